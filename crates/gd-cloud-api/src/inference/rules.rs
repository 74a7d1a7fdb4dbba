//! Rule-based inference engine: ordered keyword tables per field.
//!
//! The availability floor of the service. Pure, deterministic, and total:
//! every prompt maps to a complete `PreferenceSet` with no I/O.
//!
//! Each field has its own table of `(keyword, value)` pairs. The first keyword
//! found anywhere in the lowercased prompt wins; otherwise the field default
//! applies. Fields are decided independently, so one word can drive several
//! fields at once ("dark" sets both `theme` and `backgroundColor`).

use async_trait::async_trait;
use gd_protocol::{
    Accessibility, AnimationStyle, BorderRadius, Candidate, ColorScheme, FontFamily, FontSize,
    HexColor, IconStyle, Layout, PreferenceSet, Shadow, Theme,
};

use super::{InferenceError, PreferenceEngine};

/// An ordered first-match table for one field.
struct FieldRule<T: 'static> {
    matches: &'static [(&'static str, T)],
    default: T,
}

impl<T: Copy + 'static> FieldRule<T> {
    fn decide(&self, lower: &str) -> T {
        self.matches
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, value)| *value)
            .unwrap_or(self.default)
    }
}

/// Brand green used when no color keyword is present.
const BRAND_COLOR: HexColor = HexColor::rgb(0x4CAF50);

/// Image reference served for racing prompts.
pub const RACING_BACKGROUND: &str = "racing-background.jpg";

const THEME: FieldRule<Theme> = FieldRule {
    matches: &[("dark", Theme::Dark), ("modern", Theme::Modern)],
    default: Theme::Light,
};

const FONT_SIZE: FieldRule<FontSize> = FieldRule {
    matches: &[("large", FontSize::Large), ("small", FontSize::Small)],
    default: FontSize::Medium,
};

const LAYOUT: FieldRule<Layout> = FieldRule {
    matches: &[("minimal", Layout::Minimal), ("detailed", Layout::Detailed)],
    default: Layout::Modern,
};

const COLOR_SCHEME: FieldRule<ColorScheme> = FieldRule {
    matches: &[
        ("contrast", ColorScheme::HighContrast),
        ("calm", ColorScheme::Calm),
    ],
    default: ColorScheme::Vibrant,
};

const HIGH_CONTRAST: FieldRule<bool> = FieldRule {
    matches: &[("contrast", true)],
    default: false,
};

const REDUCED_MOTION: FieldRule<bool> = FieldRule {
    matches: &[("motion", true)],
    default: false,
};

// Shared by accentColor and iconColor.
const ACCENT_COLOR: FieldRule<HexColor> = FieldRule {
    matches: &[
        ("red", HexColor::rgb(0xFF0000)),
        ("blue", HexColor::rgb(0x0000FF)),
        ("green", HexColor::rgb(0x00FF00)),
    ],
    default: BRAND_COLOR,
};

const BACKGROUND_COLOR: FieldRule<HexColor> = FieldRule {
    matches: &[("dark", HexColor::rgb(0x121212))],
    default: HexColor::rgb(0xFFFFFF),
};

const FONT_FAMILY: FieldRule<FontFamily> = FieldRule {
    matches: &[("italic", FontFamily::Italic), ("bold", FontFamily::Bold)],
    default: FontFamily::Modern,
};

const BACKGROUND_IMAGE: FieldRule<Option<&'static str>> = FieldRule {
    matches: &[("racing", Some(RACING_BACKGROUND))],
    default: None,
};

const ICON_STYLE: FieldRule<IconStyle> = FieldRule {
    matches: &[("racing", IconStyle::Sharp)],
    default: IconStyle::Material,
};

const ANIMATION_STYLE: FieldRule<AnimationStyle> = FieldRule {
    matches: &[("racing", AnimationStyle::Dynamic)],
    default: AnimationStyle::Subtle,
};

/// Map a prompt to preferences using the keyword tables.
pub fn infer_preferences(prompt: &str) -> PreferenceSet {
    let lower = prompt.to_lowercase();
    let lower = lower.as_str();
    let accent = ACCENT_COLOR.decide(lower);

    PreferenceSet {
        theme: THEME.decide(lower),
        font_size: FONT_SIZE.decide(lower),
        layout: LAYOUT.decide(lower),
        color_scheme: COLOR_SCHEME.decide(lower),
        accessibility: Accessibility {
            high_contrast: HIGH_CONTRAST.decide(lower),
            reduced_motion: REDUCED_MOTION.decide(lower),
        },
        accent_color: accent,
        background_color: BACKGROUND_COLOR.decide(lower),
        font_family: FONT_FAMILY.decide(lower),
        border_radius: BorderRadius::Medium,
        shadow: Shadow::Subtle,
        background_image: BACKGROUND_IMAGE.decide(lower).map(str::to_string),
        icon_style: ICON_STYLE.decide(lower),
        icon_color: accent,
        animation_style: ANIMATION_STYLE.decide(lower),
    }
}

/// Keyword-table inference engine.
pub struct RuleBasedEngine;

impl RuleBasedEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RuleBasedEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PreferenceEngine for RuleBasedEngine {
    async fn infer(&self, prompt: &str) -> Result<Candidate, InferenceError> {
        Ok(infer_preferences(prompt).to_candidate())
    }

    fn tier_name(&self) -> &str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gd_protocol::normalize;

    // ── Concrete prompts ─────────────────────────────────────────

    #[test]
    fn dark_with_red_accent() {
        let p = infer_preferences("make it dark and use red accent");
        assert_eq!(p.theme, Theme::Dark);
        assert_eq!(p.background_color.to_string(), "#121212");
        assert_eq!(p.accent_color.to_string(), "#FF0000");
        assert_eq!(p.icon_color.to_string(), "#FF0000");
    }

    #[test]
    fn racing_background_with_sharp_icons() {
        let p = infer_preferences("racing background, sharp icons");
        assert_eq!(p.background_image.as_deref(), Some(RACING_BACKGROUND));
        assert_eq!(p.icon_style, IconStyle::Sharp);
        assert_eq!(p.animation_style, AnimationStyle::Dynamic);
    }

    #[test]
    fn empty_prompt_uses_field_defaults() {
        let p = infer_preferences("");
        assert_eq!(p.theme, Theme::Light);
        assert_eq!(p.font_size, FontSize::Medium);
        assert_eq!(p.layout, Layout::Modern);
        assert_eq!(p.color_scheme, ColorScheme::Vibrant);
        assert!(!p.accessibility.high_contrast);
        assert!(!p.accessibility.reduced_motion);
        assert_eq!(p.accent_color, BRAND_COLOR);
        assert_eq!(p.icon_color, BRAND_COLOR);
        assert_eq!(p.background_color.to_string(), "#FFFFFF");
        assert_eq!(p.font_family, FontFamily::Modern);
        assert_eq!(p.border_radius, BorderRadius::Medium);
        assert_eq!(p.shadow, Shadow::Subtle);
        assert!(p.background_image.is_none());
        assert_eq!(p.icon_style, IconStyle::Material);
        assert_eq!(p.animation_style, AnimationStyle::Subtle);
    }

    // ── Precedence ───────────────────────────────────────────────

    #[test]
    fn first_keyword_in_table_wins() {
        // "dark" precedes "modern" in the theme table regardless of prompt order.
        assert_eq!(infer_preferences("modern but dark").theme, Theme::Dark);
        assert_eq!(infer_preferences("small text, large icons").font_size, FontSize::Large);
        assert_eq!(infer_preferences("detailed yet minimal").layout, Layout::Minimal);
        assert_eq!(
            infer_preferences("green, blue and red").accent_color,
            HexColor::rgb(0xFF0000)
        );
        assert_eq!(
            infer_preferences("blue or green").accent_color,
            HexColor::rgb(0x0000FF)
        );
        assert_eq!(infer_preferences("bold italic").font_family, FontFamily::Italic);
    }

    #[test]
    fn fields_are_decided_independently() {
        let p = infer_preferences("dark with high contrast and reduced motion");
        assert_eq!(p.theme, Theme::Dark);
        assert_eq!(p.color_scheme, ColorScheme::HighContrast);
        assert!(p.accessibility.high_contrast);
        assert!(p.accessibility.reduced_motion);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let p = infer_preferences("DARK Mode With BLUE and Calm vibes");
        assert_eq!(p.theme, Theme::Dark);
        assert_eq!(p.accent_color, HexColor::rgb(0x0000FF));
        assert_eq!(p.color_scheme, ColorScheme::Calm);
    }

    #[test]
    fn keywords_match_as_substrings() {
        // "darker" contains "dark", "boldly" contains "bold"
        let p = infer_preferences("a darker look, boldly styled");
        assert_eq!(p.theme, Theme::Dark);
        assert_eq!(p.font_family, FontFamily::Bold);
    }

    #[test]
    fn fixed_fields_ignore_prompt() {
        let p = infer_preferences("no shadow, square corners, large radius");
        assert_eq!(p.border_radius, BorderRadius::Medium);
        assert_eq!(p.shadow, Shadow::Subtle);
    }

    // ── Totality & determinism ───────────────────────────────────

    #[test]
    fn output_is_total_and_deterministic() {
        let long = "racing ".repeat(10_000);
        let prompts = [
            "",
            " ",
            "ダークモードにして",
            "🚗💨 racing!!",
            "\u{0}\n\t",
            "ÉNORME et SOMBRE",
            long.as_str(),
        ];
        for prompt in prompts {
            let first = infer_preferences(prompt);
            let second = infer_preferences(prompt);
            assert_eq!(first, second, "non-deterministic for {prompt:?}");
            // already fully in-domain: normalizing changes nothing
            assert_eq!(normalize(&first.to_candidate()), first);
        }
    }

    #[tokio::test]
    async fn engine_candidate_matches_pure_function() {
        let engine = RuleBasedEngine::new();
        let candidate = engine.infer("calm blue minimal").await.unwrap();
        assert_eq!(normalize(&candidate), infer_preferences("calm blue minimal"));
        assert_eq!(engine.tier_name(), "local");
    }
}
