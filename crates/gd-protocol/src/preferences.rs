use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validate::SchemaError;

/// Strict `#RRGGBB` pattern. Shorthand (`#FFF`), alpha, and named colors are rejected.
static RE_HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());

/// Dashboard base theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    Light,
    Dark,
    Modern,
    Minimal,
    Gradient,
    Neon,
    Pastel,
    Monochrome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontSize {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

/// Widget arrangement on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Layout {
    Minimal,
    Standard,
    Detailed,
    Modern,
    Grid,
    Card,
    Split,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorScheme {
    Default,
    HighContrast,
    Calm,
    Vibrant,
    Professional,
    Playful,
    Elegant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontFamily {
    Default,
    Modern,
    Elegant,
    Playful,
    Tech,
    Italic,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BorderRadius {
    Small,
    Medium,
    Large,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Shadow {
    None,
    Subtle,
    Medium,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IconStyle {
    Material,
    Outlined,
    Filled,
    Rounded,
    Sharp,
    #[serde(rename = "two-tone")]
    TwoTone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationStyle {
    None,
    Subtle,
    Moderate,
    Dynamic,
}

/// A 24-bit RGB color, serialized as `#RRGGBB` (uppercase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(u32);

impl HexColor {
    /// Build a color from a `0xRRGGBB` literal. Bits above 24 are dropped.
    pub const fn rgb(value: u32) -> Self {
        Self(value & 0x00FF_FFFF)
    }

    /// Parse a strict `#RRGGBB` string (either case).
    pub fn parse(s: &str) -> Result<Self, SchemaError> {
        if !RE_HEX_COLOR.is_match(s) {
            return Err(SchemaError::InvalidHexColor(s.to_string()));
        }
        u32::from_str_radix(&s[1..], 16)
            .map(Self)
            .map_err(|_| SchemaError::InvalidHexColor(s.to_string()))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

impl TryFrom<String> for HexColor {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

/// Accessibility toggles. The only nested structure in a `PreferenceSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessibility {
    pub high_contrast: bool,
    pub reduced_motion: bool,
}

/// The complete, validated set of dashboard presentation preferences.
///
/// Every field is always populated with an in-domain value; `background_image`
/// is the only nullable field. Build one from untrusted input with
/// [`crate::normalize`] rather than deserializing directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceSet {
    pub theme: Theme,
    pub font_size: FontSize,
    pub layout: Layout,
    pub color_scheme: ColorScheme,
    pub accessibility: Accessibility,
    pub accent_color: HexColor,
    pub background_color: HexColor,
    pub font_family: FontFamily,
    pub border_radius: BorderRadius,
    pub shadow: Shadow,
    pub background_image: Option<String>,
    pub icon_style: IconStyle,
    pub icon_color: HexColor,
    pub animation_style: AnimationStyle,
}

/// Process-wide defaults used to fill any missing or invalid field.
pub const DEFAULT_PREFERENCES: PreferenceSet = PreferenceSet {
    theme: Theme::Light,
    font_size: FontSize::Medium,
    layout: Layout::Standard,
    color_scheme: ColorScheme::Default,
    accessibility: Accessibility {
        high_contrast: false,
        reduced_motion: false,
    },
    accent_color: HexColor::rgb(0x1976D2),
    background_color: HexColor::rgb(0xFFFFFF),
    font_family: FontFamily::Modern,
    border_radius: BorderRadius::Medium,
    shadow: Shadow::Subtle,
    background_image: None,
    icon_style: IconStyle::Material,
    icon_color: HexColor::rgb(0x1976D2),
    animation_style: AnimationStyle::Subtle,
};

impl Default for PreferenceSet {
    fn default() -> Self {
        DEFAULT_PREFERENCES
    }
}

impl PreferenceSet {
    /// Flatten into a JSON object, the same shape the validator accepts.
    pub fn to_candidate(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}
