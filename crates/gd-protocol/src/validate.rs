//! Preference validation and normalization.
//!
//! Untrusted input (request bodies, completion-service output, stale stored
//! rows) arrives as a loose JSON object. [`normalize`] turns any such candidate
//! into a complete [`PreferenceSet`]; it never fails. [`validate_shape`] is the
//! only fallible entry point and only checks that the input is a JSON object.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::preferences::{
    Accessibility, AnimationStyle, BorderRadius, ColorScheme, DEFAULT_PREFERENCES, FontFamily,
    FontSize, HexColor, IconStyle, Layout, PreferenceSet, Shadow, Theme,
};

/// A partial, unvalidated preference object.
pub type Candidate = Map<String, Value>;

/// Top-level wire names of every `PreferenceSet` field.
pub const PREFERENCE_FIELDS: &[&str] = &[
    "theme",
    "fontSize",
    "layout",
    "colorScheme",
    "accessibility",
    "accentColor",
    "backgroundColor",
    "fontFamily",
    "borderRadius",
    "shadow",
    "backgroundImage",
    "iconStyle",
    "iconColor",
    "animationStyle",
];

/// Shape errors raised at outer boundaries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("invalid hex color: {0:?}")]
    InvalidHexColor(String),
}

/// Parse raw bytes and require a JSON object.
pub fn validate_shape(raw: &[u8]) -> Result<Candidate, SchemaError> {
    let value: Value =
        serde_json::from_slice(raw).map_err(|e| SchemaError::InvalidJson(e.to_string()))?;
    require_object(value)
}

/// Require an already-parsed value to be a JSON object.
pub fn require_object(value: Value) -> Result<Candidate, SchemaError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(SchemaError::NotAnObject(json_kind(&other))),
    }
}

/// Fill every missing or out-of-domain field from [`DEFAULT_PREFERENCES`].
pub fn normalize(candidate: &Candidate) -> PreferenceSet {
    merge_over(&DEFAULT_PREFERENCES, candidate)
}

/// Overlay a candidate onto `base`, keeping only in-domain candidate values.
///
/// `accessibility` is merged key-by-key; every other field is replaced
/// wholesale or not at all. An explicit `null` (or blank string) for
/// `backgroundImage` clears it.
pub fn merge_over(base: &PreferenceSet, candidate: &Candidate) -> PreferenceSet {
    PreferenceSet {
        theme: pick(candidate, "theme").unwrap_or(base.theme),
        font_size: pick(candidate, "fontSize").unwrap_or(base.font_size),
        layout: pick(candidate, "layout").unwrap_or(base.layout),
        color_scheme: pick(candidate, "colorScheme").unwrap_or(base.color_scheme),
        accessibility: merge_accessibility(base.accessibility, candidate.get("accessibility")),
        accent_color: pick(candidate, "accentColor").unwrap_or(base.accent_color),
        background_color: pick(candidate, "backgroundColor").unwrap_or(base.background_color),
        font_family: pick(candidate, "fontFamily").unwrap_or(base.font_family),
        border_radius: pick(candidate, "borderRadius").unwrap_or(base.border_radius),
        shadow: pick(candidate, "shadow").unwrap_or(base.shadow),
        background_image: match candidate.get("backgroundImage") {
            Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            _ => base.background_image.clone(),
        },
        icon_style: pick(candidate, "iconStyle").unwrap_or(base.icon_style),
        icon_color: pick(candidate, "iconColor").unwrap_or(base.icon_color),
        animation_style: pick(candidate, "animationStyle").unwrap_or(base.animation_style),
    }
}

/// Number of preference fields whose candidate value is in domain.
///
/// Unknown keys and out-of-domain values do not count, so a candidate scoring
/// zero would normalize to the defaults alone.
pub fn valid_fields(candidate: &Candidate) -> usize {
    let checks = [
        pick::<Theme>(candidate, "theme").is_some(),
        pick::<FontSize>(candidate, "fontSize").is_some(),
        pick::<Layout>(candidate, "layout").is_some(),
        pick::<ColorScheme>(candidate, "colorScheme").is_some(),
        accessibility_is_valid(candidate.get("accessibility")),
        pick::<HexColor>(candidate, "accentColor").is_some(),
        pick::<HexColor>(candidate, "backgroundColor").is_some(),
        pick::<FontFamily>(candidate, "fontFamily").is_some(),
        pick::<BorderRadius>(candidate, "borderRadius").is_some(),
        pick::<Shadow>(candidate, "shadow").is_some(),
        matches!(
            candidate.get("backgroundImage"),
            Some(Value::Null | Value::String(_))
        ),
        pick::<IconStyle>(candidate, "iconStyle").is_some(),
        pick::<HexColor>(candidate, "iconColor").is_some(),
        pick::<AnimationStyle>(candidate, "animationStyle").is_some(),
    ];
    checks.into_iter().filter(|ok| *ok).count()
}

fn pick<T: DeserializeOwned>(candidate: &Candidate, key: &str) -> Option<T> {
    candidate.get(key).and_then(|v| T::deserialize(v).ok())
}

fn merge_accessibility(base: Accessibility, value: Option<&Value>) -> Accessibility {
    let Some(Value::Object(map)) = value else {
        return base;
    };
    Accessibility {
        high_contrast: map
            .get("highContrast")
            .and_then(Value::as_bool)
            .unwrap_or(base.high_contrast),
        reduced_motion: map
            .get("reducedMotion")
            .and_then(Value::as_bool)
            .unwrap_or(base.reduced_motion),
    }
}

fn accessibility_is_valid(value: Option<&Value>) -> bool {
    let Some(Value::Object(map)) = value else {
        return false;
    };
    ["highContrast", "reducedMotion"]
        .iter()
        .any(|key| map.get(*key).is_some_and(Value::is_boolean))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
