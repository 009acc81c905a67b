//! Typed UI properties.
//!
//! Field definitions carry presentation and validation hints as a JSON string
//! (`uiFieldProperties`). The blob is parsed once per field, when the schema
//! arrives, into this struct. Parsing is deliberately forgiving: an absent,
//! empty, or malformed blob yields the defaults, and a handful of fields
//! accept the sloppy encodings observed in real schemas (numeric section ids,
//! string-encoded order keys). A bad blob on one field must never take down
//! the rest of the form.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Section id used when a field declares none.
pub const DEFAULT_COLLAPSE_ID: &str = "01";

/// Presentation and validation hints for one field.
///
/// Only the keys the renderer understands are kept; unknown keys are
/// ignored. All keys are optional on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiProps {
    /// Section this field belongs to.
    #[serde(deserialize_with = "lenient_collapse_id")]
    pub collapse_id: String,
    /// Display name of the section; only the section's first field is
    /// consulted.
    pub collapse_title: Option<String>,
    /// Sort key within the section; ties keep schema order.
    #[serde(deserialize_with = "lenient_order")]
    pub input_order: f64,
    pub disabled: bool,
    pub max_length: Option<u32>,
    pub allow_clear: bool,
    /// Visible rows of a multi-line text control.
    pub rows: Option<u16>,
    pub show_count: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub precision: Option<u8>,
    /// Pre-filled value for creation forms; arbitrary JSON on the wire.
    pub initial_value: Option<Value>,
}

impl Default for UiProps {
    fn default() -> Self {
        Self {
            collapse_id: DEFAULT_COLLAPSE_ID.to_string(),
            collapse_title: None,
            input_order: 0.0,
            disabled: false,
            max_length: None,
            allow_clear: false,
            rows: None,
            show_count: false,
            min: None,
            max: None,
            precision: None,
            initial_value: None,
        }
    }
}

impl UiProps {
    /// Parse a raw `uiFieldProperties` blob. Never fails; malformed input
    /// degrades to [`UiProps::default`].
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str(raw) {
            Ok(props) => props,
            Err(err) => {
                tracing::debug!(%err, raw, "unparsable ui properties, falling back to defaults");
                Self::default()
            }
        }
    }

    /// The initial value rendered to its stored-string form, if one is
    /// declared and representable.
    pub fn initial_value_text(&self) -> Option<String> {
        match self.initial_value.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Section ids are written as strings, but some schemas emit bare numbers.
fn lenient_collapse_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => s,
        Value::Number(n) => n.to_string(),
        _ => DEFAULT_COLLAPSE_ID.to_string(),
    })
}

/// Order keys are numbers, but string-encoded numbers appear in the wild.
fn lenient_order<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_and_malformed_blobs_yield_defaults() {
        assert_eq!(UiProps::parse(""), UiProps::default());
        assert_eq!(UiProps::parse("   "), UiProps::default());
        assert_eq!(UiProps::parse("{not json"), UiProps::default());
        assert_eq!(UiProps::parse("[1,2,3]"), UiProps::default());
    }

    #[test]
    fn defaults_match_contract() {
        let props = UiProps::default();
        assert_eq!(props.collapse_id, "01");
        assert_eq!(props.input_order, 0.0);
        assert!(!props.disabled);
        assert_eq!(props.rows, None);
    }

    #[test]
    fn parses_full_blob() {
        let props = UiProps::parse(
            r#"{"collapseId":"02","collapseTitle":"Specs","inputOrder":3,
                "disabled":true,"maxLength":80,"allowClear":true,"rows":6,
                "showCount":true,"min":0,"max":9.5,"precision":1,
                "initialValue":"sedan"}"#,
        );
        assert_eq!(props.collapse_id, "02");
        assert_eq!(props.collapse_title.as_deref(), Some("Specs"));
        assert_eq!(props.input_order, 3.0);
        assert!(props.disabled);
        assert_eq!(props.max_length, Some(80));
        assert_eq!(props.rows, Some(6));
        assert_eq!(props.min, Some(0.0));
        assert_eq!(props.max, Some(9.5));
        assert_eq!(props.precision, Some(1));
        assert_eq!(props.initial_value_text().as_deref(), Some("sedan"));
    }

    #[test]
    fn tolerates_sloppy_encodings() {
        let props = UiProps::parse(r#"{"collapseId":2,"inputOrder":"10"}"#);
        assert_eq!(props.collapse_id, "2");
        assert_eq!(props.input_order, 10.0);
    }

    #[test]
    fn ignores_unknown_keys() {
        let props = UiProps::parse(r#"{"width":300,"collapseId":"05"}"#);
        assert_eq!(props.collapse_id, "05");
    }

    #[test]
    fn initial_value_text_covers_scalars() {
        assert_eq!(
            UiProps::parse(r#"{"initialValue":5}"#).initial_value_text(),
            Some("5".into())
        );
        assert_eq!(
            UiProps::parse(r#"{"initialValue":true}"#).initial_value_text(),
            Some("true".into())
        );
        assert_eq!(
            UiProps::parse(r#"{"initialValue":{"a":1}}"#).initial_value_text(),
            None
        );
    }
}
