//! Wire-level field definitions and their parsed form.
//!
//! [`FieldDefinition`] mirrors what the schema endpoints return verbatim,
//! including the raw `uiFieldProperties` JSON string. [`SchemaField`] is the
//! shape the rest of the engine works with: the definition plus its
//! properties parsed exactly once, at schema arrival.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

use crate::props::UiProps;

/// Declared type of a field, driving control dispatch and value coercion.
///
/// The set is closed on our side but open on the server's: tags we do not
/// recognize are preserved in [`ColumnType::Other`] and rendered as plain
/// text inputs.
#[derive(Debug, Clone, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    #[strum(serialize = "STRING")]
    String,
    #[strum(serialize = "TEXT")]
    Text,
    #[strum(serialize = "DOUBLE")]
    Double,
    #[strum(serialize = "BOOLEAN")]
    Boolean,
    #[strum(serialize = "SELECTION")]
    Selection,
    #[strum(serialize = "DATE")]
    Date,
    #[strum(serialize = "TIME")]
    Time,
    #[strum(default, to_string = "{0}")]
    Other(String),
}

impl From<String> for ColumnType {
    fn from(tag: String) -> Self {
        // The default variant makes this infallible.
        Self::from_str(&tag).unwrap_or(Self::Other(tag))
    }
}

impl From<ColumnType> for String {
    fn from(ty: ColumnType) -> Self {
        ty.to_string()
    }
}

/// One selectable option of a `SELECTION` field. Order is meaningful and
/// preserved end to end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionOption {
    pub value: String,
    pub label: String,
}

/// Option list attached to `SELECTION` fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionDetails {
    #[serde(default)]
    pub options: Vec<SelectionOption>,
}

/// Server-declared description of one form input, as returned by the schema
/// endpoints.
///
/// `define_id` is the wire key used on submit; `data_index` is the in-memory
/// form key and unique within one schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub define_id: i64,
    pub title: String,
    pub data_index: String,
    pub column_type: ColumnType,
    #[serde(default)]
    pub create_required: bool,
    #[serde(default)]
    pub required: bool,
    /// Raw JSON presentation hints; parse with [`UiProps::parse`].
    #[serde(default)]
    pub ui_field_properties: String,
    #[serde(default)]
    pub selection_details: Option<SelectionDetails>,
}

/// A field definition carrying the record's current value, as returned by
/// the detail endpoint for edit sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValueDetail {
    pub define_id: i64,
    pub title: String,
    pub data_index: String,
    #[serde(default)]
    pub value: String,
    pub column_type: ColumnType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub column_order: i64,
    #[serde(default)]
    pub ui_field_properties: String,
    #[serde(default)]
    pub selection_details: Option<SelectionDetails>,
}

impl FieldValueDetail {
    /// Split into the plain definition and the stored value.
    ///
    /// Detail payloads carry a single requiredness flag; it is mirrored into
    /// both slots of the definition.
    pub fn into_parts(self) -> (FieldDefinition, String) {
        let field = FieldDefinition {
            define_id: self.define_id,
            title: self.title,
            data_index: self.data_index,
            column_type: self.column_type,
            create_required: self.required,
            required: self.required,
            ui_field_properties: self.ui_field_properties,
            selection_details: self.selection_details,
        };
        (field, self.value)
    }
}

/// A field definition with its UI properties parsed. Everything downstream
/// of schema arrival (grouping, control dispatch, validation, the codec)
/// consumes this shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub field: FieldDefinition,
    pub props: UiProps,
}

impl SchemaField {
    pub fn new(field: FieldDefinition) -> Self {
        let props = UiProps::parse(&field.ui_field_properties);
        Self { field, props }
    }

    pub fn define_id(&self) -> i64 {
        self.field.define_id
    }

    pub fn data_index(&self) -> &str {
        &self.field.data_index
    }

    pub fn title(&self) -> &str {
        &self.field.title
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.field.column_type
    }
}

impl From<FieldDefinition> for SchemaField {
    fn from(field: FieldDefinition) -> Self {
        Self::new(field)
    }
}

/// Parse every definition's UI properties up front.
pub fn parse_schema(fields: Vec<FieldDefinition>) -> Vec<SchemaField> {
    fields.into_iter().map(SchemaField::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn column_type_round_trips_known_tags() {
        let ty: ColumnType = serde_json::from_str("\"DOUBLE\"").unwrap();
        assert_eq!(ty, ColumnType::Double);
        assert_eq!(serde_json::to_string(&ty).unwrap(), "\"DOUBLE\"");
    }

    #[test]
    fn column_type_preserves_unknown_tags() {
        let ty: ColumnType = serde_json::from_str("\"GEOMETRY\"").unwrap();
        assert_eq!(ty, ColumnType::Other("GEOMETRY".into()));
        assert_eq!(serde_json::to_string(&ty).unwrap(), "\"GEOMETRY\"");
    }

    #[test]
    fn field_definition_deserializes_wire_shape() {
        let json = r#"{
            "defineId": 7,
            "title": "Model",
            "dataIndex": "carModal",
            "columnType": "STRING",
            "createRequired": true,
            "required": false,
            "uiFieldProperties": "{\"collapseId\":\"02\"}",
            "selectionDetails": null
        }"#;
        let field: FieldDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(field.define_id, 7);
        assert_eq!(field.data_index, "carModal");
        assert!(field.create_required);
        assert!(!field.required);

        let parsed = SchemaField::new(field);
        assert_eq!(parsed.props.collapse_id, "02");
    }

    #[test]
    fn detail_mirrors_required_into_both_flags() {
        let detail = FieldValueDetail {
            define_id: 1,
            title: "Year".into(),
            data_index: "carYear".into(),
            value: "2021".into(),
            column_type: ColumnType::Double,
            required: true,
            column_order: 0,
            ui_field_properties: String::new(),
            selection_details: None,
        };
        let (field, value) = detail.into_parts();
        assert!(field.create_required && field.required);
        assert_eq!(value, "2021");
    }
}
