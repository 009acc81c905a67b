//! Required-field validation.
//!
//! Creation and edit flows share one validation pass but read different
//! requiredness flags from the same field definition. All violations are
//! collected and reported together; validation itself never touches the
//! network.

use thiserror::Error;

use crate::field::SchemaField;
use crate::value::FieldValue;
use std::collections::BTreeMap;

/// Which requiredness flag applies to the running form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredMode {
    /// Creation forms honor `createRequired`.
    Create,
    /// Edit forms honor `required`.
    Edit,
}

/// A required field that is missing or empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{title} is required")]
pub struct ValidationError {
    pub data_index: String,
    pub title: String,
}

/// Check every required field of the schema against the form values.
///
/// Returns one error per violating field, in schema order; an empty result
/// means the form may be submitted.
pub fn validate(
    values: &BTreeMap<String, FieldValue>,
    schema: &[SchemaField],
    mode: RequiredMode,
) -> Vec<ValidationError> {
    schema
        .iter()
        .filter(|field| match mode {
            RequiredMode::Create => field.field.create_required,
            RequiredMode::Edit => field.field.required,
        })
        .filter(|field| {
            values
                .get(field.data_index())
                .map(FieldValue::is_empty)
                .unwrap_or(true)
        })
        .map(|field| ValidationError {
            data_index: field.data_index().to_string(),
            title: field.title().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{ColumnType, FieldDefinition};
    use pretty_assertions::assert_eq;

    fn schema_field(
        data_index: &str,
        column_type: ColumnType,
        create_required: bool,
        required: bool,
    ) -> SchemaField {
        SchemaField::new(FieldDefinition {
            define_id: 1,
            title: data_index.to_uppercase(),
            data_index: data_index.to_string(),
            column_type,
            create_required,
            required,
            ui_field_properties: String::new(),
            selection_details: None,
        })
    }

    #[test]
    fn reports_exactly_the_required_and_empty_fields() {
        let schema = vec![
            schema_field("model", ColumnType::String, true, true),
            schema_field("year", ColumnType::Double, false, false),
        ];
        let mut values = BTreeMap::new();
        values.insert("model".to_string(), FieldValue::Text(String::new()));
        values.insert("year".to_string(), FieldValue::Number(2020.0));

        let errors = validate(&values, &schema, RequiredMode::Create);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].data_index, "model");
        assert_eq!(errors[0].to_string(), "MODEL is required");
    }

    #[test]
    fn missing_entries_count_as_empty() {
        let schema = vec![schema_field("model", ColumnType::String, true, true)];
        let errors = validate(&BTreeMap::new(), &schema, RequiredMode::Create);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn all_violations_surface_together() {
        let schema = vec![
            schema_field("a", ColumnType::String, true, true),
            schema_field("b", ColumnType::String, true, true),
            schema_field("c", ColumnType::String, false, false),
        ];
        let errors = validate(&BTreeMap::new(), &schema, RequiredMode::Create);
        let names: Vec<&str> = errors.iter().map(|e| e.data_index.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn create_and_edit_read_different_flags() {
        let schema = vec![schema_field("model", ColumnType::String, true, false)];
        assert_eq!(validate(&BTreeMap::new(), &schema, RequiredMode::Create).len(), 1);
        assert!(validate(&BTreeMap::new(), &schema, RequiredMode::Edit).is_empty());
    }

    #[test]
    fn false_and_zero_are_not_empty() {
        let schema = vec![
            schema_field("flag", ColumnType::Boolean, true, true),
            schema_field("count", ColumnType::Double, true, true),
        ];
        let mut values = BTreeMap::new();
        values.insert("flag".to_string(), FieldValue::Bool(false));
        values.insert("count".to_string(), FieldValue::Number(0.0));
        assert!(validate(&values, &schema, RequiredMode::Create).is_empty());
    }
}
