//! Field type → input control dispatch.
//!
//! Each schema field maps to exactly one control configuration. The mapping
//! is total: `TIME` and unrecognized type tags fall back to a plain text
//! input, mirroring the behavior of the system this console fronts.

use crate::field::{ColumnType, SchemaField, SelectionOption};

/// Rows used for a multi-line text control when the schema declares none.
pub const DEFAULT_TEXT_ROWS: u16 = 4;

/// The concrete input control for one field, with its constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlKind {
    /// Single-line text. Also the defined fallback for `TIME` and unknown
    /// type tags.
    TextInput {
        max_length: Option<u32>,
        allow_clear: bool,
    },
    /// Multi-line text.
    TextArea {
        rows: u16,
        max_length: Option<u32>,
        show_count: bool,
        allow_clear: bool,
    },
    /// Numeric entry.
    Number {
        min: Option<f64>,
        max: Option<f64>,
        precision: Option<u8>,
    },
    /// Fixed yes/no choice.
    BoolSelect,
    /// Enumerated choice; option order preserved from the schema.
    Select { options: Vec<SelectionOption> },
    /// Calendar date, no time component.
    DatePicker,
}

impl ControlKind {
    /// The finite choice list for choice-like controls: `(stored value,
    /// display label)` pairs. `None` for free-form controls.
    pub fn choices(&self) -> Option<Vec<(String, String)>> {
        match self {
            Self::BoolSelect => Some(vec![
                ("true".into(), "yes".into()),
                ("false".into(), "no".into()),
            ]),
            Self::Select { options } => Some(
                options
                    .iter()
                    .map(|o| (o.value.clone(), o.label.clone()))
                    .collect(),
            ),
            _ => None,
        }
    }
}

/// Control configuration for one rendered field.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSpec {
    pub kind: ControlKind,
    pub disabled: bool,
}

/// Resolve the control for a field from its type tag and UI properties.
pub fn control_spec(field: &SchemaField) -> ControlSpec {
    let props = &field.props;
    let kind = match field.column_type() {
        ColumnType::String => ControlKind::TextInput {
            max_length: props.max_length,
            allow_clear: props.allow_clear,
        },
        ColumnType::Text => ControlKind::TextArea {
            rows: props.rows.unwrap_or(DEFAULT_TEXT_ROWS),
            max_length: props.max_length,
            show_count: props.show_count,
            allow_clear: props.allow_clear,
        },
        ColumnType::Double => ControlKind::Number {
            min: props.min,
            max: props.max,
            precision: props.precision,
        },
        ColumnType::Boolean => ControlKind::BoolSelect,
        ColumnType::Selection => ControlKind::Select {
            options: field
                .field
                .selection_details
                .as_ref()
                .map(|d| d.options.clone())
                .unwrap_or_default(),
        },
        ColumnType::Date => ControlKind::DatePicker,
        // TIME deliberately renders as plain text, as the source system does.
        ColumnType::Time | ColumnType::Other(_) => ControlKind::TextInput {
            max_length: props.max_length,
            allow_clear: props.allow_clear,
        },
    };
    ControlSpec {
        kind,
        disabled: props.disabled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldDefinition, SelectionDetails};
    use pretty_assertions::assert_eq;

    fn field(column_type: ColumnType, props: &str) -> SchemaField {
        SchemaField::new(FieldDefinition {
            define_id: 1,
            title: "F".into(),
            data_index: "f".into(),
            column_type,
            create_required: false,
            required: false,
            ui_field_properties: props.to_string(),
            selection_details: None,
        })
    }

    #[test]
    fn string_maps_to_text_input_with_constraints() {
        let spec = control_spec(&field(
            ColumnType::String,
            r#"{"maxLength":17,"allowClear":true,"disabled":true}"#,
        ));
        assert!(spec.disabled);
        assert_eq!(
            spec.kind,
            ControlKind::TextInput {
                max_length: Some(17),
                allow_clear: true
            }
        );
    }

    #[test]
    fn text_area_defaults_to_four_rows() {
        let spec = control_spec(&field(ColumnType::Text, "{}"));
        assert_eq!(
            spec.kind,
            ControlKind::TextArea {
                rows: 4,
                max_length: None,
                show_count: false,
                allow_clear: false
            }
        );
    }

    #[test]
    fn double_carries_numeric_bounds() {
        let spec = control_spec(&field(
            ColumnType::Double,
            r#"{"min":0,"max":100,"precision":2}"#,
        ));
        assert_eq!(
            spec.kind,
            ControlKind::Number {
                min: Some(0.0),
                max: Some(100.0),
                precision: Some(2)
            }
        );
    }

    #[test]
    fn boolean_offers_fixed_yes_no() {
        let spec = control_spec(&field(ColumnType::Boolean, ""));
        assert_eq!(
            spec.kind.choices(),
            Some(vec![
                ("true".into(), "yes".into()),
                ("false".into(), "no".into())
            ])
        );
    }

    #[test]
    fn selection_preserves_option_order() {
        let mut f = field(ColumnType::Selection, "");
        f.field.selection_details = Some(SelectionDetails {
            options: vec![
                SelectionOption {
                    value: "Z".into(),
                    label: "Last letter".into(),
                },
                SelectionOption {
                    value: "A".into(),
                    label: "First letter".into(),
                },
            ],
        });
        let spec = control_spec(&f);
        let choices = spec.kind.choices().unwrap();
        assert_eq!(choices[0].0, "Z");
        assert_eq!(choices[1].0, "A");
    }

    #[test]
    fn time_and_unknown_fall_back_to_plain_text() {
        for ty in [ColumnType::Time, ColumnType::Other("GEOMETRY".into())] {
            let spec = control_spec(&field(ty, ""));
            assert!(matches!(spec.kind, ControlKind::TextInput { .. }));
        }
    }
}
