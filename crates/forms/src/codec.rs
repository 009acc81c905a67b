//! Form value codec.
//!
//! `encode` flattens the typed form state into the wire payload sent on
//! create and update; `decode` builds the typed form state from a fetched
//! record's value details. The two directions share the coercion rules in
//! [`crate::value`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::{FieldValueDetail, SchemaField};
use crate::value::FieldValue;

/// One entry of the submission payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireValue {
    #[serde(rename = "defineId")]
    pub define_id: i64,
    /// The field's `dataIndex`.
    pub name: String,
    pub value: String,
}

/// Serialize form values against the active schema.
///
/// Entries come out in schema order, one per schema field that has a form
/// entry; fields the form never touched are skipped, not defaulted. Form
/// keys with no schema counterpart are dropped silently: the two should
/// not diverge, but encoding must not fail if they briefly do.
pub fn encode(values: &BTreeMap<String, FieldValue>, schema: &[SchemaField]) -> Vec<WireValue> {
    schema
        .iter()
        .filter_map(|field| {
            values.get(field.data_index()).map(|value| WireValue {
                define_id: field.define_id(),
                name: field.data_index().to_string(),
                value: value.to_wire(),
            })
        })
        .collect()
}

/// Build the typed form state from a record's value details, applying the
/// per-type coercions of [`FieldValue::from_stored`].
pub fn decode(details: &[FieldValueDetail]) -> BTreeMap<String, FieldValue> {
    details
        .iter()
        .map(|detail| {
            (
                detail.data_index.clone(),
                FieldValue::from_stored(&detail.column_type, &detail.value),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{ColumnType, FieldDefinition};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn schema_field(define_id: i64, data_index: &str, column_type: ColumnType) -> SchemaField {
        SchemaField::new(FieldDefinition {
            define_id,
            title: data_index.to_uppercase(),
            data_index: data_index.to_string(),
            column_type,
            create_required: false,
            required: false,
            ui_field_properties: String::new(),
            selection_details: None,
        })
    }

    #[test]
    fn encodes_in_schema_order_with_typed_stringification() {
        let schema = vec![
            schema_field(1, "carModal", ColumnType::String),
            schema_field(2, "purchasedAt", ColumnType::Date),
            schema_field(3, "carYear", ColumnType::Double),
            schema_field(4, "inService", ColumnType::Boolean),
        ];
        let mut values = BTreeMap::new();
        values.insert("carYear".to_string(), FieldValue::Number(2020.0));
        values.insert("carModal".to_string(), FieldValue::Text("K5".into()));
        values.insert(
            "purchasedAt".to_string(),
            FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()),
        );
        values.insert("inService".to_string(), FieldValue::Bool(true));

        let wire = encode(&values, &schema);
        assert_eq!(
            wire,
            vec![
                WireValue {
                    define_id: 1,
                    name: "carModal".into(),
                    value: "K5".into()
                },
                WireValue {
                    define_id: 2,
                    name: "purchasedAt".into(),
                    value: "2024-03-05".into()
                },
                WireValue {
                    define_id: 3,
                    name: "carYear".into(),
                    value: "2020".into()
                },
                WireValue {
                    define_id: 4,
                    name: "inService".into(),
                    value: "true".into()
                },
            ]
        );
    }

    #[test]
    fn skips_untouched_fields_and_drops_unknown_keys() {
        let schema = vec![
            schema_field(1, "carModal", ColumnType::String),
            schema_field(2, "carYear", ColumnType::Double),
        ];
        let mut values = BTreeMap::new();
        values.insert("carYear".to_string(), FieldValue::Number(2021.0));
        values.insert("ghost".to_string(), FieldValue::Text("boo".into()));

        let wire = encode(&values, &schema);
        assert_eq!(wire.len(), 1);
        assert_eq!(wire[0].name, "carYear");
    }

    #[test]
    fn empty_values_encode_as_empty_strings() {
        let schema = vec![schema_field(1, "carModal", ColumnType::String)];
        let mut values = BTreeMap::new();
        values.insert("carModal".to_string(), FieldValue::Empty);
        assert_eq!(encode(&values, &schema)[0].value, "");
    }

    #[test]
    fn wire_value_serializes_with_define_id_key() {
        let json = serde_json::to_string(&WireValue {
            define_id: 9,
            name: "carModal".into(),
            value: "EV6".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"defineId":9,"name":"carModal","value":"EV6"}"#);
    }

    fn detail(data_index: &str, column_type: ColumnType, value: &str) -> FieldValueDetail {
        FieldValueDetail {
            define_id: 1,
            title: data_index.to_uppercase(),
            data_index: data_index.to_string(),
            value: value.to_string(),
            column_type,
            required: false,
            column_order: 0,
            ui_field_properties: String::new(),
            selection_details: None,
        }
    }

    #[test]
    fn decode_applies_type_coercions() {
        let values = decode(&[
            detail("carYear", ColumnType::Double, "2021"),
            detail("inService", ColumnType::Boolean, "false"),
            detail("purchasedAt", ColumnType::Date, "2023-11-30"),
            detail("carModal", ColumnType::String, "Sorento"),
        ]);
        assert_eq!(values["carYear"], FieldValue::Number(2021.0));
        assert_eq!(values["inService"], FieldValue::Bool(false));
        assert_eq!(
            values["purchasedAt"],
            FieldValue::Date(NaiveDate::from_ymd_opt(2023, 11, 30).unwrap())
        );
        assert_eq!(values["carModal"], FieldValue::Text("Sorento".into()));
    }

    #[test]
    fn decode_then_encode_round_trips_dates_and_numbers() {
        let details = vec![
            detail("carYear", ColumnType::Double, "2021"),
            detail("purchasedAt", ColumnType::Date, "2024-03-05"),
        ];
        let schema: Vec<SchemaField> = details
            .iter()
            .cloned()
            .map(|d| SchemaField::new(d.into_parts().0))
            .collect();
        let wire = encode(&decode(&details), &schema);
        let by_name: BTreeMap<_, _> = wire.into_iter().map(|w| (w.name.clone(), w.value)).collect();
        assert_eq!(by_name["carYear"], "2021");
        assert_eq!(by_name["purchasedAt"], "2024-03-05");
    }
}
