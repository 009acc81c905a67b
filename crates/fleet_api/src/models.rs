//! Wire models of the inventory service.
//!
//! Records are dynamic: apart from the identifier and lifecycle state every
//! column is declared by the server's table schema, so [`CarRecord`] keeps
//! its remaining fields as a flattened map keyed by `dataIndex`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle state of a record. Deletion is a state flip, never a destroy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordState {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "SOFT_DELETED")]
    SoftDeleted,
}

impl RecordState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::SoftDeleted => "SOFT_DELETED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::SoftDeleted => "deleted",
        }
    }
}

/// One column of the list view, as declared by the table-headers endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableHeader {
    pub id: i64,
    pub title: String,
    pub data_index: String,
    /// Raw JSON presentation hints; parse with [`TableHeader::column_props`].
    #[serde(default)]
    pub ui_column_properties: String,
}

impl TableHeader {
    /// Parsed column hints; malformed blobs degrade to defaults.
    pub fn column_props(&self) -> ColumnProps {
        ColumnProps::parse(&self.ui_column_properties)
    }
}

/// Presentation hints of one list column.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColumnProps {
    pub width: Option<u16>,
}

impl ColumnProps {
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        serde_json::from_str(raw).unwrap_or_default()
    }
}

/// One row of the list view. Dynamic columns live in `values`, keyed by the
/// table headers' `dataIndex`; stored values are strings on the wire but are
/// kept as raw JSON here so a misbehaving server cannot break listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarRecord {
    #[serde(rename = "objectUUID")]
    pub object_uuid: String,
    #[serde(default)]
    pub state: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, Value>,
}

impl CarRecord {
    /// A column's display text; empty for absent or non-scalar values.
    pub fn text(&self, data_index: &str) -> String {
        match self.values.get(data_index) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    pub fn record_state(&self) -> Option<RecordState> {
        match self.state.as_str() {
            "ACTIVE" => Some(RecordState::Active),
            "SOFT_DELETED" => Some(RecordState::SoftDeleted),
            _ => None,
        }
    }
}

/// Pagination block of a list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_elements: u64,
    pub page: u64,
    pub size: u64,
    #[serde(default)]
    pub has_next: bool,
}

/// One page of list results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarPage {
    pub page: PageInfo,
    pub response_list: Vec<CarRecord>,
}

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }
}

/// Search/filter/pagination/sort request for the list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub keyword: Option<String>,
    pub state: Option<RecordState>,
    pub page: u64,
    pub size: u64,
    pub order: Option<SortOrder>,
    pub field: String,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            keyword: None,
            state: None,
            page: 1,
            size: 10,
            order: None,
            field: String::new(),
        }
    }
}

/// Full detail of one record: its field definitions with current values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarDetail {
    #[serde(rename = "objectUUID")]
    pub object_uuid: String,
    pub value_details: Vec<forms::FieldValueDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn car_page_deserializes_dynamic_columns() {
        let json = r#"{
            "page": { "totalElements": 42, "page": 2, "size": 10, "hasNext": true },
            "responseList": [
                {
                    "objectUUID": "u-1",
                    "state": "ACTIVE",
                    "carModal": "K5",
                    "carYear": "2021-01-01",
                    "passangerCapacity": "5"
                }
            ]
        }"#;
        let page: CarPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.page.total_elements, 42);
        let car = &page.response_list[0];
        assert_eq!(car.object_uuid, "u-1");
        assert_eq!(car.record_state(), Some(RecordState::Active));
        assert_eq!(car.text("carModal"), "K5");
        assert_eq!(car.text("missing"), "");
    }

    #[test]
    fn table_header_column_props_parse_leniently() {
        let header = TableHeader {
            id: 1,
            title: "Model".into(),
            data_index: "carModal".into(),
            ui_column_properties: r#"{"width":140}"#.into(),
        };
        assert_eq!(header.column_props().width, Some(140));

        let broken = TableHeader {
            ui_column_properties: "{oops".into(),
            ..header
        };
        assert_eq!(broken.column_props(), ColumnProps::default());
    }

    #[test]
    fn search_params_serialize_to_the_wire_shape() {
        let params = SearchParams {
            keyword: Some("K5".into()),
            state: Some(RecordState::SoftDeleted),
            order: Some(SortOrder::Desc),
            field: "carYear".into(),
            ..SearchParams::default()
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "keyword": "K5",
                "state": "SOFT_DELETED",
                "page": 1,
                "size": 10,
                "order": "DESC",
                "field": "carYear"
            })
        );
    }

    #[test]
    fn default_search_matches_initial_list_state() {
        let params = SearchParams::default();
        assert_eq!(params.page, 1);
        assert_eq!(params.size, 10);
        assert!(params.keyword.is_none());
        assert!(params.state.is_none());
        assert!(params.order.is_none());
        assert_eq!(params.field, "");
    }

    #[test]
    fn car_detail_carries_field_value_details() {
        let json = r#"{
            "objectUUID": "u-9",
            "valueDetails": [
                {
                    "defineId": 3,
                    "title": "Year",
                    "dataIndex": "carYear",
                    "value": "2021",
                    "columnType": "DOUBLE",
                    "required": true,
                    "columnOrder": 1,
                    "uiFieldProperties": "{\"inputOrder\":2}"
                }
            ]
        }"#;
        let detail: CarDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.object_uuid, "u-9");
        assert_eq!(detail.value_details[0].value, "2021");
        assert_eq!(
            detail.value_details[0].column_type,
            forms::ColumnType::Double
        );
    }
}
