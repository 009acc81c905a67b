//! Section grouping and ordering.
//!
//! Fields are bucketed by their `collapseId` into sections. Section display
//! order is the order in which ids first appear in the schema; field order
//! within a section is a stable sort on `inputOrder`, so ties keep their
//! schema-relative order. The input slice is never mutated.

use std::collections::HashMap;

use crate::field::SchemaField;

/// Display title used when a section's first field declares none.
pub const DEFAULT_SECTION_TITLE: &str = "General";

/// A named, ordered cluster of fields rendered together.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub fields: Vec<SchemaField>,
}

/// Partition a schema into ordered sections.
///
/// The section title comes from the `collapseTitle` of the bucket's first
/// field in original (pre-sort) order. An empty schema yields no sections.
pub fn group_fields(fields: &[SchemaField]) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for field in fields {
        let id = field.props.collapse_id.as_str();
        let slot = match slots.get(id) {
            Some(&slot) => slot,
            None => {
                sections.push(Section {
                    id: id.to_string(),
                    title: field
                        .props
                        .collapse_title
                        .clone()
                        .unwrap_or_else(|| DEFAULT_SECTION_TITLE.to_string()),
                    fields: Vec::new(),
                });
                slots.insert(id, sections.len() - 1);
                sections.len() - 1
            }
        };
        sections[slot].fields.push(field.clone());
    }

    for section in &mut sections {
        // Vec::sort_by is stable; equal order keys keep schema order.
        section
            .fields
            .sort_by(|a, b| a.props.input_order.total_cmp(&b.props.input_order));
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{ColumnType, FieldDefinition};
    use pretty_assertions::assert_eq;

    fn field(data_index: &str, props: &str) -> SchemaField {
        SchemaField::new(FieldDefinition {
            define_id: data_index.len() as i64,
            title: data_index.to_uppercase(),
            data_index: data_index.to_string(),
            column_type: ColumnType::String,
            create_required: false,
            required: false,
            ui_field_properties: props.to_string(),
            selection_details: None,
        })
    }

    fn indexes(section: &Section) -> Vec<&str> {
        section.fields.iter().map(|f| f.data_index()).collect()
    }

    #[test]
    fn empty_schema_yields_no_sections() {
        assert!(group_fields(&[]).is_empty());
    }

    #[test]
    fn orders_within_section_by_input_order() {
        let schema = vec![
            field("model", r#"{"collapseId":"01","inputOrder":1}"#),
            field("year", r#"{"collapseId":"01","inputOrder":0}"#),
        ];
        let sections = group_fields(&schema);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].id, "01");
        assert_eq!(indexes(&sections[0]), vec!["year", "model"]);
    }

    #[test]
    fn partitions_without_loss_or_duplication() {
        let schema = vec![
            field("a", r#"{"collapseId":"02"}"#),
            field("b", ""),
            field("c", r#"{"collapseId":"02"}"#),
            field("d", r#"{"collapseId":"03"}"#),
        ];
        let sections = group_fields(&schema);
        let mut all: Vec<&str> = sections.iter().flat_map(|s| indexes(s)).collect();
        all.sort();
        assert_eq!(all, vec!["a", "b", "c", "d"]);
        // First-seen order of ids: "02" (a), "01" (b, default), "03" (d).
        let ids: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["02", "01", "03"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let schema = vec![
            field("first", r#"{"inputOrder":5}"#),
            field("second", r#"{"inputOrder":5}"#),
            field("third", r#"{"inputOrder":5}"#),
        ];
        let sections = group_fields(&schema);
        assert_eq!(indexes(&sections[0]), vec!["first", "second", "third"]);
    }

    #[test]
    fn title_comes_from_first_field_in_schema_order() {
        // "late" sorts first but "early" appears first in the schema, so the
        // section keeps "early"'s title.
        let schema = vec![
            field(
                "early",
                r#"{"collapseTitle":"Basics","inputOrder":9}"#,
            ),
            field("late", r#"{"collapseTitle":"Wrong","inputOrder":0}"#),
        ];
        let sections = group_fields(&schema);
        assert_eq!(sections[0].title, "Basics");
        assert_eq!(indexes(&sections[0]), vec!["late", "early"]);
    }

    #[test]
    fn missing_title_falls_back() {
        let sections = group_fields(&[field("a", "")]);
        assert_eq!(sections[0].title, DEFAULT_SECTION_TITLE);
    }

    #[test]
    fn malformed_props_on_one_field_do_not_disturb_the_rest() {
        let schema = vec![
            field("broken", "{definitely not json"),
            field("ok", r#"{"collapseId":"07","collapseTitle":"Extras"}"#),
        ];
        let sections = group_fields(&schema);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].id, "01"); // degraded to defaults
        assert_eq!(sections[1].title, "Extras");
    }
}
