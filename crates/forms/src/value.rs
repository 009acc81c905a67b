//! Typed in-memory form values.
//!
//! On the wire every value is a string. In memory, values are typed per the
//! field's declared column type so editing and validation can work with real
//! dates and numbers. [`FieldValue::from_stored`] applies the coercions used
//! when loading an existing record; [`FieldValue::to_wire`] reverses them.

use chrono::NaiveDate;

use crate::field::ColumnType;

/// Wire format for calendar dates.
pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

/// The current value of one form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// No value entered. Serializes to the empty string, never to null.
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl FieldValue {
    /// Coerce a stored string into its typed form:
    ///
    /// - `DATE`   → [`FieldValue::Date`] when it parses as `YYYY-MM-DD`
    /// - `DOUBLE` → [`FieldValue::Number`] when it parses as a float
    /// - `BOOLEAN`→ true exactly when the stored string equals `"true"`
    /// - everything else stays text
    ///
    /// A stored value that fails its coercion is kept as text rather than
    /// dropped, so nothing the server sent is lost on the way back out.
    pub fn from_stored(column_type: &ColumnType, raw: &str) -> Self {
        match column_type {
            ColumnType::Boolean => Self::Bool(raw == "true"),
            ColumnType::Date => {
                if raw.is_empty() {
                    Self::Empty
                } else {
                    NaiveDate::parse_from_str(raw, WIRE_DATE_FORMAT)
                        .map(Self::Date)
                        .unwrap_or_else(|_| Self::Text(raw.to_string()))
                }
            }
            ColumnType::Double => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    Self::Empty
                } else {
                    trimmed
                        .parse::<f64>()
                        .map(Self::Number)
                        .unwrap_or_else(|_| Self::Text(raw.to_string()))
                }
            }
            _ => {
                if raw.is_empty() {
                    Self::Empty
                } else {
                    Self::Text(raw.to_string())
                }
            }
        }
    }

    /// Stringify for the wire. Dates use [`WIRE_DATE_FORMAT`]; an empty
    /// value becomes the empty string.
    pub fn to_wire(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number(*n),
            Self::Bool(b) => b.to_string(),
            Self::Date(d) => d.format(WIRE_DATE_FORMAT).to_string(),
        }
    }

    /// True when required-field validation should reject this value.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty) || matches!(self, Self::Text(s) if s.is_empty())
    }

    /// Human-readable rendering for display in a form.
    pub fn display(&self) -> String {
        self.to_wire()
    }
}

/// Format a float the way a stored numeric string looks: integral values
/// drop the decimal point.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn double_strings_become_numbers() {
        let value = FieldValue::from_stored(&ColumnType::Double, "2021");
        assert_eq!(value, FieldValue::Number(2021.0));
        assert_eq!(value.to_wire(), "2021");
    }

    #[test]
    fn fractional_numbers_round_trip() {
        let value = FieldValue::from_stored(&ColumnType::Double, "19.75");
        assert_eq!(value, FieldValue::Number(19.75));
        assert_eq!(value.to_wire(), "19.75");
    }

    #[test]
    fn dates_parse_and_format_iso() {
        let value = FieldValue::from_stored(&ColumnType::Date, "2024-03-05");
        assert_eq!(
            value,
            FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
        );
        assert_eq!(value.to_wire(), "2024-03-05");
    }

    #[test]
    fn unparsable_stored_values_stay_text() {
        assert_eq!(
            FieldValue::from_stored(&ColumnType::Date, "03/05/2024"),
            FieldValue::Text("03/05/2024".into())
        );
        assert_eq!(
            FieldValue::from_stored(&ColumnType::Double, "fast"),
            FieldValue::Text("fast".into())
        );
    }

    #[test]
    fn boolean_is_true_only_for_literal_true() {
        assert_eq!(
            FieldValue::from_stored(&ColumnType::Boolean, "true"),
            FieldValue::Bool(true)
        );
        for raw in ["false", "TRUE", "1", ""] {
            assert_eq!(
                FieldValue::from_stored(&ColumnType::Boolean, raw),
                FieldValue::Bool(false),
                "raw = {raw:?}"
            );
        }
    }

    #[test]
    fn empty_serializes_to_empty_string() {
        assert_eq!(FieldValue::Empty.to_wire(), "");
        assert!(FieldValue::Empty.is_empty());
        assert!(FieldValue::Text(String::new()).is_empty());
        assert!(!FieldValue::Bool(false).is_empty());
        assert!(!FieldValue::Number(0.0).is_empty());
    }
}
