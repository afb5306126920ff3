use chrono::{NaiveDate, NaiveDateTime};

/// Separator used when rendering identifier lists into a single CSV cell.
pub const REF_LIST_SEPARATOR: &str = ";";

/// Value held by one field of a generated record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    /// Identifier of a record in another pool.
    Ref(String),
    /// Identifiers of records in another pool.
    RefList(Vec<String>),
}

impl FieldValue {
    /// Render a lossless text form for tabular output. Identifier lists are
    /// joined with [`REF_LIST_SEPARATOR`] so they survive a CSV round-trip.
    pub fn to_csv(&self) -> String {
        match self {
            FieldValue::Bool(value) => value.to_string(),
            FieldValue::Int(value) => value.to_string(),
            FieldValue::Float(value) => value.to_string(),
            FieldValue::Text(value) | FieldValue::Ref(value) => value.clone(),
            FieldValue::Date(value) => value.format("%Y-%m-%d").to_string(),
            FieldValue::Timestamp(value) => value.format("%Y-%m-%dT%H:%M:%S").to_string(),
            FieldValue::RefList(values) => values.join(REF_LIST_SEPARATOR),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(value) => Some(*value as f64),
            FieldValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) | FieldValue::Ref(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(value) => Some(*value),
            FieldValue::Timestamp(value) => Some(value.date()),
            _ => None,
        }
    }

    /// Identifier of a single-valued reference field.
    pub fn as_ref_id(&self) -> Option<&str> {
        match self {
            FieldValue::Ref(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Identifiers of a list-valued reference field.
    pub fn as_ref_ids(&self) -> Option<&[String]> {
        match self {
            FieldValue::RefList(values) => Some(values.as_slice()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rendering_is_lossless_for_lists() {
        let value = FieldValue::RefList(vec!["task_0".to_string(), "task_4".to_string()]);
        assert_eq!(value.to_csv(), "task_0;task_4");

        let empty = FieldValue::RefList(Vec::new());
        assert_eq!(empty.to_csv(), "");
    }

    #[test]
    fn csv_rendering_formats_temporal_values() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 1).expect("valid date");
        assert_eq!(FieldValue::Date(date).to_csv(), "2024-09-01");

        let ts = date.and_hms_opt(13, 30, 0).expect("valid time");
        assert_eq!(FieldValue::Timestamp(ts).to_csv(), "2024-09-01T13:30:00");
    }
}
