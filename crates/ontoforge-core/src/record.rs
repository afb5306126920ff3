use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::value::FieldValue;

/// Canonical field names shared by the pipeline.
pub mod fields {
    /// Record identifier column in tabular output.
    pub const ID: &str = "id";
    /// Start boundary of a scheduled activity.
    pub const START: &str = "start";
    /// End boundary of a scheduled activity.
    pub const END: &str = "end";
    /// Duration of a scheduled activity in days.
    pub const DURATION_DAYS: &str = "duration_days";
    /// Predecessor identifiers of a scheduled activity.
    pub const DEPENDS_ON: &str = "depends_on";
    /// Critical-path membership flag.
    pub const CRITICAL: &str = "critical";

    /// Names that declarations may not use for their own fields.
    pub const RESERVED: &[&str] = &[ID, START, END, DURATION_DAYS, DEPENDS_ON, CRITICAL];
}

/// One synthesized record: a unique identifier plus named field values.
///
/// Records are immutable once their pool freezes, except for the derived
/// `depends_on` and `critical` fields written by the scheduling phase.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    id: String,
    fields: BTreeMap<String, FieldValue>,
}

impl EntityRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Field names and values in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Start boundary, when this record is a scheduled activity.
    pub fn start(&self) -> Option<NaiveDate> {
        self.fields.get(fields::START).and_then(FieldValue::as_date)
    }

    /// End boundary, when this record is a scheduled activity.
    pub fn end(&self) -> Option<NaiveDate> {
        self.fields.get(fields::END).and_then(FieldValue::as_date)
    }

    /// Predecessor identifiers; empty for roots and non-activity records.
    pub fn depends_on(&self) -> &[String] {
        match self.fields.get(fields::DEPENDS_ON) {
            Some(FieldValue::RefList(ids)) => ids.as_slice(),
            _ => &[],
        }
    }

    pub fn is_critical(&self) -> bool {
        self.fields
            .get(fields::CRITICAL)
            .and_then(FieldValue::as_bool)
            .unwrap_or(false)
    }

    pub fn set_depends_on(&mut self, ids: Vec<String>) {
        self.fields
            .insert(fields::DEPENDS_ON.to_string(), FieldValue::RefList(ids));
    }

    pub fn set_critical(&mut self, critical: bool) {
        self.fields
            .insert(fields::CRITICAL.to_string(), FieldValue::Bool(critical));
    }
}
