use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Current contract version for domain spec documents.
pub const SPEC_VERSION: &str = "0.1";

/// Canonical domain specification consumed by the generation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DomainSpec {
    /// Contract version for the spec format.
    pub spec_version: String,
    /// Domain name (ex.: construction).
    pub name: String,
    /// Seed for reproducibility.
    pub seed: u64,
    /// Entity declarations in authoring order.
    pub entities: Vec<EntityDecl>,
}

impl DomainSpec {
    /// Look up an entity declaration by name.
    pub fn entity(&self, name: &str) -> Option<&EntityDecl> {
        self.entities.iter().find(|entity| entity.name == name)
    }
}

/// Load a domain spec from a JSON document on disk.
pub fn load_spec(path: &Path) -> Result<DomainSpec> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Declaration of one entity type.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EntityDecl {
    /// Entity type name; also the identifier prefix of its records.
    pub name: String,
    /// Number of records to generate.
    pub count: u64,
    /// Entity types whose pools must be materialized before this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Field declarations in output column order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDecl>,
    /// Present when the entity models scheduled activities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleDecl>,
}

/// Declaration of one generated field.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FieldDecl {
    pub name: String,
    pub rule: FieldRule,
}

/// Per-field value generation rule.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldRule {
    /// Fixed scalar value (JSON bool, integer, float, or string).
    Constant { value: serde_json::Value },
    /// Uniform integer in the inclusive range.
    IntRange { min: i64, max: i64 },
    /// Uniform float in the inclusive range.
    FloatRange { min: f64, max: f64 },
    /// Uniform pick from a fixed category list.
    Choice { options: Vec<String> },
    /// Identifier sampled from a named dependency pool.
    Reference { entity: String },
    /// Bounded count of distinct identifiers sampled without replacement.
    ReferenceList { entity: String, min: u32, max: u32 },
    /// Date within a bounded inclusive window.
    DateWindow { start: NaiveDate, end: NaiveDate },
    /// Timestamp within a bounded inclusive window.
    TimestampWindow {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl FieldRule {
    /// Dependency pool referenced by this rule, when there is one.
    pub fn referenced_entity(&self) -> Option<&str> {
        match self {
            FieldRule::Reference { entity } | FieldRule::ReferenceList { entity, .. } => {
                Some(entity.as_str())
            }
            _ => None,
        }
    }
}

/// Activity scheduling parameters for one entity type.
///
/// A scheduled entity derives `start`, `end`, and `duration_days` fields
/// from this declaration; `depends_on` and `critical` are wired afterwards
/// by the precedence and critical-path phases.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScheduleDecl {
    /// Earliest permitted activity start.
    pub window_start: NaiveDate,
    /// Latest permitted activity end.
    pub window_end: NaiveDate,
    /// Minimum activity duration in days.
    pub min_duration_days: u32,
    /// Maximum activity duration in days.
    pub max_duration_days: u32,
    /// Upper bound on sampled predecessors per activity.
    #[serde(default = "default_max_predecessors")]
    pub max_predecessors: u32,
}

fn default_max_predecessors() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_round_trips_through_json() {
        let json = serde_json::json!({
            "spec_version": "0.1",
            "name": "manufacturing",
            "seed": 11,
            "entities": [
                { "name": "plant", "count": 2, "fields": [
                    { "name": "region", "rule": { "type": "choice", "options": ["north", "south"] } }
                ] },
                { "name": "line", "count": 4, "depends_on": ["plant"], "fields": [
                    { "name": "plant", "rule": { "type": "reference", "entity": "plant" } }
                ] }
            ]
        });

        let spec: DomainSpec = serde_json::from_value(json).expect("parse spec");
        assert_eq!(spec.entities.len(), 2);
        assert_eq!(spec.entity("line").map(|e| e.depends_on.as_slice()), Some(["plant".to_string()].as_slice()));

        let back = serde_json::to_value(&spec).expect("serialize spec");
        let again: DomainSpec = serde_json::from_value(back).expect("reparse spec");
        assert_eq!(again.entities[1].name, "line");
    }

    #[test]
    fn schedule_defaults_max_predecessors() {
        let json = serde_json::json!({
            "window_start": "2024-04-01",
            "window_end": "2024-12-31",
            "min_duration_days": 3,
            "max_duration_days": 20
        });

        let schedule: ScheduleDecl = serde_json::from_value(json).expect("parse schedule");
        assert_eq!(schedule.max_predecessors, 3);
    }
}
