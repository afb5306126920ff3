use chrono::NaiveDate;
use thiserror::Error;

use crate::audit::Violation;

/// Errors emitted by the generation pipeline.
///
/// Every variant is a configuration or invariant violation: none is
/// transient, none is retried, and the first failure halts the run.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid spec: {0}")]
    InvalidSpec(String),
    #[error("entity '{entity}' is not declared in the spec")]
    UnknownEntity { entity: String },
    #[error("entity '{entity}' requires dependency pool '{dependency}', which is missing or empty")]
    MissingDependencyPool { entity: String, dependency: String },
    #[error(
        "entity '{entity}' field '{field}' requested {requested} distinct id(s) from pool '{pool}' holding {available}"
    )]
    InsufficientPoolSize {
        entity: String,
        field: String,
        pool: String,
        requested: usize,
        available: usize,
    },
    #[error("cyclic entity dependency among: {}", entities.join(", "))]
    CyclicEntityDependency { entities: Vec<String> },
    #[error("activity '{id}' has start {start} after end {end}")]
    InvalidActivityWindow {
        id: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("precedence graph contains a cycle through '{id}'")]
    CyclicPrecedenceGraph { id: String },
    #[error("dataset audit failed with {} violation(s)", violations.len())]
    AuditFailed { violations: Vec<Violation> },
    #[error(transparent)]
    Pool(#[from] ontoforge_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
