use thiserror::Error;

/// Core error type shared across Ontoforge crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A record with the same identifier already exists in the pool.
    #[error("duplicate identifier '{id}' in pool '{entity}'")]
    DuplicateId { entity: String, id: String },
    /// A record is missing a field the caller relies on.
    #[error("record '{id}' has no field '{field}'")]
    MissingField { id: String, field: String },
}

/// Convenience alias for results returned by Ontoforge crates.
pub type Result<T> = std::result::Result<T, Error>;
