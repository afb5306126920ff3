use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options for the generation engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Directory where run artifacts are written; in-memory only when unset.
    pub out_dir: Option<PathBuf>,
    /// Audit the generated pools and fail on any violation.
    pub audit: bool,
}

/// Summary of one generated entity pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityReport {
    pub entity: String,
    pub rows_requested: u64,
    pub rows_generated: u64,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub domain: String,
    pub seed: u64,
    pub entities: Vec<EntityReport>,
    /// Critical chain per scheduled entity, as ordered identifier lists.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub critical_paths: BTreeMap<String, Vec<String>>,
    pub duration_ms: u64,
    pub bytes_written: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, domain: String, seed: u64) -> Self {
        Self {
            run_id,
            domain,
            seed,
            entities: Vec::new(),
            critical_paths: BTreeMap::new(),
            duration_ms: 0,
            bytes_written: 0,
        }
    }
}
