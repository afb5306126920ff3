//! Core contracts and primitives for Ontoforge.
//!
//! This crate defines the record/pool data model shared by the generation
//! pipeline, the entity dependency graph with its topological ordering, and
//! the core error type.

pub mod error;
pub mod graph;
pub mod pool;
pub mod record;
pub mod value;

pub use error::{Error, Result};
pub use graph::{DependencyReport, DependencySummary, build_dependency_report, toposort};
pub use pool::{EntityPool, PoolBuilder, PoolSet};
pub use record::{EntityRecord, fields};
pub use value::{FieldValue, REF_LIST_SEPARATOR};
