//! Domain-spec contracts and validation for Ontoforge.
//!
//! A [`DomainSpec`] declares the entity types of one domain ontology, their
//! reference dependencies, per-field generation rules, and optional activity
//! scheduling. This crate owns the spec model, its structural validation,
//! JSON (Schema) emission, and a catalog of built-in example domains.

pub mod catalog;
pub mod errors;
pub mod model;
pub mod schema;
pub mod validate;

pub use errors::{IssueSeverity, SpecError, ValidationIssue, ValidationReport};
pub use model::{
    DomainSpec, EntityDecl, FieldDecl, FieldRule, SPEC_VERSION, ScheduleDecl, load_spec,
};
pub use schema::spec_json_schema;
pub use validate::validate_spec;
