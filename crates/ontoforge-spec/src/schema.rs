use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::model::DomainSpec;

/// Emit the JSON Schema for domain spec documents.
pub fn spec_json_schema() -> RootSchema {
    schema_for!(DomainSpec)
}
