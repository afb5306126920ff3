use std::collections::BTreeMap;

use ontoforge_core::toposort;
use ontoforge_spec::DomainSpec;

use crate::errors::GenerationError;

/// Planned generation task for one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTask {
    pub entity: String,
    pub rows: u64,
}

/// Order entity factories so every dependency pool is materialized before
/// its dependents run.
///
/// The order is a topological sort of the declared dependency graph with
/// declaration order as the stable tiebreak; a cycle in the declarations is
/// a configuration error and fails fast.
pub fn plan_entities(spec: &DomainSpec) -> Result<Vec<GenerationTask>, GenerationError> {
    let declarations: Vec<(String, Vec<String>)> = spec
        .entities
        .iter()
        .map(|entity| (entity.name.clone(), entity.depends_on.clone()))
        .collect();

    let order = toposort(&declarations)
        .map_err(|entities| GenerationError::CyclicEntityDependency { entities })?;

    let rows_by_entity: BTreeMap<&str, u64> = spec
        .entities
        .iter()
        .map(|entity| (entity.name.as_str(), entity.count))
        .collect();

    let tasks: Vec<GenerationTask> = order
        .into_iter()
        .filter_map(|entity| {
            rows_by_entity.get(entity.as_str()).map(|rows| GenerationTask {
                entity,
                rows: *rows,
            })
        })
        .collect();

    if tasks.is_empty() {
        return Err(GenerationError::InvalidSpec(
            "no entity declarations resolved".to_string(),
        ));
    }

    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontoforge_spec::catalog;

    #[test]
    fn dependencies_precede_dependents() {
        let spec = catalog::manufacturing();
        let tasks = plan_entities(&spec).expect("acyclic spec");

        let position = |entity: &str| {
            tasks
                .iter()
                .position(|task| task.entity == entity)
                .unwrap_or_else(|| panic!("missing task for '{entity}'"))
        };
        assert!(position("plant") < position("line"));
        assert!(position("line") < position("machine"));
    }

    #[test]
    fn cyclic_declarations_fail_fast() {
        let mut spec = catalog::manufacturing();
        // plant -> line -> machine already holds; close the loop
        spec.entities[0].depends_on = vec!["machine".to_string()];

        let err = plan_entities(&spec).expect_err("cycle must be rejected");
        match err {
            GenerationError::CyclicEntityDependency { entities } => {
                assert!(entities.contains(&"plant".to_string()));
                assert!(entities.contains(&"machine".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn independent_entities_keep_declaration_order() {
        let spec = catalog::construction();
        let tasks = plan_entities(&spec).expect("acyclic spec");
        let names: Vec<&str> = tasks.iter().map(|task| task.entity.as_str()).collect();
        assert_eq!(names, vec!["project", "crew", "material", "activity"]);
    }
}
