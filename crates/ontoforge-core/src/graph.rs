use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Summary of the entity dependency graph structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencySummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Report for entity dependency ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyReport {
    pub summary: DependencySummary,
    pub topo_order: Option<Vec<String>>,
    pub cycle: Option<Vec<String>>,
}

/// Build a deterministic dependency report for declared entity types.
///
/// `declarations` pairs each entity type with the types it depends on, in
/// authoring order. Dependency names that are never declared themselves are
/// included as nodes so the report reflects the full referenced graph.
pub fn build_dependency_report(declarations: &[(String, Vec<String>)]) -> DependencyReport {
    let edges = declarations
        .iter()
        .map(|(_, deps)| deps.iter().collect::<BTreeSet<_>>().len())
        .sum();

    match toposort(declarations) {
        Ok(order) => DependencyReport {
            summary: DependencySummary {
                nodes: order.len(),
                edges,
            },
            topo_order: Some(order),
            cycle: None,
        },
        Err(cycle) => {
            let nodes = count_nodes(declarations);
            DependencyReport {
                summary: DependencySummary { nodes, edges },
                topo_order: None,
                cycle: Some(cycle),
            }
        }
    }
}

/// Topologically order entity types so every dependency precedes its
/// dependents. Among types with no mutual dependency the declaration order
/// is kept, so the result is stable for a given input. On a cycle, returns
/// the names of the entities still locked in it.
pub fn toposort(declarations: &[(String, Vec<String>)]) -> Result<Vec<String>, Vec<String>> {
    let mut names: Vec<&str> = Vec::new();
    let mut positions: BTreeMap<&str, usize> = BTreeMap::new();

    for (entity, deps) in declarations {
        for name in std::iter::once(entity).chain(deps.iter()) {
            if !positions.contains_key(name.as_str()) {
                positions.insert(name.as_str(), names.len());
                names.push(name.as_str());
            }
        }
    }

    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); names.len()];
    let mut indegree: Vec<usize> = vec![0; names.len()];

    for (entity, deps) in declarations {
        let entity_pos = positions[entity.as_str()];
        let unique: BTreeSet<&str> = deps.iter().map(String::as_str).collect();
        for dep in unique {
            let dep_pos = positions[dep];
            dependents[dep_pos].push(entity_pos);
            indegree[entity_pos] += 1;
        }
    }

    let mut ready: BTreeSet<usize> = indegree
        .iter()
        .enumerate()
        .filter_map(|(position, count)| (*count == 0).then_some(position))
        .collect();

    let mut order = Vec::with_capacity(names.len());

    while let Some(position) = ready.iter().next().copied() {
        ready.remove(&position);
        order.push(names[position].to_string());

        for dependent in &dependents[position] {
            indegree[*dependent] = indegree[*dependent].saturating_sub(1);
            if indegree[*dependent] == 0 {
                ready.insert(*dependent);
            }
        }
    }

    if order.len() == names.len() {
        Ok(order)
    } else {
        let cycle = indegree
            .iter()
            .enumerate()
            .filter_map(|(position, count)| (*count > 0).then(|| names[position].to_string()))
            .collect();
        Err(cycle)
    }
}

fn count_nodes(declarations: &[(String, Vec<String>)]) -> usize {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for (entity, deps) in declarations {
        seen.insert(entity.as_str());
        for dep in deps {
            seen.insert(dep.as_str());
        }
    }
    seen.len()
}
