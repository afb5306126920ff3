//! Post-generation verification of dataset invariants.
//!
//! The audit re-checks, over the finished pools, what generation promises:
//! referential integrity, temporal precedence, acyclicity, and a coherent
//! critical chain. It is the machine-checkable form of the pipeline's
//! contract and backs the engine's `audit` option.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use ontoforge_core::{EntityPool, FieldValue, PoolSet};
use ontoforge_spec::{DomainSpec, EntityDecl, FieldRule};

/// Structured audit violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub code: String,
    pub path: String,
    pub message: String,
}

/// Aggregated audit outcome.
#[derive(Debug, Default, Clone)]
pub struct AuditReport {
    pub violations: Vec<Violation>,
}

impl AuditReport {
    /// Returns true when no violation was found.
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    fn push(&mut self, code: &str, path: String, message: String) {
        self.violations.push(Violation {
            code: code.to_string(),
            path,
            message,
        });
    }
}

/// Audit every pool of a finished generation run against the spec.
pub fn audit_pools(spec: &DomainSpec, pools: &PoolSet) -> AuditReport {
    let mut report = AuditReport::default();

    for decl in &spec.entities {
        let Some(pool) = pools.get(&decl.name) else {
            report.push(
                "missing_pool",
                format!("/{}", decl.name),
                format!("no pool generated for entity '{}'", decl.name),
            );
            continue;
        };

        if pool.len() as u64 != decl.count {
            report.push(
                "row_count_mismatch",
                format!("/{}", decl.name),
                format!(
                    "entity '{}' generated {} record(s), expected {}",
                    decl.name,
                    pool.len(),
                    decl.count
                ),
            );
        }

        audit_references(decl, pool, pools, &mut report);

        if decl.schedule.is_some() {
            audit_schedule(decl, pool, &mut report);
        }
    }

    report
}

fn audit_references(
    decl: &EntityDecl,
    pool: &EntityPool,
    pools: &PoolSet,
    report: &mut AuditReport,
) {
    for field in &decl.fields {
        let Some(target) = field.rule.referenced_entity() else {
            continue;
        };
        let Some(target_pool) = pools.get(target) else {
            // the missing pool is reported once at the entity level
            continue;
        };

        for record in pool.records() {
            let path = format!("/{}/{}/{}", decl.name, record.id(), field.name);
            match (record.get(&field.name), &field.rule) {
                (Some(FieldValue::Ref(id)), FieldRule::Reference { .. }) => {
                    if !target_pool.contains(id) {
                        report.push(
                            "dangling_reference",
                            path,
                            format!("reference '{id}' not found in pool '{target}'"),
                        );
                    }
                }
                (Some(FieldValue::RefList(ids)), FieldRule::ReferenceList { .. }) => {
                    for id in ids {
                        if !target_pool.contains(id) {
                            report.push(
                                "dangling_reference",
                                path.clone(),
                                format!("reference '{id}' not found in pool '{target}'"),
                            );
                        }
                    }
                }
                _ => {
                    report.push(
                        "missing_field",
                        path,
                        format!("reference field '{}' is absent or mistyped", field.name),
                    );
                }
            }
        }
    }
}

fn audit_schedule(decl: &EntityDecl, pool: &EntityPool, report: &mut AuditReport) {
    for record in pool.records() {
        let path = format!("/{}/{}", decl.name, record.id());
        let (Some(start), Some(end)) = (record.start(), record.end()) else {
            report.push(
                "missing_field",
                path,
                "activity lacks start/end fields".to_string(),
            );
            continue;
        };
        if start > end {
            report.push(
                "window_inverted",
                path.clone(),
                format!("activity starts {start} after ending {end}"),
            );
        }

        for predecessor in record.depends_on() {
            let Some(earlier) = pool.get(predecessor) else {
                report.push(
                    "dangling_predecessor",
                    path.clone(),
                    format!("predecessor '{predecessor}' not found"),
                );
                continue;
            };
            if earlier.end().is_none_or(|end| end > start) {
                report.push(
                    "temporal_violation",
                    path.clone(),
                    format!(
                        "predecessor '{predecessor}' ends after '{}' starts",
                        record.id()
                    ),
                );
            }
        }
    }

    audit_acyclicity(decl, pool, report);
    audit_critical_chain(decl, pool, report);
}

fn audit_acyclicity(decl: &EntityDecl, pool: &EntityPool, report: &mut AuditReport) {
    let mut successors: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for record in pool.records() {
        successors.entry(record.id()).or_default();
        for predecessor in record.depends_on() {
            successors
                .entry(predecessor.as_str())
                .or_default()
                .push(record.id());
        }
    }
    for list in successors.values_mut() {
        list.sort_unstable();
        list.dedup();
    }

    // iterative DFS with tri-state marks
    let mut done: BTreeSet<&str> = BTreeSet::new();
    let mut active: BTreeSet<&str> = BTreeSet::new();

    for start in successors.keys().copied().collect::<Vec<_>>() {
        if done.contains(start) {
            continue;
        }
        let mut stack: Vec<(&str, usize)> = vec![(start, 0)];
        active.insert(start);

        while let Some((node, next_child)) = stack.pop() {
            let children = successors.get(node).map(Vec::as_slice).unwrap_or(&[]);
            if next_child < children.len() {
                stack.push((node, next_child + 1));
                let child = children[next_child];
                if active.contains(child) {
                    report.push(
                        "precedence_cycle",
                        format!("/{}/{}", decl.name, child),
                        format!("activity '{child}' lies on a dependency cycle"),
                    );
                    return;
                }
                if !done.contains(child) {
                    active.insert(child);
                    stack.push((child, 0));
                }
            } else {
                active.remove(node);
                done.insert(node);
            }
        }
    }
}

fn audit_critical_chain(decl: &EntityDecl, pool: &EntityPool, report: &mut AuditReport) {
    let critical: Vec<&str> = pool
        .records()
        .iter()
        .filter(|record| record.is_critical())
        .map(|record| record.id())
        .collect();
    if critical.is_empty() {
        return;
    }

    let critical_set: BTreeSet<&str> = critical.iter().copied().collect();
    let mut links = 0usize;
    let mut critical_successors: BTreeMap<&str, usize> = BTreeMap::new();
    for record in pool.records() {
        if !record.is_critical() {
            continue;
        }
        let mut critical_predecessors = 0usize;
        for predecessor in record.depends_on() {
            if critical_set.contains(predecessor.as_str()) {
                critical_predecessors += 1;
                *critical_successors.entry(predecessor.as_str()).or_insert(0) += 1;
            }
        }
        if critical_predecessors > 1 {
            report.push(
                "critical_chain_broken",
                format!("/{}/{}", decl.name, record.id()),
                "critical activity has more than one critical predecessor".to_string(),
            );
            return;
        }
        links += critical_predecessors;
    }

    for (id, count) in critical_successors {
        if count > 1 {
            report.push(
                "critical_chain_broken",
                format!("/{}/{}", decl.name, id),
                "critical activity has more than one critical successor".to_string(),
            );
            return;
        }
    }

    if links != critical.len() - 1 {
        report.push(
            "critical_chain_broken",
            format!("/{}", decl.name),
            format!(
                "critical flags mark {} activities joined by {} link(s)",
                critical.len(),
                links
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ontoforge_core::{EntityRecord, PoolBuilder, fields};
    use ontoforge_spec::catalog;

    use crate::engine::{GenerationEngine, GenerationResult};
    use crate::model::GenerateOptions;

    fn generate(spec: &DomainSpec) -> GenerationResult {
        GenerationEngine::new(GenerateOptions::default())
            .run(spec)
            .expect("generation succeeds")
    }

    #[test]
    fn clean_runs_audit_clean() {
        for spec in catalog::all() {
            let result = generate(&spec);
            let report = audit_pools(&spec, &result.pools);
            assert!(
                report.is_ok(),
                "audit violations for '{}': {:?}",
                spec.name,
                report.violations
            );
        }
    }

    #[test]
    fn tampered_reference_is_flagged() {
        let spec = catalog::manufacturing();
        let mut result = generate(&spec);

        // corrupt one line->plant reference
        let pool = result.pools.get("line").expect("line pool").clone();
        let victim = pool.records()[0].id().to_string();
        let mut corrupted = pool;
        if let Some(record) = corrupted.record_mut(&victim) {
            record.set("plant", FieldValue::Ref("plant_999".to_string()));
        }
        result.pools.insert(corrupted);

        let report = audit_pools(&spec, &result.pools);
        assert!(report
            .violations
            .iter()
            .any(|violation| violation.code == "dangling_reference"));
    }

    #[test]
    fn tampered_precedence_is_flagged() {
        let date = |d: u32| NaiveDate::from_ymd_opt(2024, 1, d).expect("valid date");
        let mut builder = PoolBuilder::new("activity");
        let mut early = EntityRecord::new("activity_0");
        early.set(fields::START, FieldValue::Date(date(1)));
        early.set(fields::END, FieldValue::Date(date(10)));
        early.set_depends_on(vec!["activity_1".to_string()]);
        early.set_critical(false);
        builder.push(early).expect("push");
        let mut late = EntityRecord::new("activity_1");
        late.set(fields::START, FieldValue::Date(date(5)));
        late.set(fields::END, FieldValue::Date(date(8)));
        late.set_depends_on(Vec::new());
        late.set_critical(false);
        builder.push(late).expect("push");

        let mut pools = PoolSet::new();
        pools.insert(builder.freeze());

        let mut spec = catalog::construction();
        spec.entities.retain(|entity| entity.name == "activity");
        spec.entities[0].count = 2;
        spec.entities[0].depends_on.clear();
        spec.entities[0].fields.clear();

        let report = audit_pools(&spec, &pools);
        assert!(report
            .violations
            .iter()
            .any(|violation| violation.code == "temporal_violation"));
    }
}
