use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, warn};

use ontoforge_core::{PoolSet, fields};
use ontoforge_spec::{DomainSpec, EntityDecl, validate_spec};

use crate::audit::audit_pools;
use crate::critical::mark_critical_path;
use crate::errors::GenerationError;
use crate::factory::build_pool;
use crate::model::{EntityReport, GenerateOptions, GenerationReport};
use crate::output::csv::write_pool_csv;
use crate::planner::plan_entities;
use crate::schedule::wire_precedence;
use crate::seed::hash_seed;

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub pools: PoolSet,
    pub report: GenerationReport,
    /// Artifact directory, when an output directory was configured.
    pub run_dir: Option<PathBuf>,
}

/// Entry point for generating datasets from a domain spec.
#[derive(Debug, Clone, Default)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, spec: &DomainSpec) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();

        let validation = validate_spec(spec);
        for issue in &validation.warnings {
            warn!(code = %issue.code, path = %issue.path, "{}", issue.message);
        }
        if !validation.is_ok() {
            let summary: Vec<String> = validation
                .errors
                .iter()
                .map(|issue| format!("{} ({})", issue.message, issue.path))
                .collect();
            return Err(GenerationError::InvalidSpec(summary.join("; ")));
        }

        let run_id = uuid::Uuid::new_v4().to_string();
        let tasks = plan_entities(spec)?;

        info!(
            run_id = %run_id,
            domain = %spec.name,
            entities = tasks.len(),
            seed = spec.seed,
            "generation started"
        );

        let mut pools = PoolSet::new();
        let mut report = GenerationReport::new(run_id.clone(), spec.name.clone(), spec.seed);

        for task in &tasks {
            let decl = spec
                .entity(&task.entity)
                .ok_or_else(|| GenerationError::UnknownEntity {
                    entity: task.entity.clone(),
                })?;
            let entity_start = Instant::now();
            info!(entity = %task.entity, rows = task.rows, "generating entity");

            let mut pool = build_pool(decl, spec.seed, &pools)?;

            if let Some(schedule) = &decl.schedule {
                let entity_seed = hash_seed(spec.seed, &decl.name);
                wire_precedence(&mut pool, schedule, entity_seed)?;
                let critical = mark_critical_path(&mut pool)?;
                info!(
                    entity = %task.entity,
                    chain_edges = critical.edges,
                    "critical path marked"
                );
                report
                    .critical_paths
                    .insert(decl.name.clone(), critical.chain);
            }

            report.entities.push(EntityReport {
                entity: task.entity.clone(),
                rows_requested: task.rows,
                rows_generated: pool.len() as u64,
            });
            info!(
                entity = %task.entity,
                rows_generated = pool.len() as u64,
                duration_ms = entity_start.elapsed().as_millis() as u64,
                "entity generated"
            );

            pools.insert(pool);
        }

        if self.options.audit {
            let audit = audit_pools(spec, &pools);
            if !audit.is_ok() {
                for violation in &audit.violations {
                    warn!(
                        code = %violation.code,
                        path = %violation.path,
                        "{}",
                        violation.message
                    );
                }
                return Err(GenerationError::AuditFailed {
                    violations: audit.violations,
                });
            }
            info!(run_id = %run_id, "audit passed");
        }

        let mut run_dir_out = None;
        if let Some(out_dir) = &self.options.out_dir {
            let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%SZ").to_string();
            let run_dir = out_dir.join(format!("{timestamp}__run_{run_id}"));
            std::fs::create_dir_all(&run_dir)?;

            std::fs::write(
                run_dir.join("resolved_spec.json"),
                serde_json::to_vec_pretty(spec)?,
            )?;

            let mut bytes_written = 0_u64;
            for task in &tasks {
                let decl = spec
                    .entity(&task.entity)
                    .ok_or_else(|| GenerationError::UnknownEntity {
                        entity: task.entity.clone(),
                    })?;
                let pool = pools
                    .get(&task.entity)
                    .ok_or_else(|| GenerationError::UnknownEntity {
                        entity: task.entity.clone(),
                    })?;
                let csv_path = run_dir.join(format!("{}.csv", task.entity));
                bytes_written += write_pool_csv(&csv_path, pool, &output_field_order(decl))?;
            }
            report.bytes_written = bytes_written;
            report.duration_ms = start.elapsed().as_millis() as u64;

            std::fs::write(
                run_dir.join("generation_report.json"),
                serde_json::to_vec_pretty(&report)?,
            )?;
            run_dir_out = Some(run_dir);
        } else {
            report.duration_ms = start.elapsed().as_millis() as u64;
        }

        info!(
            run_id = %run_id,
            entities = report.entities.len(),
            duration_ms = report.duration_ms,
            bytes_written = report.bytes_written,
            "generation completed"
        );

        Ok(GenerationResult {
            pools,
            report,
            run_dir: run_dir_out,
        })
    }
}

/// Column ordering for tabular output: identifier, declared fields in
/// authoring order, then the derived schedule fields.
fn output_field_order(decl: &EntityDecl) -> Vec<String> {
    let mut order = Vec::with_capacity(decl.fields.len() + 6);
    order.push(fields::ID.to_string());
    order.extend(decl.fields.iter().map(|field| field.name.clone()));
    if decl.schedule.is_some() {
        order.extend(
            [
                fields::START,
                fields::END,
                fields::DURATION_DAYS,
                fields::DEPENDS_ON,
                fields::CRITICAL,
            ]
            .iter()
            .map(|name| name.to_string()),
        );
    }
    order
}
