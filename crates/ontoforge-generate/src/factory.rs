use std::collections::BTreeSet;

use chrono::Duration;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use ontoforge_core::{EntityPool, EntityRecord, FieldValue, PoolBuilder, PoolSet, fields};
use ontoforge_spec::{EntityDecl, FieldDecl, FieldRule, ScheduleDecl};

use crate::errors::GenerationError;
use crate::seed::{hash_seed, record_seed};

/// Produce a frozen pool of `decl.count` records for one entity type.
///
/// A pure function of (declaration, seed, dependency pools): reference
/// fields sample from the dependency pools without mutating them, and each
/// record draws from its own seeded ChaCha8 stream, so generation replays
/// deterministically.
pub fn build_pool(
    decl: &EntityDecl,
    spec_seed: u64,
    pools: &PoolSet,
) -> Result<EntityPool, GenerationError> {
    if decl.count == 0 {
        return Err(GenerationError::InvalidSpec(format!(
            "entity '{}' requests zero records",
            decl.name
        )));
    }

    let dependencies: BTreeSet<&str> = decl.depends_on.iter().map(String::as_str).collect();
    for dependency in dependencies {
        let present = pools.get(dependency).is_some_and(|pool| !pool.is_empty());
        if !present {
            return Err(GenerationError::MissingDependencyPool {
                entity: decl.name.clone(),
                dependency: dependency.to_string(),
            });
        }
    }

    let entity_seed = hash_seed(spec_seed, &decl.name);
    let mut builder = PoolBuilder::new(&decl.name);

    for index in 0..decl.count {
        let mut rng = ChaCha8Rng::seed_from_u64(record_seed(entity_seed, index));
        let mut record = EntityRecord::new(format!("{}_{}", decl.name, index));

        for field in &decl.fields {
            let value = generate_field(&decl.name, field, pools, &mut rng)?;
            record.set(&field.name, value);
        }

        if let Some(schedule) = &decl.schedule {
            apply_schedule_fields(&decl.name, &mut record, schedule, &mut rng)?;
        }

        builder.push(record)?;
    }

    Ok(builder.freeze())
}

fn generate_field(
    entity: &str,
    field: &FieldDecl,
    pools: &PoolSet,
    rng: &mut ChaCha8Rng,
) -> Result<FieldValue, GenerationError> {
    match &field.rule {
        FieldRule::Constant { value } => constant_value(entity, &field.name, value),
        FieldRule::IntRange { min, max } => {
            if min > max {
                return Err(inverted_rule(entity, &field.name));
            }
            Ok(FieldValue::Int(rng.random_range(*min..=*max)))
        }
        FieldRule::FloatRange { min, max } => {
            if min > max {
                return Err(inverted_rule(entity, &field.name));
            }
            Ok(FieldValue::Float(rng.random_range(*min..=*max)))
        }
        FieldRule::Choice { options } => {
            if options.is_empty() {
                return Err(GenerationError::InvalidSpec(format!(
                    "entity '{entity}' field '{}' has no choice options",
                    field.name
                )));
            }
            let index = rng.random_range(0..options.len());
            Ok(FieldValue::Text(options[index].clone()))
        }
        FieldRule::Reference { entity: target } => {
            let pool = dependency_pool(entity, target, pools)?;
            let index = rng.random_range(0..pool.len());
            Ok(FieldValue::Ref(pool.records()[index].id().to_string()))
        }
        FieldRule::ReferenceList {
            entity: target,
            min,
            max,
        } => {
            if min > max {
                return Err(inverted_rule(entity, &field.name));
            }
            let pool = dependency_pool(entity, target, pools)?;
            let requested = rng.random_range(*min..=*max) as usize;
            if requested > pool.len() {
                return Err(GenerationError::InsufficientPoolSize {
                    entity: entity.to_string(),
                    field: field.name.clone(),
                    pool: target.clone(),
                    requested,
                    available: pool.len(),
                });
            }
            let mut ids: Vec<String> = rand::seq::index::sample(rng, pool.len(), requested)
                .iter()
                .map(|position| pool.records()[position].id().to_string())
                .collect();
            ids.sort();
            Ok(FieldValue::RefList(ids))
        }
        FieldRule::DateWindow { start, end } => {
            if start > end {
                return Err(inverted_rule(entity, &field.name));
            }
            let span = (*end - *start).num_days();
            Ok(FieldValue::Date(
                *start + Duration::days(rng.random_range(0..=span)),
            ))
        }
        FieldRule::TimestampWindow { start, end } => {
            if start > end {
                return Err(inverted_rule(entity, &field.name));
            }
            let span = (*end - *start).num_seconds();
            Ok(FieldValue::Timestamp(
                *start + Duration::seconds(rng.random_range(0..=span)),
            ))
        }
    }
}

fn constant_value(
    entity: &str,
    field_name: &str,
    value: &serde_json::Value,
) -> Result<FieldValue, GenerationError> {
    if let Some(flag) = value.as_bool() {
        return Ok(FieldValue::Bool(flag));
    }
    if let Some(int) = value.as_i64() {
        return Ok(FieldValue::Int(int));
    }
    if let Some(float) = value.as_f64() {
        return Ok(FieldValue::Float(float));
    }
    if let Some(text) = value.as_str() {
        return Ok(FieldValue::Text(text.to_string()));
    }
    Err(GenerationError::InvalidSpec(format!(
        "entity '{entity}' field '{field_name}' has a non-scalar constant"
    )))
}

/// Derive the schedule fields of one activity record: a duration drawn from
/// the declared bounds and a start placed so the activity fits the window.
fn apply_schedule_fields(
    entity: &str,
    record: &mut EntityRecord,
    schedule: &ScheduleDecl,
    rng: &mut ChaCha8Rng,
) -> Result<(), GenerationError> {
    if schedule.window_start > schedule.window_end {
        return Err(GenerationError::InvalidSpec(format!(
            "entity '{entity}' schedule window is inverted"
        )));
    }
    if schedule.min_duration_days > schedule.max_duration_days {
        return Err(GenerationError::InvalidSpec(format!(
            "entity '{entity}' schedule durations are inverted"
        )));
    }

    let window_days = (schedule.window_end - schedule.window_start).num_days();
    if i64::from(schedule.max_duration_days) > window_days {
        return Err(GenerationError::InvalidSpec(format!(
            "entity '{entity}' schedule window cannot fit the maximum duration"
        )));
    }

    let duration = i64::from(
        rng.random_range(schedule.min_duration_days..=schedule.max_duration_days),
    );
    let offset = rng.random_range(0..=window_days - duration);
    let start = schedule.window_start + Duration::days(offset);
    let end = start + Duration::days(duration);

    record.set(fields::START, FieldValue::Date(start));
    record.set(fields::END, FieldValue::Date(end));
    record.set(fields::DURATION_DAYS, FieldValue::Int(duration));
    record.set_depends_on(Vec::new());
    record.set_critical(false);
    Ok(())
}

fn dependency_pool<'a>(
    entity: &str,
    target: &str,
    pools: &'a PoolSet,
) -> Result<&'a EntityPool, GenerationError> {
    pools
        .get(target)
        .filter(|pool| !pool.is_empty())
        .ok_or_else(|| GenerationError::MissingDependencyPool {
            entity: entity.to_string(),
            dependency: target.to_string(),
        })
}

fn inverted_rule(entity: &str, field_name: &str) -> GenerationError {
    GenerationError::InvalidSpec(format!(
        "entity '{entity}' field '{field_name}' has an inverted range"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ontoforge_spec::FieldDecl;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn decl(name: &str, count: u64) -> EntityDecl {
        EntityDecl {
            name: name.to_string(),
            count,
            depends_on: Vec::new(),
            fields: Vec::new(),
            schedule: None,
        }
    }

    fn field(name: &str, rule: FieldRule) -> FieldDecl {
        FieldDecl {
            name: name.to_string(),
            rule,
        }
    }

    fn seeded_pool(entity: &str, size: usize) -> EntityPool {
        let mut builder = PoolBuilder::new(entity);
        for index in 0..size {
            builder
                .push(EntityRecord::new(format!("{entity}_{index}")))
                .expect("push record");
        }
        builder.freeze()
    }

    #[test]
    fn identifiers_are_sequential_and_unique() {
        let pool = build_pool(&decl("plant", 4), 1, &PoolSet::new()).expect("build pool");
        let ids: Vec<&str> = pool.records().iter().map(|record| record.id()).collect();
        assert_eq!(ids, vec!["plant_0", "plant_1", "plant_2", "plant_3"]);
    }

    #[test]
    fn scalar_rules_respect_bounds() {
        let mut entity = decl("sensor", 50);
        entity.fields = vec![
            field("level", FieldRule::IntRange { min: 3, max: 9 }),
            field("ratio", FieldRule::FloatRange { min: 0.0, max: 1.0 }),
            field(
                "mode",
                FieldRule::Choice {
                    options: vec!["on".to_string(), "off".to_string()],
                },
            ),
            field(
                "installed",
                FieldRule::DateWindow {
                    start: date(2024, 1, 1),
                    end: date(2024, 1, 31),
                },
            ),
        ];

        let pool = build_pool(&entity, 5, &PoolSet::new()).expect("build pool");
        for record in pool.records() {
            let level = record.get("level").and_then(FieldValue::as_i64).unwrap();
            assert!((3..=9).contains(&level));

            let ratio = record.get("ratio").and_then(FieldValue::as_f64).unwrap();
            assert!((0.0..=1.0).contains(&ratio));

            let mode = record.get("mode").and_then(FieldValue::as_str).unwrap();
            assert!(mode == "on" || mode == "off");

            let installed = record.get("installed").and_then(FieldValue::as_date).unwrap();
            assert!(installed >= date(2024, 1, 1) && installed <= date(2024, 1, 31));
        }
    }

    #[test]
    fn reference_fields_resolve_against_dependency_pool() {
        let mut pools = PoolSet::new();
        pools.insert(seeded_pool("plant", 3));

        let mut entity = decl("line", 10);
        entity.depends_on = vec!["plant".to_string()];
        entity.fields = vec![field(
            "plant",
            FieldRule::Reference {
                entity: "plant".to_string(),
            },
        )];

        let pool = build_pool(&entity, 2, &pools).expect("build pool");
        let plant_pool = pools.get("plant").unwrap();
        for record in pool.records() {
            let reference = record.get("plant").and_then(FieldValue::as_ref_id).unwrap();
            assert!(plant_pool.contains(reference), "dangling reference {reference}");
        }
    }

    #[test]
    fn missing_dependency_pool_fails() {
        let mut entity = decl("line", 2);
        entity.depends_on = vec!["plant".to_string()];

        let err = build_pool(&entity, 2, &PoolSet::new()).expect_err("missing pool");
        assert!(matches!(
            err,
            GenerationError::MissingDependencyPool { .. }
        ));
    }

    #[test]
    fn oversized_reference_sample_fails_not_truncates() {
        let mut pools = PoolSet::new();
        pools.insert(seeded_pool("material", 3));

        let mut entity = decl("activity", 1);
        entity.depends_on = vec!["material".to_string()];
        entity.fields = vec![field(
            "materials",
            FieldRule::ReferenceList {
                entity: "material".to_string(),
                min: 5,
                max: 5,
            },
        )];

        let err = build_pool(&entity, 9, &pools).expect_err("sample larger than pool");
        match err {
            GenerationError::InsufficientPoolSize {
                requested,
                available,
                ..
            } => {
                assert_eq!(requested, 5);
                assert_eq!(available, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reference_lists_hold_distinct_ids() {
        let mut pools = PoolSet::new();
        pools.insert(seeded_pool("material", 6));

        let mut entity = decl("activity", 20);
        entity.depends_on = vec!["material".to_string()];
        entity.fields = vec![field(
            "materials",
            FieldRule::ReferenceList {
                entity: "material".to_string(),
                min: 0,
                max: 3,
            },
        )];

        let pool = build_pool(&entity, 9, &pools).expect("build pool");
        for record in pool.records() {
            let ids = record.get("materials").and_then(FieldValue::as_ref_ids).unwrap();
            let distinct: BTreeSet<&String> = ids.iter().collect();
            assert_eq!(distinct.len(), ids.len(), "duplicate sampled ids");
            assert!(ids.len() <= 3);
        }
    }

    #[test]
    fn schedule_fields_fit_the_declared_window() {
        let mut entity = decl("activity", 30);
        entity.schedule = Some(ScheduleDecl {
            window_start: date(2024, 4, 1),
            window_end: date(2024, 6, 30),
            min_duration_days: 2,
            max_duration_days: 10,
            max_predecessors: 3,
        });

        let pool = build_pool(&entity, 3, &PoolSet::new()).expect("build pool");
        for record in pool.records() {
            let start = record.start().expect("start set");
            let end = record.end().expect("end set");
            let duration = record
                .get(fields::DURATION_DAYS)
                .and_then(FieldValue::as_i64)
                .expect("duration set");

            assert!(start <= end);
            assert!(start >= date(2024, 4, 1));
            assert!(end <= date(2024, 6, 30));
            assert_eq!((end - start).num_days(), duration);
            assert!((2..=10).contains(&duration));
            assert!(record.depends_on().is_empty());
            assert!(!record.is_critical());
        }
    }

    #[test]
    fn same_seed_replays_identically() {
        let mut pools = PoolSet::new();
        pools.insert(seeded_pool("crew", 4));

        let mut entity = decl("activity", 12);
        entity.depends_on = vec!["crew".to_string()];
        entity.fields = vec![
            field(
                "crew",
                FieldRule::Reference {
                    entity: "crew".to_string(),
                },
            ),
            field("effort", FieldRule::IntRange { min: 1, max: 100 }),
        ];

        let first = build_pool(&entity, 42, &pools).expect("first run");
        let second = build_pool(&entity, 42, &pools).expect("second run");
        assert_eq!(first.records(), second.records());

        let other_seed = build_pool(&entity, 43, &pools).expect("other seed");
        assert_ne!(first.records(), other_seed.records());
    }

    #[test]
    fn zero_count_is_rejected() {
        let err = build_pool(&decl("plant", 0), 1, &PoolSet::new()).expect_err("zero count");
        assert!(matches!(err, GenerationError::InvalidSpec(_)));
    }
}
