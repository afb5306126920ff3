use std::fs;
use std::path::PathBuf;

use ontoforge_core::FieldValue;
use ontoforge_generate::{GenerateOptions, GenerationEngine, GenerationError};
use ontoforge_spec::{DomainSpec, EntityDecl, FieldDecl, FieldRule, SPEC_VERSION, catalog};

fn temp_out_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("ontoforge_generate_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp out dir");
    dir
}

fn run(spec: &DomainSpec, options: GenerateOptions) -> ontoforge_generate::GenerationResult {
    GenerationEngine::new(options).run(spec).expect("run generation")
}

#[test]
fn every_reference_resolves_after_a_full_run() {
    let spec = catalog::construction();
    let result = run(&spec, GenerateOptions::default());

    for decl in &spec.entities {
        let pool = result.pools.get(&decl.name).expect("pool generated");
        assert_eq!(pool.len() as u64, decl.count);

        for field in &decl.fields {
            let Some(target) = field.rule.referenced_entity() else {
                continue;
            };
            let target_pool = result.pools.get(target).expect("target pool generated");
            for record in pool.records() {
                match record.get(&field.name) {
                    Some(FieldValue::Ref(id)) => {
                        assert!(target_pool.contains(id), "dangling reference {id}");
                    }
                    Some(FieldValue::RefList(ids)) => {
                        for id in ids {
                            assert!(target_pool.contains(id), "dangling reference {id}");
                        }
                    }
                    other => panic!("unexpected value for {}: {other:?}", field.name),
                }
            }
        }
    }
}

#[test]
fn wired_activities_respect_temporal_precedence() {
    let spec = catalog::construction();
    let result = run(&spec, GenerateOptions::default());

    let activities = result.pools.get("activity").expect("activity pool");
    for record in activities.records() {
        let start = record.start().expect("start set");
        for predecessor in record.depends_on() {
            let earlier = activities.get(predecessor).expect("predecessor exists");
            assert!(
                earlier.end().expect("end set") <= start,
                "{predecessor} ends after {} starts",
                record.id()
            );
        }
    }
}

#[test]
fn critical_chain_is_connected_and_reported() {
    let spec = catalog::construction();
    let result = run(&spec, GenerateOptions::default());

    let chain = result
        .report
        .critical_paths
        .get("activity")
        .expect("critical path reported");
    assert!(!chain.is_empty());

    let activities = result.pools.get("activity").expect("activity pool");
    for pair in chain.windows(2) {
        let successor = activities.get(&pair[1]).expect("chain member exists");
        assert!(
            successor.depends_on().contains(&pair[0]),
            "chain link {} -> {} is not a precedence edge",
            pair[0],
            pair[1]
        );
    }

    for record in activities.records() {
        assert_eq!(record.is_critical(), chain.contains(&record.id().to_string()));
    }
}

#[test]
fn runs_with_the_same_seed_are_identical() {
    let spec = catalog::construction();
    let first = run(&spec, GenerateOptions::default());
    let second = run(&spec, GenerateOptions::default());

    for decl in &spec.entities {
        let pool_a = first.pools.get(&decl.name).expect("pool a");
        let pool_b = second.pools.get(&decl.name).expect("pool b");
        assert_eq!(pool_a.records(), pool_b.records(), "pool '{}'", decl.name);
    }
    assert_eq!(first.report.critical_paths, second.report.critical_paths);
}

#[test]
fn artifacts_are_written_per_entity() {
    let spec = catalog::manufacturing();
    let out_dir = temp_out_dir("artifacts");
    let result = run(&spec, GenerateOptions {
        out_dir: Some(out_dir.clone()),
        audit: true,
    });

    let run_dir = result.run_dir.expect("run dir created");
    assert!(run_dir.join("resolved_spec.json").is_file());
    assert!(run_dir.join("generation_report.json").is_file());

    for decl in &spec.entities {
        let csv_path = run_dir.join(format!("{}.csv", decl.name));
        let contents = fs::read_to_string(&csv_path).expect("read entity csv");
        let rows = contents.lines().count() as u64;
        assert_eq!(rows, decl.count + 1, "header plus one row per record");
    }
    assert!(result.report.bytes_written > 0);

    fs::remove_dir_all(&out_dir).ok();
}

#[test]
fn oversized_reference_sample_halts_the_pipeline() {
    let spec = DomainSpec {
        spec_version: SPEC_VERSION.to_string(),
        name: "undersized".to_string(),
        seed: 3,
        entities: vec![
            EntityDecl {
                name: "part".to_string(),
                count: 3,
                depends_on: Vec::new(),
                fields: Vec::new(),
                schedule: None,
            },
            EntityDecl {
                name: "kit".to_string(),
                count: 2,
                depends_on: vec!["part".to_string()],
                fields: vec![FieldDecl {
                    name: "parts".to_string(),
                    rule: FieldRule::ReferenceList {
                        entity: "part".to_string(),
                        min: 5,
                        max: 5,
                    },
                }],
                schedule: None,
            },
        ],
    };

    let err = GenerationEngine::new(GenerateOptions::default())
        .run(&spec)
        .expect_err("oversized sample must fail");
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
fn json_authored_spec_generates_end_to_end() {
    let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../ontoforge-spec/tests/fixtures/logistics.spec.json");
    let spec = ontoforge_spec::load_spec(&fixture).expect("load fixture spec");

    let result = run(&spec, GenerateOptions {
        out_dir: None,
        audit: true,
    });

    let deliveries = result.pools.get("delivery").expect("delivery pool");
    assert_eq!(deliveries.len(), 18);
    for record in deliveries.records() {
        assert_eq!(
            record.get("priority").and_then(FieldValue::as_str),
            Some("standard")
        );
    }
    assert!(result.report.critical_paths.contains_key("delivery"));
}

#[test]
fn cyclic_entity_declarations_halt_the_pipeline() {
    let spec = DomainSpec {
        spec_version: SPEC_VERSION.to_string(),
        name: "tangled".to_string(),
        seed: 5,
        entities: vec![
            EntityDecl {
                name: "alpha".to_string(),
                count: 1,
                depends_on: vec!["beta".to_string()],
                fields: Vec::new(),
                schedule: None,
            },
            EntityDecl {
                name: "beta".to_string(),
                count: 1,
                depends_on: vec!["alpha".to_string()],
                fields: Vec::new(),
                schedule: None,
            },
        ],
    };

    let err = GenerationEngine::new(GenerateOptions::default())
        .run(&spec)
        .expect_err("cycle must fail");
    assert!(matches!(err, GenerationError::CyclicEntityDependency { .. }));
}
