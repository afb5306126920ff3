//! Built-in example domain specs.
//!
//! These mirror the illustrative ontologies the pipeline is typically run
//! against and double as fixtures for the integration tests.

use chrono::NaiveDate;

use crate::model::{DomainSpec, EntityDecl, FieldDecl, FieldRule, SPEC_VERSION, ScheduleDecl};

/// All built-in domain specs, in catalog order.
pub fn all() -> Vec<DomainSpec> {
    vec![
        construction(),
        manufacturing(),
        supply_chain(),
        movies(),
        insurance(),
    ]
}

/// Look up a built-in domain spec by name.
pub fn by_name(name: &str) -> Option<DomainSpec> {
    all().into_iter().find(|spec| spec.name == name)
}

/// Construction-project domain: the most developed ontology, with a
/// scheduled activity entity that exercises precedence wiring and
/// critical-path analysis.
pub fn construction() -> DomainSpec {
    DomainSpec {
        spec_version: SPEC_VERSION.to_string(),
        name: "construction".to_string(),
        seed: 7,
        entities: vec![
            EntityDecl {
                name: "project".to_string(),
                count: 3,
                depends_on: Vec::new(),
                fields: vec![
                    choice(
                        "site",
                        &["riverside", "harbor_line", "north_depot", "airport_west"],
                    ),
                    field("budget", FieldRule::IntRange {
                        min: 500_000,
                        max: 40_000_000,
                    }),
                    field("kickoff", FieldRule::DateWindow {
                        start: date(2024, 1, 1),
                        end: date(2024, 3, 31),
                    }),
                ],
                schedule: None,
            },
            EntityDecl {
                name: "crew".to_string(),
                count: 8,
                depends_on: Vec::new(),
                fields: vec![
                    choice(
                        "trade",
                        &[
                            "earthworks",
                            "concrete",
                            "steel",
                            "electrical",
                            "plumbing",
                            "finishing",
                        ],
                    ),
                    field("headcount", FieldRule::IntRange { min: 2, max: 14 }),
                ],
                schedule: None,
            },
            EntityDecl {
                name: "material".to_string(),
                count: 12,
                depends_on: Vec::new(),
                fields: vec![
                    choice(
                        "category",
                        &["aggregate", "cement", "rebar", "timber", "cabling", "glass"],
                    ),
                    field("unit_cost", FieldRule::FloatRange {
                        min: 2.5,
                        max: 950.0,
                    }),
                ],
                schedule: None,
            },
            EntityDecl {
                name: "activity".to_string(),
                count: 40,
                depends_on: vec![
                    "project".to_string(),
                    "crew".to_string(),
                    "material".to_string(),
                ],
                fields: vec![
                    field("project", FieldRule::Reference {
                        entity: "project".to_string(),
                    }),
                    field("crew", FieldRule::Reference {
                        entity: "crew".to_string(),
                    }),
                    field("materials", FieldRule::ReferenceList {
                        entity: "material".to_string(),
                        min: 0,
                        max: 3,
                    }),
                    choice("phase", &["groundwork", "structure", "services", "fitout"]),
                ],
                schedule: Some(ScheduleDecl {
                    window_start: date(2024, 4, 1),
                    window_end: date(2025, 3, 31),
                    min_duration_days: 3,
                    max_duration_days: 30,
                    max_predecessors: 3,
                }),
            },
        ],
    }
}

/// Manufacturing domain: plant -> line -> machine reference chain.
pub fn manufacturing() -> DomainSpec {
    DomainSpec {
        spec_version: SPEC_VERSION.to_string(),
        name: "manufacturing".to_string(),
        seed: 11,
        entities: vec![
            EntityDecl {
                name: "plant".to_string(),
                count: 2,
                depends_on: Vec::new(),
                fields: vec![
                    choice("region", &["north", "south", "east", "west"]),
                    field("commissioned", FieldRule::DateWindow {
                        start: date(2010, 1, 1),
                        end: date(2020, 12, 31),
                    }),
                ],
                schedule: None,
            },
            EntityDecl {
                name: "line".to_string(),
                count: 5,
                depends_on: vec!["plant".to_string()],
                fields: vec![
                    field("plant", FieldRule::Reference {
                        entity: "plant".to_string(),
                    }),
                    choice("shift_model", &["two_shift", "three_shift", "continuous"]),
                ],
                schedule: None,
            },
            EntityDecl {
                name: "machine".to_string(),
                count: 14,
                depends_on: vec!["line".to_string()],
                fields: vec![
                    field("line", FieldRule::Reference {
                        entity: "line".to_string(),
                    }),
                    choice("kind", &["press", "lathe", "welder", "packer"]),
                    field("capacity_per_hour", FieldRule::IntRange { min: 20, max: 400 }),
                ],
                schedule: None,
            },
        ],
    }
}

/// Supply-chain domain: supplier -> manufacturer -> product -> order.
pub fn supply_chain() -> DomainSpec {
    DomainSpec {
        spec_version: SPEC_VERSION.to_string(),
        name: "supply_chain".to_string(),
        seed: 23,
        entities: vec![
            EntityDecl {
                name: "supplier".to_string(),
                count: 6,
                depends_on: Vec::new(),
                fields: vec![
                    choice("tier", &["tier_1", "tier_2", "tier_3"]),
                    field("reliability", FieldRule::FloatRange { min: 0.6, max: 1.0 }),
                ],
                schedule: None,
            },
            EntityDecl {
                name: "manufacturer".to_string(),
                count: 3,
                depends_on: vec!["supplier".to_string()],
                fields: vec![field("suppliers", FieldRule::ReferenceList {
                    entity: "supplier".to_string(),
                    min: 1,
                    max: 3,
                })],
                schedule: None,
            },
            EntityDecl {
                name: "product".to_string(),
                count: 10,
                depends_on: vec!["manufacturer".to_string()],
                fields: vec![
                    field("manufacturer", FieldRule::Reference {
                        entity: "manufacturer".to_string(),
                    }),
                    field("unit_price", FieldRule::FloatRange {
                        min: 4.0,
                        max: 1200.0,
                    }),
                ],
                schedule: None,
            },
            EntityDecl {
                name: "order".to_string(),
                count: 25,
                depends_on: vec!["product".to_string()],
                fields: vec![
                    field("product", FieldRule::Reference {
                        entity: "product".to_string(),
                    }),
                    field("quantity", FieldRule::IntRange { min: 1, max: 500 }),
                    field("ordered_on", FieldRule::DateWindow {
                        start: date(2024, 1, 1),
                        end: date(2024, 12, 31),
                    }),
                ],
                schedule: None,
            },
        ],
    }
}

/// Movie domain: studios, people, and films with cast references.
pub fn movies() -> DomainSpec {
    DomainSpec {
        spec_version: SPEC_VERSION.to_string(),
        name: "movies".to_string(),
        seed: 31,
        entities: vec![
            EntityDecl {
                name: "studio".to_string(),
                count: 4,
                depends_on: Vec::new(),
                fields: vec![field("founded", FieldRule::IntRange {
                    min: 1920,
                    max: 2015,
                })],
                schedule: None,
            },
            EntityDecl {
                name: "person".to_string(),
                count: 30,
                depends_on: Vec::new(),
                fields: vec![choice("role", &["actor", "director", "writer", "composer"])],
                schedule: None,
            },
            EntityDecl {
                name: "film".to_string(),
                count: 12,
                depends_on: vec!["studio".to_string(), "person".to_string()],
                fields: vec![
                    field("studio", FieldRule::Reference {
                        entity: "studio".to_string(),
                    }),
                    field("cast", FieldRule::ReferenceList {
                        entity: "person".to_string(),
                        min: 1,
                        max: 3,
                    }),
                    choice("genre", &["drama", "comedy", "thriller", "documentary"]),
                    field("runtime_minutes", FieldRule::IntRange { min: 70, max: 210 }),
                    field("released", FieldRule::DateWindow {
                        start: date(1990, 1, 1),
                        end: date(2024, 12, 31),
                    }),
                ],
                schedule: None,
            },
        ],
    }
}

/// Insurance domain: customers, policies, and claims.
pub fn insurance() -> DomainSpec {
    DomainSpec {
        spec_version: SPEC_VERSION.to_string(),
        name: "insurance".to_string(),
        seed: 43,
        entities: vec![
            EntityDecl {
                name: "customer".to_string(),
                count: 20,
                depends_on: Vec::new(),
                fields: vec![
                    choice("segment", &["retail", "small_business", "corporate"]),
                    field("since", FieldRule::DateWindow {
                        start: date(2005, 1, 1),
                        end: date(2024, 6, 30),
                    }),
                ],
                schedule: None,
            },
            EntityDecl {
                name: "policy".to_string(),
                count: 30,
                depends_on: vec!["customer".to_string()],
                fields: vec![
                    field("customer", FieldRule::Reference {
                        entity: "customer".to_string(),
                    }),
                    choice("product_line", &["motor", "property", "liability", "marine"]),
                    field("annual_premium", FieldRule::FloatRange {
                        min: 120.0,
                        max: 18_000.0,
                    }),
                    field("effective", FieldRule::DateWindow {
                        start: date(2023, 1, 1),
                        end: date(2024, 12, 31),
                    }),
                ],
                schedule: None,
            },
            EntityDecl {
                name: "claim".to_string(),
                count: 15,
                depends_on: vec!["policy".to_string()],
                fields: vec![
                    field("policy", FieldRule::Reference {
                        entity: "policy".to_string(),
                    }),
                    field("amount", FieldRule::FloatRange {
                        min: 50.0,
                        max: 250_000.0,
                    }),
                    choice("status", &["open", "approved", "rejected", "settled"]),
                    field("filed", FieldRule::DateWindow {
                        start: date(2024, 1, 1),
                        end: date(2024, 12, 31),
                    }),
                ],
                schedule: None,
            },
        ],
    }
}

fn field(name: &str, rule: FieldRule) -> FieldDecl {
    FieldDecl {
        name: name.to_string(),
        rule,
    }
}

fn choice(name: &str, options: &[&str]) -> FieldDecl {
    field(name, FieldRule::Choice {
        options: options.iter().map(|option| option.to_string()).collect(),
    })
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
