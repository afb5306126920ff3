use std::collections::HashSet;

use ontoforge_core::fields;

use crate::errors::{IssueSeverity, ValidationIssue, ValidationReport};
use crate::model::{DomainSpec, EntityDecl, FieldRule, SPEC_VERSION, ScheduleDecl};

/// Validate a domain spec structurally, returning coded issues.
///
/// Cyclic entity dependencies are not checked here; the planner detects them
/// and fails with its own error.
pub fn validate_spec(spec: &DomainSpec) -> ValidationReport {
    let mut report = ValidationReport::default();

    if spec.spec_version != SPEC_VERSION {
        report.push_warning(ValidationIssue::new(
            IssueSeverity::Warning,
            "spec_version_mismatch",
            "/spec_version",
            format!(
                "spec_version '{}' does not match supported version '{}'",
                spec.spec_version, SPEC_VERSION
            ),
            Some(format!("regenerate the spec for version '{SPEC_VERSION}'")),
        ));
    }

    if spec.name.trim().is_empty() {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "name_empty",
            "/name",
            "domain name must be a non-empty string".to_string(),
            None,
        ));
    }

    if spec.entities.is_empty() {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "entities_empty",
            "/entities",
            "spec requires at least one entity declaration".to_string(),
            Some("declare at least one entity".to_string()),
        ));
        return report;
    }

    let declared: HashSet<&str> = spec
        .entities
        .iter()
        .map(|entity| entity.name.as_str())
        .collect();

    let mut seen = HashSet::new();
    for (idx, entity) in spec.entities.iter().enumerate() {
        let base_path = format!("/entities/{idx}");

        if !seen.insert(entity.name.as_str()) {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "duplicate_entity",
                base_path.clone(),
                format!("entity '{}' is declared more than once", entity.name),
                Some("merge duplicate declarations into a single entry".to_string()),
            ));
        }

        validate_entity(entity, &base_path, &declared, &mut report);
    }

    report
}

fn validate_entity(
    entity: &EntityDecl,
    base_path: &str,
    declared: &HashSet<&str>,
    report: &mut ValidationReport,
) {
    if entity.count == 0 {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "count_zero",
            format!("{base_path}/count"),
            "count must be greater than zero".to_string(),
            Some("set count to a positive integer".to_string()),
        ));
    }

    let mut dependency_seen = HashSet::new();
    for (idx, dependency) in entity.depends_on.iter().enumerate() {
        let path = format!("{base_path}/depends_on/{idx}");
        if dependency == &entity.name {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "self_dependency",
                path.clone(),
                format!("entity '{}' depends on itself", entity.name),
                None,
            ));
        } else if !declared.contains(dependency.as_str()) {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "unknown_dependency",
                path.clone(),
                format!(
                    "entity '{}' depends on undeclared entity '{}'",
                    entity.name, dependency
                ),
                None,
            ));
        }
        if !dependency_seen.insert(dependency.as_str()) {
            report.push_warning(ValidationIssue::new(
                IssueSeverity::Warning,
                "duplicate_dependency",
                path,
                format!("dependency '{}' is listed more than once", dependency),
                None,
            ));
        }
    }

    let mut field_seen = HashSet::new();
    for (idx, field) in entity.fields.iter().enumerate() {
        let field_path = format!("{base_path}/fields/{idx}");

        if fields::RESERVED.contains(&field.name.as_str()) {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "reserved_field",
                format!("{field_path}/name"),
                format!("field name '{}' is reserved", field.name),
                Some("pick a name outside the derived field set".to_string()),
            ));
        }

        if !field_seen.insert(field.name.as_str()) {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "duplicate_field",
                format!("{field_path}/name"),
                format!("field '{}' is declared more than once", field.name),
                None,
            ));
        }

        validate_rule(entity, field.name.as_str(), &field.rule, &field_path, report);
    }

    if let Some(schedule) = &entity.schedule {
        validate_schedule(schedule, &format!("{base_path}/schedule"), report);
    }
}

fn validate_rule(
    entity: &EntityDecl,
    field_name: &str,
    rule: &FieldRule,
    field_path: &str,
    report: &mut ValidationReport,
) {
    match rule {
        FieldRule::Constant { value } => {
            let scalar = value.is_boolean() || value.is_number() || value.is_string();
            if !scalar {
                report.push_error(ValidationIssue::new(
                    IssueSeverity::Error,
                    "constant_not_scalar",
                    format!("{field_path}/rule/value"),
                    format!("constant for field '{field_name}' must be a JSON scalar"),
                    None,
                ));
            }
        }
        FieldRule::IntRange { min, max } => {
            if min > max {
                report.push_error(range_inverted(field_name, field_path));
            }
        }
        FieldRule::FloatRange { min, max } => {
            if min > max {
                report.push_error(range_inverted(field_name, field_path));
            }
        }
        FieldRule::Choice { options } => {
            if options.is_empty() {
                report.push_error(ValidationIssue::new(
                    IssueSeverity::Error,
                    "choice_empty",
                    format!("{field_path}/rule/options"),
                    format!("choice for field '{field_name}' requires at least one option"),
                    None,
                ));
            }
        }
        FieldRule::Reference { .. } | FieldRule::ReferenceList { .. } => {
            if let FieldRule::ReferenceList { min, max, .. } = rule
                && min > max
            {
                report.push_error(ValidationIssue::new(
                    IssueSeverity::Error,
                    "reference_list_bounds",
                    format!("{field_path}/rule"),
                    format!("reference list for field '{field_name}' has min greater than max"),
                    None,
                ));
            }
            let target = rule.referenced_entity().unwrap_or_default();
            if !entity.depends_on.iter().any(|dep| dep == target) {
                report.push_error(ValidationIssue::new(
                    IssueSeverity::Error,
                    "reference_without_dependency",
                    format!("{field_path}/rule/entity"),
                    format!(
                        "field '{field_name}' references entity '{target}' which is not in depends_on"
                    ),
                    Some(format!("add '{target}' to the entity's depends_on list")),
                ));
            }
        }
        FieldRule::DateWindow { start, end } => {
            if start > end {
                report.push_error(window_inverted(field_name, field_path));
            }
        }
        FieldRule::TimestampWindow { start, end } => {
            if start > end {
                report.push_error(window_inverted(field_name, field_path));
            }
        }
    }
}

fn validate_schedule(schedule: &ScheduleDecl, base_path: &str, report: &mut ValidationReport) {
    if schedule.window_start > schedule.window_end {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "schedule_window_inverted",
            format!("{base_path}/window_start"),
            "schedule window_start is after window_end".to_string(),
            None,
        ));
        return;
    }

    if schedule.min_duration_days > schedule.max_duration_days {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "schedule_duration_inverted",
            format!("{base_path}/min_duration_days"),
            "min_duration_days is greater than max_duration_days".to_string(),
            None,
        ));
    }

    let window_days = (schedule.window_end - schedule.window_start).num_days();
    if i64::from(schedule.max_duration_days) > window_days {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "schedule_window_too_small",
            format!("{base_path}/max_duration_days"),
            format!(
                "window of {window_days} day(s) cannot fit max_duration_days {}",
                schedule.max_duration_days
            ),
            Some("widen the window or reduce the maximum duration".to_string()),
        ));
    }

    if schedule.max_predecessors == 0 {
        report.push_warning(ValidationIssue::new(
            IssueSeverity::Warning,
            "schedule_no_predecessors",
            format!("{base_path}/max_predecessors"),
            "max_predecessors of zero disables precedence wiring".to_string(),
            None,
        ));
    }
}

fn range_inverted(field_name: &str, field_path: &str) -> ValidationIssue {
    ValidationIssue::new(
        IssueSeverity::Error,
        "range_inverted",
        format!("{field_path}/rule"),
        format!("range for field '{field_name}' has min greater than max"),
        None,
    )
}

fn window_inverted(field_name: &str, field_path: &str) -> ValidationIssue {
    ValidationIssue::new(
        IssueSeverity::Error,
        "window_inverted",
        format!("{field_path}/rule"),
        format!("window for field '{field_name}' has start after end"),
        None,
    )
}
