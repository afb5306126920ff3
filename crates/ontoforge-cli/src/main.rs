use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ontoforge_generate::{GenerateOptions, GenerationEngine, GenerationError};
use ontoforge_spec::{DomainSpec, IssueSeverity, SpecError, catalog, load_spec, validate_spec};

#[derive(Debug, Error)]
enum CliError {
    #[error("spec error: {0}")]
    Spec(#[from] SpecError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("unknown built-in domain '{0}'")]
    UnknownDomain(String),
    #[error("spec has {0} validation error(s)")]
    InvalidSpec(usize),
}

#[derive(Parser, Debug)]
#[command(name = "ontoforge", version, about = "Ontoforge synthetic dataset CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate datasets from a domain spec.
    Generate(GenerateArgs),
    /// Validate a domain spec document.
    Validate(ValidateArgs),
    /// List built-in domain specs.
    Domains,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Path to a domain spec JSON document.
    #[arg(long, required_unless_present = "domain", conflicts_with = "domain")]
    spec: Option<PathBuf>,
    /// Name of a built-in domain spec.
    #[arg(long)]
    domain: Option<String>,
    /// Output directory for run artifacts.
    #[arg(long, default_value = "out")]
    out: PathBuf,
    /// Override the spec seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Audit the generated pools and fail on violations.
    #[arg(long, default_value_t = false)]
    audit: bool,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Path to a domain spec JSON document.
    spec: PathBuf,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Generate(args) => generate(args),
        Command::Validate(args) => validate(args),
        Command::Domains => {
            for spec in catalog::all() {
                println!("{} ({} entities, seed {})", spec.name, spec.entities.len(), spec.seed);
            }
            Ok(())
        }
    }
}

fn generate(args: GenerateArgs) -> Result<(), CliError> {
    let mut spec = resolve_spec(args.spec.as_deref(), args.domain.as_deref())?;
    if let Some(seed) = args.seed {
        spec.seed = seed;
    }

    let engine = GenerationEngine::new(GenerateOptions {
        out_dir: Some(args.out),
        audit: args.audit,
    });
    let result = engine.run(&spec)?;

    if let Some(run_dir) = &result.run_dir {
        info!(run_dir = %run_dir.display(), "artifacts written");
        println!("{}", run_dir.display());
    }
    Ok(())
}

fn validate(args: ValidateArgs) -> Result<(), CliError> {
    let spec = load_spec(&args.spec)?;
    let report = validate_spec(&spec);

    for issue in report.errors.iter().chain(&report.warnings) {
        let severity = match issue.severity {
            IssueSeverity::Error => "error",
            IssueSeverity::Warning => "warning",
        };
        println!("{severity} [{}] {} at {}", issue.code, issue.message, issue.path);
    }

    if report.is_ok() {
        println!("spec '{}' is valid", spec.name);
        Ok(())
    } else {
        Err(CliError::InvalidSpec(report.errors.len()))
    }
}

fn resolve_spec(spec: Option<&std::path::Path>, domain: Option<&str>) -> Result<DomainSpec, CliError> {
    if let Some(path) = spec {
        return Ok(load_spec(path)?);
    }
    let Some(name) = domain else {
        // clap enforces one of the two; unreachable in practice
        return Err(CliError::UnknownDomain(String::new()));
    };
    catalog::by_name(name).ok_or_else(|| CliError::UnknownDomain(name.to_string()))
}
