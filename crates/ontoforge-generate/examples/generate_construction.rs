use std::env;
use std::path::PathBuf;

use ontoforge_generate::{GenerateOptions, GenerationEngine};
use ontoforge_spec::catalog;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut out_dir = PathBuf::from("out");
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" => {
                out_dir = args.next().map(PathBuf::from).ok_or("missing --out value")?;
            }
            other => return Err(format!("unexpected argument '{other}'").into()),
        }
    }

    let spec = catalog::construction();
    let engine = GenerationEngine::new(GenerateOptions {
        out_dir: Some(out_dir),
        audit: true,
    });
    let result = engine.run(&spec)?;

    if let Some(run_dir) = result.run_dir {
        println!("run_dir={}", run_dir.display());
    }
    let chain = result
        .report
        .critical_paths
        .get("activity")
        .map(|chain| chain.join(" -> "))
        .unwrap_or_default();
    println!("critical_path={chain}");
    Ok(())
}
