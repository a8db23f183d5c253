//! `export-meta`: print the exported surface of JS/TS modules as JSON.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use export_meta::{ExportMetaError, ModuleReport};

#[derive(Debug, Parser)]
#[command(
    name = "export-meta",
    version,
    about = "Describe the exported variables, classes and functions of JS/TS modules"
)]
struct CliArgs {
    /// Print the synthesized import statement instead of JSON.
    #[arg(long)]
    import: bool,

    /// Namespace for default-export accessors (defaults to the PascalCase file stem).
    #[arg(long, value_name = "NAME")]
    namespace: Option<String>,

    /// Single-line JSON output.
    #[arg(long)]
    compact: bool,

    /// Module files to process.
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("EXPORT_META_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let mut failed = false;
    for path in &args.files {
        if let Err(e) = process_file(path, &args) {
            eprintln!("export-meta: {e}");
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn process_file(path: &Path, args: &CliArgs) -> Result<(), ExportMetaError> {
    let report = ModuleReport::from_path(path, args.namespace.as_deref())?;

    if args.import {
        match report.import_statement() {
            Some(line) => println!("{line}"),
            None => tracing::warn!(file = %path.display(), "module has nothing to import"),
        }
    } else {
        println!("{}", report.to_json(!args.compact)?);
    }
    Ok(())
}
