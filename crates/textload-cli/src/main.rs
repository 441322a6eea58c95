//! textload — load a directory of text files into `texts` / `sections` tables.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use textload_core::{ErrorPolicy, LoaderConfig};
use textload_ingest::{load_directory, print_report};
use textload_store::SqliteStore;

fn print_usage() {
    println!("textload — split text files into fixed-size sections and store them");
    println!();
    println!("Usage: textload [texts-dir] [--isolate] [--json]");
    println!("       textload stats [--json]");
    println!();
    println!("Options:");
    println!("  --isolate     Roll back and skip failed files instead of aborting the run");
    println!("  --json        Print the summary as JSON");
    println!();
    println!("Environment:");
    println!("  TEXTLOAD_TEXTS_DIR      source directory (default: texts)");
    println!("  TEXTLOAD_DB_PATH        SQLite database (default: data/textdb.sqlite3)");
    println!("  TEXTLOAD_CHUNK_SIZE     bytes per section (default: 1024)");
    println!("  TEXTLOAD_EXTENSION      only load files with this extension");
    println!("  TEXTLOAD_ERROR_POLICY   abort | isolate (default: abort)");
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = LoaderConfig::from_env()?;
    let mut json = false;
    let mut stats_only = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--help" | "-h" | "help" => {
                print_usage();
                return Ok(ExitCode::SUCCESS);
            }
            "--isolate" => config.error_policy = ErrorPolicy::IsolatePerDocument,
            "--json" => json = true,
            "stats" => stats_only = true,
            flag if flag.starts_with('-') => {
                eprintln!("Unknown option: {}. Use 'textload help' for usage.", flag);
                return Ok(ExitCode::FAILURE);
            }
            dir => config.texts_dir = PathBuf::from(dir),
        }
    }

    if stats_only {
        let store = SqliteStore::open(&config.db_path)
            .with_context(|| format!("failed to open store at {}", config.db_path.display()))?;
        let stats = store.get_stats()?;
        store.close()?;
        if json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            println!("Texts:      {}", stats.texts);
            println!("Sections:   {}", stats.sections);
            println!("Database:   {} ({} bytes)", stats.db_path, stats.db_size_bytes);
        }
        return Ok(ExitCode::SUCCESS);
    }

    info!(
        "Loading {} into {} (chunk size {}, policy {:?})",
        config.texts_dir.display(),
        config.db_path.display(),
        config.chunk_size,
        config.error_policy
    );

    let report = load_directory(&config)
        .with_context(|| format!("load of {} aborted", config.texts_dir.display()))?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        print_report(&report);
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
