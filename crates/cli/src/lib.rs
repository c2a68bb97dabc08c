//! Command-line interface for inspecting and querying Sphinx documentation
//! search indexes.

#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::dbg_macro
)]

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod common;
mod export;
mod objects;
mod search;
mod stats;
mod validate;

#[derive(Parser)]
#[command(
    name = "sidx",
    version,
    about = "\x1b[33msidx\x1b[0m inspects and queries Sphinx documentation search indexes 🔍"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// ✅ Check an index against its structural invariants
    Validate(validate::ValidateArgs),
    /// 🔍 Full-text search over the term tables
    Search(search::SearchArgs),
    /// 🧩 Look up API objects by dotted path
    Objects(objects::ObjectsArgs),
    /// 📊 Summarize an index
    Stats(stats::StatsArgs),
    /// 📦 Re-emit an index as JSON or wrapped JavaScript
    Export(export::ExportArgs),
}

/// Run the CLI with the given argv and return the process exit code.
pub fn run(args: Vec<String>) -> i32 {
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to create tokio runtime: {err}");
            return 1;
        }
    };

    runtime.block_on(run_cli_async(args))
}

async fn run_cli_async(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Validate(args)) => validate::run(args).await,
            Some(Commands::Search(args)) => search::run(args).await,
            Some(Commands::Objects(args)) => objects::run(args).await,
            Some(Commands::Stats(args)) => stats::run(args).await,
            Some(Commands::Export(args)) => export::run(args).await,
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

fn init_tracing() {
    // SIDX_LOG controls log level: "trace", "debug", "info", "warn", "error"
    // or a full tracing filter spec like "sidx_core=debug"
    let filter = match std::env::var("SIDX_LOG") {
        Ok(level) if is_plain_level(&level) => {
            format!("sidx_core={level},sidx_cli={level}")
        }
        Ok(spec) => spec,
        Err(_) => "sidx_core=warn,sidx_cli=warn".to_string(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
