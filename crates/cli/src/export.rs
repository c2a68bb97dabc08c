use clap::{Args, ValueEnum};
use std::fs;
use std::path::PathBuf;

use crate::common::{load_index, run_to_exit_code};
use sidx_core::loader::{to_js, to_json_pretty};

/// Serialization target for `export`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[value(rename_all = "lower")]
pub enum ExportFormat {
    /// Pretty-printed JSON
    Json,
    /// Wrapped `Search.setIndex(...)` JavaScript
    Js,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[arg(
        value_name = "INDEX",
        help = "Path to a searchindex.js file or a Sphinx build directory"
    )]
    pub path: PathBuf,

    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,

    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Write to a file instead of stdout"
    )]
    pub out: Option<PathBuf>,
}

pub async fn run(args: ExportArgs) -> i32 {
    run_to_exit_code(run_inner(args)).await
}

async fn run_inner(args: ExportArgs) -> Result<(), String> {
    let index = load_index(&args.path)?;
    let contents = match args.format {
        ExportFormat::Json => to_json_pretty(&index)?,
        ExportFormat::Js => to_js(&index)?,
    };

    match args.out {
        Some(out) => {
            fs::write(&out, contents).map_err(|e| format!("Failed to write {}: {e}", out.display()))?;
            println!("Wrote {}", out.display());
        }
        None => println!("{contents}"),
    }

    Ok(())
}
