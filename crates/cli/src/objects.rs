use clap::Args;
use console::style;
use std::path::PathBuf;

use crate::common::{OutputFormat, load_index, run_to_exit_code};
use sidx_core::search_objects;

#[derive(Args, Debug, Clone)]
pub struct ObjectsArgs {
    #[arg(
        value_name = "INDEX",
        help = "Path to a searchindex.js file or a Sphinx build directory"
    )]
    pub path: PathBuf,

    #[arg(
        value_name = "QUERY",
        help = "Object name or fragment of a dotted path, e.g. \"pull\" or \"images.openi\""
    )]
    pub query: String,

    #[arg(short, long, default_value_t = 10, help = "Maximum number of results")]
    pub limit: usize,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub async fn run(args: ObjectsArgs) -> i32 {
    run_to_exit_code(run_inner(args)).await
}

async fn run_inner(args: ObjectsArgs) -> Result<(), String> {
    let index = load_index(&args.path)?;
    let hits = search_objects(&index, &args.query, args.limit);

    match args.format {
        OutputFormat::Text => {
            if hits.is_empty() {
                println!("No objects match {:?}", args.query);
                return Ok(());
            }
            for (rank, hit) in hits.iter().enumerate() {
                println!(
                    "{:>3}. {}  {}  {}",
                    rank + 1,
                    style(&hit.name).cyan().bold(),
                    style(&hit.type_label).dim(),
                    format_args!("{}#{}", hit.docname, hit.anchor)
                );
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&hits)
                    .map_err(|e| format!("Failed to serialize results: {e}"))?
            );
        }
    }

    Ok(())
}
