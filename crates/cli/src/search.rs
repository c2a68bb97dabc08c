use clap::Args;
use console::style;
use std::path::PathBuf;

use crate::common::{OutputFormat, load_index, run_to_exit_code};
use sidx_core::SearchEngine;

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[arg(
        value_name = "INDEX",
        help = "Path to a searchindex.js file or a Sphinx build directory"
    )]
    pub path: PathBuf,

    #[arg(
        value_name = "QUERY",
        required = true,
        num_args = 1..,
        help = "Search words; a document must match all of them"
    )]
    pub query: Vec<String>,

    #[arg(short, long, default_value_t = 10, help = "Maximum number of results")]
    pub limit: usize,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub async fn run(args: SearchArgs) -> i32 {
    run_to_exit_code(run_inner(args)).await
}

async fn run_inner(args: SearchArgs) -> Result<(), String> {
    let index = load_index(&args.path)?;
    let engine = SearchEngine::new(&index);
    let query = args.query.join(" ");
    let hits = engine.query(&query, args.limit);

    match args.format {
        OutputFormat::Text => {
            if hits.is_empty() {
                println!("No documents match {query:?}");
                return Ok(());
            }
            for (rank, hit) in hits.iter().enumerate() {
                println!(
                    "{:>3}. {}  {}  {}",
                    rank + 1,
                    style(&hit.docname).cyan().bold(),
                    hit.title,
                    style(format!("(score {})", hit.score)).dim()
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
