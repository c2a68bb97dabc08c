use clap::Args;
use console::style;
use std::path::PathBuf;

use crate::common::{OutputFormat, load_index, run_to_exit_code};

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    #[arg(
        value_name = "INDEX",
        help = "Path to a searchindex.js file or a Sphinx build directory"
    )]
    pub path: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub async fn run(args: StatsArgs) -> i32 {
    run_to_exit_code(run_inner(args)).await
}

async fn run_inner(args: StatsArgs) -> Result<(), String> {
    let index = load_index(&args.path)?;
    let stats = index.stats();

    match args.format {
        OutputFormat::Text => {
            println!("envversion:  {}", stats.envversion);
            println!("documents:   {}", stats.documents);
            println!("terms:       {}", stats.terms);
            println!("title terms: {}", stats.title_terms);
            println!("objects:     {}", stats.objects);
            for (label, count) in &stats.objects_by_type {
                println!("  {}  {count}", style(label).dim());
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&stats)
                    .map_err(|e| format!("Failed to serialize stats: {e}"))?
            );
        }
    }

    Ok(())
}
