//! Shared helpers for CLI commands.

use clap::ValueEnum;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use sidx_core::SearchIndex;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

/// Output rendering for commands with tabular results.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[value(rename_all = "lower")]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Machine-readable JSON
    Json,
}

/// Spinner for operations that may take a moment on large indexes.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());
    spinner
}

/// Load an index behind a spinner.
pub fn load_index(path: &Path) -> Result<SearchIndex, String> {
    let spinner = spinner(&format!("Loading {}", path.display()));
    let result = sidx_core::load_search_index(path);
    spinner.finish_and_clear();
    result
}

/// Map a command body onto a process exit code.
pub async fn run_to_exit_code<Fut>(fut: Fut) -> i32
where
    Fut: Future<Output = Result<(), String>>,
{
    match fut.await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{} {err}", style("error:").red().bold());
            1
        }
    }
}
