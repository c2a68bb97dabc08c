use clap::Args;
use serde_json::json;
use std::path::PathBuf;

use crate::common::{OutputFormat, load_index, run_to_exit_code};
use sidx_core::validate::validate;

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[arg(
        value_name = "INDEX",
        help = "Path to a searchindex.js file or a Sphinx build directory"
    )]
    pub path: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub async fn run(args: ValidateArgs) -> i32 {
    run_to_exit_code(run_inner(args)).await
}

async fn run_inner(args: ValidateArgs) -> Result<(), String> {
    let index = load_index(&args.path)?;
    let violations = validate(&index);

    match args.format {
        OutputFormat::Text => {
            if violations.is_empty() {
                println!(
                    "✅ Index is structurally sound ({} documents, {} terms, {} objects)",
                    index.doc_count(),
                    index.terms.len(),
                    index.object_count()
                );
            } else {
                for violation in &violations {
                    println!("❌ {violation}");
                }
            }
        }
        OutputFormat::Json => {
            let report = json!({
                "valid": violations.is_empty(),
                "violations": violations.iter().map(ToString::to_string).collect::<Vec<_>>(),
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&report)
                    .map_err(|e| format!("Failed to serialize report: {e}"))?
            );
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(format!("{} violation(s) found", violations.len()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const VALID: &str = concat!(
        r#"Search.setIndex({docnames:["api"],envversion:51,filenames:["api.rst"],"#,
        r#"objects:{},objnames:{},objtypes:{},terms:{alpha:0},titles:["API"],titleterms:{}})"#
    );

    // titles is missing an entry and a term points past the last document.
    const BROKEN: &str = concat!(
        r#"Search.setIndex({docnames:["api"],envversion:51,filenames:["api.rst"],"#,
        r#"objects:{},objnames:{},objtypes:{},terms:{alpha:4},titles:[],titleterms:{}})"#
    );

    fn write_index(contents: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("searchindex.js");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn test_valid_index_passes() {
        let (_dir, path) = write_index(VALID);
        let args = ValidateArgs {
            path,
            format: OutputFormat::Text,
        };
        assert!(run_inner(args).await.is_ok());
    }

    #[tokio::test]
    async fn test_broken_index_fails_with_count() {
        let (_dir, path) = write_index(BROKEN);
        let args = ValidateArgs {
            path,
            format: OutputFormat::Json,
        };
        let err = run_inner(args).await.unwrap_err();
        assert_eq!(err, "2 violation(s) found");
    }

    #[tokio::test]
    async fn test_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let args = ValidateArgs {
            path: dir.path().join("nope.js"),
            format: OutputFormat::Text,
        };
        assert!(run_inner(args).await.is_err());
    }
}
