//! Loading and writing `searchindex.js` payloads.
//!
//! A payload is the generator's object literal wrapped in
//! `Search.setIndex(...)`, optionally with a trailing semicolon. Bare JSON
//! objects (no wrapper) are accepted too, which covers indexes that were
//! re-exported through this tool.

use std::fs;
use std::path::{Path, PathBuf};

use crate::common::Timer;
use crate::jsdump;
use crate::model::SearchIndex;

/// Filename Sphinx writes into the build output root.
pub const SEARCH_INDEX_FILENAME: &str = "searchindex.js";

const WRAPPER_PREFIX: &str = "Search.setIndex(";

/// Strip the `Search.setIndex(...)` wrapper, tolerating surrounding
/// whitespace and a trailing semicolon. Input without the wrapper is
/// returned unchanged.
pub fn strip_wrapper(src: &str) -> Result<&str, String> {
    let trimmed = src.trim();
    let Some(inner) = trimmed.strip_prefix(WRAPPER_PREFIX) else {
        return Ok(trimmed);
    };
    let inner = inner.trim_end().trim_end_matches(';').trim_end();
    inner
        .strip_suffix(')')
        .ok_or_else(|| "Malformed payload: Search.setIndex( without closing parenthesis".to_string())
}

/// Parse payload text into a typed index.
pub fn parse_search_index(src: &str) -> Result<SearchIndex, String> {
    let inner = strip_wrapper(src)?;
    let value = jsdump::parse(inner).map_err(|e| format!("Failed to parse payload: {e}"))?;
    serde_json::from_value(value).map_err(|e| format!("Payload does not match the search index shape: {e}"))
}

/// Resolve a user-supplied path to a concrete index file. Directories are
/// searched for a `searchindex.js`, first directly, then recursively (a
/// Sphinx project root keeps it under e.g. `_build/html/`).
pub fn resolve_index_path(path: &Path) -> Result<PathBuf, String> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if !path.is_dir() {
        return Err(format!("No such file or directory: {}", path.display()));
    }

    let direct = path.join(SEARCH_INDEX_FILENAME);
    if direct.is_file() {
        return Ok(direct);
    }

    tracing::debug!(
        "resolve_index_path: Scanning {} for {}",
        path.display(),
        SEARCH_INDEX_FILENAME
    );
    let mut candidates: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| {
            entry.file_type().is_file() && entry.file_name() == SEARCH_INDEX_FILENAME
        })
        .map(|entry| entry.into_path())
        .collect();
    candidates.sort();

    match candidates.first() {
        Some(found) => {
            if candidates.len() > 1 {
                tracing::warn!(
                    "Found {} search indexes under {}, using {}",
                    candidates.len(),
                    path.display(),
                    found.display()
                );
            }
            Ok(found.clone())
        }
        None => Err(format!(
            "No {} found under {}",
            SEARCH_INDEX_FILENAME,
            path.display()
        )),
    }
}

/// Load an index from a file, or from a directory containing one.
pub fn load_search_index(path: &Path) -> Result<SearchIndex, String> {
    let timer = Timer::start("load_search_index");
    let file = resolve_index_path(path)?;
    tracing::debug!("load_search_index: Reading {}", file.display());

    let contents = fs::read_to_string(&file)
        .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;
    let index = parse_search_index(&contents)?;

    tracing::info!(
        "Loaded search index from {} ({} documents, {} terms)",
        file.display(),
        index.doc_count(),
        index.terms.len()
    );
    timer.finish();
    Ok(index)
}

/// Serialize an index back into the wrapped `searchindex.js` form.
///
/// Output is valid JSON inside the wrapper; the generator's bare-key
/// compression is not reproduced, which the consumer side never requires.
pub fn to_js(index: &SearchIndex) -> Result<String, String> {
    let body = serde_json::to_string(index)
        .map_err(|e| format!("Failed to serialize search index: {e}"))?;
    Ok(format!("Search.setIndex({body})"))
}

/// Serialize an index as pretty-printed JSON.
pub fn to_json_pretty(index: &SearchIndex) -> Result<String, String> {
    serde_json::to_string_pretty(index)
        .map_err(|e| format!("Failed to serialize search index: {e}"))
}

/// Write an index as a wrapped `searchindex.js` file.
pub fn write_search_index(path: &Path, index: &SearchIndex) -> Result<(), String> {
    let contents = to_js(index)?;
    fs::write(path, contents).map_err(|e| format!("Failed to write {}: {e}", path.display()))
}
