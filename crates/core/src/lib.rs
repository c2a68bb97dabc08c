//! Core library for working with Sphinx documentation search indexes: a
//! reader for the generator's `searchindex.js` payload, a typed model,
//! structural validation, and the query-side decoding a documentation
//! site's search box performs.

#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::dbg_macro
)]

pub mod common;
pub mod jsdump;
pub mod loader;
pub mod model;
pub mod search;
pub mod validate;

pub use loader::{load_search_index, parse_search_index, write_search_index};
pub use model::{DocId, IndexStats, ObjectEntry, Postings, SearchIndex};
pub use search::{ObjectHit, SearchEngine, SearchHit, search_objects};
pub use validate::{Violation, is_valid, validate};
