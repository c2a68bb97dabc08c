//! Query-side decoding of an index: full-text search over `terms` and
//! `titleterms`, and API cross-reference lookup over `objects`.

pub mod engine;
pub mod objects;

pub use engine::{SearchEngine, SearchHit};
pub use objects::{ObjectHit, search_objects};

/// Default result-scoring weights of the Sphinx search client. They are the
/// de-facto contract of this data format, so queries rank the same way the
/// documentation site itself would.
pub mod scorer {
    pub const TERM: i32 = 5;
    pub const PARTIAL_TERM: i32 = 2;
    pub const TITLE: i32 = 15;
    pub const PARTIAL_TITLE: i32 = 7;
    pub const OBJ_NAME_MATCH: i32 = 11;
    pub const OBJ_PARTIAL_MATCH: i32 = 6;

    /// Bonus for an object's priority flag. Priorities outside the known
    /// range contribute nothing.
    pub fn object_priority_bonus(priority: i32) -> i32 {
        match priority {
            0 => 15,
            1 => 5,
            2 => -5,
            _ => 0,
        }
    }
}
