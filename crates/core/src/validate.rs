//! Structural validation of a loaded index.
//!
//! A malformed index still loads if it parses; this module reports the
//! damage instead of panicking on it. All violations are collected so a
//! single run shows everything that is wrong.

use thiserror::Error;

use crate::model::{DocId, SearchIndex};

/// A single structural-integrity violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("filenames has {filenames} entries but docnames has {docnames}")]
    FilenamesLengthMismatch { docnames: usize, filenames: usize },

    #[error("titles has {titles} entries but docnames has {docnames}")]
    TitlesLengthMismatch { docnames: usize, titles: usize },

    #[error("term {term:?} references document {doc} but only {docs} documents exist")]
    TermDocOutOfBounds {
        term: String,
        doc: DocId,
        docs: usize,
    },

    #[error("title term {term:?} references document {doc} but only {docs} documents exist")]
    TitleTermDocOutOfBounds {
        term: String,
        doc: DocId,
        docs: usize,
    },

    #[error("object {name:?} references document {doc} but only {docs} documents exist")]
    ObjectDocOutOfBounds {
        name: String,
        doc: DocId,
        docs: usize,
    },

    #[error("object {name:?} uses type code {code} with no entry in {table}")]
    ObjectTypeUnresolved {
        name: String,
        code: u32,
        table: &'static str,
    },

    #[error("type code {key:?} is present in {present} but missing from {missing}")]
    TypeTablesDiverge {
        key: String,
        present: &'static str,
        missing: &'static str,
    },
}

/// Check every invariant and return all violations found.
pub fn validate(index: &SearchIndex) -> Vec<Violation> {
    let mut violations = Vec::new();
    let docs = index.doc_count();

    if index.filenames.len() != docs {
        violations.push(Violation::FilenamesLengthMismatch {
            docnames: docs,
            filenames: index.filenames.len(),
        });
    }
    if index.titles.len() != docs {
        violations.push(Violation::TitlesLengthMismatch {
            docnames: docs,
            titles: index.titles.len(),
        });
    }

    for (term, postings) in &index.terms {
        for &doc in postings.iter() {
            if doc >= docs {
                violations.push(Violation::TermDocOutOfBounds {
                    term: term.clone(),
                    doc,
                    docs,
                });
            }
        }
    }

    for (term, postings) in &index.titleterms {
        for &doc in postings.iter() {
            if doc >= docs {
                violations.push(Violation::TitleTermDocOutOfBounds {
                    term: term.clone(),
                    doc,
                    docs,
                });
            }
        }
    }

    for record in index.iter_objects() {
        if record.entry.doc() >= docs {
            violations.push(Violation::ObjectDocOutOfBounds {
                name: record.full_name.clone(),
                doc: record.entry.doc(),
                docs,
            });
        }
        let code = record.entry.type_code();
        if index.objtype(code).is_none() {
            violations.push(Violation::ObjectTypeUnresolved {
                name: record.full_name.clone(),
                code,
                table: "objtypes",
            });
        }
        if index.type_label(code).is_none() {
            violations.push(Violation::ObjectTypeUnresolved {
                name: record.full_name,
                code,
                table: "objnames",
            });
        }
    }

    for key in index.objtypes.keys() {
        if !index.objnames.contains_key(key) {
            violations.push(Violation::TypeTablesDiverge {
                key: key.clone(),
                present: "objtypes",
                missing: "objnames",
            });
        }
    }
    for key in index.objnames.keys() {
        if !index.objtypes.contains_key(key) {
            violations.push(Violation::TypeTablesDiverge {
                key: key.clone(),
                present: "objnames",
                missing: "objtypes",
            });
        }
    }

    if violations.is_empty() {
        tracing::debug!("validate: Index is structurally sound");
    } else {
        tracing::warn!("validate: Found {} violation(s)", violations.len());
    }
    violations
}

/// Convenience wrapper around [`validate`].
pub fn is_valid(index: &SearchIndex) -> bool {
    validate(index).is_empty()
}
