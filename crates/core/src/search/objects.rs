//! API cross-reference lookup over the `objects` table.

use serde::Serialize;

use crate::model::SearchIndex;
use crate::search::scorer;

/// A ranked object match, resolved to its target document and anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectHit {
    pub name: String,
    pub type_label: String,
    pub docname: String,
    pub anchor: String,
    pub priority: i32,
    pub score: i32,
}

/// Match a query against dotted object paths.
///
/// An exact match on the trailing path segment outranks a substring match
/// anywhere in the path, and each entry's priority flag contributes a bonus
/// on top. Matching is case-insensitive.
pub fn search_objects(index: &SearchIndex, query: &str, limit: usize) -> Vec<ObjectHit> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut hits = Vec::new();
    for record in index.iter_objects() {
        let name_lower = record.full_name.to_lowercase();
        let base_score = if record.name.to_lowercase() == query {
            scorer::OBJ_NAME_MATCH
        } else if name_lower.contains(&query) {
            scorer::OBJ_PARTIAL_MATCH
        } else {
            continue;
        };

        let Some(docname) = index.docnames.get(record.entry.doc()) else {
            // An invalid index that still parsed; validate reports this.
            tracing::debug!(
                "search_objects: {} references out-of-bounds document {}",
                record.full_name,
                record.entry.doc()
            );
            continue;
        };

        let priority = record.entry.priority();
        let anchor = record.entry.anchor_for(&record.full_name);
        let type_label = index
            .type_label(record.entry.type_code())
            .unwrap_or("unknown")
            .to_string();
        hits.push(ObjectHit {
            name: record.full_name,
            type_label,
            docname: docname.clone(),
            anchor,
            priority,
            score: base_score + scorer::object_priority_bonus(priority),
        });
    }

    hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
    hits.truncate(limit);
    tracing::debug!("search_objects: {:?} matched {} object(s)", query, hits.len());
    hits
}
