//! Full-text query engine over the term tables.

use serde::Serialize;
use std::collections::HashMap;

use crate::common::Timer;
use crate::model::{DocId, Postings, SearchIndex};
use crate::search::scorer;

/// A ranked document match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub docname: String,
    pub filename: String,
    pub title: String,
    pub score: i32,
}

/// Inverted index over one term table, keyed by lowercased term.
///
/// Term keys in the payload are mostly lowercase already, but generated
/// indexes contain mixed-case stragglers (`AND`, `Adding`); lowering both
/// sides makes those reachable. Keys that collide after lowering merge
/// their postings.
struct TermTable {
    exact: HashMap<String, Vec<DocId>>,
    entries: Vec<(String, Vec<DocId>)>,
}

impl TermTable {
    fn build(source: &std::collections::BTreeMap<String, Postings>) -> Self {
        let mut exact: HashMap<String, Vec<DocId>> = HashMap::new();
        let mut entries = Vec::with_capacity(source.len());
        for (term, postings) in source {
            let lowered = term.to_lowercase();
            let docs = postings.as_slice().to_vec();
            let merged = exact.entry(lowered.clone()).or_default();
            merged.extend(docs.iter().copied());
            merged.sort_unstable();
            merged.dedup();
            entries.push((lowered, docs));
        }
        Self { exact, entries }
    }

    /// Record this table's contribution for one query word. Each document
    /// keeps the best contribution, matching how the Sphinx client scores
    /// one word against one file.
    fn score_word(
        &self,
        word: &str,
        exact_score: i32,
        partial_score: i32,
        out: &mut HashMap<DocId, i32>,
    ) {
        if let Some(docs) = self.exact.get(word) {
            for &doc in docs {
                bump(out, doc, exact_score);
            }
        }
        // Substring matches only count for words long enough to be selective
        // (more than two characters, not bytes).
        if word.chars().count() > 2 {
            for (term, docs) in &self.entries {
                if term != word && term.contains(word) {
                    for &doc in docs {
                        bump(out, doc, partial_score);
                    }
                }
            }
        }
    }
}

fn bump(scores: &mut HashMap<DocId, i32>, doc: DocId, score: i32) {
    let entry = scores.entry(doc).or_insert(score);
    if *entry < score {
        *entry = score;
    }
}

/// Full-text search over a loaded index.
pub struct SearchEngine<'idx> {
    index: &'idx SearchIndex,
    terms: TermTable,
    title_terms: TermTable,
}

impl std::fmt::Debug for SearchEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("documents", &self.index.doc_count())
            .field("terms", &self.terms.entries.len())
            .field("title_terms", &self.title_terms.entries.len())
            .finish()
    }
}

impl<'idx> SearchEngine<'idx> {
    /// Build the inverted index over `terms` and `titleterms`.
    pub fn new(index: &'idx SearchIndex) -> Self {
        let timer = Timer::start("build_search_engine");
        let engine = Self {
            index,
            terms: TermTable::build(&index.terms),
            title_terms: TermTable::build(&index.titleterms),
        };
        timer.finish();
        engine
    }

    /// Run a full-text query. The query is lowercased and split on
    /// whitespace; a document matches only if every word matches (exactly,
    /// or as a substring of an indexed term for words longer than two
    /// characters). Scores follow [`scorer`].
    pub fn query(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let words: Vec<String> = query
            .split_whitespace()
            .map(str::to_lowercase)
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return Vec::new();
        }

        let mut combined: Option<HashMap<DocId, i32>> = None;
        for word in &words {
            let mut word_scores = HashMap::new();
            self.terms
                .score_word(word, scorer::TERM, scorer::PARTIAL_TERM, &mut word_scores);
            self.title_terms.score_word(
                word,
                scorer::TITLE,
                scorer::PARTIAL_TITLE,
                &mut word_scores,
            );

            combined = Some(match combined {
                None => word_scores,
                // AND semantics: keep only documents matched by every word,
                // summing the per-word scores.
                Some(acc) => acc
                    .into_iter()
                    .filter_map(|(doc, score)| {
                        word_scores.get(&doc).map(|extra| (doc, score + extra))
                    })
                    .collect(),
            });
        }

        let scores = combined.unwrap_or_default();
        let mut hits: Vec<SearchHit> = scores
            .into_iter()
            .filter_map(|(doc, score)| self.resolve(doc, score))
            .collect();
        hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.docname.cmp(&b.docname)));
        hits.truncate(limit);

        tracing::debug!("query: {:?} matched {} document(s)", query, hits.len());
        hits
    }

    /// Resolve a document index against the parallel arrays. Out-of-bounds
    /// indices (an invalid index that still parsed) are dropped.
    fn resolve(&self, doc: DocId, score: i32) -> Option<SearchHit> {
        let docname = self.index.docnames.get(doc)?;
        Some(SearchHit {
            docname: docname.clone(),
            filename: self.index.filenames.get(doc).cloned().unwrap_or_default(),
            title: self.index.titles.get(doc).cloned().unwrap_or_default(),
            score,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::loader::parse_search_index;

    fn sample_index() -> SearchIndex {
        parse_search_index(concat!(
            r#"Search.setIndex({docnames:["api","guide"],envversion:51,"#,
            r#"filenames:["api.rst","guide.rst"],objects:{},objnames:{},objtypes:{},"#,
            r#"terms:{alpha:0,beta:[0,1],alphabet:[1],AND:0},"#,
            r#"titles:["API","Guide"],titleterms:{alpha:1}})"#
        ))
        .unwrap()
    }

    #[test]
    fn test_exact_term_and_title_scores() {
        let index = sample_index();
        let engine = SearchEngine::new(&index);
        let hits = engine.query("alpha", 10);
        // guide: exact title term (15); api: exact term (5).
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].docname, "guide");
        assert_eq!(hits[0].score, 15);
        assert_eq!(hits[1].docname, "api");
        assert_eq!(hits[1].score, 5);
    }

    #[test]
    fn test_multi_word_requires_all_words() {
        let index = sample_index();
        let engine = SearchEngine::new(&index);
        let hits = engine.query("alpha beta", 10);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].docname, "guide");
        assert_eq!(hits[0].score, 20);
        assert_eq!(hits[1].docname, "api");
        assert_eq!(hits[1].score, 10);

        // "gamma" matches nothing, so the intersection is empty.
        assert!(engine.query("alpha gamma", 10).is_empty());
    }

    #[test]
    fn test_partial_matches() {
        let index = sample_index();
        let engine = SearchEngine::new(&index);
        let hits = engine.query("alph", 10);
        // guide: partial title term (7); api: partial term (2).
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].docname, "guide");
        assert_eq!(hits[0].score, 7);
        assert_eq!(hits[1].docname, "api");
        assert_eq!(hits[1].score, 2);
    }

    #[test]
    fn test_short_words_never_match_partially() {
        let index = sample_index();
        let engine = SearchEngine::new(&index);
        assert!(engine.query("al", 10).is_empty());
    }

    #[test]
    fn test_partial_threshold_counts_characters_not_bytes() {
        let index = parse_search_index(concat!(
            r#"Search.setIndex({docnames:["api"],envversion:51,filenames:["api.rst"],"#,
            r#"objects:{},objnames:{},objtypes:{},terms:{"barabási":0},"#,
            r#"titles:["API"],titleterms:{}})"#
        ))
        .unwrap();
        let engine = SearchEngine::new(&index);
        // Two characters (three bytes in UTF-8): still too short.
        assert!(engine.query("ás", 10).is_empty());
        // Three characters qualifies for substring matching.
        let hits = engine.query("bás", 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, scorer::PARTIAL_TERM);
    }

    #[test]
    fn test_mixed_case_terms_are_reachable() {
        let index = sample_index();
        let engine = SearchEngine::new(&index);
        let hits = engine.query("and", 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].docname, "api");
        assert_eq!(hits[0].score, scorer::TERM);
    }

    #[test]
    fn test_query_lowercases_input() {
        let index = sample_index();
        let engine = SearchEngine::new(&index);
        assert_eq!(engine.query("ALPHA", 10), engine.query("alpha", 10));
    }

    #[test]
    fn test_limit_truncates() {
        let index = sample_index();
        let engine = SearchEngine::new(&index);
        let hits = engine.query("alpha", 1);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].docname, "guide");
    }

    #[test]
    fn test_empty_query() {
        let index = sample_index();
        let engine = SearchEngine::new(&index);
        assert!(engine.query("", 10).is_empty());
        assert!(engine.query("   ", 10).is_empty());
    }

    #[test]
    fn test_hit_resolves_parallel_arrays() {
        let index = sample_index();
        let engine = SearchEngine::new(&index);
        let hits = engine.query("beta", 10);
        let api = hits.iter().find(|h| h.docname == "api").unwrap();
        assert_eq!(api.filename, "api.rst");
        assert_eq!(api.title, "API");
    }
}
