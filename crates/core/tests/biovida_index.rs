//! End-to-end checks against a real generated payload: the search index of
//! the biovida documentation site (envversion 51), vendored under
//! `testdata/`.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;

use sidx_core::loader::{load_search_index, to_js};
use sidx_core::search::{SearchEngine, search_objects};
use sidx_core::validate::validate;
use sidx_core::SearchIndex;

fn fixture() -> SearchIndex {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("searchindex.js");
    load_search_index(&path).expect("fixture should load")
}

#[test]
fn test_fixture_loads_and_is_valid() {
    let index = fixture();
    assert_eq!(index.doc_count(), 10);
    assert_eq!(index.envversion, 51);
    assert_eq!(index.filenames.len(), 10);
    assert_eq!(index.titles.len(), 10);
    assert_eq!(validate(&index), vec![]);
}

#[test]
fn test_fixture_shape_spot_checks() {
    let index = fixture();
    assert_eq!(index.docnames[8], "source/biovida");
    assert_eq!(index.filenames[8], "source/biovida.rst");
    assert_eq!(index.titles[8], "biovida package");

    // Singleton postings come in collapsed; lists stay lists.
    assert_eq!(index.titleterms["api"].as_slice(), &[0]);
    assert_eq!(index.terms["50x"].as_slice(), &[0, 5]);

    // The top-level module lives under the empty namespace prefix.
    let entry = &index.objects[""]["biovida"];
    assert_eq!(entry.doc(), 8);
    assert_eq!(entry.anchor_for("biovida"), "module-biovida");
    assert_eq!(index.type_label(entry.type_code()), Some("Python module"));
}

#[test]
fn test_fixture_stats() {
    let index = fixture();
    let stats = index.stats();
    assert_eq!(stats.documents, 10);
    assert_eq!(stats.terms, 1440);
    assert_eq!(stats.title_terms, 74);
    assert_eq!(stats.objects, 71);
    assert_eq!(stats.objects_by_type["Python module"], 14);
    assert_eq!(stats.objects_by_type["Python class"], 7);
    assert_eq!(stats.objects_by_type["Python method"], 34);
    assert_eq!(stats.objects_by_type["Python attribute"], 5);
    assert_eq!(stats.objects_by_type["Python function"], 11);
}

#[test]
fn test_full_text_query_against_fixture() {
    let index = fixture();
    let engine = SearchEngine::new(&index);

    // The generator stems terms ("disease" is stored as "diseas"), so plain
    // English words rank through partial matches.
    let hits = engine.query("disease ontology", 5);
    assert_eq!(hits[0].docname, "source/biovida");
    assert_eq!(hits[0].score, 9);
    assert_eq!(hits.len(), 3);

    let hits = engine.query("cancer imaging", 5);
    let names: Vec<&str> = hits.iter().map(|h| h.docname.as_str()).collect();
    assert_eq!(names, ["API", "other/images", "source/biovida"]);
    assert!(hits.iter().all(|h| h.score == 17));
}

#[test]
fn test_object_query_against_fixture() {
    let index = fixture();

    let hits = search_objects(&index, "pull", 10);
    // Five services expose a `pull` method; all tie on exact-segment score.
    assert_eq!(hits[0].name, "biovida.diagnostics.disease_ont_interface.DiseaseOntInterface.pull");
    assert_eq!(hits[0].score, 16);
    assert_eq!(hits[0].docname, "source/biovida");
    assert_eq!(hits[0].type_label, "Python method");
    assert_eq!(
        hits[0].anchor,
        "biovida.diagnostics.disease_ont_interface.DiseaseOntInterface.pull"
    );
    assert_eq!(hits[4].name, "biovida.images.openi_interface.OpeniInterface.pull");
    assert_eq!(hits[4].score, 16);
    assert_eq!(
        hits[5].name,
        "biovida.diagnostics.disease_symptoms_interface.DiseaseSymptomsInterface.hsdn_pull"
    );
    assert_eq!(hits[5].score, 11);

    let hits = search_objects(&index, "ImageClassificationCNN", 3);
    assert_eq!(
        hits[0].name,
        "biovida.images.models.image_classification.ImageClassificationCNN"
    );
    assert_eq!(hits[0].type_label, "Python class");
    assert_eq!(hits[0].docname, "other/images");
    assert_eq!(hits[0].score, 16);
}

#[test]
fn test_fixture_round_trip() {
    let index = fixture();
    let rewritten = to_js(&index).unwrap();
    assert!(rewritten.starts_with("Search.setIndex("));
    let reloaded = sidx_core::parse_search_index(&rewritten).unwrap();
    assert_eq!(reloaded, index);
}
