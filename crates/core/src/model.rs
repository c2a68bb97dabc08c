//! Typed model of a Sphinx search index payload.

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Position of a document in the `docnames` array.
pub type DocId = usize;

/// Documents a term occurs in.
///
/// The generator stores a bare integer when a term occurs in exactly one
/// document and a list otherwise (including the empty list for terms that
/// were indexed but pruned). Both forms deserialize into a plain vector,
/// and serialization collapses singletons back so a round trip reproduces
/// the generator's output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Postings(pub Vec<DocId>);

impl Postings {
    pub fn as_slice(&self) -> &[DocId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DocId> {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for Postings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PostingsVisitor;

        impl<'de> Visitor<'de> for PostingsVisitor {
            type Value = Postings;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a document index or a list of document indices")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Postings, E> {
                Ok(Postings(vec![v as DocId]))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Postings, E> {
                if v < 0 {
                    return Err(E::custom(format!("negative document index {v}")));
                }
                Ok(Postings(vec![v as DocId]))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Postings, A::Error> {
                let mut docs = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(doc) = seq.next_element::<DocId>()? {
                    docs.push(doc);
                }
                Ok(Postings(docs))
            }
        }

        deserializer.deserialize_any(PostingsVisitor)
    }
}

impl Serialize for Postings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.len() == 1 {
            serializer.serialize_u64(self.0[0] as u64)
        } else {
            let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
            for doc in &self.0 {
                seq.serialize_element(doc)?;
            }
            seq.end()
        }
    }
}

/// One entry in `objects`: (document index, type code, priority, short anchor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry(pub DocId, pub u32, pub i32, pub String);

impl ObjectEntry {
    pub fn doc(&self) -> DocId {
        self.0
    }

    pub fn type_code(&self) -> u32 {
        self.1
    }

    pub fn priority(&self) -> i32 {
        self.2
    }

    pub fn short_anchor(&self) -> &str {
        &self.3
    }

    /// Expand the generator's anchor compression: `""` means the anchor is
    /// the dotted full name, `"-"` means `module-<full name>`.
    pub fn anchor_for(&self, full_name: &str) -> String {
        match self.3.as_str() {
            "" => full_name.to_string(),
            "-" => format!("module-{full_name}"),
            other => other.to_string(),
        }
    }
}

/// One entry in `objnames`: (domain, type name, human-readable label).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectTypeName(pub String, pub String, pub String);

impl ObjectTypeName {
    pub fn domain(&self) -> &str {
        &self.0
    }

    pub fn type_name(&self) -> &str {
        &self.1
    }

    pub fn label(&self) -> &str {
        &self.2
    }
}

/// A Sphinx `searchindex.js` payload.
///
/// Field order matches the generator's alphabetical key ordering so that
/// serialized output lines up with what Sphinx writes. Type-table keys
/// (`objnames`, `objtypes`) are stringified integers; they stay strings
/// here and are resolved through [`SearchIndex::type_label`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchIndex {
    pub docnames: Vec<String>,
    pub envversion: u64,
    pub filenames: Vec<String>,
    pub objects: BTreeMap<String, BTreeMap<String, ObjectEntry>>,
    pub objnames: BTreeMap<String, ObjectTypeName>,
    pub objtypes: BTreeMap<String, String>,
    pub terms: BTreeMap<String, Postings>,
    pub titles: Vec<String>,
    pub titleterms: BTreeMap<String, Postings>,
}

/// An `objects` entry joined with its namespace prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord<'a> {
    pub prefix: &'a str,
    pub name: &'a str,
    pub full_name: String,
    pub entry: &'a ObjectEntry,
}

impl SearchIndex {
    pub fn doc_count(&self) -> usize {
        self.docnames.len()
    }

    /// Human-readable label for an object type code, e.g. `"Python method"`.
    pub fn type_label(&self, code: u32) -> Option<&str> {
        self.objnames
            .get(&code.to_string())
            .map(ObjectTypeName::label)
    }

    /// Domain-qualified type identifier for a code, e.g. `"py:method"`.
    pub fn objtype(&self, code: u32) -> Option<&str> {
        self.objtypes.get(&code.to_string()).map(String::as_str)
    }

    /// All object entries with their dotted full names. The empty prefix is
    /// legal and used for top-level modules.
    pub fn iter_objects(&self) -> impl Iterator<Item = ObjectRecord<'_>> {
        self.objects.iter().flat_map(|(prefix, members)| {
            members.iter().map(move |(name, entry)| {
                let full_name = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}.{name}")
                };
                ObjectRecord {
                    prefix,
                    name,
                    full_name,
                    entry,
                }
            })
        })
    }

    pub fn object_count(&self) -> usize {
        self.objects.values().map(BTreeMap::len).sum()
    }

    /// Summary counters for the `stats` command.
    pub fn stats(&self) -> IndexStats {
        let mut objects_by_type = BTreeMap::new();
        for record in self.iter_objects() {
            let label = self
                .type_label(record.entry.type_code())
                .unwrap_or("unknown")
                .to_string();
            *objects_by_type.entry(label).or_insert(0usize) += 1;
        }
        IndexStats {
            envversion: self.envversion,
            documents: self.doc_count(),
            terms: self.terms.len(),
            title_terms: self.titleterms.len(),
            objects: self.object_count(),
            objects_by_type,
        }
    }
}

/// Summary counters over one index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub envversion: u64,
    pub documents: usize,
    pub terms: usize,
    pub title_terms: usize,
    pub objects: usize,
    pub objects_by_type: BTreeMap<String, usize>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use serde_json::json;

    fn sample_index() -> SearchIndex {
        serde_json::from_value(json!({
            "docnames": ["api", "guide"],
            "envversion": 51,
            "filenames": ["api.rst", "guide.rst"],
            "objects": {
                "": {"pkg": [0, 0, 0, "-"]},
                "pkg": {"Thing": [1, 1, 1, ""]},
                "pkg.Thing": {"run": [1, 2, 1, "custom-anchor"]}
            },
            "objnames": {
                "0": ["py", "module", "Python module"],
                "1": ["py", "class", "Python class"],
                "2": ["py", "method", "Python method"]
            },
            "objtypes": {"0": "py:module", "1": "py:class", "2": "py:method"},
            "terms": {"alpha": 0, "beta": [0, 1], "gamma": []},
            "titles": ["API", "Guide"],
            "titleterms": {"api": 0}
        }))
        .unwrap()
    }

    #[test]
    fn test_postings_single_and_list() {
        let index = sample_index();
        assert_eq!(index.terms["alpha"].as_slice(), &[0]);
        assert_eq!(index.terms["beta"].as_slice(), &[0, 1]);
        assert!(index.terms["gamma"].is_empty());
    }

    #[test]
    fn test_postings_serialize_collapses_singleton() {
        assert_eq!(serde_json::to_value(Postings(vec![3])).unwrap(), json!(3));
        assert_eq!(
            serde_json::to_value(Postings(vec![0, 5])).unwrap(),
            json!([0, 5])
        );
        assert_eq!(serde_json::to_value(Postings(vec![])).unwrap(), json!([]));
    }

    #[test]
    fn test_anchor_expansion() {
        let index = sample_index();
        let entry = &index.objects[""]["pkg"];
        assert_eq!(entry.anchor_for("pkg"), "module-pkg");
        let entry = &index.objects["pkg"]["Thing"];
        assert_eq!(entry.anchor_for("pkg.Thing"), "pkg.Thing");
        let entry = &index.objects["pkg.Thing"]["run"];
        assert_eq!(entry.anchor_for("pkg.Thing.run"), "custom-anchor");
    }

    #[test]
    fn test_type_label_lookup() {
        let index = sample_index();
        assert_eq!(index.type_label(2), Some("Python method"));
        assert_eq!(index.objtype(0), Some("py:module"));
        assert_eq!(index.type_label(9), None);
    }

    #[test]
    fn test_iter_objects_full_names() {
        let index = sample_index();
        let mut names: Vec<String> = index.iter_objects().map(|r| r.full_name).collect();
        names.sort();
        assert_eq!(names, ["pkg", "pkg.Thing", "pkg.Thing.run"]);
    }

    #[test]
    fn test_stats() {
        let index = sample_index();
        let stats = index.stats();
        assert_eq!(stats.documents, 2);
        assert_eq!(stats.terms, 3);
        assert_eq!(stats.title_terms, 1);
        assert_eq!(stats.objects, 3);
        assert_eq!(stats.objects_by_type["Python module"], 1);
    }

    #[test]
    fn test_round_trip_preserves_shape() {
        let index = sample_index();
        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(json["terms"]["alpha"], json!(0));
        assert_eq!(json["terms"]["beta"], json!([0, 1]));
        let back: SearchIndex = serde_json::from_value(json).unwrap();
        assert_eq!(back, index);
    }
}
