//! Benchmark corpora for `jeq`.
//!
//! Each corpus is generated deterministically in memory, so the Criterion
//! groups and the doctests need no fixture files on disk.
//!
//! # Examples
//!
//! ```
//! let corpus = jeq_benches::available_corpora()
//!     .iter()
//!     .find(|corpus| corpus.name() == "wide-object")
//!     .expect("registered corpus");
//! let dataset = corpus.load()?;
//! assert!(dataset.compare_list().is_none());
//! # Ok::<(), jeq_core::ParseError>(())
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

use jeq_core::{
    compare_with, contains_subtree, ArrayMode, CompareOptions, Difference, Node, ParseError,
};
use serde_json::{json, Value};

/// A named, reproducible benchmark input.
#[derive(Clone, Copy, Debug)]
pub struct Corpus {
    name: &'static str,
    build: fn() -> Sources,
}

struct Sources {
    actual: Value,
    expected: Value,
    subtree: Value,
}

impl Corpus {
    /// Stable identifier used as the Criterion benchmark id.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Size in bytes of the serialized `actual` document.
    #[must_use]
    pub fn fixture_bytes(&self) -> usize {
        (self.build)().actual.to_string().len()
    }

    /// Parses the corpus into comparable nodes.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if a generated document fails to parse.
    pub fn load(&self) -> Result<Dataset, ParseError> {
        let sources = (self.build)();
        Ok(Dataset {
            actual: Node::from_json_str(&sources.actual.to_string())?,
            expected: Node::from_json_str(&sources.expected.to_string())?,
            subtree: Node::from_json_str(&sources.subtree.to_string())?,
        })
    }
}

/// Parsed documents for one corpus.
#[derive(Clone, Debug)]
pub struct Dataset {
    actual: Node,
    expected: Node,
    subtree: Node,
}

impl Dataset {
    /// Document under test.
    #[must_use]
    pub fn actual(&self) -> &Node {
        &self.actual
    }

    /// Reference document. Equal to `actual` in list mode except for array order.
    #[must_use]
    pub fn expected(&self) -> &Node {
        &self.expected
    }

    /// A fragment of `actual` for subtree matching.
    #[must_use]
    pub fn subtree(&self) -> &Node {
        &self.subtree
    }

    /// Compares `actual` with itself rebuilt in the same order.
    #[must_use]
    pub fn compare_list(&self) -> Option<Difference> {
        compare_with(Some(&self.actual), Some(&self.actual.clone()), &CompareOptions::default())
    }

    /// Compares `actual` with the reordered `expected` in set mode.
    #[must_use]
    pub fn compare_set(&self) -> Option<Difference> {
        let options = CompareOptions::default().with_array_mode(ArrayMode::Set);
        compare_with(Some(&self.actual), Some(&self.expected), &options)
    }

    /// Runs the subtree matcher.
    #[must_use]
    pub fn contains(&self) -> bool {
        contains_subtree(&self.actual, &self.subtree)
    }
}

static CORPORA: [Corpus; 3] = [
    Corpus { name: "wide-object", build: wide_object },
    Corpus { name: "deep-nesting", build: deep_nesting },
    Corpus { name: "record-set", build: record_set },
];

/// Returns every registered corpus.
#[must_use]
pub fn available_corpora() -> &'static [Corpus] {
    &CORPORA
}

fn wide_object() -> Sources {
    let mut actual = serde_json::Map::new();
    for index in 0..512 {
        actual.insert(format!("field_{index:03}"), json!({"id": index, "tags": ["a", "b"]}));
    }
    let subtree = json!({"field_100": {"id": 100}, "field_511": {"tags": ["b"]}});
    let actual = Value::Object(actual);
    Sources { expected: actual.clone(), actual, subtree }
}

fn deep_nesting() -> Sources {
    let mut actual = json!({"leaf": [1, 2, 3]});
    let mut expected = json!({"leaf": [3, 2, 1]});
    for depth in 0..64 {
        actual = json!({"depth": depth, "child": actual});
        expected = json!({"child": expected, "depth": depth});
    }
    let subtree = json!({"child": {"child": {"depth": 61}}});
    Sources { actual, expected, subtree }
}

fn record_set() -> Sources {
    let records: Vec<Value> = (0..1_000)
        .map(|id| json!({"id": id, "name": format!("user-{id}"), "active": id % 3 == 0}))
        .collect();
    let mut reversed = records.clone();
    reversed.reverse();
    let subtree = json!([{"id": 999}, {"name": "user-0"}]);
    Sources { actual: Value::Array(records), expected: Value::Array(reversed), subtree }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_corpus_loads_and_matches() {
        for corpus in available_corpora() {
            let dataset = corpus.load().expect("corpus parses");
            assert!(dataset.compare_list().is_none(), "{}", corpus.name());
            assert!(dataset.compare_set().is_none(), "{}", corpus.name());
            assert!(dataset.contains(), "{}", corpus.name());
            assert!(corpus.fixture_bytes() > 0);
        }
    }

    #[test]
    fn reordered_corpora_differ_in_list_mode() {
        let corpus = available_corpora().iter().find(|c| c.name() == "record-set").unwrap();
        let dataset = corpus.load().unwrap();
        let difference = compare_with(
            Some(dataset.actual()),
            Some(dataset.expected()),
            &CompareOptions::default(),
        );
        assert!(difference.is_some());
    }
}
