//! First-difference comparison of JSON trees.
//!
//! The comparator walks both trees in lock-step and stops at the first point
//! where they diverge, reporting what kind of divergence it found and where.
//! Objects compare by name regardless of property order; arrays compare by
//! position, or as sets when [`ArrayMode::Set`](crate::ArrayMode::Set) is
//! selected.

mod array;
mod object;
mod path;
mod value;

pub use path::{Path, PathSegment};

use std::fmt;

use serde::Serialize;

use crate::{
    hash::{HashCache, HashCode},
    CompareOptions, Node,
};

/// Classification of a divergence between two trees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DifferenceKind {
    /// The actual document is absent.
    ActualIsNull,
    /// The expected document is absent.
    ExpectedIsNull,
    /// The nodes have different shapes or scalar types.
    OtherType,
    /// Two properties have different names.
    OtherName,
    /// Two scalars of the same type hold different values.
    OtherValue,
    /// Two arrays have different lengths.
    DifferentLength,
    /// The expected object has a property the actual one lacks.
    ActualMissesProperty,
    /// The actual object has a property the expected one lacks.
    ExpectedMissesProperty,
    /// An array element has no equivalent on the other side (set mode).
    OtherSet,
}

/// The first divergence found between two trees.
///
/// ```
/// # use jeq_core::{compare, DifferenceKind, Node};
/// let actual = Node::from_json_str("{\"a\":1}")?;
/// let expected = Node::from_json_str("{\"a\":1,\"b\":2}")?;
/// let difference = compare(Some(&actual), Some(&expected)).unwrap();
/// assert_eq!(difference.kind(), DifferenceKind::ActualMissesProperty);
/// assert_eq!(difference.to_string(), "misses property $.b");
/// # Ok::<(), jeq_core::ParseError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Difference {
    kind: DifferenceKind,
    path: Path,
}

impl Difference {
    /// Creates a difference.
    #[must_use]
    pub fn new(kind: DifferenceKind, path: Path) -> Self {
        Self { kind, path }
    }

    /// Kind of divergence.
    #[must_use]
    pub fn kind(&self) -> DifferenceKind {
        self.kind
    }

    /// Where the divergence was observed.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Human-readable description, e.g. `has a different value at $.a[1]`.
    #[must_use]
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = &self.path;
        match self.kind {
            DifferenceKind::ActualIsNull => f.write_str("is null"),
            DifferenceKind::ExpectedIsNull => f.write_str("is not null"),
            DifferenceKind::OtherType => write!(f, "has a different type at {path}"),
            DifferenceKind::OtherName => write!(f, "has a different name at {path}"),
            DifferenceKind::OtherValue => write!(f, "has a different value at {path}"),
            DifferenceKind::DifferentLength => write!(f, "has a different length at {path}"),
            DifferenceKind::ActualMissesProperty => write!(f, "misses property {path}"),
            DifferenceKind::ExpectedMissesProperty => write!(f, "has extra property {path}"),
            DifferenceKind::OtherSet => write!(f, "has a mismatch in set at {path}"),
        }
    }
}

/// Finds the first difference using default options (arrays as lists).
///
/// `None` means the documents are equivalent.
#[must_use]
pub fn compare(actual: Option<&Node>, expected: Option<&Node>) -> Option<Difference> {
    compare_with(actual, expected, &CompareOptions::default())
}

/// Finds the first difference using the given options.
///
/// ```
/// # use jeq_core::{compare_with, CompareOptions, DifferenceKind, Node};
/// let actual = Node::from_json_str("[1,2,2]")?;
/// let expected = Node::from_json_str("[1,2,3]")?;
/// let difference = compare_with(Some(&actual), Some(&expected), &CompareOptions::set()).unwrap();
/// assert_eq!(difference.kind(), DifferenceKind::OtherSet);
/// # Ok::<(), jeq_core::ParseError>(())
/// ```
#[must_use]
pub fn compare_with(
    actual: Option<&Node>,
    expected: Option<&Node>,
    options: &CompareOptions,
) -> Option<Difference> {
    let difference = match (actual, expected) {
        (None, None) => None,
        (Some(actual), Some(expected)) if std::ptr::eq(actual, expected) => None,
        (None, Some(_)) => Some(Difference::new(DifferenceKind::ActualIsNull, Path::root())),
        (Some(_), None) => Some(Difference::new(DifferenceKind::ExpectedIsNull, Path::root())),
        (Some(actual), Some(expected)) => {
            compare_at(actual, expected, &Path::root(), &mut Comparison::new(options))
        }
    };
    if let Some(difference) = &difference {
        tracing::trace!(kind = ?difference.kind, path = %difference.path, "difference found");
    }
    difference
}

/// Options and structural hash codes shared by one top-level comparison.
///
/// Set-mode arrays hash their elements; nested set arrays reuse those codes
/// instead of hashing the same subtrees again.
pub(crate) struct Comparison<'a> {
    options: &'a CompareOptions,
    hashes: HashCache<'a>,
}

impl<'a> Comparison<'a> {
    pub(crate) fn new(options: &'a CompareOptions) -> Self {
        Self { options, hashes: HashCache::default() }
    }

    fn options(&self) -> &'a CompareOptions {
        self.options
    }

    fn hash_code(&mut self, node: &'a Node) -> HashCode {
        node.cached_hash_code(self.options, &mut self.hashes)
    }
}

pub(crate) fn compare_at<'a>(
    actual: &'a Node,
    expected: &'a Node,
    path: &Path,
    cx: &mut Comparison<'a>,
) -> Option<Difference> {
    match (actual, expected) {
        (Node::Array(actual), Node::Array(expected)) => {
            array::compare_arrays(actual, expected, path, cx)
        }
        (Node::Object(actual), Node::Object(expected)) => {
            object::compare_objects(actual, expected, path, cx)
        }
        (Node::Property(actual), Node::Property(expected)) => {
            if actual.name != expected.name {
                return Some(Difference::new(DifferenceKind::OtherName, path.clone()));
            }
            compare_at(&actual.value, &expected.value, path, cx)
        }
        (Node::Value(actual), Node::Value(expected)) => {
            value::compare_scalars(actual, expected, path)
        }
        (Node::Array(_) | Node::Object(_) | Node::Property(_) | Node::Value(_), _) => {
            Some(Difference::new(DifferenceKind::OtherType, path.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    fn node(json: &str) -> Node {
        Node::from_json_str(json).unwrap()
    }

    fn first(actual: &str, expected: &str) -> Option<(DifferenceKind, String)> {
        compare(Some(&node(actual)), Some(&node(expected)))
            .map(|d| (d.kind(), d.path().to_string()))
    }

    #[test]
    fn absent_documents() {
        let doc = node("{}");
        assert_eq!(compare(None, None), None);
        assert_eq!(compare(None, Some(&doc)).unwrap().kind(), DifferenceKind::ActualIsNull);
        assert_eq!(compare(Some(&doc), None).unwrap().kind(), DifferenceKind::ExpectedIsNull);
    }

    #[test]
    fn same_reference_is_equivalent() {
        let doc = node("[1,{\"a\":null}]");
        assert_eq!(compare(Some(&doc), Some(&doc)), None);
    }

    #[test]
    fn shape_mismatch_is_other_type() {
        assert_eq!(first("[]", "{}"), Some((DifferenceKind::OtherType, "$".into())));
        assert_eq!(first("{}", "[]"), Some((DifferenceKind::OtherType, "$".into())));
        assert_eq!(
            first("{\"a\":[1]}", "{\"a\":{\"b\":1}}"),
            Some((DifferenceKind::OtherType, "$.a".into()))
        );
        assert_eq!(first("1", "[1]"), Some((DifferenceKind::OtherType, "$".into())));
    }

    #[test]
    fn properties_compare_names_then_values() {
        let a = Node::property("a", Node::from(1));
        let b = Node::property("b", Node::from(1));
        let a2 = Node::property("a", Node::from(2));
        let opts = CompareOptions::default();
        assert_eq!(a.compare(&b, &opts).unwrap().kind(), DifferenceKind::OtherName);
        let difference = a.compare(&a2, &opts).unwrap();
        assert_eq!(difference.kind(), DifferenceKind::OtherValue);
        assert!(difference.path().is_root());
        assert_eq!(a.compare(&Node::from(1), &opts).unwrap().kind(), DifferenceKind::OtherType);
    }

    #[test]
    fn describe_uses_fixed_templates() {
        let path = Path::root().with_property("a").with_index(0);
        let cases = [
            (DifferenceKind::ActualIsNull, "is null"),
            (DifferenceKind::ExpectedIsNull, "is not null"),
            (DifferenceKind::OtherType, "has a different type at $.a[0]"),
            (DifferenceKind::OtherName, "has a different name at $.a[0]"),
            (DifferenceKind::OtherValue, "has a different value at $.a[0]"),
            (DifferenceKind::DifferentLength, "has a different length at $.a[0]"),
            (DifferenceKind::ActualMissesProperty, "misses property $.a[0]"),
            (DifferenceKind::ExpectedMissesProperty, "has extra property $.a[0]"),
            (DifferenceKind::OtherSet, "has a mismatch in set at $.a[0]"),
        ];
        for (kind, expected) in cases {
            assert_eq!(Difference::new(kind, path.clone()).describe(), expected);
        }
    }

    #[test]
    fn serializes_kind_and_path() {
        let difference = Difference::new(DifferenceKind::OtherValue, Path::root().with_index(1));
        assert_eq!(
            serde_json::to_value(&difference).unwrap(),
            serde_json::json!({"kind": "OtherValue", "path": "$[1]"})
        );
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl CapturedLog {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'w> MakeWriter<'w> for CapturedLog {
        type Writer = Self;

        fn make_writer(&'w self) -> Self::Writer {
            self.clone()
        }
    }

    fn traced<T>(run: impl FnOnce() -> T) -> (T, String) {
        let log = CapturedLog::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(log.clone())
            .finish();
        let result = tracing::subscriber::with_default(subscriber, run);
        (result, log.contents())
    }

    #[test]
    fn only_the_reported_difference_is_traced() {
        let actual = node("[{\"a\":[1,2]},{\"a\":[3]}]");
        let expected = node("[{\"a\":[3]},{\"a\":[2,1,9]}]");
        let (difference, log) =
            traced(|| compare_with(Some(&actual), Some(&expected), &CompareOptions::set()));
        assert_eq!(difference.unwrap().path().to_string(), "$[0]");
        assert_eq!(log.matches("difference found").count(), 1, "{log}");
        assert!(log.contains("$[0]"), "{log}");
    }

    #[test]
    fn discarded_candidate_mismatches_are_not_traced() {
        let document = node("[1,\"x\",{\"k\":[true,false]},3]");
        let subtree = node("[3,{\"k\":[false]}]");
        let (contained, log) = traced(|| crate::contains_subtree(&document, &subtree));
        assert!(contained);
        assert!(!log.contains("difference found"), "{log}");

        let same = node("[[1,2],[3]]");
        let other = node("[[3],[2,1]]");
        let (difference, log) =
            traced(|| compare_with(Some(&same), Some(&other), &CompareOptions::set()));
        assert_eq!(difference, None);
        assert!(log.is_empty(), "{log}");
    }

    fn arb_json_value() -> impl Strategy<Value = serde_json::Value> {
        use proptest::{collection::btree_map, collection::vec, string::string_regex};

        let leaf = prop_oneof![
            Just(serde_json::Value::Null),
            any::<bool>().prop_map(serde_json::Value::Bool),
            any::<i32>().prop_map(|i| serde_json::Value::Number(i.into())),
            proptest::num::f64::NORMAL.prop_filter_map("finite", |f| {
                serde_json::Number::from_f64(f).map(serde_json::Value::Number)
            }),
            string_regex("[a-zA-Z0-9]{0,8}").unwrap().prop_map(serde_json::Value::String),
        ];
        leaf.prop_recursive(4, 8, 4, move |inner| {
            prop_oneof![
                vec(inner.clone(), 0..4).prop_map(serde_json::Value::Array),
                btree_map(string_regex("[a-zA-Z0-9]{1,8}").unwrap(), inner, 0..4).prop_map(|map| {
                    let mut object = serde_json::Map::new();
                    for (k, v) in map {
                        object.insert(k, v);
                    }
                    serde_json::Value::Object(object)
                }),
            ]
        })
    }

    proptest! {
        #[test]
        fn comparison_is_reflexive(json in arb_json_value()) {
            let node = Node::from_json_value(json.clone());
            let other = Node::from_json_value(json);
            prop_assert_eq!(compare(Some(&node), Some(&other)), None);
            prop_assert_eq!(compare_with(Some(&node), Some(&other), &CompareOptions::set()), None);
        }

        #[test]
        fn equivalent_nodes_share_hash_codes(json in arb_json_value()) {
            let node = Node::from_json_value(json);
            let reversed = match &node {
                Node::Array(values) => Node::Array(values.iter().rev().cloned().collect()),
                other => other.clone(),
            };
            let set = CompareOptions::set();
            prop_assert_eq!(node.compare(&reversed, &set), None);
            prop_assert_eq!(node.hash_code(&set), reversed.hash_code(&set));
        }
    }
}
