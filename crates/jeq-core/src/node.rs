use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde_json::{Map as JsonMap, Value as JsonValue};
use serde_yaml::Value as YamlValue;

use crate::{
    compare::Difference,
    hash::{combine_unordered, Fnv, HashCache, HashCode},
    ArrayMode, CompareOptions, Number, ParseError,
};

const NULL_SEED: u8 = 0x10;
const BOOL_SEED: u8 = 0x11;
const STRING_SEED: u8 = 0x12;
const LIST_SEED: u8 = 0x20;
const SET_SEED: u8 = 0x21;
const OBJECT_SEED: u8 = 0x30;
const PROPERTY_SEED: u8 = 0x31;

/// One element of a JSON tree.
///
/// The variant is the node's shape; comparison dispatches on it with
/// exhaustive matches.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// JSON object. Properties keep document order; names are expected to be
    /// unique and the first occurrence wins when they are not.
    Object(Vec<Property>),
    /// JSON array.
    Array(Vec<Node>),
    /// A named value. Parsing never produces a bare property, but properties
    /// can be compared directly.
    Property(Property),
    /// JSON scalar.
    Value(Scalar),
}

/// A name paired with its value.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    /// Property name.
    pub name: String,
    /// Property value.
    pub value: Box<Node>,
}

impl Property {
    /// Creates a property.
    #[must_use]
    pub fn new(name: impl Into<String>, value: Node) -> Self {
        Self { name: name.into(), value: Box::new(value) }
    }
}

/// JSON primitive value.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// `null`.
    Null,
    /// `true` or `false`.
    Bool(bool),
    /// A number.
    Number(Number),
    /// A string.
    String(String),
}

/// Primitive type tag of a [`Scalar`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `null`.
    Null,
    /// Boolean.
    Boolean,
    /// Number.
    Number,
    /// String.
    String,
}

/// Shape tag of a [`Node`], used in messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Object.
    Object,
    /// Array.
    Array,
    /// Property.
    Property,
    /// Scalar of the given kind.
    Value(ScalarKind),
}

impl Scalar {
    /// Returns the primitive type tag.
    #[must_use]
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Null => ScalarKind::Null,
            Self::Bool(_) => ScalarKind::Boolean,
            Self::Number(_) => ScalarKind::Number,
            Self::String(_) => ScalarKind::String,
        }
    }

    /// Returns the value as text, or `None` for `null`.
    ///
    /// ```
    /// # use jeq_core::{Number, Scalar};
    /// assert_eq!(Scalar::String("a".into()).as_text().as_deref(), Some("a"));
    /// assert_eq!(Scalar::Number(Number::from(3_i64)).as_text().as_deref(), Some("3"));
    /// assert_eq!(Scalar::Null.as_text(), None);
    /// ```
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(v) => Some(v.to_string()),
            Self::Number(n) => Some(n.to_string()),
            Self::String(s) => Some(s.clone()),
        }
    }

    fn hash_code(&self) -> HashCode {
        match self {
            Self::Null => Fnv::seeded(NULL_SEED).finish(),
            Self::Bool(v) => {
                let mut fnv = Fnv::seeded(BOOL_SEED);
                fnv.write(&[u8::from(*v)]);
                fnv.finish()
            }
            Self::Number(n) => n.hash_code(),
            Self::String(s) => {
                let mut fnv = Fnv::seeded(STRING_SEED);
                fnv.write_str(s);
                fnv.finish()
            }
        }
    }
}

impl Node {
    /// Parses a JSON string.
    ///
    /// ```
    /// # use jeq_core::Node;
    /// let node = Node::from_json_str("{\"hello\":\"world\"}")?;
    /// assert!(matches!(node, Node::Object(_)));
    /// # Ok::<(), jeq_core::ParseError>(())
    /// ```
    pub fn from_json_str(input: &str) -> Result<Self, ParseError> {
        let value: JsonValue = serde_json::from_str(input)?;
        Ok(Self::from_json_value(value))
    }

    /// Parses a YAML string.
    ///
    /// ```
    /// # use jeq_core::Node;
    /// let node = Node::from_yaml_str("answer: 42\n")?;
    /// assert_eq!(node, Node::from_json_str("{\"answer\":42}")?);
    /// # Ok::<(), jeq_core::ParseError>(())
    /// ```
    pub fn from_yaml_str(input: &str) -> Result<Self, ParseError> {
        let value: YamlValue = serde_yaml::from_str(input)?;
        Self::from_yaml_value(value)
    }

    /// Converts a serde JSON value.
    #[must_use]
    pub fn from_json_value(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Value(Scalar::Null),
            JsonValue::Bool(v) => Self::Value(Scalar::Bool(v)),
            JsonValue::Number(n) => Self::Value(Scalar::Number(n.into())),
            JsonValue::String(s) => Self::Value(Scalar::String(s)),
            JsonValue::Array(values) => {
                Self::Array(values.into_iter().map(Self::from_json_value).collect())
            }
            JsonValue::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(name, value)| Property::new(name, Self::from_json_value(value)))
                    .collect(),
            ),
        }
    }

    fn from_yaml_value(value: YamlValue) -> Result<Self, ParseError> {
        match value {
            YamlValue::Null => Ok(Self::Value(Scalar::Null)),
            YamlValue::Bool(v) => Ok(Self::Value(Scalar::Bool(v))),
            YamlValue::Number(num) => {
                let number = if let Some(u) = num.as_u64() {
                    Number::from(u)
                } else if let Some(i) = num.as_i64() {
                    Number::from(i)
                } else {
                    Number::from_f64(num.as_f64().unwrap_or(f64::NAN))?
                };
                Ok(Self::Value(Scalar::Number(number)))
            }
            YamlValue::String(s) => Ok(Self::Value(Scalar::String(s))),
            YamlValue::Sequence(seq) => {
                let mut items = Vec::with_capacity(seq.len());
                for value in seq {
                    items.push(Self::from_yaml_value(value)?);
                }
                Ok(Self::Array(items))
            }
            YamlValue::Mapping(map) => {
                let mut properties = Vec::with_capacity(map.len());
                for (key, value) in map {
                    let name = match key {
                        YamlValue::String(s) => s,
                        other => {
                            return Err(ParseError::NonStringYamlKey {
                                found: format!("{other:?}"),
                            });
                        }
                    };
                    properties.push(Property::new(name, Self::from_yaml_value(value)?));
                }
                Ok(Self::Object(properties))
            }
            YamlValue::Tagged(tagged) => {
                Err(ParseError::UnsupportedYamlTag { tag: tagged.tag.to_string() })
            }
        }
    }

    /// Builds an object from name/value pairs.
    #[must_use]
    pub fn object<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = (S, Node)>,
        S: Into<String>,
    {
        Self::Object(
            properties.into_iter().map(|(name, value)| Property::new(name, value)).collect(),
        )
    }

    /// Builds a bare property node.
    #[must_use]
    pub fn property(name: impl Into<String>, value: Node) -> Self {
        Self::Property(Property::new(name, value))
    }

    /// JSON `null`.
    #[must_use]
    pub fn null() -> Self {
        Self::Value(Scalar::Null)
    }

    /// Converts the node into a serde JSON value.
    ///
    /// A bare property becomes a single-entry object. Duplicate object names
    /// collapse to the last occurrence.
    #[must_use]
    pub fn to_json_value(&self) -> JsonValue {
        match self {
            Self::Value(Scalar::Null) => JsonValue::Null,
            Self::Value(Scalar::Bool(v)) => JsonValue::Bool(*v),
            Self::Value(Scalar::Number(n)) => JsonValue::Number(n.clone().into()),
            Self::Value(Scalar::String(s)) => JsonValue::String(s.clone()),
            Self::Array(values) => {
                JsonValue::Array(values.iter().map(Self::to_json_value).collect())
            }
            Self::Object(properties) => {
                let mut map = JsonMap::new();
                for property in properties {
                    map.insert(property.name.clone(), property.value.to_json_value());
                }
                JsonValue::Object(map)
            }
            Self::Property(property) => {
                let mut map = JsonMap::new();
                map.insert(property.name.clone(), property.value.to_json_value());
                JsonValue::Object(map)
            }
        }
    }

    /// Returns the shape tag.
    #[must_use]
    pub fn shape(&self) -> Shape {
        match self {
            Self::Object(_) => Shape::Object,
            Self::Array(_) => Shape::Array,
            Self::Property(_) => Shape::Property,
            Self::Value(scalar) => Shape::Value(scalar.kind()),
        }
    }

    /// Looks up an object property by name (first occurrence).
    ///
    /// ```
    /// # use jeq_core::Node;
    /// let node = Node::from_json_str("{\"id\":7}")?;
    /// assert_eq!(node.get("id"), Some(&Node::from_json_str("7")?));
    /// assert_eq!(node.get("missing"), None);
    /// # Ok::<(), jeq_core::ParseError>(())
    /// ```
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Node> {
        match self {
            Self::Object(properties) => {
                properties.iter().find(|p| p.name == name).map(|p| p.value.as_ref())
            }
            _ => None,
        }
    }

    /// Returns the scalar when the node is a value.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Value(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Number of direct children: elements of an array, properties of an
    /// object, one for a property, none for a scalar.
    #[must_use]
    pub fn child_count(&self) -> usize {
        match self {
            Self::Object(properties) => properties.len(),
            Self::Array(values) => values.len(),
            Self::Property(_) => 1,
            Self::Value(_) => 0,
        }
    }

    /// Finds the first difference between this node and `expected`.
    ///
    /// ```
    /// # use jeq_core::{CompareOptions, DifferenceKind, Node};
    /// let actual = Node::from_json_str("{\"a\":[1,2]}")?;
    /// let expected = Node::from_json_str("{\"a\":[1,3]}")?;
    /// let difference = actual.compare(&expected, &CompareOptions::default()).unwrap();
    /// assert_eq!(difference.kind(), DifferenceKind::OtherValue);
    /// assert_eq!(difference.path().to_string(), "$.a[1]");
    /// # Ok::<(), jeq_core::ParseError>(())
    /// ```
    #[must_use]
    pub fn compare(&self, expected: &Node, options: &CompareOptions) -> Option<Difference> {
        crate::compare::compare_with(Some(self), Some(expected), options)
    }

    /// Reports whether this node contains `subtree`.
    #[must_use]
    pub fn contains_subtree(&self, subtree: &Node) -> bool {
        crate::subtree::contains_subtree(self, subtree)
    }

    /// Structural hash code consistent with equivalence under `options`.
    #[must_use]
    pub fn hash_code(&self, options: &CompareOptions) -> HashCode {
        self.cached_hash_code(options, &mut HashCache::default())
    }

    /// Hash code of this node, reusing and filling `cache` for containers.
    pub(crate) fn cached_hash_code<'a>(
        &'a self,
        options: &CompareOptions,
        cache: &mut HashCache<'a>,
    ) -> HashCode {
        if let Self::Value(scalar) = self {
            return scalar.hash_code();
        }
        if let Some(code) = cache.get(self) {
            return code;
        }
        let code = match self {
            Self::Value(scalar) => scalar.hash_code(),
            Self::Array(values) => match options.array_mode() {
                ArrayMode::List => {
                    let mut fnv = Fnv::seeded(LIST_SEED);
                    for value in values {
                        fnv.write_code(value.cached_hash_code(options, cache));
                    }
                    fnv.finish()
                }
                ArrayMode::Set => {
                    let unique: BTreeSet<HashCode> = values
                        .iter()
                        .map(|value| value.cached_hash_code(options, cache))
                        .collect();
                    combine_unordered(SET_SEED, unique.into_iter().collect())
                }
            },
            Self::Object(properties) => {
                let mut fnv = Fnv::seeded(OBJECT_SEED);
                for (name, value) in first_occurrences(properties) {
                    fnv.write_str(name);
                    fnv.write_code(value.cached_hash_code(options, cache));
                }
                fnv.finish()
            }
            Self::Property(property) => {
                let mut fnv = Fnv::seeded(PROPERTY_SEED);
                fnv.write_str(&property.name);
                fnv.write_code(property.value.cached_hash_code(options, cache));
                fnv.finish()
            }
        };
        cache.insert(self, code);
        code
    }
}

/// Name to value map keeping the first occurrence of each name.
pub(crate) fn first_occurrences(properties: &[Property]) -> BTreeMap<&str, &Node> {
    let mut map = BTreeMap::new();
    for property in properties {
        map.entry(property.name.as_str()).or_insert(property.value.as_ref());
    }
    map
}

impl From<JsonValue> for Node {
    fn from(value: JsonValue) -> Self {
        Self::from_json_value(value)
    }
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Self::Value(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Self::Value(Scalar::Bool(value))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Self::Value(Scalar::Number(Number::from(value)))
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Value(Scalar::String(value.to_string()))
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Self::Array(value)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean => f.write_str("boolean"),
            Self::Number => f.write_str("number"),
            Self::String => f.write_str("string"),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => f.write_str("object"),
            Self::Array => f.write_str("array"),
            Self::Property => f.write_str("property"),
            Self::Value(kind) => fmt::Display::fmt(kind, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::{
        collection::{btree_map, vec},
        prelude::*,
        string::string_regex,
    };

    fn arb_json_value() -> impl Strategy<Value = JsonValue> {
        let leaf = prop_oneof![
            Just(JsonValue::Null),
            any::<bool>().prop_map(JsonValue::Bool),
            any::<i64>().prop_map(|i| JsonValue::Number(i.into())),
            string_regex("[a-zA-Z0-9]{0,8}").unwrap().prop_map(JsonValue::String),
        ];
        leaf.prop_recursive(4, 8, 4, move |inner| {
            prop_oneof![
                vec(inner.clone(), 0..4).prop_map(JsonValue::Array),
                btree_map(string_regex("[a-zA-Z0-9]{1,8}").unwrap(), inner, 0..4).prop_map(|map| {
                    let mut object = JsonMap::new();
                    for (k, v) in map {
                        object.insert(k, v);
                    }
                    JsonValue::Object(object)
                }),
            ]
        })
    }

    #[test]
    fn object_keeps_document_order() {
        let node = Node::from_json_str("{\"z\":1,\"a\":2}").unwrap();
        let Node::Object(properties) = node else {
            panic!("expected object");
        };
        let names: Vec<_> = properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["z", "a"]);
    }

    #[test]
    fn empty_input_is_a_parse_error() {
        let err = Node::from_json_str("  ").unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn yaml_non_string_key_errors() {
        let err = Node::from_yaml_str("? [1, 2]: 3").unwrap_err();
        let ParseError::NonStringYamlKey { .. } = err else {
            panic!("expected NonStringYamlKey error");
        };
    }

    #[test]
    fn property_renders_as_single_entry_object() {
        let node = Node::property("a", Node::from(1));
        assert_eq!(node.to_json_value(), serde_json::json!({"a": 1}));
    }

    #[test]
    fn first_property_wins_on_duplicates() {
        let node = Node::object([("a", Node::from(1)), ("a", Node::from(2))]);
        assert_eq!(node.get("a"), Some(&Node::from(1)));
        let Node::Object(properties) = &node else { unreachable!() };
        assert_eq!(first_occurrences(properties).len(), 1);
    }

    #[test]
    fn shapes_have_readable_names() {
        assert_eq!(Node::null().shape().to_string(), "null");
        assert_eq!(Node::Array(vec![]).shape().to_string(), "array");
        assert_eq!(Node::from("x").shape(), Shape::Value(ScalarKind::String));
    }

    #[test]
    fn set_hash_ignores_order_and_repetition() {
        let set = CompareOptions::set();
        let lhs = Node::from_json_str("[1,2,2]").unwrap();
        let rhs = Node::from_json_str("[2,1]").unwrap();
        assert_eq!(lhs.hash_code(&set), rhs.hash_code(&set));
        let list = CompareOptions::default();
        assert_ne!(lhs.hash_code(&list), rhs.hash_code(&list));
    }

    proptest! {
        #[test]
        fn json_roundtrips_through_node(value in arb_json_value()) {
            let node = Node::from_json_value(value.clone());
            prop_assert_eq!(node.to_json_value(), value);
        }

        #[test]
        fn object_hash_ignores_property_order(value in arb_json_value()) {
            let node = Node::from_json_value(value);
            let reordered = match &node {
                Node::Object(properties) => {
                    Node::Object(properties.iter().rev().cloned().collect())
                }
                other => other.clone(),
            };
            let options = CompareOptions::default();
            prop_assert_eq!(node.hash_code(&options), reordered.hash_code(&options));
        }
    }
}
