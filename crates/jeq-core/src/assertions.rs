//! Fluent assertions over JSON documents.
//!
//! Every check returns `Ok(&Self)` when it holds so checks can be chained with
//! `?`, and [`AssertionError::Failed`] with a rendered message when it does
//! not. Arguments that cannot be used at all (unparsable JSON text, invalid
//! regex patterns) are rejected with their own error variants before the
//! subject is looked at.
//!
//! ```
//! use jeq_core::{assert_json, Node};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let response = Node::from_json_str("{\"status\":\"ok\",\"items\":[{\"id\":1}]}")?;
//!     let checks = assert_json(Some(&response));
//!     checks
//!         .contains_subtree_str("{\"items\":[{\"id\":1}]}")?
//!         .has_count(2)?;
//!     checks.has_element("status")?.has_value("ok")?;
//!     Ok(())
//! }
//! ```

use regex::Regex;

use crate::{
    compare_with, find_missing_subtree, format::format_node, AssertionError, CompareOptions, Node,
    Path,
};

/// Starts assertions about `subject`, which may be absent.
#[must_use]
pub fn assert_json(subject: Option<&Node>) -> JsonAssertions<'_> {
    JsonAssertions { subject, path: Path::root(), reason: None }
}

/// Assertions about one node of a JSON document.
#[derive(Clone, Debug)]
pub struct JsonAssertions<'a> {
    subject: Option<&'a Node>,
    path: Path,
    reason: Option<String>,
}

impl<'a> JsonAssertions<'a> {
    /// Starts assertions about a present document.
    #[must_use]
    pub fn new(subject: &'a Node) -> Self {
        assert_json(Some(subject))
    }

    /// Attaches a reason that is appended to failure messages.
    ///
    /// ```
    /// # use jeq_core::{JsonAssertions, Node};
    /// let node = Node::from_json_str("[1]")?;
    /// let checks = JsonAssertions::new(&node).because("the cart holds two items");
    /// let err = checks.has_count(2).unwrap_err();
    /// assert!(err.to_string().contains("because the cart holds two items"));
    /// # Ok::<(), jeq_core::ParseError>(())
    /// ```
    #[must_use]
    pub fn because(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Location of the subject inside the document the assertions started from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Asserts equivalence with `expected`, arrays compared as lists.
    pub fn is_equivalent_to(&self, expected: &Node) -> Result<&Self, AssertionError> {
        self.is_equivalent_to_with(expected, &CompareOptions::default())
    }

    /// Parses `expected` and asserts equivalence with it.
    pub fn is_equivalent_to_str(&self, expected: &str) -> Result<&Self, AssertionError> {
        let expected = parse_argument("expected", expected)?;
        self.is_equivalent_to(&expected)
    }

    /// Asserts equivalence with `expected` under the given options.
    ///
    /// ```
    /// # use jeq_core::{assert_json, CompareOptions, Node};
    /// let actual = Node::from_json_str("{\"ids\":[3,1,2]}")?;
    /// let expected = Node::from_json_str("{\"ids\":[1,2,3]}")?;
    /// let checks = assert_json(Some(&actual));
    /// assert!(checks.is_equivalent_to_with(&expected, &CompareOptions::set()).is_ok());
    /// let err = checks.is_equivalent_to(&expected).unwrap_err();
    /// assert!(err.to_string().starts_with("JSON document has a different value at $.ids[0]."));
    /// # Ok::<(), jeq_core::ParseError>(())
    /// ```
    pub fn is_equivalent_to_with(
        &self,
        expected: &Node,
        options: &CompareOptions,
    ) -> Result<&Self, AssertionError> {
        let Some(difference) = compare_with(self.subject, Some(expected), options) else {
            return Ok(self);
        };
        Err(self.fail(format!(
            "JSON document {difference}.\nExpected\n{}\nto be equivalent to\n{}{}.",
            format_node(self.subject, true),
            format_node(Some(expected), true),
            self.reason_suffix(),
        )))
    }

    /// Asserts that the subject is not equivalent to `unexpected`.
    pub fn is_not_equivalent_to(&self, unexpected: &Node) -> Result<&Self, AssertionError> {
        if compare_with(self.subject, Some(unexpected), &CompareOptions::default()).is_some() {
            return Ok(self);
        }
        Err(self.fail(format!(
            "Expected JSON document not to be equivalent to {}{}.",
            format_node(Some(unexpected), false),
            self.reason_suffix(),
        )))
    }

    /// Parses `unexpected` and asserts the subject is not equivalent to it.
    pub fn is_not_equivalent_to_str(&self, unexpected: &str) -> Result<&Self, AssertionError> {
        let unexpected = parse_argument("unexpected", unexpected)?;
        self.is_not_equivalent_to(&unexpected)
    }

    /// Asserts that the subject is a scalar whose text is `expected`.
    pub fn has_value(&self, expected: &str) -> Result<&Self, AssertionError> {
        if self.text().as_deref() == Some(expected) {
            return Ok(self);
        }
        Err(self.fail(format!(
            "Expected JSON property {} to have value {expected:?}{}, but found {}.",
            self.path,
            self.reason_suffix(),
            self.found(),
        )))
    }

    /// Asserts that the subject's text is not `unexpected`.
    pub fn does_not_have_value(&self, unexpected: &str) -> Result<&Self, AssertionError> {
        if self.text().as_deref() != Some(unexpected) {
            return Ok(self);
        }
        Err(self.fail(format!(
            "Did not expect JSON property {} to have value {unexpected:?}{}.",
            self.path,
            self.reason_suffix(),
        )))
    }

    /// Asserts that the subject's text matches `pattern`.
    ///
    /// ```
    /// # use jeq_core::{assert_json, AssertionError, Node};
    /// let node = Node::from_json_str("\"2024-01-31\"")?;
    /// assert!(assert_json(Some(&node)).matches_regex(r"^\d{4}-\d{2}-\d{2}$").is_ok());
    /// let err = assert_json(Some(&node)).matches_regex("(").unwrap_err();
    /// assert!(matches!(err, AssertionError::InvalidPattern { .. }));
    /// # Ok::<(), jeq_core::ParseError>(())
    /// ```
    pub fn matches_regex(&self, pattern: &str) -> Result<&Self, AssertionError> {
        let regex = compile(pattern)?;
        if self.text().is_some_and(|text| regex.is_match(&text)) {
            return Ok(self);
        }
        Err(self.fail(format!(
            "Expected JSON property {} to match regex pattern {pattern:?}{}, but found {}.",
            self.path,
            self.reason_suffix(),
            self.found(),
        )))
    }

    /// Asserts that the subject's text does not match `pattern`.
    pub fn does_not_match_regex(&self, pattern: &str) -> Result<&Self, AssertionError> {
        let regex = compile(pattern)?;
        if !self.text().is_some_and(|text| regex.is_match(&text)) {
            return Ok(self);
        }
        Err(self.fail(format!(
            "Did not expect JSON property {} to match regex pattern {pattern:?}{}.",
            self.path,
            self.reason_suffix(),
        )))
    }

    /// Asserts that the subject is an object with property `name` and
    /// continues with assertions about that property's value.
    pub fn has_element(&self, name: &str) -> Result<JsonAssertions<'a>, AssertionError> {
        if let Some(child) = self.subject.and_then(|node| node.get(name)) {
            return Ok(self.child(child, self.path.with_property(name)));
        }
        Err(self.fail(format!(
            "Expected JSON document {} to have element {name:?}{}, but no such element was found.",
            format_node(self.subject, false),
            self.reason_suffix(),
        )))
    }

    /// Asserts that the subject has no property `name`.
    pub fn does_not_have_element(&self, name: &str) -> Result<&Self, AssertionError> {
        if self.subject.and_then(|node| node.get(name)).is_none() {
            return Ok(self);
        }
        Err(self.fail(format!(
            "Did not expect JSON document {} to have element {name:?}{}.",
            format_node(self.subject, false),
            self.reason_suffix(),
        )))
    }

    /// Asserts that the subject has exactly one child and continues with
    /// assertions about it: the element of an array, or the value of an
    /// object's property.
    pub fn contains_single_item(&self) -> Result<JsonAssertions<'a>, AssertionError> {
        let single = match self.subject {
            Some(Node::Array(values)) if values.len() == 1 => {
                Some(self.child(&values[0], self.path.with_index(0)))
            }
            Some(Node::Object(properties)) if properties.len() == 1 => {
                let property = &properties[0];
                Some(self.child(&property.value, self.path.with_property(property.name.as_str())))
            }
            _ => None,
        };
        single.ok_or_else(|| {
            self.fail(format!(
                "Expected JSON document {} to contain a single item{}, but found {}.",
                format_node(self.subject, false),
                self.reason_suffix(),
                self.count_description(),
            ))
        })
    }

    /// Asserts the number of direct children of the subject.
    pub fn has_count(&self, expected: usize) -> Result<&Self, AssertionError> {
        if self.subject.map(Node::child_count) == Some(expected) {
            return Ok(self);
        }
        Err(self.fail(format!(
            "Expected JSON document {} to contain {expected} item(s){}, but found {}.",
            format_node(self.subject, false),
            self.reason_suffix(),
            self.count_description(),
        )))
    }

    /// Asserts that the subject contains `subtree`.
    ///
    /// The failure message names the first part of the subtree that was not
    /// found.
    pub fn contains_subtree(&self, subtree: &Node) -> Result<&Self, AssertionError> {
        let missing = match self.subject {
            Some(subject) => find_missing_subtree(subject, subtree),
            None => Some(Path::root()),
        };
        let Some(missing) = missing else {
            return Ok(self);
        };
        Err(self.fail(format!(
            "Expected JSON document to contain subtree {}{}, but {missing} was not found.",
            format_node(Some(subtree), false),
            self.reason_suffix(),
        )))
    }

    /// Parses `subtree` and asserts the subject contains it.
    pub fn contains_subtree_str(&self, subtree: &str) -> Result<&Self, AssertionError> {
        let subtree = parse_argument("subtree", subtree)?;
        self.contains_subtree(&subtree)
    }

    fn child(&self, subject: &'a Node, path: Path) -> JsonAssertions<'a> {
        JsonAssertions { subject: Some(subject), path, reason: None }
    }

    fn text(&self) -> Option<String> {
        self.subject.and_then(Node::as_scalar).and_then(|scalar| scalar.as_text())
    }

    fn found(&self) -> String {
        match self.subject.and_then(Node::as_scalar) {
            Some(scalar) => match scalar.as_text() {
                Some(text) => format!("{text:?}"),
                None => "null".to_string(),
            },
            None => match self.subject {
                Some(node) => format!("{} {}", node.shape(), format_node(Some(node), false)),
                None => format_node(None, false),
            },
        }
    }

    /// Child count of containers, the shape of anything else.
    fn count_description(&self) -> String {
        match self.subject {
            Some(node @ (Node::Object(_) | Node::Array(_))) => node.child_count().to_string(),
            Some(node) => format!("a {}", node.shape()),
            None => format_node(None, false),
        }
    }

    fn reason_suffix(&self) -> String {
        match self.reason.as_deref().map(str::trim) {
            None | Some("") => String::new(),
            Some(reason) if reason.starts_with("because") => format!(" {reason}"),
            Some(reason) => format!(" because {reason}"),
        }
    }

    fn fail(&self, message: String) -> AssertionError {
        tracing::debug!(path = %self.path, "assertion failed");
        AssertionError::Failed { message }
    }
}

fn parse_argument(argument: &'static str, text: &str) -> Result<Node, AssertionError> {
    Node::from_json_str(text).map_err(|source| AssertionError::InvalidJson {
        argument,
        text: text.to_string(),
        source,
    })
}

fn compile(pattern: &str) -> Result<Regex, AssertionError> {
    Regex::new(pattern)
        .map_err(|source| AssertionError::InvalidPattern { pattern: pattern.to_string(), source })
}
