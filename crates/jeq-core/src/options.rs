use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Controls how arrays are compared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayMode {
    /// Arrays are ordered lists compared position by position (default).
    #[default]
    List,
    /// Arrays are compared without regard to order: every element on either
    /// side must have an equivalent element on the other.
    Set,
}

/// Configuration passed explicitly through every comparison.
///
/// Options live for a single call; nothing is remembered between calls.
///
/// ```
/// # use jeq_core::{compare_with, ArrayMode, CompareOptions, Node};
/// let actual = Node::from_json_str("[1,2,3]")?;
/// let expected = Node::from_json_str("[3,2,1]")?;
/// let set = CompareOptions::default().with_array_mode(ArrayMode::Set);
/// assert!(compare_with(Some(&actual), Some(&expected), &set).is_none());
/// assert!(compare_with(Some(&actual), Some(&expected), &CompareOptions::default()).is_some());
/// # Ok::<(), jeq_core::ParseError>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompareOptions {
    array_mode: ArrayMode,
}

impl CompareOptions {
    /// Options with set semantics for arrays.
    #[must_use]
    pub fn set() -> Self {
        Self { array_mode: ArrayMode::Set }
    }

    /// Returns the configured array mode.
    #[must_use]
    pub fn array_mode(&self) -> ArrayMode {
        self.array_mode
    }

    /// Sets the array mode.
    #[must_use]
    pub fn with_array_mode(mut self, mode: ArrayMode) -> Self {
        self.array_mode = mode;
        self
    }

    /// Shorthand for choosing between list and set semantics with a flag.
    #[must_use]
    pub fn with_set_mode(self, enabled: bool) -> Self {
        self.with_array_mode(if enabled { ArrayMode::Set } else { ArrayMode::List })
    }
}

impl fmt::Display for ArrayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayMode::List => f.write_str("list"),
            ArrayMode::Set => f.write_str("set"),
        }
    }
}

/// Error returned when parsing an unknown [`ArrayMode`] name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown array mode {0:?}; expected \"list\" or \"set\"")]
pub struct UnknownArrayMode(pub String);

impl FromStr for ArrayMode {
    type Err = UnknownArrayMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "list" => Ok(Self::List),
            "set" => Ok(Self::Set),
            _ => Err(UnknownArrayMode(s.to_string())),
        }
    }
}
