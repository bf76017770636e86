//! Structural equivalence checking for JSON trees.
//!
//! `jeq-core` compares an *actual* document with an *expected* one and
//! reports the first point where they diverge: what kind of divergence it is
//! and the path at which it was found. On top of the comparator it offers a
//! subtree containment check and a set of fluent assertions for tests.
//!
//! ```
//! use jeq_core::{compare, DifferenceKind, Node};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let actual = Node::from_json_str("{\"x\":{\"y\":[1,2]}}")?;
//!     let expected = Node::from_json_str("{\"x\":{\"y\":[1,9]}}")?;
//!
//!     let difference = compare(Some(&actual), Some(&expected)).expect("documents differ");
//!     assert_eq!(difference.kind(), DifferenceKind::OtherValue);
//!     assert_eq!(difference.to_string(), "has a different value at $.x.y[1]");
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assertions;
pub mod compare;
mod error;
mod format;
mod hash;
mod node;
mod number;
mod options;
pub mod subtree;

pub use assertions::{assert_json, JsonAssertions};
pub use compare::{compare, compare_with, Difference, DifferenceKind, Path, PathSegment};
pub use error::{AssertionError, ParseError};
pub use format::{format_node, ABSENT};
pub use hash::{combine_unordered, hash_bytes, HashCode};
pub use node::{Node, Property, Scalar, ScalarKind, Shape};
pub use number::Number;
pub use options::{ArrayMode, CompareOptions, UnknownArrayMode};
pub use subtree::{contains_subtree, find_missing_subtree};

/// Returns the semantic version of the `jeq-core` crate.
///
/// ```
/// assert!(!jeq_core::version().is_empty());
/// ```
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
