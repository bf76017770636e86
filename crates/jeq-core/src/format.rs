//! Display rendering of nodes for diagnostics.

use std::fmt;

use crate::Node;

/// Placeholder printed for an absent document.
pub const ABSENT: &str = "<null>";

/// Renders a node as JSON, pretty-printed when `line_breaks` is set.
///
/// ```
/// # use jeq_core::{format_node, Node};
/// let node = Node::from_json_str("{\"a\":[1,2]}")?;
/// assert_eq!(format_node(Some(&node), false), "{\"a\":[1,2]}");
/// assert_eq!(format_node(Some(&node), true), "{\n  \"a\": [\n    1,\n    2\n  ]\n}");
/// assert_eq!(format_node(None, true), "<null>");
/// # Ok::<(), jeq_core::ParseError>(())
/// ```
#[must_use]
pub fn format_node(node: Option<&Node>, line_breaks: bool) -> String {
    let Some(node) = node else {
        return ABSENT.to_string();
    };
    let value = node.to_json_value();
    if line_breaks {
        format!("{value:#}")
    } else {
        value.to_string()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.to_json_value();
        if f.alternate() {
            write!(f, "{value:#}")
        } else {
            write!(f, "{value}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_compact_format() {
        let node = Node::from_json_str("[true,null,\"x\"]").unwrap();
        assert_eq!(node.to_string(), format_node(Some(&node), false));
        assert_eq!(format!("{node:#}"), format_node(Some(&node), true));
    }
}
