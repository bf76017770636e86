//! Partial matching: does a document contain a given subtree?
//!
//! Objects match when every property of the subtree is present and matches
//! recursively; extra properties in the document are ignored. Arrays match
//! when every subtree element is matched by some document element, in any
//! position, and one document element may satisfy several subtree elements.
//! Anything else must be equivalent in full.

use crate::{
    compare::{compare_at, Comparison},
    CompareOptions, Node, Path,
};

/// Reports whether `actual` contains `subtree`.
///
/// ```
/// # use jeq_core::{contains_subtree, Node};
/// let doc = Node::from_json_str("{\"items\":[{\"type\":\"a\",\"name\":\"Alpha\"}],\"ok\":true}")?;
/// let subtree = Node::from_json_str("{\"items\":[{\"name\":\"Alpha\"}]}")?;
/// assert!(contains_subtree(&doc, &subtree));
/// # Ok::<(), jeq_core::ParseError>(())
/// ```
#[must_use]
pub fn contains_subtree(actual: &Node, subtree: &Node) -> bool {
    find_missing_subtree(actual, subtree).is_none()
}

/// Returns the path, in `subtree` coordinates, of the first part of `subtree`
/// that `actual` does not contain.
///
/// ```
/// # use jeq_core::{find_missing_subtree, Node};
/// let doc = Node::from_json_str("{\"data\":{\"name\":\"x\"}}")?;
/// let subtree = Node::from_json_str("{\"data\":{\"id\":1}}")?;
/// let missing = find_missing_subtree(&doc, &subtree).unwrap();
/// assert_eq!(missing.to_string(), "$.data.id");
/// # Ok::<(), jeq_core::ParseError>(())
/// ```
#[must_use]
pub fn find_missing_subtree(actual: &Node, subtree: &Node) -> Option<Path> {
    missing_at(actual, subtree, &Path::root())
}

fn missing_at(actual: &Node, subtree: &Node, path: &Path) -> Option<Path> {
    match subtree {
        Node::Object(properties) => {
            if !matches!(actual, Node::Object(_)) {
                return Some(path.clone());
            }
            properties.iter().find_map(|property| {
                let property_path = path.with_property(property.name.as_str());
                match actual.get(&property.name) {
                    Some(value) => missing_at(value, &property.value, &property_path),
                    None => Some(property_path),
                }
            })
        }
        Node::Array(elements) => {
            let Node::Array(items) = actual else {
                return Some(path.clone());
            };
            elements.iter().enumerate().find_map(|(index, element)| {
                let element_path = path.with_index(index);
                let found =
                    items.iter().any(|item| missing_at(item, element, &element_path).is_none());
                (!found).then_some(element_path)
            })
        }
        Node::Property(_) | Node::Value(_) => {
            let options = CompareOptions::default();
            compare_at(actual, subtree, path, &mut Comparison::new(&options)).map(|_| path.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(json: &str) -> Node {
        Node::from_json_str(json).unwrap()
    }

    fn missing(actual: &str, subtree: &str) -> Option<String> {
        find_missing_subtree(&node(actual), &node(subtree)).map(|p| p.to_string())
    }

    #[test]
    fn extra_properties_are_ignored() {
        assert!(contains_subtree(&node("{\"a\":1,\"b\":2}"), &node("{\"a\":1}")));
        assert!(!contains_subtree(&node("{\"a\":1}"), &node("{\"a\":1,\"b\":2}")));
    }

    #[test]
    fn arrays_match_existentially() {
        assert!(contains_subtree(&node("[{\"a\":1,\"c\":9},{\"a\":2}]"), &node("[{\"a\":1}]")));
        assert!(contains_subtree(&node("[3,2,1]"), &node("[1,1,3]")));
        assert_eq!(missing("[1,2]", "[2,5]"), Some("$[1]".into()));
    }

    #[test]
    fn scalars_require_equality() {
        assert!(contains_subtree(&node("\"x\""), &node("\"x\"")));
        assert_eq!(missing("{\"a\":1}", "{\"a\":\"1\"}"), Some("$.a".into()));
    }

    #[test]
    fn shape_mismatch_is_missing_at_that_path() {
        assert_eq!(missing("{\"a\":[1]}", "{\"a\":{\"b\":1}}"), Some("$.a".into()));
        assert_eq!(missing("{\"a\":{}}", "{\"a\":[]}"), Some("$.a".into()));
    }

    #[test]
    fn empty_containers_are_always_contained_by_same_shape() {
        assert!(contains_subtree(&node("{\"a\":1}"), &node("{}")));
        assert!(contains_subtree(&node("[1]"), &node("[]")));
    }

    #[test]
    fn nested_arrays_inside_objects_use_containment() {
        assert!(contains_subtree(
            &node("{\"success\":true,\"data\":{\"type\":\"t\",\"name\":\"Noone\",\"tags\":[1,2]}}"),
            &node("{\"data\":{\"name\":\"Noone\",\"tags\":[2]}}")
        ));
    }
}
