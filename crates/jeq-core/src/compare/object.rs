use super::{compare_at, Comparison, Difference, DifferenceKind, Path};
use crate::{node::first_occurrences, Property};

/// Compares two objects by property name.
///
/// Missing names are reported before any value is compared: first the names
/// `expected` has and `actual` lacks (in `expected` order), then the reverse
/// (in `actual` order).
pub(super) fn compare_objects<'a>(
    actual: &'a [Property],
    expected: &'a [Property],
    path: &Path,
    cx: &mut Comparison<'a>,
) -> Option<Difference> {
    let actual_map = first_occurrences(actual);
    let expected_map = first_occurrences(expected);

    if let Some(missing) = expected.iter().find(|p| !actual_map.contains_key(p.name.as_str())) {
        return Some(Difference::new(
            DifferenceKind::ActualMissesProperty,
            path.with_property(missing.name.as_str()),
        ));
    }

    if let Some(extra) = actual.iter().find(|p| !expected_map.contains_key(p.name.as_str())) {
        return Some(Difference::new(
            DifferenceKind::ExpectedMissesProperty,
            path.with_property(extra.name.as_str()),
        ));
    }

    for property in expected {
        let name = property.name.as_str();
        // Later duplicates were shadowed by the first occurrence.
        if !std::ptr::eq(expected_map[name], property.value.as_ref()) {
            continue;
        }
        let sub_path = path.with_property(name);
        if let Some(difference) = compare_at(actual_map[name], &property.value, &sub_path, cx) {
            return Some(difference);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compare, Node};

    fn first(actual: &str, expected: &str) -> Option<(DifferenceKind, String)> {
        let actual = Node::from_json_str(actual).unwrap();
        let expected = Node::from_json_str(expected).unwrap();
        compare(Some(&actual), Some(&expected)).map(|d| (d.kind(), d.path().to_string()))
    }

    #[test]
    fn property_order_is_irrelevant() {
        assert_eq!(first("{\"a\":1,\"b\":2}", "{\"b\":2,\"a\":1}"), None);
    }

    #[test]
    fn missing_names_reported_before_values() {
        assert_eq!(
            first("{\"a\":0,\"c\":3}", "{\"a\":1,\"b\":2,\"c\":3}"),
            Some((DifferenceKind::ActualMissesProperty, "$.b".into()))
        );
        assert_eq!(
            first("{\"a\":0,\"z\":9,\"y\":8}", "{\"a\":1}"),
            Some((DifferenceKind::ExpectedMissesProperty, "$.z".into()))
        );
    }

    #[test]
    fn values_compared_in_expected_order() {
        assert_eq!(
            first("{\"a\":1,\"b\":1}", "{\"b\":2,\"a\":2}"),
            Some((DifferenceKind::OtherValue, "$.b".into()))
        );
    }

    #[test]
    fn duplicate_names_use_first_occurrence() {
        let actual = Node::object([("a", Node::from(1)), ("a", Node::from(2))]);
        let expected = Node::object([("a", Node::from(1))]);
        assert_eq!(compare(Some(&actual), Some(&expected)), None);
        assert_eq!(compare(Some(&expected), Some(&actual)), None);
    }

    #[test]
    fn empty_objects_are_equivalent() {
        assert_eq!(first("{}", "{}"), None);
    }
}
