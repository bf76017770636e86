//! Fuzzing harnesses for `jeq`.
//!
//! Each public function accepts raw bytes so it can be driven from a
//! `cargo fuzz` target. Decoding failures are swallowed; broken comparison
//! laws panic so the fuzzer records the input.
//!
//! # Examples
//!
//! ```
//! jeq_fuzz::fuzz_parse(b"{\"a\":[1,2]}");
//! jeq_fuzz::fuzz_compare(&[1, 2, 3, 4]);
//! jeq_fuzz::fuzz_subtree(b"subtree");
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

use arbitrary::Unstructured;
use jeq_core::{compare_with, contains_subtree, ArrayMode, CompareOptions, Node};
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};

const MAX_DEPTH: usize = 4;
const MAX_ARRAY_LEN: u8 = 6;
const MAX_OBJECT_LEN: u8 = 6;
const MAX_STRING_LEN: u8 = 12;

/// Feeds arbitrary bytes through the JSON and YAML parsers.
///
/// Whatever parses must compare equivalent to itself after a JSON round trip.
pub fn fuzz_parse(data: &[u8]) {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(node) = Node::from_json_str(text) {
        let reparsed = Node::from_json_value(node.to_json_value());
        assert!(
            node.compare(&reparsed, &CompareOptions::default()).is_none(),
            "round trip changed {text}"
        );
    }
    let _ = Node::from_yaml_str(text);
}

/// Compares randomly generated documents in both array modes.
///
/// Checks reflexivity on a deep copy, symmetry of the verdict, and that two
/// documents judged equivalent in set mode share a structural hash.
pub fn fuzz_compare(data: &[u8]) {
    let mut unstructured = Unstructured::new(data);
    let Some(left) = random_node(&mut unstructured) else {
        return;
    };
    let Some(right) = random_node(&mut unstructured) else {
        return;
    };

    for mode in [ArrayMode::List, ArrayMode::Set] {
        let options = CompareOptions::default().with_array_mode(mode);
        let copy = left.clone();
        assert!(compare_with(Some(&left), Some(&copy), &options).is_none());

        let forward = compare_with(Some(&left), Some(&right), &options);
        let backward = compare_with(Some(&right), Some(&left), &options);
        assert_eq!(forward.is_none(), backward.is_none());
        if forward.is_none() {
            assert_eq!(left.hash_code(&options), right.hash_code(&options));
        }
    }
}

/// Checks that a random document contains itself and that an equivalent
/// candidate is always reported as contained.
pub fn fuzz_subtree(data: &[u8]) {
    let mut unstructured = Unstructured::new(data);
    let Some(actual) = random_node(&mut unstructured) else {
        return;
    };
    assert!(contains_subtree(&actual, &actual));

    if let Some(candidate) = random_node(&mut unstructured) {
        if actual.compare(&candidate, &CompareOptions::default()).is_none() {
            assert!(contains_subtree(&actual, &candidate));
        }
    }
}

fn random_node(unstructured: &mut Unstructured<'_>) -> Option<Node> {
    let value = json_value_from_unstructured(unstructured, 0).ok()?;
    Some(Node::from_json_value(value))
}

fn json_value_from_unstructured(
    unstructured: &mut Unstructured<'_>,
    depth: usize,
) -> Result<JsonValue, arbitrary::Error> {
    if depth >= MAX_DEPTH {
        return json_leaf(unstructured);
    }

    let choice = unstructured.int_in_range::<u8>(0..=5)?;
    match choice {
        0 => Ok(JsonValue::Null),
        1 => Ok(JsonValue::Bool(unstructured.arbitrary()?)),
        2 => Ok(JsonValue::Number(random_number(unstructured)?)),
        3 => Ok(JsonValue::String(random_string(unstructured)?)),
        4 => {
            let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_ARRAY_LEN)?);
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(json_value_from_unstructured(unstructured, depth + 1)?);
            }
            Ok(JsonValue::Array(items))
        }
        _ => {
            let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_OBJECT_LEN)?);
            let mut map = JsonMap::new();
            for _ in 0..len {
                let key = random_string(unstructured)?;
                let value = json_value_from_unstructured(unstructured, depth + 1)?;
                map.insert(key, value);
            }
            Ok(JsonValue::Object(map))
        }
    }
}

fn json_leaf(unstructured: &mut Unstructured<'_>) -> Result<JsonValue, arbitrary::Error> {
    let choice = unstructured.int_in_range::<u8>(0..=3)?;
    match choice {
        0 => Ok(JsonValue::Null),
        1 => Ok(JsonValue::Bool(unstructured.arbitrary()?)),
        2 => Ok(JsonValue::Number(random_number(unstructured)?)),
        _ => Ok(JsonValue::String(random_string(unstructured)?)),
    }
}

fn random_number(unstructured: &mut Unstructured<'_>) -> Result<JsonNumber, arbitrary::Error> {
    if unstructured.arbitrary()? {
        let int = unstructured.arbitrary::<i64>()?;
        Ok(JsonNumber::from(int))
    } else {
        let numerator = f64::from(unstructured.arbitrary::<i32>()?);
        let denominator = f64::from(unstructured.int_in_range::<u16>(1..=1024)?);
        JsonNumber::from_f64(numerator / denominator).ok_or(arbitrary::Error::IncorrectFormat)
    }
}

fn random_string(unstructured: &mut Unstructured<'_>) -> Result<String, arbitrary::Error> {
    let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_STRING_LEN)?);
    let mut string = String::with_capacity(len);
    for _ in 0..len {
        let byte = unstructured.int_in_range::<u8>(0x20..=0x7e)?;
        string.push(char::from(byte));
    }
    Ok(string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_harness_handles_utf8_and_garbage() {
        fuzz_parse(br#"{"a":[1,2.5,"x",null]}"#);
        fuzz_parse(&[0xff, 0xfe, 0x00]);
        fuzz_parse(b"a: [1, 2]\n");
    }

    #[test]
    fn compare_harness_runs() {
        fuzz_compare(b"compare");
        fuzz_compare(&[5, 3, 2, 7, 1, 0, 4, 4, 9, 200, 13, 17]);
    }

    #[test]
    fn subtree_harness_runs() {
        fuzz_subtree(b"subtree");
        fuzz_subtree(&[]);
    }
}
