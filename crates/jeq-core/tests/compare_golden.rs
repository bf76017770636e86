use std::fs;
use std::path::Path;

use jeq_core::{compare_with, CompareOptions, Node};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ExpectedDifference {
    kind: String,
    path: String,
}

#[derive(Debug, Deserialize)]
struct Fixture {
    actual: String,
    expected: String,
    #[serde(default)]
    set: bool,
    difference: Option<ExpectedDifference>,
}

fn load_fixture(path: &Path) -> Fixture {
    let data = fs::read_to_string(path).expect("fixture should be readable");
    serde_json::from_str(&data).expect("fixture should deserialize")
}

#[test]
fn first_difference_matches_fixtures() {
    let fixtures_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/compare");
    let mut entries: Vec<_> = fs::read_dir(&fixtures_root)
        .expect("fixtures directory must exist")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    entries.sort();

    assert!(!entries.is_empty(), "expected at least one fixture under tests/fixtures/compare");

    for path in entries {
        let fixture = load_fixture(&path);
        let actual = Node::from_json_str(&fixture.actual).expect("actual parses");
        let expected = Node::from_json_str(&fixture.expected).expect("expected parses");
        let options = CompareOptions::default().with_set_mode(fixture.set);

        let found = compare_with(Some(&actual), Some(&expected), &options).map(|difference| {
            let value = serde_json::to_value(&difference).expect("difference serializes");
            (value["kind"].as_str().unwrap_or_default().to_string(), difference.path().to_string())
        });
        let wanted = fixture.difference.map(|d| (d.kind, d.path));
        assert_eq!(found, wanted, "fixture {path:?}");
    }
}
