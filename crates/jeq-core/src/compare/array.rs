use std::collections::HashMap;

use super::{compare_at, Comparison, Difference, DifferenceKind, Path};
use crate::{hash::HashCode, ArrayMode, Node};

pub(super) fn compare_arrays<'a>(
    actual: &'a [Node],
    expected: &'a [Node],
    path: &Path,
    cx: &mut Comparison<'a>,
) -> Option<Difference> {
    match cx.options().array_mode() {
        ArrayMode::List => compare_lists(actual, expected, path, cx),
        ArrayMode::Set => compare_sets(actual, expected, path, cx),
    }
}

fn compare_lists<'a>(
    actual: &'a [Node],
    expected: &'a [Node],
    path: &Path,
    cx: &mut Comparison<'a>,
) -> Option<Difference> {
    if actual.len() != expected.len() {
        return Some(Difference::new(DifferenceKind::DifferentLength, path.clone()));
    }
    actual
        .iter()
        .zip(expected)
        .enumerate()
        .find_map(|(index, (a, e))| compare_at(a, e, &path.with_index(index), cx))
}

/// Both directions must hold: each actual element needs an equivalent
/// expected element, then each expected element an equivalent actual one.
/// The reported index belongs to the side being scanned.
///
/// Equal hash codes are necessary for equivalence, so only elements in the
/// same bucket are compared in full. Expected elements already paired with an
/// actual element in the first pass are not scanned again in the second.
fn compare_sets<'a>(
    actual: &'a [Node],
    expected: &'a [Node],
    path: &Path,
    cx: &mut Comparison<'a>,
) -> Option<Difference> {
    let actual_hashes: Vec<HashCode> = actual.iter().map(|node| cx.hash_code(node)).collect();
    let expected_hashes: Vec<HashCode> = expected.iter().map(|node| cx.hash_code(node)).collect();

    let expected_buckets = buckets(&expected_hashes);
    let mut matched = vec![false; expected.len()];
    for (index, (node, hash)) in actual.iter().zip(&actual_hashes).enumerate() {
        let element_path = path.with_index(index);
        let candidates = expected_buckets.get(hash).map_or(&[][..], Vec::as_slice);
        // Unpaired candidates first, so equal arrays pair up one to one.
        let (fresh, paired): (Vec<usize>, Vec<usize>) =
            candidates.iter().copied().partition(|&candidate| !matched[candidate]);
        let found = fresh.into_iter().chain(paired).find(|&candidate| {
            compare_at(node, &expected[candidate], &element_path, cx).is_none()
        });
        match found {
            Some(candidate) => matched[candidate] = true,
            None => return Some(Difference::new(DifferenceKind::OtherSet, element_path)),
        }
    }

    let actual_buckets = buckets(&actual_hashes);
    expected
        .iter()
        .zip(&expected_hashes)
        .enumerate()
        .filter(|(index, _)| !matched[*index])
        .find_map(|(index, (node, hash))| {
            let element_path = path.with_index(index);
            let found = actual_buckets.get(hash).is_some_and(|candidates| {
                candidates.iter().any(|&candidate| {
                    compare_at(&actual[candidate], node, &element_path, cx).is_none()
                })
            });
            (!found).then(|| Difference::new(DifferenceKind::OtherSet, element_path))
        })
}

fn buckets(hashes: &[HashCode]) -> HashMap<HashCode, Vec<usize>> {
    let mut buckets: HashMap<HashCode, Vec<usize>> = HashMap::new();
    for (index, hash) in hashes.iter().enumerate() {
        buckets.entry(*hash).or_default().push(index);
    }
    buckets
}
