//! Structural hash codes.
//!
//! Two nodes that compare equivalent under a given [`CompareOptions`](crate::CompareOptions)
//! always share a hash code, so set-mode comparison only needs to run the full
//! comparison against elements in the same bucket.

use std::collections::HashMap;
use std::marker::PhantomData;

use crate::Node;

/// 64-bit structural hash code.
///
/// ```
/// # use jeq_core::hash_bytes;
/// assert_eq!(hash_bytes(b"jeq"), hash_bytes(b"jeq"));
/// assert_ne!(hash_bytes(b"jeq"), hash_bytes(b"jq"));
/// ```
pub type HashCode = u64;

const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const PRIME: u64 = 0x0100_0000_01b3;

/// Incremental FNV-1a hasher.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv(u64);

impl Fnv {
    pub(crate) fn new() -> Self {
        Self(OFFSET_BASIS)
    }

    pub(crate) fn seeded(seed: u8) -> Self {
        let mut fnv = Self::new();
        fnv.write(&[seed]);
        fnv
    }

    pub(crate) fn write(&mut self, input: &[u8]) {
        for byte in input {
            self.0 ^= u64::from(*byte);
            self.0 = self.0.wrapping_mul(PRIME);
        }
    }

    pub(crate) fn write_code(&mut self, code: HashCode) {
        self.write(&code.to_le_bytes());
    }

    /// Length-prefixed write so that adjacent strings cannot run together.
    pub(crate) fn write_str(&mut self, value: &str) {
        self.write(&(value.len() as u64).to_le_bytes());
        self.write(value.as_bytes());
    }

    pub(crate) fn finish(self) -> HashCode {
        self.0
    }
}

/// Hash codes already computed during one walk, keyed by node address.
///
/// The lifetime ties every key to a borrow that outlives the cache, so an
/// address cannot be reused by another node while the entry exists.
#[derive(Debug, Default)]
pub(crate) struct HashCache<'a> {
    codes: HashMap<*const Node, HashCode>,
    nodes: PhantomData<&'a Node>,
}

impl<'a> HashCache<'a> {
    pub(crate) fn get(&self, node: &'a Node) -> Option<HashCode> {
        self.codes.get(&std::ptr::from_ref(node)).copied()
    }

    pub(crate) fn insert(&mut self, node: &'a Node, code: HashCode) {
        self.codes.insert(std::ptr::from_ref(node), code);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.codes.len()
    }
}

/// Computes the FNV-1a hash of the provided bytes.
#[must_use]
pub fn hash_bytes(input: &[u8]) -> HashCode {
    let mut fnv = Fnv::new();
    fnv.write(input);
    fnv.finish()
}

/// Combines hash codes independently of their order.
///
/// ```
/// # use jeq_core::{combine_unordered, hash_bytes};
/// let a = hash_bytes(b"a");
/// let b = hash_bytes(b"b");
/// assert_eq!(combine_unordered(0, vec![a, b]), combine_unordered(0, vec![b, a]));
/// ```
#[must_use]
pub fn combine_unordered(seed: u8, mut codes: Vec<HashCode>) -> HashCode {
    codes.sort_unstable();
    let mut fnv = Fnv::seeded(seed);
    for code in codes {
        fnv.write_code(code);
    }
    fnv.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_prefix_separates_strings() {
        let mut joined = Fnv::new();
        joined.write_str("ab");
        joined.write_str("c");
        let mut split = Fnv::new();
        split.write_str("a");
        split.write_str("bc");
        assert_ne!(joined.finish(), split.finish());
    }

    #[test]
    fn cache_records_every_container_once() {
        let node = Node::from_json_str("[[1],{\"a\":[2]}]").unwrap();
        let options = crate::CompareOptions::set();
        let mut cache = HashCache::default();
        let code = node.cached_hash_code(&options, &mut cache);
        assert_eq!(code, node.hash_code(&options));
        // outer array, [1], the object and [2]; scalars are not cached
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.get(&node), Some(code));
        assert_eq!(node.cached_hash_code(&options, &mut cache), code);
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn seed_changes_code() {
        assert_ne!(combine_unordered(1, vec![]), combine_unordered(2, vec![]));
    }
}
