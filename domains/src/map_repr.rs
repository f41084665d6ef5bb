//! The common map interface [`crate::env::Environment`] and
//! [`crate::partition::Partition`] are generic over, implemented for both a
//! trie-backed and a hash-backed map, per spec.md §4.F ("parameterized by
//! the underlying mapping").

use std::collections::HashMap as StdHashMap;
use std::hash::Hash;

use abslat_trie::{PatriciaMap, TrieKey};

/// A mutable key→value map. `V` carries no bound here; the top/bottom-value
/// semantics live one layer up, in [`crate::env::Environment`] /
/// [`crate::partition::Partition`], which is what lets a single map
/// implementation serve both (an environment's absent entries default to
/// top, a partition's to bottom — the map itself doesn't know which).
///
/// Keys are required to be `Copy` throughout this crate's domains (every
/// concrete key type used — integers, pointers, interned variable ids — is),
/// which lets `bindings()` return owned keys rather than a borrowing
/// iterator, avoiding a lifetime-infected associated iterator type.
pub trait MapRepr<K: Copy, V: Clone>: Clone {
    fn new() -> Self;
    fn get(&self, key: &K) -> Option<&V>;
    fn set(&mut self, key: K, value: V);
    fn erase(&mut self, key: &K);
    fn is_empty(&self) -> bool;
    fn len(&self) -> usize;
    /// All bindings, order unspecified across implementations (trie-backed
    /// maps happen to yield ascending key order; hash-backed maps don't).
    fn bindings(&self) -> Vec<(K, &V)>;
}

impl<K: TrieKey, V: Clone + PartialEq> MapRepr<K, V> for PatriciaMap<K, V> {
    fn new() -> Self {
        PatriciaMap::new()
    }
    fn get(&self, key: &K) -> Option<&V> {
        PatriciaMap::get(self, *key)
    }
    fn set(&mut self, key: K, value: V) {
        PatriciaMap::insert(self, key, value);
    }
    fn erase(&mut self, key: &K) {
        PatriciaMap::remove(self, *key);
    }
    fn is_empty(&self) -> bool {
        PatriciaMap::is_empty(self)
    }
    fn len(&self) -> usize {
        PatriciaMap::len(self)
    }
    fn bindings(&self) -> Vec<(K, &V)> {
        PatriciaMap::iter(self).collect()
    }
}

#[derive(Clone, Debug)]
pub struct HashMapRepr<K: Eq + Hash + Copy, V: Clone> {
    entries: StdHashMap<K, V>,
}

impl<K: Eq + Hash + Copy, V: Clone> MapRepr<K, V> for HashMapRepr<K, V> {
    fn new() -> Self {
        HashMapRepr {
            entries: StdHashMap::new(),
        }
    }
    fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }
    fn set(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
    }
    fn erase(&mut self, key: &K) {
        self.entries.remove(key);
    }
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    fn len(&self) -> usize {
        self.entries.len()
    }
    fn bindings(&self) -> Vec<(K, &V)> {
        self.entries.iter().map(|(k, v)| (*k, v)).collect()
    }
}
