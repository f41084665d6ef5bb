//! Persistent map from [`TrieKey`] to an arbitrary value type, backed by a
//! Patricia trie.
//!
//! # Invariants
//!
//! 1. For every branch, every key in `left ∪ right` matches `prefix` on all
//!    bits strictly above `branching_bit`.
//! 2. Keys in `left` have a `0` at `branching_bit`; keys in `right` have
//!    a `1`.
//! 3. `branching_bit` is a power of two.
//! 4. `left` and `right` are both non-empty (no unary branches).
//! 5. Nodes are immutable; a mutation produces a new root, and unaffected
//!    subtrees are shared by reference.
//! 6. `cached_hash` and `cached_size` are functions of the subtree's
//!    contents, maintained by every constructor.

use std::hash::Hash;

use crate::iter::Iter;
use crate::key::TrieKey;
use crate::node::{self, NodeRef};

/// A persistent, structurally-shared map from `K` to `V`.
///
/// Cloning a `PatriciaMap` is `O(1)`: the clone shares the same root node,
/// and only the path touched by a subsequent mutation is reallocated.
pub struct PatriciaMap<K: TrieKey, V> {
    root: NodeRef<K, V>,
}

impl<K: TrieKey, V> Clone for PatriciaMap<K, V> {
    fn clone(&self) -> Self {
        PatriciaMap {
            root: self.root.clone(),
        }
    }
}

impl<K: TrieKey, V> Default for PatriciaMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TrieKey, V> PatriciaMap<K, V> {
    pub fn new() -> Self {
        PatriciaMap {
            root: node::empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.size() == 0
    }

    pub fn len(&self) -> usize {
        self.root.size()
    }

    pub fn get(&self, key: K) -> Option<&V> {
        node::lookup(&self.root, key)
    }

    pub fn contains_key(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// If the map holds exactly one binding, returns its key.
    pub fn singleton(&self) -> Option<K> {
        node::as_singleton(&self.root)
    }

    /// Two maps are reference-equal when they are backed by the same root
    /// node. This is a fast-path, strictly stronger than [`Self::equals`]:
    /// it only returns `true` when the trie has demonstrably not changed
    /// (e.g. after a sequence of in-place-looking operations turned out to
    /// be no-ops), never merely when the bindings happen to coincide.
    pub fn reference_equals(&self, other: &Self) -> bool {
        NodeRef::ptr_eq(&self.root, &other.root)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root)
    }

    pub fn visit_all_leafs<F: FnMut(K, &V)>(&self, mut visitor: F) {
        node::visit_all_leafs(&self.root, &mut visitor)
    }

    pub fn clear(&mut self) {
        self.root = node::empty();
    }
}

impl<K: TrieKey, V: Hash> PatriciaMap<K, V> {
    pub fn hash(&self) -> u64 {
        self.root.hash()
    }

    /// Removes `key`, if present. `O(w)` where `w` is the key width; shares
    /// every subtree not on the path to `key`.
    pub fn remove(&mut self, key: K) {
        self.root = node::remove(&self.root, key);
    }

    /// Inserts or replaces the binding for `key`. A same-key upsert that
    /// leaves the value unchanged reuses the existing leaf: `reference_equals`
    /// holds afterwards whenever this call was a structural no-op.
    pub fn insert(&mut self, key: K, value: V)
    where
        V: Clone + PartialEq,
    {
        self.root = node::upsert_with(&self.root, key, |_| value);
    }

    /// Applies `f` to a reference to the current binding of `key` (or `None`
    /// if absent), storing the result as the new binding. Like [`Self::insert`],
    /// a same-key update whose result equals the old value is a no-op.
    pub fn update<F: FnOnce(Option<&V>) -> V>(&mut self, key: K, f: F)
    where
        V: Clone + PartialEq,
    {
        self.root = node::upsert_with(&self.root, key, f);
    }

    pub fn filter<P: Fn(K, &V) -> bool>(&mut self, predicate: P) {
        self.root = node::filter(&self.root, &predicate);
    }

    /// Removes every binding whose key has any bit set in `mask`. Returns
    /// whether any binding was actually removed.
    pub fn erase_all_matching(&mut self, mask: K::Encoded) -> bool {
        let (new_root, removed) = node::erase_all_matching(&self.root, mask);
        self.root = new_root;
        removed
    }
}

impl<K: TrieKey, V: Hash + PartialEq> PatriciaMap<K, V> {
    /// Structural equality: same bindings, independent of sharing.
    pub fn equals(&self, other: &Self) -> bool {
        node::equals(&self.root, &other.root)
    }
}

impl<K: TrieKey, V> PatriciaMap<K, V> {
    /// Whether every key bound in `self` is also bound in `other` (values are
    /// not compared).
    pub fn is_subset_of<W>(&self, other: &PatriciaMap<K, W>) -> bool {
        node::is_subset_of(&self.root, &other.root)
    }
}

impl<K: TrieKey, V: Hash + Clone + PartialEq> PatriciaMap<K, V> {
    /// Merges `other` into `self` in place. `combine(key, self_value,
    /// other_value)` decides, for every key bound on at least one side, what
    /// (if anything) the result binds it to. When `self` and `other` share
    /// structure, unaffected subtrees are reused without modification
    /// (including the whole-tree case: `reference_equals` afterwards holds
    /// whenever the merge was a structural no-op).
    pub fn merge<F>(&mut self, other: &Self, combine: F)
    where
        F: Fn(K, Option<&V>, Option<&V>) -> Option<V>,
    {
        self.root = node::zip_with(&self.root, &other.root, &combine);
    }

    /// Same structural walk as [`Self::merge`], with a combining function
    /// that is expected to drop any key missing on either side.
    pub fn intersect<F>(&mut self, other: &Self, combine: F)
    where
        F: Fn(K, &V, &V) -> Option<V>,
    {
        self.merge(other, move |k, a, b| match (a, b) {
            (Some(a), Some(b)) => combine(k, a, b),
            _ => None,
        });
    }

    /// Same structural walk, keeping only bindings present in `self` but not
    /// surviving `combine` against `other`'s value (or absent from `other`
    /// altogether).
    pub fn diff<F>(&mut self, other: &Self, combine: F)
    where
        F: Fn(K, &V, Option<&V>) -> Option<V>,
    {
        self.merge(other, move |k, a, b| match a {
            Some(a) => combine(k, a, b),
            None => None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_get_remove() {
        let mut m: PatriciaMap<u32, &'static str> = PatriciaMap::new();
        m.insert(1, "one");
        m.insert(2, "two");
        assert_eq!(m.get(1), Some(&"one"));
        assert_eq!(m.len(), 2);
        m.remove(1);
        assert_eq!(m.get(1), None);
        assert!(!m.contains_key(1));
    }

    #[test]
    fn noop_upsert_is_reference_equal() {
        let mut m: PatriciaMap<u32, u32> = PatriciaMap::new();
        m.insert(7, 100);
        let before = m.clone();
        m.update(7, |old| *old.unwrap());
        assert!(m.reference_equals(&before));
    }

    #[test]
    fn merge_is_pointwise() {
        let mut a: PatriciaMap<u32, i32> = PatriciaMap::new();
        a.insert(1, 10);
        a.insert(2, 20);
        let mut b: PatriciaMap<u32, i32> = PatriciaMap::new();
        b.insert(2, 200);
        b.insert(3, 300);

        a.merge(&b, |_, x, y| match (x, y) {
            (Some(x), Some(y)) => Some(x + y),
            (Some(x), None) => Some(*x),
            (None, Some(y)) => Some(*y),
            (None, None) => None,
        });
        assert_eq!(a.get(1), Some(&10));
        assert_eq!(a.get(2), Some(&220));
        assert_eq!(a.get(3), Some(&300));
    }

    #[test]
    fn hash_determinism() {
        let mut a: PatriciaMap<u32, i32> = PatriciaMap::new();
        a.insert(1, 10);
        a.insert(2, 20);
        let mut b: PatriciaMap<u32, i32> = PatriciaMap::new();
        b.insert(2, 20);
        b.insert(1, 10);
        assert!(a.equals(&b));
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn iteration_is_ascending() {
        let mut m: PatriciaMap<u32, ()> = PatriciaMap::new();
        for k in [5u32, 1, 9, 3, 7] {
            m.insert(k, ());
        }
        let keys: Vec<u32> = m.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![1, 3, 5, 7, 9]);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use std::collections::BTreeMap;

    #[quickcheck]
    fn iteration_matches_a_btreemap_built_from_the_same_inserts(entries: Vec<(u32, i32)>) -> bool {
        let mut trie: PatriciaMap<u32, i32> = PatriciaMap::new();
        let mut reference: BTreeMap<u32, i32> = BTreeMap::new();
        for (k, v) in entries {
            trie.insert(k, v);
            reference.insert(k, v);
        }
        let from_trie: Vec<(u32, i32)> = trie.iter().map(|(k, v)| (k, *v)).collect();
        let from_reference: Vec<(u32, i32)> = reference.into_iter().collect();
        from_trie == from_reference
    }

    #[quickcheck]
    fn insert_then_remove_every_key_is_empty(keys: Vec<u32>) -> bool {
        let mut trie: PatriciaMap<u32, ()> = PatriciaMap::new();
        for k in &keys {
            trie.insert(*k, ());
        }
        for k in &keys {
            trie.remove(*k);
        }
        trie.is_empty()
    }

    #[quickcheck]
    fn two_tries_built_from_the_same_entries_in_any_order_are_equal(
        entries: Vec<(u16, u16)>,
    ) -> bool {
        let mut forward: PatriciaMap<u16, u16> = PatriciaMap::new();
        for (k, v) in &entries {
            forward.insert(*k, *v);
        }
        let mut backward: PatriciaMap<u16, u16> = PatriciaMap::new();
        for (k, v) in entries.iter().rev() {
            backward.insert(*k, *v);
        }
        forward.equals(&backward) && forward.hash() == backward.hash()
    }
}
