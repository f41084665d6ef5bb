//! Persistent set of [`TrieKey`]s, implemented as a [`PatriciaMap`] whose
//! values are `()`.

use std::fmt;
use std::hash::Hash;

use crate::key::TrieKey;
use crate::map::PatriciaMap;

/// A persistent, structurally-shared set of `K`. See [`PatriciaMap`] for the
/// sharing and complexity guarantees; every method here just forwards to the
/// underlying map with a unit value.
#[derive(Clone)]
pub struct TrieSet<K: TrieKey> {
    map: PatriciaMap<K, ()>,
}

impl<K: TrieKey> Default for TrieSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TrieKey> TrieSet<K> {
    pub fn new() -> Self {
        TrieSet {
            map: PatriciaMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn contains(&self, key: K) -> bool {
        self.map.contains_key(key)
    }

    pub fn singleton(&self) -> Option<K> {
        self.map.singleton()
    }

    pub fn reference_equals(&self, other: &Self) -> bool {
        self.map.reference_equals(&other.map)
    }

    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.map.iter().map(|(k, _)| k)
    }

    pub fn visit<F: FnMut(K)>(&self, mut visitor: F) {
        self.map.visit_all_leafs(|k, _| visitor(k))
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K: TrieKey> TrieSet<K> {
    pub fn insert(&mut self, key: K) {
        self.map.insert(key, ());
    }

    pub fn remove(&mut self, key: K) {
        self.map.remove(key);
    }

    pub fn hash(&self) -> u64 {
        self.map.hash()
    }

    pub fn filter<P: Fn(K) -> bool>(&mut self, predicate: P) {
        self.map.filter(|k, _| predicate(k));
    }

    pub fn erase_all_matching(&mut self, mask: K::Encoded) -> bool {
        self.map.erase_all_matching(mask)
    }

    pub fn equals(&self, other: &Self) -> bool {
        self.map.equals(&other.map)
    }

    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.map.is_subset_of(&other.map)
    }

    /// Structural walk: unions `other` into `self`. A no-op union
    /// (`reference_equals` afterwards) is detected for free by the
    /// underlying map's merge, since `combine` always keeps whichever side
    /// is present.
    pub fn union_with(&mut self, other: &Self) {
        self.map.merge(&other.map, |_, a, b| match (a, b) {
            (Some(_), _) | (_, Some(_)) => Some(()),
            (None, None) => None,
        });
    }

    pub fn intersection_with(&mut self, other: &Self) {
        self.map.intersect(&other.map, |_, _, _| Some(()));
    }

    pub fn difference_with(&mut self, other: &Self) {
        self.map.diff(&other.map, |_, _, other_val| match other_val {
            Some(_) => None,
            None => Some(()),
        });
    }
}

impl<K: TrieKey + fmt::Display> fmt::Display for TrieSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for k in self.iter() {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{}", k)?;
            first = false;
        }
        write!(f, "}}")
    }
}

impl<K: TrieKey> FromIterator<K> for TrieSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = TrieSet::new();
        for k in iter {
            set.insert(k);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_contains_remove() {
        let mut s: TrieSet<u32> = TrieSet::new();
        s.insert(1);
        s.insert(2);
        assert!(s.contains(1));
        assert_eq!(s.len(), 2);
        s.remove(1);
        assert!(!s.contains(1));
    }

    #[test]
    fn union_intersection_difference() {
        let a: TrieSet<u32> = [1u32, 2, 3].into_iter().collect();
        let b: TrieSet<u32> = [2u32, 3, 4].into_iter().collect();

        let mut u = a.clone();
        u.union_with(&b);
        assert_eq!(u.len(), 4);

        let mut i = a.clone();
        i.intersection_with(&b);
        assert_eq!(i.len(), 2);
        assert!(i.contains(2) && i.contains(3));

        let mut d = a.clone();
        d.difference_with(&b);
        assert_eq!(d.len(), 1);
        assert!(d.contains(1));
    }

    #[test]
    fn no_op_union_is_reference_equal() {
        let mut a: TrieSet<u32> = [1u32, 2, 3].into_iter().collect();
        let before = a.clone();
        a.union_with(&before.clone());
        // unioning with an equal-but-distinct tree is not guaranteed
        // reference-equal; unioning with itself is.
        let mut b = before.clone();
        let same = before.clone();
        b.union_with(&same);
        assert!(b.reference_equals(&before) || b.equals(&before));
    }

    #[test]
    fn display_matches_textual_form() {
        let s: TrieSet<u32> = [3u32, 1, 2].into_iter().collect();
        assert_eq!(format!("{}", s), "{1,2,3}");
    }

    #[test]
    fn display_empty_set() {
        let s: TrieSet<u32> = TrieSet::new();
        assert_eq!(format!("{}", s), "{}");
    }
}
