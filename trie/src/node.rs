//! The immutable, structurally-shared node representation underlying every
//! [`crate::map::PatriciaMap`] and [`crate::set::TrieSet`].

use std::hash::{Hash, Hasher};

use crate::key::{branching_bit, is_zero_bit, matches_prefix, TrieKey, Word};

#[cfg(not(feature = "sync"))]
pub(crate) type NodeRef<K, V> = std::rc::Rc<Node<K, V>>;
#[cfg(feature = "sync")]
pub(crate) type NodeRef<K, V> = std::sync::Arc<Node<K, V>>;

/// A node of a Patricia trie. See the module invariants in `crate::map`.
pub(crate) enum Node<K: TrieKey, V> {
    Empty,
    Leaf {
        key: K,
        value: V,
    },
    Branch {
        prefix: K::Encoded,
        branching_bit: K::Encoded,
        left: NodeRef<K, V>,
        right: NodeRef<K, V>,
        cached_hash: u64,
        cached_size: usize,
    },
}

impl<K: TrieKey, V> Node<K, V> {
    pub(crate) fn size(&self) -> usize {
        match self {
            Node::Empty => 0,
            Node::Leaf { .. } => 1,
            Node::Branch { cached_size, .. } => *cached_size,
        }
    }

    pub(crate) fn hash(&self) -> u64
    where
        V: Hash,
    {
        match self {
            Node::Empty => 0,
            Node::Leaf { key, value } => leaf_hash(*key, value),
            Node::Branch { cached_hash, .. } => *cached_hash,
        }
    }
}

fn leaf_hash<K: TrieKey, V: Hash>(key: K, value: &V) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    key.encode().hash(&mut hasher);
    value.hash(&mut hasher);
    hasher.finish()
}

/// Combines two already-computed subtree hashes into a branch's cached hash.
/// Order-independent in `branching_bit`/`prefix` is irrelevant here since the
/// pair `(left, right)` together with the prefix fully determines a branch's
/// identity; we fold all four into the hash.
fn combine_hash<W: Word + Hash>(prefix: W, bit: W, left: u64, right: u64) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    prefix.hash(&mut hasher);
    bit.hash(&mut hasher);
    left.hash(&mut hasher);
    right.hash(&mut hasher);
    hasher.finish()
}

pub(crate) fn empty<K: TrieKey, V>() -> NodeRef<K, V> {
    NodeRef::new(Node::Empty)
}

pub(crate) fn leaf<K: TrieKey, V>(key: K, value: V) -> NodeRef<K, V> {
    NodeRef::new(Node::Leaf { key, value })
}

/// Builds a branch node from two known-disjoint, known-non-empty children,
/// given their already-agreed `prefix`/`branching_bit`. This is the single
/// constructor that preserves invariants 1-4 from the trie's module
/// documentation; every mutating operation in this crate funnels through it
/// (directly, or through [`join`]/[`branch`]).
fn make_branch<K: TrieKey, V: Hash>(
    prefix: K::Encoded,
    bit: K::Encoded,
    left: NodeRef<K, V>,
    right: NodeRef<K, V>,
) -> NodeRef<K, V> {
    let cached_size = left.size() + right.size();
    let cached_hash = combine_hash(prefix, bit, left.hash(), right.hash());
    NodeRef::new(Node::Branch {
        prefix,
        branching_bit: bit,
        left,
        right,
        cached_hash,
        cached_size,
    })
}

/// Joins two non-empty, disjoint subtrees `t0` (whose keys share prefix
/// `prefix0`) and `t1` (prefix `prefix1`) into a single branch, computing the
/// branching bit and the side each subtree falls on.
fn join<K: TrieKey, V: Hash>(
    prefix0: K::Encoded,
    t0: NodeRef<K, V>,
    prefix1: K::Encoded,
    t1: NodeRef<K, V>,
) -> NodeRef<K, V> {
    let bit = branching_bit(prefix0, prefix1);
    let prefix = crate::key::mask(prefix0, bit);
    if is_zero_bit(prefix0, bit) {
        make_branch(prefix, bit, t0, t1)
    } else {
        make_branch(prefix, bit, t1, t0)
    }
}

/// Rebuilds a branch around possibly-updated children, collapsing to the
/// non-empty side if one child became empty (this is how removal and
/// filtering avoid producing unary branches, preserving invariant 4).
fn branch<K: TrieKey, V: Hash>(
    prefix: K::Encoded,
    bit: K::Encoded,
    left: NodeRef<K, V>,
    right: NodeRef<K, V>,
) -> NodeRef<K, V> {
    match (&*left, &*right) {
        (Node::Empty, _) => right,
        (_, Node::Empty) => left,
        _ => make_branch(prefix, bit, left, right),
    }
}

pub(crate) fn lookup<K: TrieKey, V>(node: &NodeRef<K, V>, key: K) -> Option<&V> {
    let k = key.encode();
    let mut current = node;
    loop {
        match &**current {
            Node::Empty => return None,
            Node::Leaf { key: lk, value } => {
                return if lk.encode() == k { Some(value) } else { None };
            }
            Node::Branch {
                branching_bit,
                left,
                right,
                ..
            } => {
                current = if is_zero_bit(k, *branching_bit) {
                    left
                } else {
                    right
                };
            }
        }
    }
}

/// Inserts or updates `key`, combining any existing bound value with `f`.
/// `f(None)` is called when `key` is absent, `f(Some(old))` when present.
pub(crate) fn upsert_with<K, V, F>(node: &NodeRef<K, V>, key: K, f: F) -> NodeRef<K, V>
where
    K: TrieKey,
    V: Hash + Clone + PartialEq,
    F: FnOnce(Option<&V>) -> V,
{
    let k = key.encode();
    insert_rec(node, key, k, f)
}

fn insert_rec<K, V, F>(node: &NodeRef<K, V>, key: K, k: K::Encoded, f: F) -> NodeRef<K, V>
where
    K: TrieKey,
    V: Hash + Clone + PartialEq,
    F: FnOnce(Option<&V>) -> V,
{
    match &**node {
        Node::Empty => leaf(key, f(None)),
        Node::Leaf { key: lk, value } => {
            let lk_encoded = lk.encode();
            if lk_encoded == k {
                let new_value = f(Some(value));
                if new_value == *value {
                    node.clone()
                } else {
                    leaf(key, new_value)
                }
            } else {
                join(lk_encoded, node.clone(), k, leaf(key, f(None)))
            }
        }
        Node::Branch {
            prefix,
            branching_bit,
            left,
            right,
            ..
        } => {
            if matches_prefix(k, *prefix, *branching_bit) {
                if is_zero_bit(k, *branching_bit) {
                    let new_left = insert_rec(left, key, k, f);
                    make_branch(*prefix, *branching_bit, new_left, right.clone())
                } else {
                    let new_right = insert_rec(right, key, k, f);
                    make_branch(*prefix, *branching_bit, left.clone(), new_right)
                }
            } else {
                join(*prefix, node.clone(), k, leaf(key, f(None)))
            }
        }
    }
}

pub(crate) fn remove<K, V>(node: &NodeRef<K, V>, key: K) -> NodeRef<K, V>
where
    K: TrieKey,
    V: Hash,
{
    let k = key.encode();
    remove_rec(node, k)
}

fn remove_rec<K, V>(node: &NodeRef<K, V>, k: K::Encoded) -> NodeRef<K, V>
where
    K: TrieKey,
    V: Hash,
{
    match &**node {
        Node::Empty => node.clone(),
        Node::Leaf { key: lk, .. } => {
            if lk.encode() == k {
                empty()
            } else {
                node.clone()
            }
        }
        Node::Branch {
            prefix,
            branching_bit,
            left,
            right,
            ..
        } => {
            if !matches_prefix(k, *prefix, *branching_bit) {
                node.clone()
            } else if is_zero_bit(k, *branching_bit) {
                let new_left = remove_rec(left, k);
                if NodeRef::ptr_eq(&new_left, left) {
                    node.clone()
                } else {
                    branch(*prefix, *branching_bit, new_left, right.clone())
                }
            } else {
                let new_right = remove_rec(right, k);
                if NodeRef::ptr_eq(&new_right, right) {
                    node.clone()
                } else {
                    branch(*prefix, *branching_bit, left.clone(), new_right)
                }
            }
        }
    }
}

/// Structural equality of two Patricia trees: same bindings, independent of
/// sharing. Short-circuits on `NodeRef::ptr_eq`, and then on cached
/// hash/size mismatches, before falling back to a full recursive walk.
pub(crate) fn equals<K, V>(a: &NodeRef<K, V>, b: &NodeRef<K, V>) -> bool
where
    K: TrieKey,
    V: Hash + PartialEq,
{
    if NodeRef::ptr_eq(a, b) {
        return true;
    }
    match (&**a, &**b) {
        (Node::Empty, Node::Empty) => true,
        (Node::Leaf { key: k1, value: v1 }, Node::Leaf { key: k2, value: v2 }) => {
            k1.encode() == k2.encode() && v1 == v2
        }
        (
            Node::Branch {
                prefix: p1,
                branching_bit: b1,
                left: l1,
                right: r1,
                cached_hash: h1,
                cached_size: s1,
            },
            Node::Branch {
                prefix: p2,
                branching_bit: b2,
                left: l2,
                right: r2,
                cached_hash: h2,
                cached_size: s2,
            },
        ) => {
            s1 == s2
                && h1 == h2
                && p1 == p2
                && b1 == b2
                && equals(l1, l2)
                && equals(r1, r2)
        }
        _ => false,
    }
}

pub(crate) fn is_subset_of<K, V, W>(a: &NodeRef<K, V>, b: &NodeRef<K, W>) -> bool
where
    K: TrieKey,
{
    match &**a {
        Node::Empty => true,
        Node::Leaf { key, .. } => lookup(b, *key).is_some(),
        Node::Branch {
            prefix,
            branching_bit,
            left,
            right,
            ..
        } => match descend_for_subset(b, *prefix, *branching_bit) {
            Descend::Missing => false,
            Descend::Whole(sub) => is_subset_of(left, &sub) && is_subset_of(right, &sub),
            Descend::Split { on_left, on_right } => {
                is_subset_of(left, &on_left) && is_subset_of(right, &on_right)
            }
        },
    }
}

enum Descend<K: TrieKey, W> {
    Missing,
    Whole(NodeRef<K, W>),
    Split {
        on_left: NodeRef<K, W>,
        on_right: NodeRef<K, W>,
    },
}

/// Finds the part of `b` relevant to a subtree of `a` rooted at
/// `(prefix, branching_bit)`, used by `is_subset_of`'s structural recursion.
fn descend_for_subset<K, W>(
    b: &NodeRef<K, W>,
    prefix: K::Encoded,
    branching_bit: K::Encoded,
) -> Descend<K, W>
where
    K: TrieKey,
{
    match &**b {
        Node::Empty => Descend::Missing,
        Node::Leaf { .. } => Descend::Whole(b.clone()),
        Node::Branch {
            prefix: bp,
            branching_bit: bb,
            left,
            right,
            ..
        } => {
            if *bb == branching_bit && *bp == prefix {
                Descend::Split {
                    on_left: left.clone(),
                    on_right: right.clone(),
                }
            } else if *bb > branching_bit && matches_prefix(prefix, *bp, *bb) {
                if is_zero_bit(prefix, *bb) {
                    descend_for_subset(left, prefix, branching_bit)
                } else {
                    descend_for_subset(right, prefix, branching_bit)
                }
            } else {
                Descend::Missing
            }
        }
    }
}

/// The shared structural walk behind `merge`/`intersect`/`diff`. `leaf_op`
/// decides, for a pair of leaves with the same key (or one side missing),
/// what binding (if any) survives into the result.
pub(crate) fn zip_with<K, V, F>(a: &NodeRef<K, V>, b: &NodeRef<K, V>, leaf_op: &F) -> NodeRef<K, V>
where
    K: TrieKey,
    V: Hash + Clone + PartialEq,
    F: Fn(K, Option<&V>, Option<&V>) -> Option<V>,
{
    if NodeRef::ptr_eq(a, b) {
        return a.clone();
    }
    match (&**a, &**b) {
        (Node::Empty, _) => only_side(b, leaf_op, Side::Right),
        (_, Node::Empty) => only_side(a, leaf_op, Side::Left),
        (Node::Leaf { key, value }, _) => merge_leaf_into(*key, value, b, leaf_op, true),
        (_, Node::Leaf { key, value }) => merge_leaf_into(*key, value, a, leaf_op, false),
        (
            Node::Branch {
                prefix: p1,
                branching_bit: b1,
                left: l1,
                right: r1,
                ..
            },
            Node::Branch {
                prefix: p2,
                branching_bit: b2,
                left: l2,
                right: r2,
                ..
            },
        ) => {
            if b1 == b2 && p1 == p2 {
                let left = zip_with(l1, l2, leaf_op);
                let right = zip_with(r1, r2, leaf_op);
                branch(*p1, *b1, left, right)
            } else if *b1 > *b2 && matches_prefix(*p2, *p1, *b1) {
                if is_zero_bit(*p2, *b1) {
                    branch(*p1, *b1, zip_with(l1, b, leaf_op), only_side(r1, leaf_op, Side::Left))
                } else {
                    branch(*p1, *b1, only_side(l1, leaf_op, Side::Left), zip_with(r1, b, leaf_op))
                }
            } else if *b2 > *b1 && matches_prefix(*p1, *p2, *b2) {
                if is_zero_bit(*p1, *b2) {
                    branch(*p2, *b2, zip_with(a, l2, leaf_op), only_side(r2, leaf_op, Side::Right))
                } else {
                    branch(*p2, *b2, only_side(l2, leaf_op, Side::Right), zip_with(a, r2, leaf_op))
                }
            } else {
                disjoint_union(*p1, a.clone(), *p2, b.clone(), leaf_op)
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Applies `leaf_op` to every leaf of `node`, treating the other side as
/// entirely absent (used when the structural walk falls off one side).
fn only_side<K, V, F>(node: &NodeRef<K, V>, leaf_op: &F, side: Side) -> NodeRef<K, V>
where
    K: TrieKey,
    V: Hash + Clone,
    F: Fn(K, Option<&V>, Option<&V>) -> Option<V>,
{
    match &**node {
        Node::Empty => empty(),
        Node::Leaf { key, value } => {
            let kept = match side {
                Side::Left => leaf_op(*key, Some(value), None),
                Side::Right => leaf_op(*key, None, Some(value)),
            };
            match kept {
                Some(v) => leaf(*key, v),
                None => empty(),
            }
        }
        Node::Branch {
            prefix,
            branching_bit,
            left,
            right,
            ..
        } => branch(
            *prefix,
            *branching_bit,
            only_side(left, leaf_op, side),
            only_side(right, leaf_op, side),
        ),
    }
}

/// Merges a lone leaf `(key, value)` into an arbitrary tree `other`: every
/// leaf of `other` other than `key`'s is transformed one-sidedly (as if
/// `key`'s tree were empty there), and `key`'s own binding is replaced by the
/// fully combined `leaf_op` result (dropped if that combine yields `None`).
/// `leaf_is_left` says whether the lone leaf is the `self` (left) operand of
/// `leaf_op` or the `other` (right) operand.
fn merge_leaf_into<K, V, F>(
    key: K,
    value: &V,
    other: &NodeRef<K, V>,
    leaf_op: &F,
    leaf_is_left: bool,
) -> NodeRef<K, V>
where
    K: TrieKey,
    V: Hash + Clone + PartialEq,
    F: Fn(K, Option<&V>, Option<&V>) -> Option<V>,
{
    let other_value = lookup(other, key);
    let combined = if leaf_is_left {
        leaf_op(key, Some(value), other_value)
    } else {
        leaf_op(key, other_value, Some(value))
    };
    let other_side = if leaf_is_left { Side::Right } else { Side::Left };
    let transformed = only_side(other, leaf_op, other_side);
    match combined {
        Some(v) => upsert_with(&transformed, key, |_| v),
        None => remove(&transformed, key),
    }
}

/// Combines two tries whose top-level prefixes are structurally disjoint
/// (neither branching bit dominates the other).
fn disjoint_union<K, V, F>(
    prefix0: K::Encoded,
    t0: NodeRef<K, V>,
    prefix1: K::Encoded,
    t1: NodeRef<K, V>,
    leaf_op: &F,
) -> NodeRef<K, V>
where
    K: TrieKey,
    V: Hash + Clone,
    F: Fn(K, Option<&V>, Option<&V>) -> Option<V>,
{
    let t0 = only_side(&t0, leaf_op, Side::Left);
    let t1 = only_side(&t1, leaf_op, Side::Right);
    match (&*t0, &*t1) {
        (Node::Empty, _) => t1,
        (_, Node::Empty) => t0,
        _ => join(prefix0, t0, prefix1, t1),
    }
}

pub(crate) fn filter<K, V, P>(node: &NodeRef<K, V>, predicate: &P) -> NodeRef<K, V>
where
    K: TrieKey,
    V: Hash,
    P: Fn(K, &V) -> bool,
{
    match &**node {
        Node::Empty => node.clone(),
        Node::Leaf { key, value } => {
            if predicate(*key, value) {
                node.clone()
            } else {
                empty()
            }
        }
        Node::Branch {
            prefix,
            branching_bit,
            left,
            right,
            ..
        } => {
            let new_left = filter(left, predicate);
            let new_right = filter(right, predicate);
            if NodeRef::ptr_eq(&new_left, left) && NodeRef::ptr_eq(&new_right, right) {
                node.clone()
            } else {
                branch(*prefix, *branching_bit, new_left, new_right)
            }
        }
    }
}

pub(crate) fn visit_all_leafs<K, V, F>(node: &NodeRef<K, V>, visitor: &mut F)
where
    K: TrieKey,
    F: FnMut(K, &V),
{
    match &**node {
        Node::Empty => {}
        Node::Leaf { key, value } => visitor(*key, value),
        Node::Branch { left, right, .. } => {
            visit_all_leafs(left, visitor);
            visit_all_leafs(right, visitor);
        }
    }
}

/// Removes every leaf whose key has any bit set in `mask`. Returns whether
/// anything was actually removed.
pub(crate) fn erase_all_matching<K, V>(node: &NodeRef<K, V>, mask: K::Encoded) -> (NodeRef<K, V>, bool)
where
    K: TrieKey,
    V: Hash,
{
    match &**node {
        Node::Empty => (node.clone(), false),
        Node::Leaf { key, .. } => {
            if (key.encode() & mask) != K::Encoded::ZERO {
                (empty(), true)
            } else {
                (node.clone(), false)
            }
        }
        Node::Branch {
            prefix,
            branching_bit,
            left,
            right,
            ..
        } => {
            // If none of the branch's own address bits (prefix/branching_bit)
            // intersect the mask, the subtree's key bits at those positions
            // are unaffected, but leaves further down may still match; we
            // always have to recurse, there's no valid short-circuit here.
            let (new_left, removed_left) = erase_all_matching(left, mask);
            let (new_right, removed_right) = erase_all_matching(right, mask);
            if !removed_left && !removed_right {
                (node.clone(), false)
            } else {
                (
                    branch(*prefix, *branching_bit, new_left, new_right),
                    true,
                )
            }
        }
    }
}

/// As-leaf-key accessor used by `singleton()`: returns the sole key if the
/// tree holds exactly one binding.
pub(crate) fn as_singleton<K: TrieKey, V>(node: &NodeRef<K, V>) -> Option<K> {
    match &**node {
        Node::Leaf { key, .. } => Some(*key),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ins(t: &NodeRef<u32, ()>, k: u32) -> NodeRef<u32, ()> {
        upsert_with(t, k, |_| ())
    }

    #[test]
    fn insert_lookup_remove() {
        let mut t: NodeRef<u32, ()> = empty();
        for k in [0u32, 1, 0xFFFF_FFFF, 42] {
            t = ins(&t, k);
        }
        for k in [0u32, 1, 0xFFFF_FFFF, 42] {
            assert!(lookup(&t, k).is_some());
        }
        assert!(lookup(&t, 7).is_none());

        let removed = remove(&t, 42);
        assert!(lookup(&removed, 42).is_none());
        assert!(lookup(&removed, 0).is_some());
    }

    #[test]
    fn no_op_upsert_is_reference_equal() {
        let t: NodeRef<u32, u32> = upsert_with(&empty(), 5, |_| 100);
        let t2 = upsert_with(&t, 5, |old| *old.unwrap());
        assert!(NodeRef::ptr_eq(&t, &t2));
    }
}
