//! Set containers and the power-set abstract domain built over either of
//! them, plus the small-sorted-set and over/under-set specializations.

use std::collections::HashSet as StdHashSet;
use std::hash::Hash;

use abslat_trie::{TrieKey, TrieSet};
use abslat_value::{AbstractDomain, AbstractValue, Error, Result, ValueKind};

/// The common interface of a concrete set container usable underneath
/// [`SetDomain`]. Implemented identically by the trie-backed and hash-backed
/// sets; see spec.md §4.E's table for which side is asymptotically better
/// at which operation.
pub trait SetRepr<E>: Clone {
    fn new() -> Self;
    fn is_empty(&self) -> bool;
    fn len(&self) -> usize;
    fn contains(&self, element: &E) -> bool;
    fn insert(&mut self, element: E);
    fn remove(&mut self, element: &E);
    fn union_with(&mut self, other: &Self);
    fn intersection_with(&mut self, other: &Self);
    fn is_subset_of(&self, other: &Self) -> bool;
    fn equals(&self, other: &Self) -> bool;
    fn singleton(&self) -> Option<E>;
}

impl<E: TrieKey> SetRepr<E> for TrieSet<E> {
    fn new() -> Self {
        TrieSet::new()
    }
    fn is_empty(&self) -> bool {
        TrieSet::is_empty(self)
    }
    fn len(&self) -> usize {
        TrieSet::len(self)
    }
    fn contains(&self, element: &E) -> bool {
        TrieSet::contains(self, *element)
    }
    fn insert(&mut self, element: E) {
        TrieSet::insert(self, element)
    }
    fn remove(&mut self, element: &E) {
        TrieSet::remove(self, *element)
    }
    fn union_with(&mut self, other: &Self) {
        TrieSet::union_with(self, other)
    }
    fn intersection_with(&mut self, other: &Self) {
        TrieSet::intersection_with(self, other)
    }
    fn is_subset_of(&self, other: &Self) -> bool {
        TrieSet::is_subset_of(self, other)
    }
    fn equals(&self, other: &Self) -> bool {
        TrieSet::equals(self, other)
    }
    fn singleton(&self) -> Option<E> {
        TrieSet::singleton(self)
    }
}

/// A hash-table-backed set, the `HashSet`-analogue of [`SetRepr`], used by
/// element types with no bitwise-integer encoding.
#[derive(Clone, Debug)]
pub struct HashSet<E: Eq + Hash + Clone> {
    elements: StdHashSet<E>,
}

impl<E: Eq + Hash + Clone> SetRepr<E> for HashSet<E> {
    fn new() -> Self {
        HashSet {
            elements: StdHashSet::new(),
        }
    }
    fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
    fn len(&self) -> usize {
        self.elements.len()
    }
    fn contains(&self, element: &E) -> bool {
        self.elements.contains(element)
    }
    fn insert(&mut self, element: E) {
        self.elements.insert(element);
    }
    fn remove(&mut self, element: &E) {
        self.elements.remove(element);
    }
    fn union_with(&mut self, other: &Self) {
        // Iterate the smaller side into the larger, per spec.md §4.E.
        if self.elements.len() < other.elements.len() {
            let mut merged = other.elements.clone();
            merged.extend(self.elements.drain());
            self.elements = merged;
        } else {
            self.elements.extend(other.elements.iter().cloned());
        }
    }
    fn intersection_with(&mut self, other: &Self) {
        self.elements.retain(|e| other.elements.contains(e));
    }
    fn is_subset_of(&self, other: &Self) -> bool {
        self.elements.iter().all(|e| other.elements.contains(e))
    }
    fn equals(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
    fn singleton(&self) -> Option<E> {
        if self.elements.len() == 1 {
            self.elements.iter().next().cloned()
        } else {
            None
        }
    }
}

/// A power-set abstract domain over an arbitrary [`SetRepr`]: the empty set
/// is bottom, union is join, intersection is meet. Top has no finite
/// representation as a set of elements, so it is carried as an explicit tag
/// rather than synthesized, exactly like [`abslat_value::Scaffolding`]'s
/// `Top` state (this domain does not use `Scaffolding` directly since its
/// bottom is the container's own empty state, not a separate tag).
#[derive(Clone, Debug)]
pub enum SetDomain<E, S: SetRepr<E>> {
    Top,
    Elements(S, std::marker::PhantomData<E>),
}

impl<E, S: SetRepr<E>> SetDomain<E, S> {
    pub fn elements_set(set: S) -> Self {
        SetDomain::Elements(set, std::marker::PhantomData)
    }

    pub fn is_value(&self) -> bool {
        matches!(self, SetDomain::Elements(..))
    }

    pub fn elements(&self) -> Option<&S> {
        match self {
            SetDomain::Elements(s, _) => Some(s),
            SetDomain::Top => None,
        }
    }

    pub fn contains(&self, element: &E) -> bool {
        match self {
            SetDomain::Top => true,
            SetDomain::Elements(s, _) => s.contains(element),
        }
    }

    pub fn add(&mut self, element: E) {
        if let SetDomain::Elements(s, _) = self {
            s.insert(element);
        }
    }

    pub fn remove(&mut self, element: &E) {
        if let SetDomain::Elements(s, _) = self {
            s.remove(element);
        }
    }

    pub fn size(&self) -> Result<usize> {
        match self {
            SetDomain::Elements(s, _) => Ok(s.len()),
            SetDomain::Top => Err(Error::undefined_operation("size of top set")),
        }
    }
}

impl<E, S: SetRepr<E>> AbstractValue for SetDomain<E, S> {
    fn is_top(&self) -> bool {
        matches!(self, SetDomain::Top)
    }

    fn leq(&self, other: &Self) -> bool {
        match (self, other) {
            (_, SetDomain::Top) => true,
            (SetDomain::Top, _) => false,
            (SetDomain::Elements(a, _), SetDomain::Elements(b, _)) => a.is_subset_of(b),
        }
    }

    fn equals(&self, other: &Self) -> bool {
        match (self, other) {
            (SetDomain::Top, SetDomain::Top) => true,
            (SetDomain::Elements(a, _), SetDomain::Elements(b, _)) => a.equals(b),
            _ => false,
        }
    }

    fn kind(&self) -> ValueKind {
        match self {
            SetDomain::Top => ValueKind::Top,
            SetDomain::Elements(s, _) if s.is_empty() => ValueKind::Bottom,
            SetDomain::Elements(..) => ValueKind::Value,
        }
    }

    fn join_with(&mut self, other: &Self) {
        match (&mut *self, other) {
            (SetDomain::Top, _) => {}
            (_, SetDomain::Top) => *self = SetDomain::Top,
            (SetDomain::Elements(a, _), SetDomain::Elements(b, _)) => a.union_with(b),
        }
    }

    fn meet_with(&mut self, other: &Self) {
        match (&mut *self, other) {
            (_, SetDomain::Top) => {}
            (SetDomain::Top, _) => *self = other.clone(),
            (SetDomain::Elements(a, _), SetDomain::Elements(b, _)) => a.intersection_with(b),
        }
    }

    fn clear(&mut self) {
        *self = SetDomain::elements_set(S::new());
    }
}

impl<E, S: SetRepr<E>> AbstractDomain for SetDomain<E, S> {
    fn bottom() -> Self {
        SetDomain::elements_set(S::new())
    }

    fn top() -> Self {
        SetDomain::Top
    }

    fn is_bottom(&self) -> bool {
        matches!(self, SetDomain::Elements(s, _) if s.is_empty())
    }
}

/// A flat-sorted-vector powerset specialization, fixed-capacity: once the
/// set would exceed `cap` elements it collapses to top rather than growing
/// further, which is what makes it safe to use on lattices of unbounded
/// height (the plain [`SetDomain`] above has no such cap and is only safe
/// to widen over a finite element universe, per spec.md §4.E).
#[derive(Clone, Debug)]
pub struct SmallSortedSetDomain<E: Ord + Clone> {
    cap: usize,
    state: SmallSortedSetState<E>,
}

#[derive(Clone, Debug)]
enum SmallSortedSetState<E> {
    Top,
    Elements(Vec<E>),
}

impl<E: Ord + Clone> SmallSortedSetDomain<E> {
    pub fn empty(cap: usize) -> Self {
        SmallSortedSetDomain {
            cap,
            state: SmallSortedSetState::Elements(Vec::new()),
        }
    }

    fn collapse_if_over_cap(&mut self) {
        if let SmallSortedSetState::Elements(v) = &self.state {
            if v.len() > self.cap {
                self.state = SmallSortedSetState::Top;
            }
        }
    }

    pub fn add(&mut self, element: E) {
        if let SmallSortedSetState::Elements(v) = &mut self.state {
            if let Err(pos) = v.binary_search(&element) {
                v.insert(pos, element);
            }
        }
        self.collapse_if_over_cap();
    }

    pub fn elements(&self) -> Result<&[E]> {
        match &self.state {
            SmallSortedSetState::Elements(v) => Ok(v),
            SmallSortedSetState::Top => Err(Error::undefined_operation("elements of top set")),
        }
    }
}

impl<E: Ord + Clone> AbstractValue for SmallSortedSetDomain<E> {
    fn is_top(&self) -> bool {
        matches!(self.state, SmallSortedSetState::Top)
    }

    fn leq(&self, other: &Self) -> bool {
        match (&self.state, &other.state) {
            (_, SmallSortedSetState::Top) => true,
            (SmallSortedSetState::Top, _) => false,
            (SmallSortedSetState::Elements(a), SmallSortedSetState::Elements(b)) => {
                a.iter().all(|e| b.binary_search(e).is_ok())
            }
        }
    }

    fn kind(&self) -> ValueKind {
        match &self.state {
            SmallSortedSetState::Top => ValueKind::Top,
            SmallSortedSetState::Elements(v) if v.is_empty() => ValueKind::Bottom,
            SmallSortedSetState::Elements(_) => ValueKind::Value,
        }
    }

    fn join_with(&mut self, other: &Self) {
        match (&mut self.state, &other.state) {
            (SmallSortedSetState::Top, _) => {}
            (_, SmallSortedSetState::Top) => self.state = SmallSortedSetState::Top,
            (SmallSortedSetState::Elements(a), SmallSortedSetState::Elements(b)) => {
                *a = merge_sorted(a, b);
            }
        }
        self.collapse_if_over_cap();
    }

    fn meet_with(&mut self, other: &Self) {
        match (&mut self.state, &other.state) {
            (_, SmallSortedSetState::Top) => {}
            (SmallSortedSetState::Top, _) => self.state = other.state.clone(),
            (SmallSortedSetState::Elements(a), SmallSortedSetState::Elements(b)) => {
                a.retain(|e| b.binary_search(e).is_ok());
            }
        }
    }

    fn clear(&mut self) {
        self.state = SmallSortedSetState::Elements(Vec::new());
    }
}

fn merge_sorted<E: Ord + Clone>(a: &[E], b: &[E]) -> Vec<E> {
    let mut result = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => {
                result.push(a[i].clone());
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                result.push(b[j].clone());
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                result.push(a[i].clone());
                i += 1;
                j += 1;
            }
        }
    }
    result.extend_from_slice(&a[i..]);
    result.extend_from_slice(&b[j..]);
    result
}

/// The sparse-set trick: a dense array of present elements plus a sparse
/// index table mapping each possible element back to its slot in the dense
/// array, giving O(1) `contains`/`insert`/`remove` over a small universe
/// `0..universe_size` at the cost of `O(universe_size)` storage.
#[derive(Clone, Debug)]
struct SparseSet {
    universe_size: usize,
    dense: Vec<usize>,
    sparse: Vec<usize>,
}

impl SparseSet {
    fn new(universe_size: usize) -> Self {
        SparseSet {
            universe_size,
            dense: Vec::new(),
            sparse: vec![0; universe_size],
        }
    }

    fn contains(&self, element: usize) -> bool {
        element < self.universe_size
            && self.sparse[element] < self.dense.len()
            && self.dense[self.sparse[element]] == element
    }

    /// Returns `false` without mutating anything if `element` falls outside
    /// `0..universe_size`, letting the caller decide how to treat overflow.
    fn insert(&mut self, element: usize) -> bool {
        if element >= self.universe_size {
            return false;
        }
        if !self.contains(element) {
            self.sparse[element] = self.dense.len();
            self.dense.push(element);
        }
        true
    }

    fn remove(&mut self, element: usize) {
        if !self.contains(element) {
            return;
        }
        let pos = self.sparse[element];
        let last = *self.dense.last().unwrap();
        self.dense[pos] = last;
        self.sparse[last] = pos;
        self.dense.pop();
    }

    fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.dense.iter().copied()
    }
}

#[derive(Clone, Debug)]
enum SparseSetState {
    Top,
    Set(SparseSet),
}

/// A powerset domain over a small bounded universe `0..universe_size`,
/// backed by [`SparseSet`]. The cardinality bound is fixed at construction
/// (a universe size of zero is rejected there); a later `add` of an element
/// outside the universe collapses the whole domain to top rather than
/// panicking or silently dropping the element, mirroring how
/// [`SmallSortedSetDomain`] collapses to top on an element-count overflow.
#[derive(Clone, Debug)]
pub struct SparseSetAbstractDomain {
    state: SparseSetState,
}

impl SparseSetAbstractDomain {
    pub fn new(universe_size: usize) -> Result<Self> {
        if universe_size == 0 {
            return Err(Error::invalid_argument(
                "sparse-set universe size must be at least 1",
            ));
        }
        Ok(SparseSetAbstractDomain {
            state: SparseSetState::Set(SparseSet::new(universe_size)),
        })
    }

    pub fn add(&mut self, element: usize) {
        if let SparseSetState::Set(s) = &mut self.state {
            if !s.insert(element) {
                self.state = SparseSetState::Top;
            }
        }
    }

    pub fn remove(&mut self, element: usize) {
        if let SparseSetState::Set(s) = &mut self.state {
            s.remove(element);
        }
    }

    pub fn contains(&self, element: usize) -> bool {
        match &self.state {
            SparseSetState::Top => true,
            SparseSetState::Set(s) => s.contains(element),
        }
    }

    /// The set's elements in ascending order. Undefined for top, since top
    /// has no finite element listing.
    pub fn elements(&self) -> Result<Vec<usize>> {
        match &self.state {
            SparseSetState::Top => Err(Error::undefined_operation("elements of top sparse set")),
            SparseSetState::Set(s) => {
                let mut v: Vec<usize> = s.iter().collect();
                v.sort_unstable();
                Ok(v)
            }
        }
    }
}

impl std::fmt::Display for SparseSetAbstractDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.state {
            SparseSetState::Top => write!(f, "T"),
            SparseSetState::Set(s) => {
                write!(f, "[#{}]{{", s.dense.len())?;
                let mut elements: Vec<usize> = s.iter().collect();
                elements.sort_unstable();
                let mut first = true;
                for e in elements {
                    if !first {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", e)?;
                    first = false;
                }
                write!(f, "}}")
            }
        }
    }
}

impl AbstractValue for SparseSetAbstractDomain {
    fn is_top(&self) -> bool {
        matches!(self.state, SparseSetState::Top)
    }

    fn leq(&self, other: &Self) -> bool {
        match (&self.state, &other.state) {
            (_, SparseSetState::Top) => true,
            (SparseSetState::Top, _) => false,
            (SparseSetState::Set(a), SparseSetState::Set(b)) => a.iter().all(|e| b.contains(e)),
        }
    }

    fn kind(&self) -> ValueKind {
        match &self.state {
            SparseSetState::Top => ValueKind::Top,
            SparseSetState::Set(s) if s.dense.is_empty() => ValueKind::Bottom,
            SparseSetState::Set(_) => ValueKind::Value,
        }
    }

    fn join_with(&mut self, other: &Self) {
        match (&self.state, &other.state) {
            (SparseSetState::Top, _) => {}
            (_, SparseSetState::Top) => self.state = SparseSetState::Top,
            (SparseSetState::Set(a), SparseSetState::Set(b)) => {
                let universe = a.universe_size.max(b.universe_size);
                let mut merged = SparseSet::new(universe);
                for e in a.iter() {
                    merged.insert(e);
                }
                for e in b.iter() {
                    merged.insert(e);
                }
                self.state = SparseSetState::Set(merged);
            }
        }
    }

    fn meet_with(&mut self, other: &Self) {
        match (&self.state, &other.state) {
            (_, SparseSetState::Top) => {}
            (SparseSetState::Top, _) => self.state = other.state.clone(),
            (SparseSetState::Set(a), SparseSetState::Set(b)) => {
                let universe = a.universe_size.max(b.universe_size);
                let mut result = SparseSet::new(universe);
                for e in a.iter() {
                    if b.contains(e) {
                        result.insert(e);
                    }
                }
                self.state = SparseSetState::Set(result);
            }
        }
    }

    fn clear(&mut self) {
        self.state = SparseSetState::Set(SparseSet::new(0));
    }
}

impl AbstractDomain for SparseSetAbstractDomain {
    fn bottom() -> Self {
        SparseSetAbstractDomain {
            state: SparseSetState::Set(SparseSet::new(0)),
        }
    }

    fn top() -> Self {
        SparseSetAbstractDomain {
            state: SparseSetState::Top,
        }
    }

    fn is_bottom(&self) -> bool {
        matches!(&self.state, SparseSetState::Set(s) if s.dense.is_empty())
    }
}

/// A product of two set values `under ⊑ over`, tracking both an
/// over-approximation and an under-approximation of the same quantity.
/// Maintains the invariant that `over` is empty iff `under` is empty.
#[derive(Clone, Debug)]
pub struct OverUnderSetDomain<E, S: SetRepr<E>> {
    over: SetDomain<E, S>,
    under: SetDomain<E, S>,
}

impl<E: Clone, S: SetRepr<E>> OverUnderSetDomain<E, S> {
    pub fn new(over: SetDomain<E, S>, under: SetDomain<E, S>) -> Self {
        let mut domain = OverUnderSetDomain { over, under };
        domain.restore_invariant();
        domain
    }

    fn restore_invariant(&mut self) {
        let over_empty = matches!(&self.over, SetDomain::Elements(s, _) if s.is_empty());
        if over_empty {
            self.under = SetDomain::bottom();
        }
    }

    pub fn over(&self) -> &SetDomain<E, S> {
        &self.over
    }

    pub fn under(&self) -> &SetDomain<E, S> {
        &self.under
    }

    pub fn is_top(&self) -> bool {
        self.over.is_top()
    }

    pub fn is_bottom(&self) -> bool {
        AbstractDomain::is_bottom(&self.over)
    }

    pub fn join_with(&mut self, other: &Self) {
        self.over.join_with(&other.over);
        self.under.meet_with(&other.under);
        self.restore_invariant();
    }

    pub fn meet_with(&mut self, other: &Self) {
        self.over.meet_with(&other.over);
        self.under.join_with(&other.under);
        self.restore_invariant();
    }

    /// Widening drops the under-set, reflecting that only the over-set is
    /// guaranteed monotonic across iterations (spec.md §4.E).
    pub fn widen_with(&mut self, other: &Self) {
        self.over.widen_with(&other.over);
        self.under = SetDomain::bottom();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trie_set_domain_union_and_intersection() {
        let mut a: SetDomain<u32, TrieSet<u32>> =
            SetDomain::elements_set([1u32, 2, 3].into_iter().collect());
        let b: SetDomain<u32, TrieSet<u32>> =
            SetDomain::elements_set([2u32, 3, 4].into_iter().collect());

        let joined = a.join(&b);
        assert_eq!(joined.size().unwrap(), 4);

        a.meet_with(&b);
        assert_eq!(a.size().unwrap(), 2);
        assert!(a.contains(&2) && a.contains(&3));
    }

    #[test]
    fn empty_set_is_bottom() {
        let empty: SetDomain<u32, TrieSet<u32>> = SetDomain::bottom();
        assert!(AbstractDomain::is_bottom(&empty));
        assert!(matches!(empty.kind(), ValueKind::Bottom));
    }

    #[test]
    fn top_absorbs_union() {
        let top: SetDomain<u32, TrieSet<u32>> = SetDomain::top();
        let some: SetDomain<u32, TrieSet<u32>> =
            SetDomain::elements_set([1u32].into_iter().collect());
        assert!(top.join(&some).is_top());
    }

    #[test]
    fn hash_set_domain_behaves_like_trie_set_domain() {
        let mut a: SetDomain<&'static str, HashSet<&'static str>> =
            SetDomain::elements_set(["a", "b"].into_iter().fold(HashSet::new(), |mut s, e| {
                s.insert(e);
                s
            }));
        let b: SetDomain<&'static str, HashSet<&'static str>> =
            SetDomain::elements_set(["b", "c"].into_iter().fold(HashSet::new(), |mut s, e| {
                s.insert(e);
                s
            }));
        a.join_with(&b);
        assert_eq!(a.size().unwrap(), 3);
    }

    #[test]
    fn small_sorted_set_collapses_to_top_on_overflow() {
        let mut s: SmallSortedSetDomain<u32> = SmallSortedSetDomain::empty(2);
        s.add(1);
        s.add(2);
        assert!(!s.is_top());
        s.add(3);
        assert!(s.is_top());
    }

    #[test]
    fn sparse_set_rejects_zero_universe() {
        assert!(SparseSetAbstractDomain::new(0).is_err());
    }

    #[test]
    fn sparse_set_lattice_operations() {
        let mut e1 = SparseSetAbstractDomain::new(16).unwrap();
        e1.add(1);
        let mut e2 = SparseSetAbstractDomain::new(16).unwrap();
        e2.add(1);
        e2.add(2);
        e2.add(3);
        let mut e3 = SparseSetAbstractDomain::new(16).unwrap();
        e3.add(2);
        e3.add(3);
        e3.add(4);

        assert_eq!(e1.elements().unwrap(), vec![1]);
        assert_eq!(e2.elements().unwrap(), vec![1, 2, 3]);
        assert_eq!(e3.elements().unwrap(), vec![2, 3, 4]);
        assert_eq!(format!("{}", e1), "[#1]{1}");

        let bottom: SparseSetAbstractDomain = AbstractDomain::bottom();
        let top: SparseSetAbstractDomain = AbstractDomain::top();
        assert!(bottom.leq(&top));
        assert!(!top.leq(&bottom));
        assert!(!e2.is_top());
        assert!(!AbstractDomain::is_bottom(&e2));

        assert!(e1.leq(&e2));
        assert!(!e1.leq(&e3));

        assert_eq!(e2.join(&e3).elements().unwrap(), vec![1, 2, 3, 4]);
        assert!(e1.join(&e2).equals(&e2));
        assert!(e2.join(&bottom).equals(&e2));
        assert!(e2.join(&top).is_top());
        assert!(e1.widening(&e2).equals(&e2));

        assert_eq!(e2.meet(&e3).elements().unwrap(), vec![2, 3]);
        assert!(e1.meet(&e2).equals(&e1));
        assert!(AbstractDomain::is_bottom(&e2.meet(&bottom)));
        assert!(e2.meet(&top).equals(&e2));
        assert!(e1.narrowing(&e2).equals(&e1));

        assert!(e2.contains(1));
        assert!(!e3.contains(1));
    }

    #[test]
    fn sparse_set_add_outside_universe_collapses_to_top() {
        let mut s = SparseSetAbstractDomain::new(4).unwrap();
        s.add(1);
        assert!(!s.is_top());
        s.add(10);
        assert!(s.is_top());
    }

    #[test]
    fn sparse_set_remove_is_pointwise() {
        let mut s = SparseSetAbstractDomain::new(8).unwrap();
        s.add(1);
        s.add(2);
        s.add(3);
        s.remove(2);
        assert_eq!(s.elements().unwrap(), vec![1, 3]);
    }

    #[test]
    fn over_under_invariant_collapses_under_when_over_empties() {
        let over: SetDomain<u32, TrieSet<u32>> = SetDomain::bottom();
        let under: SetDomain<u32, TrieSet<u32>> =
            SetDomain::elements_set([1u32].into_iter().collect());
        let domain = OverUnderSetDomain::new(over, under);
        assert!(AbstractDomain::is_bottom(domain.under()));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn set_of(elements: Vec<u32>) -> SetDomain<u32, TrieSet<u32>> {
        SetDomain::elements_set(elements.into_iter().collect())
    }

    #[quickcheck]
    fn set_domain_join_is_commutative(a: Vec<u32>, b: Vec<u32>) -> bool {
        let a = set_of(a);
        let b = set_of(b);
        a.join(&b).equals(&b.join(&a))
    }

    #[quickcheck]
    fn set_domain_join_is_an_upper_bound(a: Vec<u32>, b: Vec<u32>) -> bool {
        let a = set_of(a);
        let b = set_of(b);
        let joined = a.join(&b);
        a.leq(&joined) && b.leq(&joined)
    }
}
