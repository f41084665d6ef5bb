//! Constant, interval, lifted, finite, and disjoint-union scalar domains
//! (spec.md §4.G).

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use num_traits::{Bounded, SaturatingAdd};

use abslat_value::{AbstractDomain, AbstractValue, Error, Result, ValueKind};

// ---------------------------------------------------------------------
// Constant domain
// ---------------------------------------------------------------------

/// A four-point lattice `{⊥, c (for each c ∈ T), ⊤}` over an equality-typed
/// constant.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstantDomain<T: Clone + PartialEq> {
    Bottom,
    Constant(T),
    Top,
}

impl<T: Clone + PartialEq> ConstantDomain<T> {
    pub fn constant(value: T) -> Self {
        ConstantDomain::Constant(value)
    }

    pub fn value(&self) -> Result<&T> {
        match self {
            ConstantDomain::Constant(v) => Ok(v),
            ConstantDomain::Bottom => Err(Error::undefined_operation("constant of bottom")),
            ConstantDomain::Top => Err(Error::undefined_operation("constant of top")),
        }
    }
}

impl<T: Clone + PartialEq> AbstractValue for ConstantDomain<T> {
    fn is_top(&self) -> bool {
        matches!(self, ConstantDomain::Top)
    }

    fn leq(&self, other: &Self) -> bool {
        match (self, other) {
            (ConstantDomain::Bottom, _) => true,
            (_, ConstantDomain::Top) => true,
            (ConstantDomain::Constant(a), ConstantDomain::Constant(b)) => a == b,
            _ => false,
        }
    }

    fn kind(&self) -> ValueKind {
        match self {
            ConstantDomain::Bottom => ValueKind::Bottom,
            ConstantDomain::Constant(_) => ValueKind::Value,
            ConstantDomain::Top => ValueKind::Top,
        }
    }

    fn join_with(&mut self, other: &Self) {
        *self = match (&self, other) {
            (ConstantDomain::Bottom, _) => other.clone(),
            (_, ConstantDomain::Bottom) => self.clone(),
            (ConstantDomain::Top, _) | (_, ConstantDomain::Top) => ConstantDomain::Top,
            (ConstantDomain::Constant(a), ConstantDomain::Constant(b)) => {
                if a == b {
                    ConstantDomain::Constant(a.clone())
                } else {
                    ConstantDomain::Top
                }
            }
        };
    }

    fn meet_with(&mut self, other: &Self) {
        *self = match (&self, other) {
            (ConstantDomain::Top, _) => other.clone(),
            (_, ConstantDomain::Top) => self.clone(),
            (ConstantDomain::Bottom, _) | (_, ConstantDomain::Bottom) => ConstantDomain::Bottom,
            (ConstantDomain::Constant(a), ConstantDomain::Constant(b)) => {
                if a == b {
                    ConstantDomain::Constant(a.clone())
                } else {
                    ConstantDomain::Bottom
                }
            }
        };
    }

    fn clear(&mut self) {
        *self = ConstantDomain::Bottom;
    }
}

impl<T: Clone + PartialEq> AbstractDomain for ConstantDomain<T> {
    fn bottom() -> Self {
        ConstantDomain::Bottom
    }
    fn top() -> Self {
        ConstantDomain::Top
    }
    fn is_bottom(&self) -> bool {
        matches!(self, ConstantDomain::Bottom)
    }
}

// ---------------------------------------------------------------------
// Interval domain
// ---------------------------------------------------------------------

/// An integer range `[lo, hi]` with saturating sentinels at `I::MIN`/`I::MAX`
/// (spec.md §3/§4.G). `finite`/`bounded_below`/`bounded_above`/`low`/`high`
/// are the named special forms spec.md calls out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntervalDomain<I> {
    Bottom,
    Range { lo: I, hi: I },
}

impl<I: Ord + Copy + Bounded> IntervalDomain<I> {
    pub fn bottom() -> Self {
        IntervalDomain::Bottom
    }

    pub fn finite(a: I, b: I) -> Self {
        if a > b {
            IntervalDomain::Bottom
        } else {
            IntervalDomain::Range { lo: a, hi: b }
        }
    }

    pub fn bounded_below(a: I) -> Self {
        IntervalDomain::Range { lo: a, hi: I::max_value() }
    }

    pub fn bounded_above(b: I) -> Self {
        IntervalDomain::Range { lo: I::min_value(), hi: b }
    }

    pub fn low() -> Self {
        IntervalDomain::Range { lo: I::min_value(), hi: I::min_value() }
    }

    pub fn high() -> Self {
        IntervalDomain::Range { lo: I::max_value(), hi: I::max_value() }
    }

    pub fn top() -> Self {
        IntervalDomain::Range { lo: I::min_value(), hi: I::max_value() }
    }

    pub fn bounds(&self) -> Result<(I, I)> {
        match self {
            IntervalDomain::Range { lo, hi } => Ok((*lo, *hi)),
            IntervalDomain::Bottom => Err(Error::undefined_operation("bounds of bottom interval")),
        }
    }
}

impl<I: Ord + Copy + Bounded + SaturatingAdd> IntervalDomain<I> {
    /// Saturating addition: endpoints that would overflow clamp to
    /// `MIN`/`MAX` rather than wrapping.
    pub fn add(&self, other: &Self) -> Self {
        match (self, other) {
            (IntervalDomain::Bottom, _) | (_, IntervalDomain::Bottom) => IntervalDomain::Bottom,
            (
                IntervalDomain::Range { lo: lo1, hi: hi1 },
                IntervalDomain::Range { lo: lo2, hi: hi2 },
            ) => IntervalDomain::Range {
                lo: lo1.saturating_add(lo2),
                hi: hi1.saturating_add(hi2),
            },
        }
    }
}

impl<I: Ord + Copy + Bounded> AbstractValue for IntervalDomain<I> {
    fn is_top(&self) -> bool {
        matches!(self, IntervalDomain::Range { lo, hi } if *lo == I::min_value() && *hi == I::max_value())
    }

    fn leq(&self, other: &Self) -> bool {
        match (self, other) {
            (IntervalDomain::Bottom, _) => true,
            (_, IntervalDomain::Bottom) => false,
            (
                IntervalDomain::Range { lo: lo1, hi: hi1 },
                IntervalDomain::Range { lo: lo2, hi: hi2 },
            ) => lo2 <= lo1 && hi1 <= hi2,
        }
    }

    fn kind(&self) -> ValueKind {
        match self {
            IntervalDomain::Bottom => ValueKind::Bottom,
            _ if self.is_top() => ValueKind::Top,
            _ => ValueKind::Value,
        }
    }

    fn join_with(&mut self, other: &Self) {
        *self = match (&self, other) {
            (IntervalDomain::Bottom, _) => other.clone(),
            (_, IntervalDomain::Bottom) => self.clone(),
            (
                IntervalDomain::Range { lo: lo1, hi: hi1 },
                IntervalDomain::Range { lo: lo2, hi: hi2 },
            ) => IntervalDomain::Range {
                lo: *lo1.min(lo2),
                hi: *hi1.max(hi2),
            },
        };
    }

    fn meet_with(&mut self, other: &Self) {
        *self = match (&self, other) {
            (IntervalDomain::Bottom, _) | (_, IntervalDomain::Bottom) => IntervalDomain::Bottom,
            (
                IntervalDomain::Range { lo: lo1, hi: hi1 },
                IntervalDomain::Range { lo: lo2, hi: hi2 },
            ) => IntervalDomain::finite(*lo1.max(lo2), *hi1.min(hi2)),
        };
    }

    /// Compare operands; if the right endpoint grew, widen it to
    /// `MAX`; symmetrically for the left (spec.md §4.G).
    fn widen_with(&mut self, other: &Self) {
        *self = match (&self, other) {
            (IntervalDomain::Bottom, _) => other.clone(),
            (_, IntervalDomain::Bottom) => self.clone(),
            (
                IntervalDomain::Range { lo: lo1, hi: hi1 },
                IntervalDomain::Range { lo: lo2, hi: hi2 },
            ) => {
                let lo = if lo2 < lo1 { I::min_value() } else { *lo1 };
                let hi = if hi2 > hi1 { I::max_value() } else { *hi1 };
                IntervalDomain::Range { lo, hi }
            }
        };
    }

    /// Replace `MIN`/`MAX` endpoints with the other operand's
    /// values when those are tighter (spec.md §4.G).
    fn narrow_with(&mut self, other: &Self) {
        *self = match (&self, other) {
            (IntervalDomain::Bottom, _) | (_, IntervalDomain::Bottom) => IntervalDomain::Bottom,
            (
                IntervalDomain::Range { lo: lo1, hi: hi1 },
                IntervalDomain::Range { lo: lo2, hi: hi2 },
            ) => {
                let lo = if *lo1 == I::min_value() { *lo2 } else { *lo1 };
                let hi = if *hi1 == I::max_value() { *hi2 } else { *hi1 };
                IntervalDomain::finite(lo, hi)
            }
        };
    }

    fn clear(&mut self) {
        *self = IntervalDomain::Bottom;
    }
}

impl<I: Ord + Copy + Bounded> AbstractDomain for IntervalDomain<I> {
    fn bottom() -> Self {
        IntervalDomain::Bottom
    }
    fn top() -> Self {
        IntervalDomain::top()
    }
    fn is_bottom(&self) -> bool {
        matches!(self, IntervalDomain::Bottom)
    }
}

impl<I: Ord + Copy + Bounded + std::fmt::Display> std::fmt::Display for IntervalDomain<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntervalDomain::Bottom => write!(f, "_|_"),
            IntervalDomain::Range { lo, hi } => write!(f, "[{},{}]", lo, hi),
        }
    }
}

// ---------------------------------------------------------------------
// Lifted domain
// ---------------------------------------------------------------------

/// Wraps an underlying domain `U`, adding a new bottom strictly below `U`'s
/// own bottom. `lifted(U::bottom())` is distinguished from the new bottom
/// and displays as `*` (spec.md §6); the new bottom displays as `_|_`.
#[derive(Clone, Debug)]
pub enum LiftedDomain<U: AbstractDomain> {
    Bottom,
    Lifted(U),
}

impl<U: AbstractDomain> LiftedDomain<U> {
    pub fn lifted(value: U) -> Self {
        LiftedDomain::Lifted(value)
    }

    pub fn is_lifted(&self) -> bool {
        matches!(self, LiftedDomain::Lifted(_))
    }

    pub fn lowered(&self) -> Result<&U> {
        match self {
            LiftedDomain::Lifted(u) => Ok(u),
            LiftedDomain::Bottom => Err(Error::undefined_operation("lowered() of lifted bottom")),
        }
    }
}

impl<U: AbstractDomain> AbstractValue for LiftedDomain<U> {
    fn is_top(&self) -> bool {
        matches!(self, LiftedDomain::Lifted(u) if u.is_top())
    }

    fn leq(&self, other: &Self) -> bool {
        match (self, other) {
            (LiftedDomain::Bottom, _) => true,
            (_, LiftedDomain::Bottom) => false,
            (LiftedDomain::Lifted(a), LiftedDomain::Lifted(b)) => a.leq(b),
        }
    }

    fn kind(&self) -> ValueKind {
        match self {
            LiftedDomain::Bottom => ValueKind::Bottom,
            LiftedDomain::Lifted(u) if u.is_top() => ValueKind::Top,
            LiftedDomain::Lifted(_) => ValueKind::Value,
        }
    }

    fn join_with(&mut self, other: &Self) {
        match (&mut *self, other) {
            (LiftedDomain::Bottom, _) => *self = other.clone(),
            (_, LiftedDomain::Bottom) => {}
            (LiftedDomain::Lifted(a), LiftedDomain::Lifted(b)) => a.join_with(b),
        }
    }

    fn meet_with(&mut self, other: &Self) {
        match (&mut *self, other) {
            (LiftedDomain::Bottom, _) => {}
            (_, LiftedDomain::Bottom) => *self = LiftedDomain::Bottom,
            (LiftedDomain::Lifted(a), LiftedDomain::Lifted(b)) => a.meet_with(b),
        }
    }

    fn widen_with(&mut self, other: &Self) {
        match (&mut *self, other) {
            (LiftedDomain::Bottom, _) => *self = other.clone(),
            (_, LiftedDomain::Bottom) => {}
            (LiftedDomain::Lifted(a), LiftedDomain::Lifted(b)) => a.widen_with(b),
        }
    }

    fn narrow_with(&mut self, other: &Self) {
        match (&mut *self, other) {
            (LiftedDomain::Bottom, _) => {}
            (_, LiftedDomain::Bottom) => *self = LiftedDomain::Bottom,
            (LiftedDomain::Lifted(a), LiftedDomain::Lifted(b)) => a.narrow_with(b),
        }
    }

    fn clear(&mut self) {
        *self = LiftedDomain::Bottom;
    }
}

impl<U: AbstractDomain> AbstractDomain for LiftedDomain<U> {
    fn bottom() -> Self {
        LiftedDomain::Bottom
    }
    fn top() -> Self {
        LiftedDomain::Lifted(U::top())
    }
    fn is_bottom(&self) -> bool {
        matches!(self, LiftedDomain::Bottom)
    }
}

impl<U: AbstractDomain + std::fmt::Display> std::fmt::Display for LiftedDomain<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiftedDomain::Bottom => write!(f, "_|_"),
            LiftedDomain::Lifted(u) if u.is_top() => write!(f, "T"),
            LiftedDomain::Lifted(u) if AbstractDomain::is_bottom(u) => write!(f, "*"),
            LiftedDomain::Lifted(u) => write!(f, "{}", u),
        }
    }
}

// ---------------------------------------------------------------------
// Finite abstract domain
// ---------------------------------------------------------------------

/// A lattice over a fixed finite set of elements, encoded as a bit-vector:
/// element `e`'s encoding has exactly one bit set at `e`'s height and a mask
/// of bits for every ancestor, so `leq(a,b)` reduces to
/// `encoding(a) & encoding(b) == encoding(a)` (spec.md §4.G).
#[derive(Clone, Debug)]
pub struct FiniteAbstractDomain<E: Eq + Hash + Clone> {
    encodings: std::rc::Rc<HashMap<E, u64>>,
    elements_by_bit: std::rc::Rc<HashMap<u64, E>>,
    state: FiniteState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FiniteState {
    Bottom,
    Encoded(u64),
}

impl<E: Eq + Hash + Clone> FiniteAbstractDomain<E> {
    /// Builds the lattice from its elements and covering edges (`child,
    /// parent` pairs). Rejects malformed lattices: a non-unique minimum, a
    /// non-unique maximum, or more than 63 elements (the bit-vector
    /// encoding's width).
    pub fn new(elements: Vec<E>, covering_edges: Vec<(E, E)>) -> Result<Self> {
        if elements.len() > 63 {
            return Err(Error::invalid_argument(
                "finite lattice has more elements than the bit-vector encoding supports",
            ));
        }
        let mut encodings: HashMap<E, u64> = HashMap::new();
        for (i, e) in elements.iter().enumerate() {
            encodings.insert(e.clone(), 1u64 << i);
        }
        // `encoding(e)` accumulates the bit of every ancestor reachable via
        // covering edges, so `leq` reduces to a bitmask containment test.
        let mut ancestor_bits: HashMap<E, u64> = encodings.clone();
        let mut changed = true;
        while changed {
            changed = false;
            for (child, parent) in &covering_edges {
                let parent_bits = *ancestor_bits.get(parent).unwrap_or(&0);
                let child_bits = ancestor_bits.get(child).copied().unwrap_or(0);
                let merged = child_bits | parent_bits;
                if merged != child_bits {
                    ancestor_bits.insert(child.clone(), merged);
                    changed = true;
                }
            }
        }
        for e in &elements {
            encodings.insert(e.clone(), ancestor_bits[e]);
        }

        let minimums: Vec<&E> = elements
            .iter()
            .filter(|e| !covering_edges.iter().any(|(c, _)| c == *e))
            .collect();
        let maximums: Vec<&E> = elements
            .iter()
            .filter(|e| !covering_edges.iter().any(|(_, p)| p == *e))
            .collect();
        if minimums.len() != 1 {
            return Err(Error::invalid_argument(
                "finite lattice must have a unique minimum element",
            ));
        }
        if maximums.len() != 1 {
            return Err(Error::invalid_argument(
                "finite lattice must have a unique maximum element",
            ));
        }

        let elements_by_bit: HashMap<u64, E> = elements
            .iter()
            .map(|e| (encodings[e], e.clone()))
            .collect();

        let bottom_bits = encodings[minimums[0]];
        Ok(FiniteAbstractDomain {
            encodings: std::rc::Rc::new(encodings),
            elements_by_bit: std::rc::Rc::new(elements_by_bit),
            state: FiniteState::Encoded(bottom_bits),
        })
    }

    pub fn element(&self, e: E) -> Result<Self> {
        let bits = *self
            .encodings
            .get(&e)
            .ok_or_else(|| Error::invalid_argument("element not part of this lattice"))?;
        Ok(FiniteAbstractDomain {
            encodings: self.encodings.clone(),
            elements_by_bit: self.elements_by_bit.clone(),
            state: FiniteState::Encoded(bits),
        })
    }

    pub fn to_element(&self) -> Result<&E> {
        match self.state {
            FiniteState::Bottom => Err(Error::undefined_operation("element of bottom")),
            FiniteState::Encoded(bits) => self
                .elements_by_bit
                .get(&bits)
                .ok_or_else(|| Error::undefined_operation("encoding is a join, not a single element")),
        }
    }

    /// The bottom element of this instance's lattice. Unlike
    /// [`AbstractDomain::bottom`], this is scoped to an already-constructed
    /// lattice rather than conjured from nothing, since which elements and
    /// covering edges exist is a runtime property of [`Self::new`]'s
    /// arguments, not of the type `E` alone.
    pub fn bottom(&self) -> Self {
        FiniteAbstractDomain {
            encodings: self.encodings.clone(),
            elements_by_bit: self.elements_by_bit.clone(),
            state: FiniteState::Bottom,
        }
    }

    /// The top element of this instance's lattice (the bitwise union of
    /// every element's encoding). See [`Self::bottom`] for why this isn't
    /// the parameterless [`AbstractDomain::top`].
    pub fn top(&self) -> Self {
        let top_bits = self.encodings.values().fold(0u64, |acc, b| acc | *b);
        FiniteAbstractDomain {
            encodings: self.encodings.clone(),
            elements_by_bit: self.elements_by_bit.clone(),
            state: FiniteState::Encoded(top_bits),
        }
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self.state, FiniteState::Bottom)
    }
}

impl<E: Eq + Hash + Clone> AbstractValue for FiniteAbstractDomain<E> {
    fn is_top(&self) -> bool {
        match self.state {
            FiniteState::Bottom => false,
            FiniteState::Encoded(bits) => self.encodings.values().all(|b| bits & b == *b),
        }
    }

    fn leq(&self, other: &Self) -> bool {
        match (self.state, other.state) {
            (FiniteState::Bottom, _) => true,
            (_, FiniteState::Bottom) => false,
            (FiniteState::Encoded(a), FiniteState::Encoded(b)) => a & b == a,
        }
    }

    fn kind(&self) -> ValueKind {
        match self.state {
            FiniteState::Bottom => ValueKind::Bottom,
            _ if self.is_top() => ValueKind::Top,
            _ => ValueKind::Value,
        }
    }

    fn join_with(&mut self, other: &Self) {
        self.state = match (self.state, other.state) {
            (FiniteState::Bottom, s) | (s, FiniteState::Bottom) => s,
            (FiniteState::Encoded(a), FiniteState::Encoded(b)) => FiniteState::Encoded(a | b),
        };
    }

    fn meet_with(&mut self, other: &Self) {
        self.state = match (self.state, other.state) {
            (FiniteState::Bottom, _) | (_, FiniteState::Bottom) => FiniteState::Bottom,
            (FiniteState::Encoded(a), FiniteState::Encoded(b)) => FiniteState::Encoded(a & b),
        };
    }

    fn clear(&mut self) {
        self.state = FiniteState::Bottom;
    }
}

// ---------------------------------------------------------------------
// Disjoint-union domain
// ---------------------------------------------------------------------

/// A tagged union over a fixed list of named component domains: exactly one
/// component is active at a time. Top and bottom are shared across
/// components (spec.md §4.G).
#[derive(Clone, Debug)]
pub enum DisjointUnionDomain<Tag: Eq + Hash + Clone, D: AbstractDomain> {
    Bottom,
    Top,
    Active(Tag, D),
}

impl<Tag: Eq + Hash + Clone, D: AbstractDomain> DisjointUnionDomain<Tag, D> {
    pub fn active(tag: Tag, value: D) -> Self {
        DisjointUnionDomain::Active(tag, value)
    }
}

impl<Tag: Eq + Hash + Clone, D: AbstractDomain> AbstractValue for DisjointUnionDomain<Tag, D> {
    fn is_top(&self) -> bool {
        matches!(self, DisjointUnionDomain::Top)
    }

    fn leq(&self, other: &Self) -> bool {
        match (self, other) {
            (DisjointUnionDomain::Bottom, _) => true,
            (_, DisjointUnionDomain::Top) => true,
            (DisjointUnionDomain::Top, _) => false,
            (_, DisjointUnionDomain::Bottom) => false,
            (DisjointUnionDomain::Active(t1, v1), DisjointUnionDomain::Active(t2, v2)) => {
                t1 == t2 && v1.leq(v2)
            }
        }
    }

    fn kind(&self) -> ValueKind {
        match self {
            DisjointUnionDomain::Bottom => ValueKind::Bottom,
            DisjointUnionDomain::Top => ValueKind::Top,
            DisjointUnionDomain::Active(_, _) => ValueKind::Value,
        }
    }

    fn join_with(&mut self, other: &Self) {
        *self = match (&self, other) {
            (DisjointUnionDomain::Bottom, _) => other.clone(),
            (_, DisjointUnionDomain::Bottom) => self.clone(),
            (DisjointUnionDomain::Top, _) | (_, DisjointUnionDomain::Top) => {
                DisjointUnionDomain::Top
            }
            (DisjointUnionDomain::Active(t1, v1), DisjointUnionDomain::Active(t2, v2)) => {
                if t1 == t2 {
                    DisjointUnionDomain::Active(t1.clone(), v1.join(v2))
                } else {
                    DisjointUnionDomain::Top
                }
            }
        };
    }

    fn meet_with(&mut self, other: &Self) {
        *self = match (&self, other) {
            (DisjointUnionDomain::Top, _) => other.clone(),
            (_, DisjointUnionDomain::Top) => self.clone(),
            (DisjointUnionDomain::Bottom, _) | (_, DisjointUnionDomain::Bottom) => {
                DisjointUnionDomain::Bottom
            }
            (DisjointUnionDomain::Active(t1, v1), DisjointUnionDomain::Active(t2, v2)) => {
                if t1 == t2 {
                    DisjointUnionDomain::Active(t1.clone(), v1.meet(v2))
                } else {
                    DisjointUnionDomain::Bottom
                }
            }
        };
    }

    fn clear(&mut self) {
        *self = DisjointUnionDomain::Bottom;
    }
}

impl<Tag: Eq + Hash + Clone, D: AbstractDomain> AbstractDomain for DisjointUnionDomain<Tag, D> {
    fn bottom() -> Self {
        DisjointUnionDomain::Bottom
    }
    fn top() -> Self {
        DisjointUnionDomain::Top
    }
    fn is_bottom(&self) -> bool {
        matches!(self, DisjointUnionDomain::Bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_domain_join_of_unequal_is_top() {
        let a: ConstantDomain<i32> = ConstantDomain::constant(1);
        let b: ConstantDomain<i32> = ConstantDomain::constant(2);
        assert!(a.join(&b).is_top());
        assert!(a.meet(&b).kind() == ValueKind::Bottom);
    }

    #[test]
    fn interval_saturating_add() {
        let a = IntervalDomain::<i32>::bounded_below(i32::MAX - 1);
        let b = IntervalDomain::finite(5, 5);
        let sum = a.add(&b);
        assert_eq!(sum.bounds().unwrap(), (i32::MAX, i32::MAX));
    }

    #[test]
    fn interval_widening_jumps_to_sentinel() {
        let mut a = IntervalDomain::finite(0, 10);
        let b = IntervalDomain::finite(0, 20);
        a.widen_with(&b);
        assert_eq!(a.bounds().unwrap(), (0, i32::MAX));
    }

    #[test]
    fn interval_narrowing_tightens_sentinel() {
        let mut a = IntervalDomain::<i32>::top();
        let b = IntervalDomain::finite(-5, 5);
        a.narrow_with(&b);
        assert_eq!(a.bounds().unwrap(), (-5, 5));
    }

    #[test]
    fn lifted_domain_distinguishes_new_bottom_from_lifted_bottom() {
        type LiftedInterval = LiftedDomain<IntervalDomain<i32>>;
        let new_bottom = LiftedInterval::bottom();
        let lifted_bottom = LiftedInterval::lifted(IntervalDomain::bottom());
        assert!(AbstractDomain::is_bottom(&new_bottom));
        assert!(!AbstractDomain::is_bottom(&lifted_bottom));
        assert!(new_bottom.leq(&lifted_bottom));
        assert_eq!(format!("{}", new_bottom), "_|_");
        assert_eq!(format!("{}", lifted_bottom), "*");
    }

    #[test]
    fn finite_domain_rejects_non_unique_maximum() {
        let result = FiniteAbstractDomain::new(
            vec!["bottom", "a", "b"],
            vec![("a", "bottom"), ("b", "bottom")],
        );
        assert!(result.is_err());
    }

    #[test]
    fn finite_domain_leq_via_bitmask() {
        let lattice =
            FiniteAbstractDomain::new(vec!["bottom", "a", "top"], vec![("a", "bottom"), ("top", "a")])
                .unwrap();
        let a = lattice.element("a").unwrap();
        let top = lattice.element("top").unwrap();
        assert!(a.leq(&top));
        assert!(!top.leq(&a));
    }

    #[test]
    fn disjoint_union_join_of_different_components_is_top() {
        type Tagged = DisjointUnionDomain<&'static str, ConstantDomain<i32>>;
        let a = Tagged::active("int", ConstantDomain::constant(1));
        let b = Tagged::active("str", ConstantDomain::constant(2));
        assert!(a.join(&b).is_top());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn interval_join_is_commutative(a: (i32, i32), b: (i32, i32)) -> bool {
        let (a_lo, a_hi) = (a.0.min(a.1), a.0.max(a.1));
        let (b_lo, b_hi) = (b.0.min(b.1), b.0.max(b.1));
        let a = IntervalDomain::finite(a_lo, a_hi);
        let b = IntervalDomain::finite(b_lo, b_hi);
        a.join(&b).equals(&b.join(&a))
    }

    #[quickcheck]
    fn interval_join_is_an_upper_bound(a: (i32, i32), b: (i32, i32)) -> bool {
        let (a_lo, a_hi) = (a.0.min(a.1), a.0.max(a.1));
        let (b_lo, b_hi) = (b.0.min(b.1), b.0.max(b.1));
        let a = IntervalDomain::finite(a_lo, a_hi);
        let b = IntervalDomain::finite(b_lo, b_hi);
        let joined = a.join(&b);
        a.leq(&joined) && b.leq(&joined)
    }

    #[quickcheck]
    fn constant_domain_leq_is_antisymmetric(a: i32, b: i32) -> bool {
        let a = ConstantDomain::constant(a);
        let b = ConstantDomain::constant(b);
        if a.leq(&b) && b.leq(&a) {
            a.equals(&b)
        } else {
            true
        }
    }
}
