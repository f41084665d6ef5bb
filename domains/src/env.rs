//! Map-based **environment**: variable → domain element, absent bindings
//! default to top. Grounded on `HashedAbstractEnvironment.h`: to keep the
//! underlying map small, a binding is only ever stored when its value is
//! neither bottom-absorbing-the-whole-environment nor top.

use abslat_value::AbstractDomain;

use crate::map_repr::MapRepr;

/// `{variable → D}`, absent variables read as `D::top()`. Assigning
/// `D::bottom()` to any variable collapses the whole environment to bottom
/// (spec.md §4.F / §3): from that point on every `get` returns bottom and
/// every mutation is a no-op, mirroring an `AbstractDomain`'s own absorbing
/// bottom.
#[derive(Clone, Debug)]
pub struct Environment<K, D, M: MapRepr<K, D>>
where
    K: Copy,
    D: AbstractDomain,
{
    // `None` once the whole environment has collapsed to bottom.
    bindings: Option<M>,
    _marker: std::marker::PhantomData<(K, D)>,
}

impl<K, D, M> Environment<K, D, M>
where
    K: Copy,
    D: AbstractDomain,
    M: MapRepr<K, D>,
{
    pub fn top() -> Self {
        Environment {
            bindings: Some(M::new()),
            _marker: std::marker::PhantomData,
        }
    }

    pub fn bottom() -> Self {
        Environment {
            bindings: None,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn is_bottom(&self) -> bool {
        self.bindings.is_none()
    }

    pub fn is_top(&self) -> bool {
        matches!(&self.bindings, Some(m) if m.is_empty())
    }

    /// The binding for `v`, or `top()` if `v` is unbound (or the whole
    /// environment is bottom — conventionally reported as bottom instead,
    /// since every variable reads as bottom once the environment is).
    pub fn get(&self, v: &K) -> D {
        match &self.bindings {
            None => D::bottom(),
            Some(m) => m.get(v).cloned().unwrap_or_else(D::top),
        }
    }

    /// `d == bottom` collapses the whole environment; `d == top` erases the
    /// binding (keeping the map sparse); otherwise stores `d`.
    pub fn set(&mut self, v: K, d: D) {
        if self.is_bottom() {
            return;
        }
        if AbstractDomain::is_bottom(&d) {
            self.bindings = None;
            return;
        }
        let m = self.bindings.as_mut().unwrap();
        if d.is_top() {
            m.erase(&v);
        } else {
            m.set(v, d);
        }
    }

    pub fn update<F: FnOnce(D) -> D>(&mut self, v: K, f: F) {
        if self.is_bottom() {
            return;
        }
        let updated = f(self.get(&v));
        self.set(v, updated);
    }

    pub fn leq(&self, other: &Self) -> bool {
        match (&self.bindings, &other.bindings) {
            (None, _) => true,
            (_, None) => false,
            (Some(_), Some(other_m)) => other_m
                .bindings()
                .into_iter()
                .all(|(v, d)| self.get(&v).leq(d)),
        }
    }

    pub fn equals(&self, other: &Self) -> bool {
        self.leq(other) && other.leq(self)
    }

    pub fn join_with(&mut self, other: &Self) {
        match (&self.bindings, &other.bindings) {
            (None, _) => *self = other.clone(),
            (_, None) => {}
            (Some(_), Some(other_m)) => {
                let keys: Vec<K> = self
                    .bindings
                    .as_ref()
                    .unwrap()
                    .bindings()
                    .into_iter()
                    .map(|(k, _)| k)
                    .chain(other_m.bindings().into_iter().map(|(k, _)| k))
                    .collect();
                let mut new_map = M::new();
                for v in keys {
                    let joined = self.get(&v).join(&other.get(&v));
                    if !joined.is_top() {
                        new_map.set(v, joined);
                    }
                }
                self.bindings = Some(new_map);
            }
        }
    }

    pub fn meet_with(&mut self, other: &Self) {
        if self.is_bottom() || other.is_bottom() {
            self.bindings = None;
            return;
        }
        let self_m = self.bindings.as_ref().unwrap();
        let other_m = other.bindings.as_ref().unwrap();
        let keys: Vec<K> = self_m
            .bindings()
            .into_iter()
            .map(|(k, _)| k)
            .chain(other_m.bindings().into_iter().map(|(k, _)| k))
            .collect();
        let mut new_map = M::new();
        let mut collapsed = false;
        for v in keys {
            let met = self.get(&v).meet(&other.get(&v));
            if AbstractDomain::is_bottom(&met) {
                collapsed = true;
                break;
            }
            if !met.is_top() {
                new_map.set(v, met);
            }
        }
        self.bindings = if collapsed { None } else { Some(new_map) };
    }

    pub fn widen_with(&mut self, other: &Self) {
        match (&self.bindings, &other.bindings) {
            (None, _) => *self = other.clone(),
            (_, None) => {}
            (Some(_), Some(other_m)) => {
                let keys: Vec<K> = other_m.bindings().into_iter().map(|(k, _)| k).collect();
                let mut new_map = M::new();
                for v in keys {
                    let widened = self.get(&v).widening(&other.get(&v));
                    if !widened.is_top() {
                        new_map.set(v, widened);
                    }
                }
                self.bindings = Some(new_map);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_repr::HashMapRepr;
    use crate::scalar::IntervalDomain;
    use pretty_assertions::assert_eq;

    type IntervalEnv = Environment<u32, IntervalDomain<i32>, HashMapRepr<u32, IntervalDomain<i32>>>;

    #[test]
    fn unbound_variable_reads_as_top() {
        let e: IntervalEnv = Environment::top();
        assert!(e.get(&0).is_top());
    }

    #[test]
    fn setting_bottom_collapses_environment() {
        let mut e: IntervalEnv = Environment::top();
        e.set(0, IntervalDomain::finite(1, 2));
        e.set(1, IntervalDomain::bottom());
        assert!(e.is_bottom());
        assert!(AbstractDomain::is_bottom(&e.get(&0)));
    }

    #[test]
    fn join_with_absent_binding_yields_top() {
        let mut a: IntervalEnv = Environment::top();
        a.set(0, IntervalDomain::finite(1, 2));
        let b: IntervalEnv = Environment::top();
        a.join_with(&b);
        assert!(a.get(&0).is_top());
    }

    #[test]
    fn join_of_two_bound_variables_widens_to_their_hull() {
        let mut a: IntervalEnv = Environment::top();
        a.set(0, IntervalDomain::finite(1, 2));
        let mut b: IntervalEnv = Environment::top();
        b.set(0, IntervalDomain::finite(5, 9));
        a.join_with(&b);
        assert_eq!(a.get(&0).bounds().unwrap(), (1, 9));
    }
}
