//! Map-based **partition**: label → domain element, absent bindings default
//! to bottom. Grounded on `HashedAbstractPartition.h`.

use abslat_value::AbstractDomain;

use crate::map_repr::MapRepr;

/// `{label → D}`, absent labels read as `D::bottom()`. Once a partition is
/// explicitly promoted to top, it refuses further bindings — a deliberate
/// simplification of the top element, per spec.md §4.F.
#[derive(Clone, Debug)]
pub struct Partition<K, D, M: MapRepr<K, D>>
where
    K: Copy,
    D: AbstractDomain,
{
    // `None` once the partition has been explicitly absorbed to top.
    bindings: Option<M>,
    _marker: std::marker::PhantomData<(K, D)>,
}

impl<K, D, M> Partition<K, D, M>
where
    K: Copy,
    D: AbstractDomain,
    M: MapRepr<K, D>,
{
    pub fn bottom() -> Self {
        Partition {
            bindings: Some(M::new()),
            _marker: std::marker::PhantomData,
        }
    }

    pub fn top() -> Self {
        Partition {
            bindings: None,
            _marker: std::marker::PhantomData,
        }
    }

    /// A partition is bottom iff every explicit binding is bottom (or the
    /// map is empty); it does not need a separate sentinel the way
    /// `Environment` does, since the all-bottom map already *is* bottom.
    pub fn is_bottom(&self) -> bool {
        match &self.bindings {
            None => false,
            Some(m) => m.bindings().into_iter().all(|(_, d)| AbstractDomain::is_bottom(d)),
        }
    }

    pub fn is_top(&self) -> bool {
        self.bindings.is_none()
    }

    pub fn get(&self, l: &K) -> D {
        match &self.bindings {
            None => D::top(),
            Some(m) => m.get(l).cloned().unwrap_or_else(D::bottom),
        }
    }

    /// No-op if the partition is already top; erases the binding if `d` is
    /// bottom (keeping the map sparse); otherwise stores `d`.
    pub fn set(&mut self, l: K, d: D) {
        let m = match &mut self.bindings {
            None => return,
            Some(m) => m,
        };
        if AbstractDomain::is_bottom(&d) {
            m.erase(&l);
        } else {
            m.set(l, d);
        }
    }

    pub fn update<F: FnOnce(D) -> D>(&mut self, l: K, f: F) {
        if self.is_top() {
            return;
        }
        let updated = f(self.get(&l));
        self.set(l, updated);
    }

    pub fn set_to_top(&mut self) {
        self.bindings = None;
    }

    pub fn leq(&self, other: &Self) -> bool {
        match (&self.bindings, &other.bindings) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(self_m), Some(_)) => self_m
                .bindings()
                .into_iter()
                .all(|(l, d)| d.leq(&other.get(&l))),
        }
    }

    pub fn equals(&self, other: &Self) -> bool {
        self.leq(other) && other.leq(self)
    }

    /// Top absorbs: joining with a top partition (or joining a top
    /// partition with anything) yields top.
    pub fn join_with(&mut self, other: &Self) {
        match (&self.bindings, &other.bindings) {
            (None, _) | (_, None) => self.bindings = None,
            (Some(self_m), Some(other_m)) => {
                let keys: Vec<K> = self_m
                    .bindings()
                    .into_iter()
                    .map(|(k, _)| k)
                    .chain(other_m.bindings().into_iter().map(|(k, _)| k))
                    .collect();
                let mut new_map = M::new();
                for l in keys {
                    let joined = self.get(&l).join(&other.get(&l));
                    if !AbstractDomain::is_bottom(&joined) {
                        new_map.set(l, joined);
                    }
                }
                self.bindings = Some(new_map);
            }
        }
    }

    /// Pointwise meet; labels absent on either side stay bottom (meeting
    /// bottom with anything is bottom, so they're simply never stored).
    pub fn meet_with(&mut self, other: &Self) {
        match (&self.bindings, &other.bindings) {
            (None, _) => *self = other.clone(),
            (_, None) => {}
            (Some(self_m), Some(_)) => {
                let keys: Vec<K> = self_m.bindings().into_iter().map(|(k, _)| k).collect();
                let mut new_map = M::new();
                for l in keys {
                    let met = self.get(&l).meet(&other.get(&l));
                    if !AbstractDomain::is_bottom(&met) {
                        new_map.set(l, met);
                    }
                }
                self.bindings = Some(new_map);
            }
        }
    }

    pub fn widen_with(&mut self, other: &Self) {
        match (&self.bindings, &other.bindings) {
            (None, _) | (_, None) => self.bindings = None,
            (Some(self_m), Some(other_m)) => {
                let keys: Vec<K> = self_m
                    .bindings()
                    .into_iter()
                    .map(|(k, _)| k)
                    .chain(other_m.bindings().into_iter().map(|(k, _)| k))
                    .collect();
                let mut new_map = M::new();
                for l in keys {
                    let widened = self.get(&l).widening(&other.get(&l));
                    if !AbstractDomain::is_bottom(&widened) {
                        new_map.set(l, widened);
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

    type IntervalPartition =
        Partition<u32, IntervalDomain<i32>, HashMapRepr<u32, IntervalDomain<i32>>>;

    #[test]
    fn unbound_label_reads_as_bottom() {
        let p: IntervalPartition = Partition::bottom();
        assert!(AbstractDomain::is_bottom(&p.get(&0)));
    }

    #[test]
    fn top_refuses_further_bindings() {
        let mut p: IntervalPartition = Partition::top();
        p.set(0, IntervalDomain::finite(1, 2));
        assert!(p.is_top());
        assert!(p.get(&0).is_top());
    }

    #[test]
    fn is_bottom_when_every_binding_is_bottom() {
        let mut p: IntervalPartition = Partition::bottom();
        p.set(0, IntervalDomain::bottom());
        assert!(p.is_bottom());
    }

    #[test]
    fn join_with_top_absorbs() {
        let mut p: IntervalPartition = Partition::bottom();
        p.set(0, IntervalDomain::finite(1, 2));
        let top: IntervalPartition = Partition::top();
        p.join_with(&top);
        assert!(p.is_top());
    }
}
