//! Facade over the `abslat` workspace: re-exports every component crate
//! under one name and offers a curated `prelude` for the traits and types
//! most analyses need. Downstream crates are expected to depend on the
//! individual `abslat-*` crates directly when they only need one piece;
//! `abslat` itself exists for callers that want the whole toolkit and for
//! this workspace's own cross-crate integration tests.

pub use abslat_domains as domains;
pub use abslat_posmap as posmap;
pub use abslat_queue as queue;
pub use abslat_trie as trie;
pub use abslat_value as value;
pub use abslat_wto as wto;

/// The traits and types most callers reach for first. Items whose names
/// collide across component crates (`domains::HashSet` vs.
/// `std::collections::HashSet`, for instance) are left out of the prelude
/// and must be named through their owning module.
pub mod prelude {
    pub use abslat_domains::{
        ConstantDomain, DisjointUnionDomain, Environment, FiniteAbstractDomain, IntervalDomain,
        LiftedDomain, OverUnderSetDomain, Partition, SetDomain, SmallSortedSetDomain,
        SparseSetAbstractDomain,
    };
    pub use abslat_posmap::{PositionMap, PositionRecord};
    pub use abslat_queue::{AsyncRunner, ThreadPool, WorkQueue, WorkerState};
    pub use abslat_trie::{PatriciaMap, TrieKey, TrieSet};
    pub use abslat_value::{AbstractDomain, AbstractValue, Error, Result, ValueKind};
    pub use abslat_wto::{Wto, WtoComponent};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use abslat_domains::HashMapRepr;
    use pretty_assertions::assert_eq;

    #[test]
    fn patricia_map_feeds_an_environment_over_interval_domains() {
        type Env = Environment<u64, IntervalDomain<i64>, HashMapRepr<u64, IntervalDomain<i64>>>;

        let mut env = Env::top();
        env.set(1, IntervalDomain::finite(0, 10));
        env.set(2, IntervalDomain::finite(5, 20));

        let mut other = Env::top();
        other.set(1, IntervalDomain::finite(-5, 3));

        env.join_with(&other);
        assert_eq!(env.get(&1).bounds().unwrap(), (-5, 10));
        assert_eq!(env.get(&2).bounds().unwrap(), (5, 20));
    }

    #[test]
    fn weak_topological_order_drives_a_fixpoint_over_a_constant_domain() {
        use std::collections::HashMap as StdHashMap;

        let mut edges: StdHashMap<&'static str, Vec<&'static str>> = StdHashMap::new();
        edges.insert("entry", vec!["loop_head"]);
        edges.insert("loop_head", vec!["loop_body"]);
        edges.insert("loop_body", vec!["loop_head", "exit"]);

        let wto = Wto::new("entry", |n| edges.get(n).cloned().unwrap_or_default());
        let order: Vec<&str> = wto.iter().map(|c| *c.head_node()).collect();
        assert_eq!(order, vec!["entry", "loop_head"]);
        assert!(wto.iter().nth(1).unwrap().is_scc());
    }

    #[test]
    fn position_map_round_trips_positions_built_from_a_trie_backed_set_of_ids() {
        let mut ids = TrieSet::new();
        ids.insert(0u64);
        ids.insert(1u64);

        let mut map = PositionMap::new();
        map.strings.push("Widget".to_string());
        map.strings.push("Widget.java".to_string());
        for id in ids.iter() {
            map.positions.push(PositionRecord {
                class_id: 0,
                method_id: id as u32,
                file_id: 1,
                line: 10 + id as u32,
                parent: None,
            });
        }

        let mut buffer = Vec::new();
        map.write(&mut buffer).unwrap();
        let decoded = PositionMap::read(&mut std::io::Cursor::new(buffer)).unwrap();
        assert_eq!(decoded, map);
    }

    #[test]
    fn work_queue_processes_tasks_pushed_from_a_work_stealing_worker() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let total = Arc::new(AtomicUsize::new(0));
        let counted = total.clone();
        let mut queue = abslat_queue::WorkQueue::new(
            move |_worker: &WorkerState<u32>, item: u32| {
                counted.fetch_add(item as usize, Ordering::SeqCst);
            },
            2,
        );
        for item in 0..10u32 {
            queue.add_item(item);
        }
        queue.run_all();
        assert_eq!(total.load(Ordering::SeqCst), (0..10u32).sum::<u32>() as usize);
    }
}
