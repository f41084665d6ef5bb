//! Compound abstract domains built on top of `abslat-trie`'s persistent
//! containers and `abslat-value`'s core traits.

pub mod env;
pub mod map_repr;
pub mod partition;
pub mod scalar;
pub mod set;

pub use env::Environment;
pub use map_repr::{HashMapRepr, MapRepr};
pub use partition::Partition;
pub use scalar::{ConstantDomain, DisjointUnionDomain, FiniteAbstractDomain, IntervalDomain, LiftedDomain};
pub use set::{
    HashSet, OverUnderSetDomain, SetDomain, SetRepr, SmallSortedSetDomain, SparseSetAbstractDomain,
};
