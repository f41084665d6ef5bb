//! A reusable thread pool and a work-stealing work queue, used to drive
//! abstract-interpretation fixpoint computation across independent analysis
//! units in parallel.

mod thread_pool;
mod work_queue;

pub use thread_pool::{AsyncRunner, ThreadPool};
pub use work_queue::{default_num_threads, for_each, WorkQueue, WorkerState};
