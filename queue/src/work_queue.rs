//! A work-stealing queue: each worker services its own queue first and
//! steals from others, in a random order with itself first, once its own
//! queue empties. Grounded on
//! `examples/original_source/sparta/include/SpartaWorkQueue.h`.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rand::thread_rng;

/// Returns the number of available hardware threads, clamped to at least 1.
/// Mirrors `parallel::default_num_threads()`.
pub fn default_num_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .max(1)
}

/// Creates a random visiting order over `[0, num)`, with `own_index` placed
/// first so a worker always drains its own queue before attempting to steal.
fn create_permutation(num: usize, own_index: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..num).collect();
    order.shuffle(&mut thread_rng());
    if let Some(pos) = order.iter().position(|&i| i == own_index) {
        order.swap(0, pos);
    }
    order
}

struct Termination {
    num_non_empty: AtomicUsize,
    num_running: AtomicUsize,
}

/// A single worker's queue, plus its running flag. Exposed to the executor
/// closure so in-flight work can push follow-up tasks onto the
/// currently-running worker's own queue.
pub struct WorkerState<T> {
    id: usize,
    queue: Mutex<VecDeque<T>>,
    running: std::sync::atomic::AtomicBool,
    termination: Arc<Termination>,
}

impl<T> WorkerState<T> {
    fn new(id: usize, termination: Arc<Termination>) -> Self {
        WorkerState {
            id,
            queue: Mutex::new(VecDeque::new()),
            running: std::sync::atomic::AtomicBool::new(false),
            termination,
        }
    }

    pub fn worker_id(&self) -> usize {
        self.id
    }

    /// Adds a task to this worker's own queue. While the queue is running,
    /// this must be used instead of [`WorkQueue::add_item`], which is not
    /// safe to call concurrently with `run_all`.
    pub fn push_task(&self, task: T) {
        let mut queue = self.queue.lock();
        if queue.is_empty() {
            self.termination.num_non_empty.fetch_add(1, Ordering::SeqCst);
        }
        queue.push_back(task);
    }

    fn set_running(&self, running: bool) {
        let was_running = self.running.swap(running, Ordering::SeqCst);
        if was_running && !running {
            self.termination.num_running.fetch_sub(1, Ordering::SeqCst);
        } else if !was_running && running {
            self.termination.num_running.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn pop_task(&self, thief: &WorkerState<T>) -> Option<T> {
        let mut queue = self.queue.lock();
        if queue.is_empty() {
            return None;
        }
        thief.set_running(true);
        let task = queue.pop_front();
        if queue.is_empty() {
            self.termination.num_non_empty.fetch_sub(1, Ordering::SeqCst);
        }
        task
    }
}

/// Work-stealing queue over `num_threads` workers. `run_all` blocks until
/// every worker's queue is empty and no worker is running.
pub struct WorkQueue<T, Executor> {
    executor: Executor,
    states: Vec<Arc<WorkerState<T>>>,
    termination: Arc<Termination>,
    insert_idx: usize,
}

impl<T, Executor> WorkQueue<T, Executor>
where
    T: Send + 'static,
    Executor: Fn(&WorkerState<T>, T) + Send + Sync + 'static,
{
    pub fn new(executor: Executor, num_threads: usize) -> Self {
        assert!(num_threads >= 1);
        let termination = Arc::new(Termination {
            num_non_empty: AtomicUsize::new(0),
            num_running: AtomicUsize::new(0),
        });
        let states = (0..num_threads)
            .map(|id| Arc::new(WorkerState::new(id, termination.clone())))
            .collect();
        WorkQueue {
            executor,
            states,
            termination,
            insert_idx: 0,
        }
    }

    /// Adds an item before `run_all` is called, round-robining across
    /// workers. Not safe to call once `run_all` is running; use
    /// [`WorkerState::push_task`] from inside the executor instead.
    pub fn add_item(&mut self, task: T) {
        self.states[self.insert_idx].push_task(task);
        self.insert_idx = (self.insert_idx + 1) % self.states.len();
    }

    /// Spawns `num_threads` workers and runs them to completion. Blocks
    /// until every queue is empty. The first panic captured from an
    /// executor call is rethrown here.
    pub fn run_all(self) {
        let WorkQueue { executor, states, termination, .. } = self;

        for state in &states {
            if !state.queue.lock().is_empty() {
                termination.num_non_empty.fetch_add(1, Ordering::SeqCst);
            }
        }

        let executor = Arc::new(executor);
        let exception: Arc<Mutex<Option<Box<dyn std::any::Any + Send>>>> = Arc::new(Mutex::new(None));
        let num_threads = states.len();

        let handles: Vec<_> = states
            .iter()
            .map(|state| {
                let states = states.clone();
                let state = state.clone();
                let executor = executor.clone();
                let termination = termination.clone();
                let exception = exception.clone();
                std::thread::spawn(move || {
                    let own_index = state.worker_id();
                    let permutation = create_permutation(num_threads, own_index);
                    loop {
                        let mut have_task = false;
                        for &idx in &permutation {
                            if let Some(task) = states[idx].pop_task(&state) {
                                have_task = true;
                                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                                    (executor)(&state, task)
                                }));
                                if let Err(payload) = result {
                                    log::error!("work queue task panicked on worker {}", state.worker_id());
                                    let mut exception = exception.lock();
                                    if exception.is_none() {
                                        *exception = Some(payload);
                                    }
                                }
                                break;
                            }
                        }
                        if !have_task {
                            state.set_running(false);
                        }
                        if termination.num_running.load(Ordering::SeqCst) == 0
                            && termination.num_non_empty.load(Ordering::SeqCst) == 0
                        {
                            return;
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            let _ = handle.join();
        }

        if let Some(payload) = exception.lock().take() {
            panic::resume_unwind(payload);
        }
    }
}

/// Convenience constructor for executors that don't need [`WorkerState`]
/// access.
pub fn for_each<T, F>(func: F, num_threads: usize) -> WorkQueue<T, impl Fn(&WorkerState<T>, T) + Send + Sync + 'static>
where
    T: Send + 'static,
    F: Fn(T) + Send + Sync + 'static,
{
    WorkQueue::new(move |_state: &WorkerState<T>, item: T| func(item), num_threads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn processes_every_item_exactly_once() {
        let total = Arc::new(AtomicUsize::new(0));
        let total_clone = total.clone();
        let mut queue = for_each(
            move |item: u32| {
                total_clone.fetch_add(item as usize, Ordering::SeqCst);
            },
            4,
        );
        for i in 1..=100u32 {
            queue.add_item(i);
        }
        queue.run_all();
        assert_eq!(total.load(Ordering::SeqCst), (1..=100u32).sum::<u32>() as usize);
    }

    #[test]
    fn workers_can_push_followup_tasks() {
        let processed = Arc::new(AtomicUsize::new(0));
        let processed_clone = processed.clone();
        let mut queue = WorkQueue::new(
            move |state: &WorkerState<u32>, item: u32| {
                processed_clone.fetch_add(1, Ordering::SeqCst);
                if item > 0 {
                    state.push_task(item - 1);
                }
            },
            2,
        );
        queue.add_item(5);
        queue.run_all();
        assert_eq!(processed.load(Ordering::SeqCst), 6);
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn run_all_rethrows_first_panic() {
        let mut queue = for_each(|_item: u32| panic!("boom"), 2);
        queue.add_item(1);
        queue.run_all();
    }
}
