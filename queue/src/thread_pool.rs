//! A reusable thread pool: threads are spawned lazily as work arrives and
//! kept alive between `run_async` calls. Grounded on
//! `examples/original_source/sparta/include/sparta/ThreadPool.h`.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::{Condvar, Mutex};

type BoxedJob = Box<dyn FnOnce() + Send>;

/// Runs closures on a separate thread without blocking the caller.
/// Submitting work never blocks: enough threads are spawned that work is
/// never queued behind a busy one indefinitely.
pub trait AsyncRunner {
    fn run_async<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static;
}

struct State {
    threads: Vec<JoinHandle<()>>,
    waiting: usize,
    pending: VecDeque<BoxedJob>,
    joining: bool,
}

struct Shared {
    state: Mutex<State>,
    pending_or_joining: Condvar,
    all_waiting: Condvar,
    exception: Mutex<Option<Box<dyn std::any::Any + Send + 'static>>>,
}

/// A pool of reusable worker threads. Destruction joins all outstanding
/// threads; any captured panic is only rethrown by an explicit call to
/// [`ThreadPool::join`] (a deliberate departure from the teacher's C++
/// destructor, which also rethrows there — a panicking `Drop` in Rust risks
/// aborting the process if it runs during unwinding).
pub struct ThreadPool {
    shared: Arc<Shared>,
}

impl ThreadPool {
    pub fn new() -> Self {
        ThreadPool {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    threads: Vec::new(),
                    waiting: 0,
                    pending: VecDeque::new(),
                    joining: false,
                }),
                pending_or_joining: Condvar::new(),
                all_waiting: Condvar::new(),
                exception: Mutex::new(None),
            }),
        }
    }

    /// Number of spawned, unjoined threads.
    pub fn size(&self) -> usize {
        self.shared.state.lock().threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn join_threads(&self) {
        {
            let mut state = self.shared.state.lock();
            while state.waiting != state.threads.len() {
                self.shared.all_waiting.wait(&mut state);
            }
            state.joining = true;
        }
        self.shared.pending_or_joining.notify_all();
        let handles: Vec<JoinHandle<()>> = {
            let mut state = self.shared.state.lock();
            state.threads.drain(..).collect()
        };
        for handle in handles {
            let _ = handle.join();
        }
        let mut state = self.shared.state.lock();
        state.waiting = 0;
        state.joining = false;
    }

    /// Waits for all async work to finish and joins every thread. Rethrows
    /// the first panic captured from a submitted closure, if any.
    pub fn join(&self) {
        self.join_threads();
        if let Some(exception) = self.shared.exception.lock().take() {
            panic::resume_unwind(exception);
        }
    }

    fn run(shared: Arc<Shared>, mut job: BoxedJob) {
        loop {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
                log::error!("thread pool job panicked");
                let mut exception = shared.exception.lock();
                if exception.is_none() {
                    *exception = Some(payload);
                }
            }

            let mut state = shared.state.lock();
            state.waiting += 1;
            if state.waiting == state.threads.len() {
                shared.all_waiting.notify_one();
            }
            shared
                .pending_or_joining
                .wait_while(&mut state, |s| s.pending.is_empty() && !s.joining);
            if state.joining {
                return;
            }
            job = state.pending.pop_front().expect("woken with no pending job");
        }
    }
}

impl Default for ThreadPool {
    fn default() -> Self {
        ThreadPool::new()
    }
}

impl AsyncRunner for ThreadPool {
    fn run_async<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let job: BoxedJob = Box::new(f);
        let mut state = self.shared.state.lock();
        assert!(!state.joining, "cannot submit work while the pool is joining");
        if state.waiting == 0 {
            let shared = self.shared.clone();
            let handle = std::thread::spawn(move || ThreadPool::run(shared, job));
            state.threads.push(handle);
        } else {
            state.waiting -= 1;
            state.pending.push_back(job);
            drop(state);
            self.shared.pending_or_joining.notify_one();
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.join_threads();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn runs_submitted_work() {
        let pool = ThreadPool::new();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..8 {
            let counter = counter.clone();
            pool.run_async(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        pool.join();
        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn join_rethrows_first_panic() {
        let pool = ThreadPool::new();
        pool.run_async(|| panic!("boom"));
        pool.join();
    }

    #[test]
    fn threads_are_reused_across_join_cycles() {
        let pool = ThreadPool::new();
        pool.run_async(|| {});
        pool.join();
        let first_size = pool.size();
        pool.run_async(|| {});
        pool.join();
        assert_eq!(first_size, pool.size());
    }
}
