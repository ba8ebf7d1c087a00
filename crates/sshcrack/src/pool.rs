//! Bounded worker pool — fixed-size executor group with FIFO dispatch.
//!
//! ## Design
//!
//! The pool is a `Mutex`-guarded `VecDeque` plus a `Condvar`: `queue()` pushes
//! a task onto the back and wakes one waiting executor; every executor thread
//! loops on locking the queue, popping the front task if one is present, or
//! waiting on the condvar if the queue is empty. This is the simplest
//! construction that preserves FIFO order without a dormant-worker rendezvous
//! or a hot-looping coordinator (see `DESIGN.md` for why the historical
//! revision of this pool — a coordinator that polled each worker's private
//! channel with a non-blocking send — is not reproduced here).
//!
//! ## Lifecycle
//!
//! `unstarted -> running -> closed`, enforced by an internal enum guarded by a
//! `Mutex`. `queue()` is legal in both `unstarted` and `running` — tasks
//! submitted before `start()` simply sit in the deque until an executor
//! thread is spawned to drain them.
//!
//! ## Shutdown
//!
//! `close()` locks the shared queue, marks it closed, and clears whatever
//! tasks are still sitting in the deque — they are dropped, not run — then
//! wakes every executor via `notify_all()` and joins each thread. An executor
//! checks the closed flag before every pop attempt, so once `close()` has
//! taken the lock no executor can observe a task that arrived after (or
//! survives) the clear. By the time `close()` returns no pool thread is left
//! running and no discarded task has executed — acceptable here because the
//! caller (the dictionary driver) only closes a pool after it has already
//! decided the outcome it's going to return.
//!
//! ## Zero unsafe blocks
//!
//! All concurrency uses safe Rust APIs (`Mutex`, `Condvar`, `thread`).

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

/// A unit of deferred work. Plain `FnOnce` thunk — callers capture whatever
/// typed state they need directly in the closure rather than threading an
/// untyped parameter bundle through the pool.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Errors the pool surfaces on misuse. The pool never surfaces failures from
/// task closures themselves — that's the caller's job, via whatever channel
/// the closure captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// `Pool::new` was called with `size == 0`.
    InvalidSize,
    /// `start()` was called on a pool that is not `unstarted`, or `close()`
    /// was called on a pool that is already `closed`.
    IllegalState,
    /// `queue()` was called on a pool that is already `closed`.
    ClosedPool,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::InvalidSize => write!(f, "workers: pool size must be >= 1"),
            PoolError::IllegalState => write!(f, "workers: illegal pool state transition"),
            PoolError::ClosedPool => write!(f, "workers: pool is closed"),
        }
    }
}

impl std::error::Error for PoolError {}

/// The FIFO task queue shared by every executor, plus the flag that tells
/// executors to stop looking for work rather than a disconnect they'd have
/// to infer from a channel error.
struct TaskQueue {
    tasks: VecDeque<Task>,
    closed: bool,
}

struct Shared {
    queue: Mutex<TaskQueue>,
    not_empty: Condvar,
}

enum Inner {
    Unstarted { shared: Arc<Shared> },
    Running { shared: Arc<Shared>, handles: Vec<JoinHandle<()>> },
    Closed,
}

/// A fixed-size group of executor threads fed by a single FIFO queue.
///
/// `size` is fixed at construction: N executors exist iff the pool is
/// running. The pool is one-shot: once `close()`d it cannot be restarted
/// (no resurrection).
pub struct Pool {
    size: usize,
    inner: Mutex<Inner>,
}

impl Pool {
    /// Creates a pool of `size` executors. The returned pool is `unstarted`
    /// and its queue already accepts submissions, so callers can pre-load the
    /// entire workload before calling `start()`.
    pub fn new(size: usize) -> Result<Self, PoolError> {
        if size < 1 {
            return Err(PoolError::InvalidSize);
        }
        let shared = Arc::new(Shared {
            queue: Mutex::new(TaskQueue { tasks: VecDeque::new(), closed: false }),
            not_empty: Condvar::new(),
        });
        Ok(Pool {
            size,
            inner: Mutex::new(Inner::Unstarted { shared }),
        })
    }

    /// The configured pool size.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Adds `task` to the FIFO. Legal before and after `start()`.
    pub fn queue(&self, task: Task) -> Result<(), PoolError> {
        let inner = self.inner.lock().expect("pool state mutex poisoned");
        let shared = match &*inner {
            Inner::Unstarted { shared } | Inner::Running { shared, .. } => shared,
            Inner::Closed => return Err(PoolError::ClosedPool),
        };
        let mut q = shared.queue.lock().expect("pool queue mutex poisoned");
        q.tasks.push_back(task);
        drop(q);
        shared.not_empty.notify_one();
        Ok(())
    }

    /// Spawns `size` executor threads and returns immediately (does not wait
    /// for queued tasks to complete). One-shot: fails with `IllegalState` if
    /// the pool is not `unstarted`.
    pub fn start(&self) -> Result<(), PoolError> {
        let mut inner = self.inner.lock().expect("pool state mutex poisoned");
        let shared = match std::mem::replace(&mut *inner, Inner::Closed) {
            Inner::Unstarted { shared } => shared,
            other @ (Inner::Running { .. } | Inner::Closed) => {
                *inner = other;
                return Err(PoolError::IllegalState);
            }
        };

        let handles = (0..self.size)
            .map(|slot| {
                let shared = Arc::clone(&shared);
                thread::Builder::new()
                    .name(format!("sshcrack-pool-{slot}"))
                    .spawn(move || run_executor(&shared))
                    .expect("failed to spawn pool executor thread")
            })
            .collect();

        *inner = Inner::Running { shared, handles };
        Ok(())
    }

    /// Transitions to `closed`. Marks the queue closed and drops whatever
    /// tasks are still waiting in it, wakes every executor, then joins every
    /// executor thread. By the time this returns, no pool thread is left
    /// running and no discarded task has run. Fails with `IllegalState` if
    /// the pool is already `closed` — a second close is an error, not a
    /// silent no-op.
    pub fn close(&self) -> Result<(), PoolError> {
        let mut inner = self.inner.lock().expect("pool state mutex poisoned");
        match std::mem::replace(&mut *inner, Inner::Closed) {
            Inner::Unstarted { .. } => Ok(()),
            Inner::Running { shared, handles } => {
                {
                    let mut q = shared.queue.lock().expect("pool queue mutex poisoned");
                    q.closed = true;
                    q.tasks.clear();
                }
                shared.not_empty.notify_all();
                for handle in handles {
                    let _ = handle.join();
                }
                Ok(())
            }
            Inner::Closed => {
                *inner = Inner::Closed;
                Err(PoolError::IllegalState)
            }
        }
    }
}

/// One executor's main loop: wait for a task, run it, repeat, until the
/// queue is marked closed (the pool was closed). The closed flag is checked
/// before every pop attempt, so a task sitting in the deque the instant
/// `close()` locks it is cleared there and this loop never sees it.
fn run_executor(shared: &Shared) {
    loop {
        let mut q = shared.queue.lock().expect("pool queue mutex poisoned");
        loop {
            if q.closed {
                return;
            }
            if let Some(task) = q.tasks.pop_front() {
                drop(q);
                task();
                break;
            }
            q = shared.not_empty.wait(q).expect("pool queue mutex poisoned");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    // Size validation.
    #[test]
    fn new_rejects_zero_size() {
        assert_eq!(Pool::new(0).unwrap_err(), PoolError::InvalidSize);
    }

    #[test]
    fn new_accepts_size_one() {
        assert!(Pool::new(1).is_ok());
    }

    // Lifecycle monotonicity.
    #[test]
    fn queue_accepted_before_start() {
        let pool = Pool::new(2).unwrap();
        assert!(pool.queue(Box::new(|| {})).is_ok());
    }

    #[test]
    fn start_twice_is_illegal_state() {
        let pool = Pool::new(1).unwrap();
        pool.start().unwrap();
        assert_eq!(pool.start().unwrap_err(), PoolError::IllegalState);
        pool.close().unwrap();
    }

    #[test]
    fn queue_after_close_is_closed_pool() {
        let pool = Pool::new(1).unwrap();
        pool.start().unwrap();
        pool.close().unwrap();
        assert_eq!(pool.queue(Box::new(|| {})).unwrap_err(), PoolError::ClosedPool);
    }

    #[test]
    fn start_after_close_is_illegal_state() {
        let pool = Pool::new(1).unwrap();
        pool.close().unwrap();
        assert_eq!(pool.start().unwrap_err(), PoolError::IllegalState);
    }

    #[test]
    fn double_close_is_illegal_state() {
        let pool = Pool::new(1).unwrap();
        pool.start().unwrap();
        pool.close().unwrap();
        assert_eq!(pool.close().unwrap_err(), PoolError::IllegalState);
    }

    #[test]
    fn close_without_start_succeeds() {
        let pool = Pool::new(3).unwrap();
        assert!(pool.close().is_ok());
    }

    // Arithmetic smoke test: dispatch completeness under no failures.
    #[test]
    fn dispatch_completeness_arithmetic_smoke_test() {
        let pool = Pool::new(10).unwrap();
        let (tx, rx) = mpsc::channel::<u32>();
        for _ in 0..20 {
            let tx = tx.clone();
            pool.queue(Box::new(move || {
                let _ = tx.send(8 * 8);
            }))
            .unwrap();
        }
        drop(tx);
        pool.start().unwrap();

        let mut received = Vec::new();
        for _ in 0..20 {
            received.push(rx.recv_timeout(Duration::from_secs(5)).expect("task did not complete"));
        }
        assert_eq!(received.len(), 20);
        assert!(received.iter().all(|&v| v == 64));

        let start = Instant::now();
        pool.close().unwrap();
        assert!(
            start.elapsed() < Duration::from_millis(500),
            "close() took too long to join executors"
        );
    }

    // No leaks: close() joins every executor before returning.
    #[test]
    fn close_joins_all_executors_promptly() {
        let pool = Pool::new(4).unwrap();
        pool.start().unwrap();
        let start = Instant::now();
        pool.close().unwrap();
        assert!(start.elapsed() < Duration::from_millis(200));
    }

    // Tasks still sitting in the queue when close() takes the lock must
    // never run: the single executor is busy with the first task the whole
    // time, so every task behind it in the deque is still queued when
    // close() clears it.
    #[test]
    fn pending_tasks_are_discarded_on_close() {
        let pool = Pool::new(1).unwrap();
        let ran = Arc::new(AtomicUsize::new(0));
        for _ in 0..5 {
            let ran = Arc::clone(&ran);
            pool.queue(Box::new(move || {
                std::thread::sleep(Duration::from_millis(50));
                ran.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        }
        pool.start().unwrap();
        std::thread::sleep(Duration::from_millis(10));
        pool.close().unwrap();
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fifo_order_in_single_executor_mode() {
        let pool = Pool::new(1).unwrap();
        let (tx, rx) = mpsc::channel::<u32>();
        for i in 0..10u32 {
            let tx = tx.clone();
            pool.queue(Box::new(move || {
                let _ = tx.send(i);
            }))
            .unwrap();
        }
        drop(tx);
        pool.start().unwrap();
        let received: Vec<u32> = rx.iter().collect();
        pool.close().unwrap();
        assert_eq!(received, (0..10).collect::<Vec<_>>());
    }
}
