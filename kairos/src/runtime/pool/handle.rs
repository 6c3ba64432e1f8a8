use crate::error::PromiseError;
use crate::promise::{Promise, capture};
use crate::runtime::context;
use crate::runtime::queue::TaskQueue;
use crate::runtime::timer::TimerHandle;

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Deadline used when `now + duration` does not fit in an [`Instant`].
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

/// A unit of work executed exactly once by a pool worker.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// State shared by the pool, its workers and every [`PoolHandle`].
pub(crate) struct Shared {
    /// Queue drained by the workers.
    pub(crate) queue: TaskQueue<Task>,

    /// Tasks currently executing.
    active: AtomicUsize,

    /// Tasks enqueued and not yet finished.
    outstanding: AtomicUsize,

    /// Lock paired with `idle`; guards no data.
    idle_lock: Mutex<()>,

    /// Signalled when `outstanding` drops to zero.
    idle: Condvar,

    /// Sending side of the timer thread.
    pub(crate) timer: TimerHandle,

    /// Number of worker threads.
    workers: usize,
}

impl Shared {
    pub(crate) fn new(timer: TimerHandle, workers: usize) -> Self {
        Self {
            queue: TaskQueue::new(),
            active: AtomicUsize::new(0),
            outstanding: AtomicUsize::new(0),
            idle_lock: Mutex::new(()),
            idle: Condvar::new(),
            timer,
            workers,
        }
    }

    /// Runs a dequeued task, keeping the counters right even if it unwinds.
    pub(crate) fn run(&self, task: Task) {
        self.active.fetch_add(1, Ordering::AcqRel);
        let _running = Running { shared: self };

        task();
    }

    fn finish(&self) {
        self.active.fetch_sub(1, Ordering::AcqRel);
        self.release();
    }

    /// Forgets one outstanding task and wakes idle waiters on the last one.
    fn release(&self) {
        if self.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            let _guard = self.idle_lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.idle.notify_all();
        }
    }
}

/// Saturating `Instant::now() + duration`.
fn deadline_after(duration: Duration) -> Instant {
    let now = Instant::now();

    now.checked_add(duration)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Decrements the pool counters when a task finishes or unwinds.
struct Running<'a> {
    shared: &'a Shared,
}

impl Drop for Running<'_> {
    fn drop(&mut self) {
        self.shared.finish();
    }
}

/// Cheap, clonable handle to a [`ThreadPool`](super::ThreadPool).
///
/// Handles can be moved into tasks to schedule further work from a worker
/// thread. They do not keep the workers alive: once the owning pool has been
/// dropped, submitted tasks are discarded, and any promise they would have
/// settled is rejected with [`PromiseError::Abandoned`].
#[derive(Clone)]
pub struct PoolHandle {
    pub(crate) shared: Arc<Shared>,
}

impl PoolHandle {
    /// Returns the handle of the pool running the current thread.
    ///
    /// Returns `None` when called outside a pool worker.
    pub fn current() -> Option<PoolHandle> {
        context::current_pool()
    }

    /// Submits a task to the pool.
    ///
    /// Safe to call from any thread, including from inside a running task.
    /// A panicking task is not caught: it terminates the worker that ran it.
    pub fn enqueue_task<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.outstanding.fetch_add(1, Ordering::AcqRel);

        if let Err(task) = self.shared.queue.push(Box::new(task)) {
            drop(task);
            self.shared.release();
            tracing::debug!("pool stopped, task dropped");
        }
    }

    /// Runs `f` on a worker and returns a promise of its result.
    ///
    /// A panic inside `f` rejects the promise with
    /// [`PromiseError::Panicked`].
    pub fn spawn<F, T>(&self, f: F) -> Promise<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.try_spawn(move || Ok(f()))
    }

    /// Runs the fallible `f` on a worker and returns a promise of its result.
    pub fn try_spawn<F, T>(&self, f: F) -> Promise<T>
    where
        F: FnOnce() -> Result<T, PromiseError> + Send + 'static,
        T: Send + 'static,
    {
        let (promise, resolver) = Promise::pending();

        self.enqueue_task(move || {
            resolver.settle(capture(f));
        });

        promise
    }

    /// Returns a promise fulfilled with `value` once `duration` has elapsed.
    ///
    /// The caller is never blocked. When the deadline passes, the settling
    /// task is queued on the pool so continuations run on a worker.
    pub fn delay<T>(&self, value: T, duration: Duration) -> Promise<T>
    where
        T: Send + 'static,
    {
        let (promise, resolver) = Promise::pending();
        let handle = self.clone();

        self.shared.timer.schedule(
            deadline_after(duration),
            Box::new(move || {
                handle.enqueue_task(move || {
                    resolver.resolve(value);
                });
            }),
        );

        promise
    }

    /// Returns `true` if no task is queued or running.
    ///
    /// This is a momentary snapshot. Queued and running tasks are counted
    /// together, so a task between dequeue and execution still counts.
    pub fn is_idle(&self) -> bool {
        self.shared.outstanding.load(Ordering::Acquire) == 0
    }

    /// Blocks until every task enqueued so far has finished.
    ///
    /// Must not be called from a worker of the same pool, since the calling
    /// task itself would never finish.
    pub fn wait_idle(&self) {
        let mut guard = self
            .shared
            .idle_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        while self.shared.outstanding.load(Ordering::Acquire) != 0 {
            guard = self
                .shared
                .idle
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Number of tasks waiting in the queue.
    pub fn queue_size(&self) -> usize {
        self.shared.queue.len()
    }

    /// Number of tasks currently executing.
    pub fn active_tasks(&self) -> usize {
        self.shared.active.load(Ordering::Acquire)
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.shared.workers
    }
}

impl fmt::Debug for PoolHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolHandle")
            .field("workers", &self.shared.workers)
            .field("queued", &self.queue_size())
            .field("active", &self.active_tasks())
            .finish()
    }
}
