use super::handle::{PoolHandle, Shared};
use super::worker::Worker;
use crate::error::{BuildError, PromiseError};
use crate::promise::Promise;
use crate::runtime::builder::PoolBuilder;
use crate::runtime::timer::Timer;

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Fixed-size pool of worker threads draining one task queue.
///
/// The `ThreadPool` is responsible for:
/// - spawning its worker threads and the timer thread,
/// - accepting tasks from any thread,
/// - orderly shutdown when dropped.
///
/// Dropping the pool blocks until every accepted task has run. Any state
/// captured by queued tasks must therefore outlive the pool.
///
/// # Examples
///
/// ```rust,no_run
/// use kairos::ThreadPool;
///
/// let pool = ThreadPool::new(2).unwrap();
/// let answer = pool.spawn(|| 6 * 7).wait().unwrap();
/// assert_eq!(answer, 42);
/// ```
pub struct ThreadPool {
    /// Handle shared with workers and callers.
    handle: PoolHandle,

    /// Join handles for the worker threads.
    workers: Vec<JoinHandle<()>>,

    /// Join handle for the timer thread.
    timer: Option<JoinHandle<()>>,
}

impl ThreadPool {
    /// Creates a pool with `worker_threads` workers and default settings.
    pub fn new(worker_threads: usize) -> Result<Self, BuildError> {
        PoolBuilder::new().worker_threads(worker_threads).build()
    }

    /// Starts the timer and the worker threads described by `config`.
    ///
    /// If a thread fails to spawn, the threads already started are shut
    /// down and joined before the error is returned.
    pub(crate) fn start(config: PoolBuilder) -> Result<Self, BuildError> {
        if config.worker_threads == 0 {
            return Err(BuildError::ZeroWorkers);
        }

        let timer_name = format!("{}-timer", config.thread_name);
        let (timer, timer_thread) = Timer::start(timer_name.clone()).map_err(|source| {
            BuildError::Spawn {
                thread: timer_name,
                source,
            }
        })?;

        let mut pool = ThreadPool {
            handle: PoolHandle {
                shared: Arc::new(Shared::new(timer, config.worker_threads)),
            },
            workers: Vec::with_capacity(config.worker_threads),
            timer: Some(timer_thread),
        };

        for id in 0..config.worker_threads {
            let name = format!("{}-{}", config.thread_name, id);

            let mut builder = thread::Builder::new().name(name.clone());
            if let Some(size) = config.stack_size {
                builder = builder.stack_size(size);
            }

            let worker = Worker::new(id, pool.handle.clone());

            match builder.spawn(move || worker.run()) {
                Ok(thread) => pool.workers.push(thread),
                Err(source) => {
                    return Err(BuildError::Spawn {
                        thread: name,
                        source,
                    });
                }
            }
        }

        tracing::debug!(workers = config.worker_threads, "thread pool started");

        Ok(pool)
    }

    /// Returns a clonable handle to this pool.
    pub fn handle(&self) -> PoolHandle {
        self.handle.clone()
    }

    /// Submits a task. See [`PoolHandle::enqueue_task`].
    pub fn enqueue_task<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.handle.enqueue_task(task);
    }

    /// Runs `f` on a worker. See [`PoolHandle::spawn`].
    pub fn spawn<F, T>(&self, f: F) -> Promise<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.handle.spawn(f)
    }

    /// Runs the fallible `f` on a worker. See [`PoolHandle::try_spawn`].
    pub fn try_spawn<F, T>(&self, f: F) -> Promise<T>
    where
        F: FnOnce() -> Result<T, PromiseError> + Send + 'static,
        T: Send + 'static,
    {
        self.handle.try_spawn(f)
    }

    /// Delayed value. See [`PoolHandle::delay`].
    pub fn delay<T>(&self, value: T, duration: Duration) -> Promise<T>
    where
        T: Send + 'static,
    {
        self.handle.delay(value, duration)
    }

    /// Returns `true` if no task is queued or running.
    pub fn is_idle(&self) -> bool {
        self.handle.is_idle()
    }

    /// Blocks until every task enqueued so far has finished.
    pub fn wait_idle(&self) {
        self.handle.wait_idle();
    }

    /// Number of tasks waiting in the queue.
    pub fn queue_size(&self) -> usize {
        self.handle.queue_size()
    }

    /// Number of tasks currently executing.
    pub fn active_tasks(&self) -> usize {
        self.handle.active_tasks()
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.handle.worker_count()
    }
}

impl Drop for ThreadPool {
    /// Shuts the pool down.
    ///
    /// This performs the following steps:
    /// 1. Stops the timer; delays that have not fired are abandoned
    /// 2. Signals queue shutdown and joins every worker once the backlog drains
    /// 3. Runs tasks that in-flight tasks enqueued after the last worker left
    /// 4. Closes the queue so later submissions are discarded, then runs
    ///    whatever was accepted before the close
    fn drop(&mut self) {
        let shared = &self.handle.shared;

        shared.timer.shutdown();
        if let Some(timer) = self.timer.take() {
            if timer.join().is_err() {
                tracing::error!("timer thread panicked");
            }
        }

        shared.queue.shutdown();
        for (id, worker) in self.workers.drain(..).enumerate() {
            if worker.join().is_err() {
                tracing::error!(worker = id, "worker terminated by a panicking task");
            }
        }

        drain_late_tasks(shared);
        shared.queue.close();
        drain_late_tasks(shared);

        tracing::debug!("thread pool stopped");
    }
}

/// Runs queued tasks on the dropping thread until the queue is empty.
fn drain_late_tasks(shared: &Shared) {
    while let Some(task) = shared.queue.try_pop() {
        if panic::catch_unwind(AssertUnwindSafe(|| shared.run(task))).is_err() {
            tracing::error!("late task panicked during pool shutdown");
        }
    }
}

impl fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadPool")
            .field("handle", &self.handle)
            .field("running", &self.workers.len())
            .finish()
    }
}
