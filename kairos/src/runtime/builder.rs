use crate::error::BuildError;
use crate::runtime::pool::ThreadPool;

use std::thread;

/// Builder for configuring and creating a [`ThreadPool`].
///
/// # Examples
///
/// ```rust,no_run
/// use kairos::PoolBuilder;
///
/// let pool = PoolBuilder::new()
///     .worker_threads(4)
///     .thread_name("assets")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct PoolBuilder {
    /// Number of worker threads.
    pub(crate) worker_threads: usize,

    /// Prefix of every thread name spawned by the pool.
    pub(crate) thread_name: String,

    /// Stack size of worker threads, in bytes.
    pub(crate) stack_size: Option<usize>,
}

impl PoolBuilder {
    /// Creates a new `PoolBuilder` with default configuration.
    ///
    /// By default, the number of worker threads is set to the number
    /// of available logical CPUs, falling back to `1` if unavailable.
    pub fn new() -> Self {
        let worker_threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            worker_threads,
            thread_name: "kairos-worker".to_owned(),
            stack_size: None,
        }
    }

    /// Sets the number of worker threads.
    ///
    /// [`build`](Self::build) fails with [`BuildError::ZeroWorkers`] if
    /// `n == 0`.
    pub fn worker_threads(mut self, n: usize) -> Self {
        self.worker_threads = n;
        self
    }

    /// Sets the thread name prefix.
    ///
    /// Workers are named `{prefix}-{index}` and the timer `{prefix}-timer`.
    pub fn thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name = prefix.into();
        self
    }

    /// Sets the stack size of worker threads.
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Builds the pool, spawning every thread immediately.
    pub fn build(self) -> Result<ThreadPool, BuildError> {
        ThreadPool::start(self)
    }
}

impl Default for PoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}
