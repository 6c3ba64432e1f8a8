//! Thread-safe promises.
//!
//! A [`Promise`] is a single-assignment container for a value that some
//! other thread will produce. It is settled exactly once, through one of its
//! [`Resolver`]s, and can then be consumed in one of three ways:
//!
//! - chained with [`then`](Promise::then) or [`map`](Promise::map),
//! - recovered with [`catch_error`](Promise::catch_error),
//! - waited on with [`wait`](Promise::wait), blocking the calling thread.
//!
//! Each of these takes the promise by value: a promise has exactly one
//! consumer. Continuations run on whichever thread settles the promise,
//! usually a pool worker, or immediately on the registering thread if the
//! promise is already settled.
//!
//! Errors returned by, and panics raised in, executors and continuations are
//! converted into rejections, so a failure never escapes a chain to take
//! down an unrelated thread.
//!
//! ```rust
//! use kairos::{Promise, PromiseError};
//!
//! let doubled = Promise::resolved(10).then(|v| Ok(v * 2));
//! assert_eq!(doubled.wait().unwrap(), 20);
//!
//! let recovered = Promise::<i32>::rejected(PromiseError::msg("missing"))
//!     .catch_error(|_| Ok(0));
//! assert_eq!(recovered.wait().unwrap(), 0);
//! ```

mod capture;
mod resolver;
mod shared;
mod state;

pub(crate) use capture::capture;

pub use resolver::Resolver;
pub use state::PromiseState;

use crate::error::PromiseError;
use shared::{Outcome, Shared};

use std::fmt;
use std::sync::Arc;

/// A value that will be available once some work completes.
///
/// See the [module documentation](self) for an overview.
pub struct Promise<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Promise<T>
where
    T: Send + 'static,
{
    /// Creates a promise and runs `executor` synchronously with its resolver.
    ///
    /// The executor usually hands the resolver to background work, such as
    /// a task enqueued on a pool. If the executor returns `Err` or panics,
    /// the promise is rejected with that error.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use kairos::{Promise, ThreadPool};
    ///
    /// let pool = ThreadPool::new(1).unwrap();
    ///
    /// let promise = Promise::new(|resolver| {
    ///     pool.enqueue_task(move || {
    ///         resolver.resolve(42);
    ///     });
    ///     Ok(())
    /// });
    ///
    /// assert_eq!(promise.wait().unwrap(), 42);
    /// ```
    pub fn new<F>(executor: F) -> Self
    where
        F: FnOnce(Resolver<T>) -> Result<(), PromiseError>,
    {
        let (promise, resolver) = Self::pending();
        let boundary = resolver.clone();

        if let Err(error) = capture(move || executor(resolver)) {
            boundary.reject(error);
        }

        promise
    }

    /// Creates a pending promise together with its resolver.
    pub fn pending() -> (Self, Resolver<T>) {
        let shared = Arc::new(Shared::new());
        let resolver = Resolver::new(Arc::clone(&shared));

        (Promise { shared }, resolver)
    }

    /// Creates a promise already fulfilled with `value`.
    pub fn resolved(value: T) -> Self {
        Self::from_result(Ok(value))
    }

    /// Creates a promise already rejected with `error`.
    pub fn rejected(error: PromiseError) -> Self {
        Self::from_result(Err(error))
    }

    /// Creates a promise already settled from `outcome`.
    pub fn from_result(outcome: Result<T, PromiseError>) -> Self {
        let (promise, resolver) = Self::pending();
        resolver.settle(outcome);
        promise
    }

    /// Chains a transformation of the fulfilled value.
    ///
    /// `on_fulfilled` runs immediately if this promise is already fulfilled,
    /// otherwise on the thread that fulfills it. Its `Ok` fulfills the
    /// returned promise; its `Err` or a panic rejects it. A rejection of this
    /// promise skips `on_fulfilled` and is forwarded unchanged.
    pub fn then<U, F>(self, on_fulfilled: F) -> Promise<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Result<U, PromiseError> + Send + 'static,
    {
        let (next, resolver) = Promise::pending();

        self.subscribe(move |outcome| {
            let outcome = match outcome {
                Ok(value) => capture(move || on_fulfilled(value)),
                Err(error) => Err(error),
            };

            resolver.settle(outcome);
        });

        next
    }

    /// Chains an infallible transformation of the fulfilled value.
    pub fn map<U, F>(self, f: F) -> Promise<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        self.then(move |value| Ok(f(value)))
    }

    /// Handles a rejection.
    ///
    /// `on_rejected` runs immediately if this promise is already rejected,
    /// otherwise on the thread that rejects it. It may recover with `Ok` or
    /// reject the returned promise again with `Err`. If this promise is
    /// fulfilled, `on_rejected` never runs and the value passes through.
    pub fn catch_error<F>(self, on_rejected: F) -> Promise<T>
    where
        F: FnOnce(PromiseError) -> Result<T, PromiseError> + Send + 'static,
    {
        let (next, resolver) = Promise::pending();

        self.subscribe(move |outcome| {
            let outcome = match outcome {
                Ok(value) => Ok(value),
                Err(error) => capture(move || on_rejected(error)),
            };

            resolver.settle(outcome);
        });

        next
    }

    /// Blocks the calling thread until the promise settles.
    ///
    /// Returns the value if fulfilled, or the stored error if rejected.
    ///
    /// Waiting from a pool worker on a promise that needs a worker of the
    /// same pool to settle can deadlock a saturated pool.
    pub fn wait(self) -> Result<T, PromiseError> {
        self.shared.wait()
    }

    /// Takes the outcome of an already settled promise, or hands the
    /// promise back while it is still pending.
    pub(crate) fn try_take(self) -> Result<Outcome<T>, Self> {
        match self.shared.try_take() {
            Some(outcome) => Ok(outcome),
            None => Err(self),
        }
    }

    /// Registers the single continuation of this promise.
    pub(crate) fn subscribe(self, continuation: impl FnOnce(Outcome<T>) + Send + 'static) {
        self.shared.subscribe(continuation);
    }
}

impl<T> Promise<T> {
    /// Returns `true` once the promise is fulfilled or rejected.
    pub fn is_settled(&self) -> bool {
        self.shared.state().is_settled()
    }

    /// Returns the current settlement state.
    pub fn state(&self) -> PromiseState {
        self.shared.state()
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("state", &self.state())
            .finish()
    }
}
