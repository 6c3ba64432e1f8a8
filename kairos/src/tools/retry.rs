use crate::error::PromiseError;
use crate::promise::{Promise, Resolver, capture};
use crate::runtime::pool::PoolHandle;

use std::time::Duration;

/// Runs the promise produced by `factory` up to `max_attempts` times.
///
/// The returned promise is fulfilled with the first successful value, or
/// rejected with the error of the last attempt once all attempts failed.
/// Attempts follow each other immediately; use [`Retry::with_interval`] to
/// pause between them.
///
/// # Panics
///
/// Panics if `max_attempts == 0`.
///
/// # Examples
///
/// ```rust
/// use kairos::{Promise, PromiseError, tools};
///
/// let mut calls = 0;
/// let result = tools::retry(3, move || {
///     calls += 1;
///     if calls < 3 {
///         Promise::rejected(PromiseError::msg("busy"))
///     } else {
///         Promise::resolved(calls)
///     }
/// });
///
/// assert_eq!(result.wait().unwrap(), 3);
/// ```
pub fn retry<T, G>(max_attempts: usize, factory: G) -> Promise<T>
where
    T: Send + 'static,
    G: FnMut() -> Promise<T> + Send + 'static,
{
    Retry::new(max_attempts, factory).start()
}

/// Configurable form of [`retry`].
pub struct Retry<G> {
    factory: G,
    max_attempts: usize,
    interval: Option<(PoolHandle, Duration)>,
}

impl<G> Retry<G> {
    /// Creates a retry of at most `max_attempts` attempts in total.
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts == 0`.
    pub fn new(max_attempts: usize, factory: G) -> Self {
        assert!(max_attempts > 0, "max_attempts must be > 0");

        Self {
            factory,
            max_attempts,
            interval: None,
        }
    }

    /// Waits `interval` between a failed attempt and the next one.
    ///
    /// The pause is driven by the pool's timer and never blocks a thread.
    pub fn with_interval(mut self, pool: &PoolHandle, interval: Duration) -> Self {
        self.interval = Some((pool.clone(), interval));
        self
    }

    /// Starts the first attempt and returns the promise of the final result.
    pub fn start<T>(self) -> Promise<T>
    where
        T: Send + 'static,
        G: FnMut() -> Promise<T> + Send + 'static,
    {
        let (output, resolver) = Promise::pending();

        Attempt {
            factory: self.factory,
            number: 1,
            max_attempts: self.max_attempts,
            interval: self.interval,
            resolver,
        }
        .run();

        output
    }
}

/// State carried from one attempt to the next.
struct Attempt<G, T> {
    factory: G,
    number: usize,
    max_attempts: usize,
    interval: Option<(PoolHandle, Duration)>,
    resolver: Resolver<T>,
}

impl<G, T> Attempt<G, T>
where
    T: Send + 'static,
    G: FnMut() -> Promise<T> + Send + 'static,
{
    /// Runs attempts back to back for as long as they settle synchronously.
    ///
    /// Only a pending attempt or a pause hands the loop over to a
    /// continuation, so the stack stays flat whatever `max_attempts` is.
    fn run(mut self) {
        loop {
            let promise = capture(|| Ok((self.factory)())).unwrap_or_else(Promise::rejected);

            let outcome = match promise.try_take() {
                Ok(outcome) => outcome,
                Err(pending) => {
                    pending.subscribe(move |outcome| {
                        if self.record(outcome) {
                            self.next();
                        }
                    });
                    return;
                }
            };

            if !self.record(outcome) {
                return;
            }

            if self.interval.is_some() {
                self.next();
                return;
            }
        }
    }

    /// Starts the next attempt, after the configured pause if any.
    fn next(self) {
        match self.interval.clone() {
            None => self.run(),
            Some((pool, interval)) => {
                pool.delay((), interval).subscribe(move |tick| match tick {
                    Ok(()) => self.run(),
                    Err(error) => {
                        self.resolver.reject(error);
                    }
                });
            }
        }
    }

    /// Settles the output on success or exhaustion.
    ///
    /// Returns `true` if another attempt must run.
    fn record(&mut self, outcome: Result<T, PromiseError>) -> bool {
        let error = match outcome {
            Ok(value) => {
                self.resolver.resolve(value);
                return false;
            }
            Err(error) => error,
        };

        if self.number >= self.max_attempts {
            tracing::debug!(attempts = self.number, %error, "retry exhausted");
            self.resolver.reject(error);
            return false;
        }

        tracing::debug!(
            attempt = self.number,
            max_attempts = self.max_attempts,
            %error,
            "attempt failed, retrying"
        );
        self.number += 1;

        true
    }
}
