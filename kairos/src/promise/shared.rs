use super::state::PromiseState;
use crate::error::PromiseError;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Settled outcome of a promise.
pub(crate) type Outcome<T> = Result<T, PromiseError>;

/// Callback run once with the outcome of a promise.
///
/// A single slot covers both settlement paths: the continuation receives
/// the `Ok` value or the `Err` rejection.
type Continuation<T> = Box<dyn FnOnce(Outcome<T>) + Send + 'static>;

/// State shared between a promise and its resolvers.
pub(crate) struct Shared<T> {
    /// Settlement state, stored outcome and pending continuation.
    inner: Mutex<Inner<T>>,

    /// Wakes threads blocked in `wait`.
    settled: Condvar,

    /// Number of live resolvers.
    resolvers: AtomicUsize,
}

struct Inner<T> {
    state: PromiseState,

    /// Set on settlement unless a continuation consumed it directly.
    outcome: Option<Outcome<T>>,

    continuation: Option<Continuation<T>>,
}

impl<T> Shared<T> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: PromiseState::Pending,
                outcome: None,
                continuation: None,
            }),
            settled: Condvar::new(),
            resolvers: AtomicUsize::new(0),
        }
    }

    /// Settles the promise. Returns `false` if it was already settled.
    pub(crate) fn settle(&self, outcome: Outcome<T>) -> bool {
        let settled = self.transition(outcome);

        if !settled {
            tracing::trace!("promise already settled, ignoring");
        }

        settled
    }

    /// Registers the continuation, or runs it right away if the promise has
    /// already settled.
    pub(crate) fn subscribe(&self, continuation: impl FnOnce(Outcome<T>) + Send + 'static) {
        let mut inner = self.lock();

        if !inner.state.is_settled() {
            inner.continuation = Some(Box::new(continuation));
            return;
        }

        let outcome = inner.outcome.take();
        drop(inner);

        // The outcome is only ever taken by the promise's sole consumer.
        continuation(outcome.unwrap_or(Err(PromiseError::Abandoned)));
    }

    /// Blocks until the promise settles and takes its outcome.
    pub(crate) fn wait(&self) -> Outcome<T> {
        let mut inner = self.lock();

        while !inner.state.is_settled() {
            inner = self
                .settled
                .wait(inner)
                .unwrap_or_else(PoisonError::into_inner);
        }

        inner.outcome.take().unwrap_or(Err(PromiseError::Abandoned))
    }

    /// Takes the outcome if the promise has already settled.
    pub(crate) fn try_take(&self) -> Option<Outcome<T>> {
        let mut inner = self.lock();

        if !inner.state.is_settled() {
            return None;
        }

        Some(inner.outcome.take().unwrap_or(Err(PromiseError::Abandoned)))
    }

    pub(crate) fn state(&self) -> PromiseState {
        self.lock().state
    }

    pub(crate) fn acquire_resolver(&self) {
        self.resolvers.fetch_add(1, Ordering::Relaxed);
    }

    /// Drops one resolver; the last one abandons a still pending promise.
    pub(crate) fn release_resolver(&self) {
        if self.resolvers.fetch_sub(1, Ordering::AcqRel) == 1
            && self.transition(Err(PromiseError::Abandoned))
        {
            tracing::debug!("promise abandoned by its last resolver");
        }
    }

    fn transition(&self, outcome: Outcome<T>) -> bool {
        let mut inner = self.lock();

        if inner.state.is_settled() {
            return false;
        }

        inner.state = match outcome {
            Ok(_) => PromiseState::Fulfilled,
            Err(_) => PromiseState::Rejected,
        };

        let state = inner.state;
        let ready = match inner.continuation.take() {
            Some(continuation) => Some((continuation, outcome)),
            None => {
                inner.outcome = Some(outcome);
                None
            }
        };

        // Continuations may settle other promises or register new
        // continuations, so they run without the lock.
        drop(inner);

        tracing::trace!(?state, "promise settled");

        if let Some((continuation, outcome)) = ready {
            continuation(outcome);
        }

        self.settled.notify_all();

        true
    }

    // No user code runs while the lock is held.
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
