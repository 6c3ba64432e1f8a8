use super::shared::Shared;
use super::state::PromiseState;
use crate::error::PromiseError;

use std::fmt;
use std::sync::Arc;

/// The settling half of a [`Promise`](super::Promise).
///
/// A resolver can be cloned and sent to any thread. The first call to
/// [`resolve`](Self::resolve), [`reject`](Self::reject) or
/// [`settle`](Self::settle) wins; later calls are silently ignored.
///
/// When the last resolver of a pending promise is dropped, the promise is
/// rejected with [`PromiseError::Abandoned`], so nobody waits forever on a
/// task that was discarded.
pub struct Resolver<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Resolver<T> {
    pub(crate) fn new(shared: Arc<Shared<T>>) -> Self {
        shared.acquire_resolver();
        Self { shared }
    }

    /// Fulfills the promise with `value`.
    ///
    /// Returns `true` if this call settled the promise.
    pub fn resolve(&self, value: T) -> bool {
        self.shared.settle(Ok(value))
    }

    /// Rejects the promise with `error`.
    ///
    /// Returns `true` if this call settled the promise.
    pub fn reject(&self, error: PromiseError) -> bool {
        self.shared.settle(Err(error))
    }

    /// Fulfills or rejects the promise from a `Result`.
    ///
    /// Returns `true` if this call settled the promise.
    pub fn settle(&self, outcome: Result<T, PromiseError>) -> bool {
        self.shared.settle(outcome)
    }

    /// Returns `true` once the promise has been settled.
    pub fn is_settled(&self) -> bool {
        self.shared.state().is_settled()
    }

    /// Returns the current settlement state of the promise.
    pub fn state(&self) -> PromiseState {
        self.shared.state()
    }
}

impl<T> Clone for Resolver<T> {
    fn clone(&self) -> Self {
        Resolver::new(Arc::clone(&self.shared))
    }
}

impl<T> Drop for Resolver<T> {
    fn drop(&mut self) {
        self.shared.release_resolver();
    }
}

impl<T> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("state", &self.state())
            .finish()
    }
}
