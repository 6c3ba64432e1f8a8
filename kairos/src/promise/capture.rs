use crate::error::PromiseError;

use std::panic::{self, AssertUnwindSafe};

/// Runs `f`, turning a panic into a [`PromiseError::Panicked`] rejection.
///
/// Every place where user code runs on behalf of a promise (executors,
/// continuations, spawned closures, retry factories) goes through here.
pub(crate) fn capture<T>(f: impl FnOnce() -> Result<T, PromiseError>) -> Result<T, PromiseError> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(PromiseError::from_panic(payload)))
}
