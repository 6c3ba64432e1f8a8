use crate::error::PromiseError;
use crate::promise::Promise;
use crate::runtime::pool::PoolHandle;
use crate::tools::race;

use std::time::Duration;

/// Bounds how long `promise` may take to settle.
///
/// The returned promise settles like `promise` if it settles within
/// `duration`; otherwise it is rejected with [`PromiseError::TimedOut`].
/// The underlying work is not cancelled.
pub fn timeout<T>(pool: &PoolHandle, duration: Duration, promise: Promise<T>) -> Promise<T>
where
    T: Send + 'static,
{
    let deadline = pool
        .delay((), duration)
        .then(move |()| Err(PromiseError::TimedOut(duration)));

    race([promise, deadline])
}
