use crate::error::PromiseError;
use crate::promise::Promise;

/// Settles like the first promise to settle.
///
/// Later settlements of the other inputs have no observable effect. An
/// empty input rejects immediately with [`PromiseError::NoInputs`].
///
/// # Examples
///
/// ```rust,no_run
/// use kairos::{ThreadPool, tools};
/// use std::time::Duration;
///
/// let pool = ThreadPool::new(2).unwrap();
///
/// let winner = tools::race([
///     pool.delay("slow", Duration::from_millis(200)),
///     pool.delay("fast", Duration::from_millis(10)),
/// ]);
///
/// assert_eq!(winner.wait().unwrap(), "fast");
/// ```
pub fn race<T, I>(promises: I) -> Promise<T>
where
    T: Send + 'static,
    I: IntoIterator<Item = Promise<T>>,
{
    let (output, resolver) = Promise::pending();
    let mut inputs = 0usize;

    for promise in promises {
        let resolver = resolver.clone();
        inputs += 1;

        promise.subscribe(move |outcome| {
            resolver.settle(outcome);
        });
    }

    if inputs == 0 {
        resolver.reject(PromiseError::NoInputs);
    }

    output
}
