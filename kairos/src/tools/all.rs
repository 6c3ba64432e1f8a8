use crate::error::PromiseError;
use crate::promise::{Promise, Resolver};

use std::sync::{Arc, Mutex, PoisonError};

/// Waits for every promise to be fulfilled.
///
/// The returned promise is fulfilled with the values in input order, or
/// rejected with the first rejection to arrive. An empty input fulfills
/// immediately with an empty vector.
///
/// # Examples
///
/// ```rust
/// use kairos::{Promise, tools};
///
/// let values = tools::all((0..3).map(|i| Promise::resolved(i * 10)));
/// assert_eq!(values.wait().unwrap(), vec![0, 10, 20]);
/// ```
pub fn all<T, I>(promises: I) -> Promise<Vec<T>>
where
    T: Send + 'static,
    I: IntoIterator<Item = Promise<T>>,
{
    let promises: Vec<Promise<T>> = promises.into_iter().collect();

    if promises.is_empty() {
        return Promise::resolved(Vec::new());
    }

    let (output, resolver) = Promise::pending();
    let gather = Arc::new(Gather {
        slots: Mutex::new(Slots {
            values: promises.iter().map(|_| None).collect(),
            remaining: promises.len(),
        }),
        resolver,
    });

    for (index, promise) in promises.into_iter().enumerate() {
        let gather = Arc::clone(&gather);

        promise.subscribe(move |outcome| match outcome {
            Ok(value) => gather.fill(index, value),
            Err(error) => gather.fail(error),
        });
    }

    output
}

/// Collects the values of an [`all`] call.
struct Gather<T> {
    slots: Mutex<Slots<T>>,
    resolver: Resolver<Vec<T>>,
}

struct Slots<T> {
    values: Vec<Option<T>>,
    remaining: usize,
}

impl<T> Gather<T> {
    fn fill(&self, index: usize, value: T) {
        let values = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);

            slots.values[index] = Some(value);
            slots.remaining -= 1;

            if slots.remaining > 0 {
                return;
            }

            std::mem::take(&mut slots.values)
        };

        self.resolver.resolve(values.into_iter().flatten().collect());
    }

    fn fail(&self, error: PromiseError) {
        self.resolver.reject(error);
    }
}
