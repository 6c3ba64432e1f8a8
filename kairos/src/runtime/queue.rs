use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Thread-safe blocking FIFO queue.
///
/// The queue stores items behind a single mutex and uses a condition
/// variable to park consumers until an item arrives or the queue is
/// shut down.
///
/// After [`shutdown`](Self::shutdown) the queue is retired: consumers keep
/// receiving the remaining backlog, then [`pop`](Self::pop) returns `None`.
/// This is the only termination signal a draining consumer gets.
///
/// After [`close`](Self::close) the queue also refuses new items. Closing and
/// pushing are decided under the same lock, so an item is either accepted
/// before the close or handed back to its producer.
pub struct TaskQueue<T> {
    /// Queued items and the lifecycle flags, guarded together.
    inner: Mutex<Inner<T>>,

    /// Signalled on push (one waiter) and on shutdown (all waiters).
    available: Condvar,
}

struct Inner<T> {
    items: VecDeque<T>,
    shutdown: bool,
    closed: bool,
}

impl<T> TaskQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::new(),
                shutdown: false,
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Appends an item to the tail and wakes one waiting consumer.
    ///
    /// Never blocks beyond the critical section. Items pushed after shutdown
    /// are still delivered while the backlog drains; once the queue is
    /// closed the item is returned as `Err`.
    pub fn push(&self, item: T) -> Result<(), T> {
        let mut inner = self.lock();
        if inner.closed {
            return Err(item);
        }

        inner.items.push_back(item);
        drop(inner);

        self.available.notify_one();
        Ok(())
    }

    /// Removes the head item, blocking until one is available.
    ///
    /// Returns `None` once the queue has been shut down and is empty.
    pub fn pop(&self) -> Option<T> {
        let mut inner = self.lock();

        loop {
            if let Some(item) = inner.items.pop_front() {
                return Some(item);
            }

            if inner.shutdown {
                return None;
            }

            inner = self
                .available
                .wait(inner)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Removes the head item without blocking.
    pub fn try_pop(&self) -> Option<T> {
        self.lock().items.pop_front()
    }

    /// Signals shutdown and wakes every waiting consumer.
    ///
    /// Calling this more than once has no further effect.
    pub fn shutdown(&self) {
        self.lock().shutdown = true;
        self.available.notify_all();
    }

    /// Shuts the queue down and refuses every later push.
    ///
    /// Items already queued stay available to [`pop`](Self::pop) and
    /// [`try_pop`](Self::try_pop).
    pub fn close(&self) {
        let mut inner = self.lock();
        inner.shutdown = true;
        inner.closed = true;
        drop(inner);

        self.available.notify_all();
    }

    /// Returns `true` if [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Returns `true` if [`shutdown`](Self::shutdown) has been called.
    pub fn is_shutdown(&self) -> bool {
        self.lock().shutdown
    }

    /// Returns `true` if no item is queued.
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    // No user code runs while the lock is held, so a poisoned lock still
    // guards a consistent queue.
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
