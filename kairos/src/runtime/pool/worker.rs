use super::handle::PoolHandle;
use crate::runtime::context::enter_context;

/// A worker thread of the pool.
///
/// A `Worker` blocks on the shared queue, runs each task it receives to
/// completion, and exits once the queue has been shut down and drained.
/// It holds no task state between iterations.
pub(crate) struct Worker {
    /// Index of the worker inside its pool.
    id: usize,

    /// Handle to the owning pool.
    handle: PoolHandle,
}

impl Worker {
    pub(crate) fn new(id: usize, handle: PoolHandle) -> Self {
        Self { id, handle }
    }

    /// Runs the worker loop.
    ///
    /// The pool context (handle and worker id) is installed for the whole
    /// lifetime of the thread so tasks can reach their pool through
    /// [`PoolHandle::current`].
    pub(crate) fn run(self) {
        let Worker { id, handle } = self;

        enter_context(handle.clone(), id, || {
            tracing::debug!(worker = id, "worker started");

            while let Some(task) = handle.shared.queue.pop() {
                handle.shared.run(task);
            }

            tracing::debug!(worker = id, "worker stopped");
        });
    }
}
