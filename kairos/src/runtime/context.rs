use crate::runtime::pool::PoolHandle;

use std::cell::{Cell, RefCell};

thread_local! {
    /// Handle of the pool owning the current worker thread.
    static CURRENT_POOL: RefCell<Option<PoolHandle>> = const { RefCell::new(None) };

    /// Index of the current worker thread inside its pool.
    static CURRENT_WORKER_ID: Cell<Option<usize>> = const { Cell::new(None) };
}

/// Installs the pool context for the duration of `f`.
///
/// The previous context is restored afterwards.
pub(crate) fn enter_context<R>(pool: PoolHandle, worker: usize, f: impl FnOnce() -> R) -> R {
    let prev_pool = CURRENT_POOL.with(|cell| cell.replace(Some(pool)));
    let prev_worker = CURRENT_WORKER_ID.with(|cell| cell.replace(Some(worker)));

    let out = f();

    CURRENT_WORKER_ID.with(|cell| cell.set(prev_worker));
    CURRENT_POOL.with(|cell| *cell.borrow_mut() = prev_pool);

    out
}

/// Returns the handle of the pool running the current thread, if any.
pub(crate) fn current_pool() -> Option<PoolHandle> {
    CURRENT_POOL.with(|cell| cell.borrow().clone())
}

/// Returns the index of the current worker thread inside its pool.
///
/// Returns `None` when called outside a pool worker.
pub fn worker_id() -> Option<usize> {
    CURRENT_WORKER_ID.with(Cell::get)
}
