//! Thread pool.
//!
//! A [`ThreadPool`] owns a fixed set of worker threads draining one
//! [`TaskQueue`](crate::TaskQueue). Work is submitted through the pool or
//! through a cloned [`PoolHandle`], which can be moved into tasks to
//! schedule nested work.
//!
//! It is composed of:
//! - [`handle`]: state shared by the pool, its workers and its handles,
//! - [`thread_pool`]: construction and draining shutdown,
//! - [`worker`]: the worker loop.

mod handle;
mod thread_pool;
mod worker;

pub use handle::{PoolHandle, Task};
pub use thread_pool::ThreadPool;
