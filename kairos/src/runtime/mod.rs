//! Execution runtime.
//!
//! This module contains the building blocks that actually run work:
//!
//! - [`queue`]: the blocking FIFO task queue,
//! - [`pool`]: the fixed-size thread pool and its shareable handle,
//! - [`builder`]: pool configuration,
//! - a timer thread backing [`PoolHandle::delay`](pool::PoolHandle::delay),
//! - a thread-local context exposing the pool a worker belongs to.
//!
//! Most users only need [`PoolBuilder`](builder::PoolBuilder) and
//! [`PoolHandle`](pool::PoolHandle).

pub(crate) mod context;
pub(crate) mod timer;

pub mod builder;
pub mod pool;
pub mod queue;

pub use context::worker_id;
