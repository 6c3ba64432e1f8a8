//! # Kairos
//!
//! **Kairos** is a small execution framework for offloading blocking work
//! from latency-sensitive threads, built for the **Nebula** ecosystem.
//!
//! It pairs a fixed-size thread pool, fed by a blocking FIFO task queue, with
//! thread-safe promises that can be chained, recovered, combined and waited on.
//! Work is plain closures running on OS threads: there is no reactor and no
//! `async` machinery involved.
//!
//! It offers:
//!
//! - A **thread pool** with idle detection and graceful, draining shutdown
//! - **Promises** with single-assignment settlement, `then`, `catch_error`
//!   and blocking [`wait`](Promise::wait)
//! - **Combinators**: [`all`](tools::all), [`race`](tools::race),
//!   [`retry`](tools::retry), [`timeout`](tools::timeout), plus
//!   [`PoolHandle::delay`] and [`PoolHandle::spawn`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kairos::{PoolBuilder, tools};
//!
//! let pool = PoolBuilder::new().worker_threads(4).build().unwrap();
//!
//! let sizes: Vec<_> = ["a.png", "b.png", "c.png"]
//!     .into_iter()
//!     .map(|name| pool.spawn(move || name.len()))
//!     .collect();
//!
//! let total = tools::all(sizes)
//!     .map(|sizes| sizes.iter().sum::<usize>())
//!     .wait()
//!     .unwrap();
//!
//! assert_eq!(total, 15);
//! ```
//!
//! ## Modules
//!
//! - [`runtime`] — Task queue, thread pool and its configuration
//! - [`promise`] — Promises and resolvers
//! - [`tools`] — Combinators over promises
//! - [`error`] — Error types

pub mod error;
pub mod promise;
pub mod runtime;
pub mod tools;

pub use error::{BuildError, PromiseError};
pub use promise::{Promise, PromiseState, Resolver};
pub use runtime::builder::PoolBuilder;
pub use runtime::pool::{PoolHandle, Task, ThreadPool};
pub use runtime::queue::TaskQueue;
