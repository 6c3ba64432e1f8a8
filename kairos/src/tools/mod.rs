//! Combinators over promises.
//!
//! These helpers compose several promises into one without blocking the
//! calling thread. They are built on continuations: no thread is parked
//! waiting for an input to settle.
//!
//! - [`all`] fulfills once every input is fulfilled,
//! - [`race`] settles like the first input to settle,
//! - [`retry`] re-runs a promise factory until it succeeds,
//! - [`timeout`] rejects if a promise takes too long.
//!
//! Delays and background execution live on
//! [`PoolHandle`](crate::PoolHandle), since they need a pool to run on.

mod all;
mod race;
mod retry;
mod timeout;

#[doc(inline)]
pub use all::all;

#[doc(inline)]
pub use race::race;

#[doc(inline)]
pub use retry::{Retry, retry};

#[doc(inline)]
pub use timeout::timeout;
