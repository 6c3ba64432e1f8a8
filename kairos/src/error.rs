//! Error types.
//!
//! [`PromiseError`] is the rejection payload carried through promise chains.
//! [`BuildError`] is returned when a thread pool cannot be constructed.

use std::any::Any;
use std::error::Error as StdError;
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// Reason a promise was rejected.
///
/// The error is cheap to clone: user errors are stored behind an [`Arc`], so
/// the same payload can travel through any number of `then` / `catch_error`
/// hops without loss.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PromiseError {
    /// A user supplied error value.
    #[error(transparent)]
    Failed(Arc<dyn StdError + Send + Sync + 'static>),

    /// A plain error message.
    #[error("{0}")]
    Message(String),

    /// An executor, continuation or spawned closure panicked.
    #[error("panicked: {0}")]
    Panicked(String),

    /// Every resolver was dropped while the promise was still pending.
    #[error("promise abandoned before it was settled")]
    Abandoned,

    /// A [`timeout`](crate::tools::timeout) elapsed first.
    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    /// A combinator that needs at least one input got none.
    #[error("no input promises")]
    NoInputs,
}

impl PromiseError {
    /// Wraps an arbitrary error value.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        PromiseError::Failed(Arc::new(error))
    }

    /// Creates an error from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        PromiseError::Message(message.into())
    }

    /// Returns the wrapped error if it is a [`Failed`](Self::Failed) of type `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        match self {
            PromiseError::Failed(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Converts a panic payload caught by `catch_unwind`.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<&'static str>() {
            Ok(message) => (*message).to_owned(),
            Err(payload) => match payload.downcast::<String>() {
                Ok(message) => *message,
                Err(_) => "non-string panic payload".to_owned(),
            },
        };

        PromiseError::Panicked(message)
    }
}

/// Error returned by [`PoolBuilder::build`](crate::PoolBuilder::build).
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The pool was configured with zero worker threads.
    #[error("worker_threads must be > 0")]
    ZeroWorkers,

    /// The operating system refused to spawn a thread.
    #[error("failed to spawn {thread}")]
    Spawn {
        /// Name of the worker or timer thread that failed to start.
        thread: String,
        #[source]
        source: io::Error,
    },
}
