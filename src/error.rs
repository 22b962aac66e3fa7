use std::collections::TryReserveError;
use thiserror::Error;

/// Failure to construct a [`BoundedQueue`](crate::queue::BoundedQueue) or a
/// [`PriorityRwLock`](crate::rwlock::PriorityRwLock).
///
/// Construction never aborts the process; every failure mode ends up here.
#[derive(Error, PartialEq, Eq, Clone, Debug)]
pub enum ConstructionError {
    /// A queue was requested with a capacity of zero.
    #[error("a queue needs a capacity of at least 1")]
    ZeroCapacity,
    /// The slot buffer of a queue couldn't be allocated.
    #[error("couldn't allocate the queue buffer: {0}")]
    Alloc(#[from] TryReserveError),
    /// An N-way policy was requested with a threshold below 1.
    ///
    /// Contains the rejected threshold.
    #[error("an N-way threshold must be at least 1, got {0}")]
    InvalidThreshold(i64),
}
