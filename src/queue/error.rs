use std::fmt;
use thiserror::Error;

/// An enumeration listing the failure modes of the [`try_push`](super::BoundedQueue::try_push) method.
#[derive(Error, PartialEq, Eq, Clone, Copy)]
pub enum TryPushError<T> {
    /// The element couldn't be pushed because the queue already
    /// held `capacity - 1` elements.
    ///
    /// Contains the element that failed to push.
    #[error("pushing to a full queue")]
    Full(T),
}

/// An enumeration listing the failure modes of the [`try_pop`](super::BoundedQueue::try_pop) method.
#[derive(Error, PartialEq, Eq, Clone, Copy, Debug)]
pub enum TryPopError {
    /// No element was popped because the queue was empty.
    #[error("popping from an empty queue")]
    Empty,
}

impl<T> TryPushError<T> {
    /// Returns the element that failed to push.
    pub fn into_inner(self) -> T {
        match self {
            TryPushError::Full(item) => item,
        }
    }
}

impl<T> fmt::Debug for TryPushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TryPushError::Full(_) => "Full(..)".fmt(f),
        }
    }
}
