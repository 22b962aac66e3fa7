//! # Example
//!
//! ```
//! use priority_sync::queue::BoundedQueue;
//! use std::sync::Arc;
//! use std::thread;
//!
//! // holds up to 3 elements at once
//! let queue = Arc::new(BoundedQueue::new(4).unwrap());
//!
//! let producer = {
//!     let queue = Arc::clone(&queue);
//!     thread::spawn(move || {
//!         for c in "HELLO".chars() {
//!             queue.push(c);
//!         }
//!     })
//! };
//!
//! let word: String = (0..5).map(|_| queue.pop()).collect();
//! producer.join().unwrap();
//! assert_eq!(word, "HELLO");
//! ```
use crate::error::ConstructionError;
use crate::sync::{self, Condvar, Mutex};
use std::fmt;

mod error;
#[doc(inline)]
pub use error::{TryPopError, TryPushError};

/// A blocking circular buffer guarded by one mutex and two condition variables.
///
/// A queue created with capacity `C` holds at most `C - 1` elements: one slot
/// always stays free so that `head == tail` means empty and
/// `tail + 1 == head` (modulo `C`) means full.
///
/// Elements are owned by the queue from [`push`](BoundedQueue::push) until
/// they're handed to the caller of [`pop`](BoundedQueue::pop). Elements still
/// queued when the queue is dropped are dropped with it.
///
/// Waiters of the same kind are woken one at a time and in no particular order.
pub struct BoundedQueue<T> {
    capacity: usize,
    ring: Mutex<Ring<T>>,
    not_empty: Condvar,
    not_full: Condvar,
}

struct Ring<T> {
    slots: Box<[Option<T>]>,
    // next slot to pop
    head: usize,
    // next slot to push
    tail: usize,
}

impl<T> BoundedQueue<T> {
    /// Creates a queue with `capacity` slots, able to hold `capacity - 1` elements.
    ///
    /// Fails with [`ConstructionError::ZeroCapacity`] if `capacity` is 0 and with
    /// [`ConstructionError::Alloc`] if the slots can't be allocated.
    pub fn new(capacity: usize) -> Result<Self, ConstructionError> {
        let ring = match Ring::with_capacity(capacity) {
            Ok(ring) => ring,
            Err(e) => {
                tracing::warn!(capacity, error = %e, "rejected queue construction");
                return Err(e);
            }
        };
        if capacity == 1 {
            tracing::warn!("a queue with capacity 1 can never hold an element");
        }
        tracing::debug!(capacity, "created bounded queue");
        Ok(Self {
            capacity,
            ring: Mutex::new(ring),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        })
    }

    /// Pushes `item` to the back of the queue.
    ///
    /// If the queue is full, blocks until another thread pops an element.
    /// There's no timeout: without a consumer this never returns.
    pub fn push(&self, item: T) {
        let mut ring = sync::lock(&self.ring);
        while ring.is_full() {
            tracing::trace!(capacity = ring.capacity(), "queue full, waiting");
            ring = sync::wait(&self.not_full, ring);
        }
        ring.write(item);
        self.not_empty.notify_one();
    }

    /// Pops the element at the front of the queue.
    ///
    /// If the queue is empty, blocks until another thread pushes an element.
    /// There's no timeout: without a producer this never returns.
    pub fn pop(&self) -> T {
        let mut ring = sync::lock(&self.ring);
        while ring.is_empty() {
            tracing::trace!(capacity = ring.capacity(), "queue empty, waiting");
            ring = sync::wait(&self.not_empty, ring);
        }
        let item = ring.read();
        self.not_full.notify_one();
        item
    }

    /// Tries to push `item` without blocking.
    ///
    /// Hands `item` back in [`TryPushError::Full`] if the queue is full.
    pub fn try_push(&self, item: T) -> Result<(), TryPushError<T>> {
        let mut ring = sync::lock(&self.ring);
        if ring.is_full() {
            return Err(TryPushError::Full(item));
        }
        ring.write(item);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Tries to pop an element without blocking.
    pub fn try_pop(&self) -> Result<T, TryPopError> {
        let mut ring = sync::lock(&self.ring);
        if ring.is_empty() {
            return Err(TryPopError::Empty);
        }
        let item = ring.read();
        self.not_full.notify_one();
        Ok(item)
    }

    /// The number of slots, one more than the number of elements the queue can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of elements currently queued.
    ///
    /// The value may be stale by the time it's returned if other threads use the queue.
    pub fn len(&self) -> usize {
        sync::lock(&self.ring).len()
    }

    /// Checks if the queue currently holds no elements.
    pub fn is_empty(&self) -> bool {
        sync::lock(&self.ring).is_empty()
    }

    /// Checks if a [`push`](BoundedQueue::push) would currently block.
    pub fn is_full(&self) -> bool {
        sync::lock(&self.ring).is_full()
    }
}

impl<T> Ring<T> {
    fn with_capacity(capacity: usize) -> Result<Self, ConstructionError> {
        if capacity == 0 {
            return Err(ConstructionError::ZeroCapacity);
        }
        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity)?;
        slots.resize_with(capacity, || None);
        Ok(Self {
            slots: slots.into_boxed_slice(),
            head: 0,
            tail: 0,
        })
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn len(&self) -> usize {
        (self.tail + self.capacity() - self.head) % self.capacity()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    #[inline]
    fn is_full(&self) -> bool {
        (self.tail + 1) % self.capacity() == self.head
    }

    fn write(&mut self, item: T) {
        debug_assert!(!self.is_full(), "write to a full ring");
        let prev = self.slots[self.tail].replace(item);
        debug_assert!(prev.is_none(), "overwrote a queued element");
        self.tail = (self.tail + 1) % self.capacity();
    }

    fn read(&mut self) -> T {
        debug_assert!(!self.is_empty(), "read from an empty ring");
        let item = self.slots[self.head].take();
        self.head = (self.head + 1) % self.capacity();
        match item {
            Some(item) => item,
            None => unreachable!("slots in [head, tail) are always occupied"),
        }
    }
}

impl<T> fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests;
