//! # Example
//!
//! ```
//! use priority_sync::rwlock::{Policy, PriorityRwLock};
//! use std::sync::Arc;
//! use std::thread;
//!
//! // at most 3 readers get in ahead of a waiting writer
//! let policy = Policy::n_way(3).unwrap();
//! let config = Arc::new(PriorityRwLock::new(policy, vec![1, 2, 3]).unwrap());
//!
//! let writer = {
//!     let config = Arc::clone(&config);
//!     thread::spawn(move || config.write().push(4))
//! };
//! let sum: i32 = config.read().iter().sum();
//! assert!(sum == 6 || sum == 10);
//!
//! writer.join().unwrap();
//! assert_eq!(*config.read(), [1, 2, 3, 4]);
//! ```
use crate::cell::{ConstPtr, MutPtr, UnsafeCell};
use crate::error::ConstructionError;
use crate::util::marker::PhantomUnsend;
use std::fmt;
use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};

mod policy;
#[doc(inline)]
pub use policy::{Counters, Policy};

mod raw;
#[doc(inline)]
pub use raw::RawPriorityRwLock;

/// A reader/writer lock protecting a `T`, with a fairness [`Policy`] chosen at construction.
///
/// Any number of [`ReadGuard`]s or a single [`WriteGuard`] can exist at a
/// time. Which blocked thread gets in next is decided by the policy; within
/// one side, waiters are woken in no particular order.
///
/// The lock isn't reentrant: a thread that already holds it and asks for it
/// again may deadlock.
pub struct PriorityRwLock<T> {
    raw: RawPriorityRwLock,
    data: UnsafeCell<T>,
}

/// Shared access to the data of a [`PriorityRwLock`], released on drop.
#[must_use = "if unused the lock will immediately unlock"]
pub struct ReadGuard<'a, T> {
    lock: &'a PriorityRwLock<T>,
    // released before the reader lock
    data: ManuallyDrop<ConstPtr<T>>,
    _unsend: PhantomUnsend,
}

/// Exclusive access to the data of a [`PriorityRwLock`], released on drop.
#[must_use = "if unused the lock will immediately unlock"]
pub struct WriteGuard<'a, T> {
    lock: &'a PriorityRwLock<T>,
    // released before the writer lock
    data: ManuallyDrop<MutPtr<T>>,
    _unsend: PhantomUnsend,
}

impl<T> PriorityRwLock<T> {
    /// Creates an unlocked lock protecting `value`.
    ///
    /// Fails with [`ConstructionError::InvalidThreshold`] for [`Policy::NWay(0)`](Policy::NWay).
    pub fn new(policy: Policy, value: T) -> Result<Self, ConstructionError> {
        Ok(Self {
            raw: RawPriorityRwLock::new(policy)?,
            data: UnsafeCell::new(value),
        })
    }

    /// Locks for shared access, blocking while the policy keeps readers out.
    pub fn read(&self) -> ReadGuard<'_, T> {
        self.raw.reader_lock();
        ReadGuard::new(self)
    }

    /// Locks for exclusive access, blocking until the policy lets this writer in.
    pub fn write(&self) -> WriteGuard<'_, T> {
        self.raw.writer_lock();
        WriteGuard::new(self)
    }

    /// Locks for shared access if that's possible without blocking.
    pub fn try_read(&self) -> Option<ReadGuard<'_, T>> {
        self.raw.try_reader_lock().then(|| ReadGuard::new(self))
    }

    /// Locks for exclusive access if that's possible without blocking.
    pub fn try_write(&self) -> Option<WriteGuard<'_, T>> {
        self.raw.try_writer_lock().then(|| WriteGuard::new(self))
    }

    /// Returns a mutable reference to the data.
    ///
    /// No locking is needed: the `&mut` borrow guarantees there are no guards.
    pub fn get_mut(&mut self) -> &mut T {
        /*SAFETY:
         *&mut self rules out any other access to data.
         */
        self.data.with_mut(|ptr| unsafe { &mut *ptr })
    }

    /// The policy this lock was created with.
    #[inline]
    pub fn policy(&self) -> Policy {
        self.raw.policy()
    }

    /// Copies the current bookkeeping of the lock.
    pub fn snapshot(&self) -> Counters {
        self.raw.snapshot()
    }
}

impl<'a, T> ReadGuard<'a, T> {
    /// Must only be called after a successful reader lock.
    fn new(lock: &'a PriorityRwLock<T>) -> Self {
        Self {
            lock,
            data: ManuallyDrop::new(lock.data.get()),
            _unsend: PhantomUnsend {},
        }
    }
}

impl<'a, T> WriteGuard<'a, T> {
    /// Must only be called after a successful writer lock.
    fn new(lock: &'a PriorityRwLock<T>) -> Self {
        Self {
            lock,
            data: ManuallyDrop::new(lock.data.get_mut()),
            _unsend: PhantomUnsend {},
        }
    }
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        /*SAFETY:
         *a reader lock is held, so there's no writer until this guard drops.
         */
        unsafe { (*self.data).deref() }
    }
}

impl<T> Deref for WriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        /*SAFETY:
         *the writer lock is held, and a shared borrow of the guard
         *rules out a live &mut T.
         */
        self.data.with(|ptr| unsafe { &*ptr })
    }
}

impl<T> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        /*SAFETY:
         *the writer lock is held and the guard is borrowed mutably.
         */
        unsafe { (*self.data).deref() }
    }
}

impl<T> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        /*SAFETY:
         *data is never used again.
         */
        unsafe { ManuallyDrop::drop(&mut self.data) };
        self.lock.raw.reader_unlock();
    }
}

impl<T> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        /*SAFETY:
         *data is never used again.
         */
        unsafe { ManuallyDrop::drop(&mut self.data) };
        self.lock.raw.writer_unlock();
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T: fmt::Debug> fmt::Debug for WriteGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T> fmt::Debug for PriorityRwLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityRwLock")
            .field("policy", &self.policy())
            .field("counters", &self.snapshot())
            .finish_non_exhaustive()
    }
}

unsafe impl<T: Send> Send for PriorityRwLock<T> {}
unsafe impl<T: Send + Sync> Sync for PriorityRwLock<T> {}

// a shared guard only hands out &T
unsafe impl<T: Sync> Sync for ReadGuard<'_, T> {}
unsafe impl<T: Sync> Sync for WriteGuard<'_, T> {}
