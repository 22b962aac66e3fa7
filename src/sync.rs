#![allow(unused_imports)]
cfg_loom! {
    pub(crate) use loom::sync::*;
    pub(crate) use std::sync::PoisonError;
}

cfg_not_loom! {
    pub(crate) use std::sync::*;
}

/// Locks `mutex`, ignoring poison.
///
/// Every critical section in this crate leaves its state consistent before
/// anything that can panic runs, so a poisoned guard is still valid.
#[inline]
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Waits on `condvar`, ignoring poison. See [`lock`].
#[inline]
pub(crate) fn wait<'a, T>(condvar: &Condvar, guard: MutexGuard<'a, T>) -> MutexGuard<'a, T> {
    condvar.wait(guard).unwrap_or_else(PoisonError::into_inner)
}
