use std::marker::PhantomData;

/// Makes a type `!Send` while leaving it `Sync`.
///
/// Lock guards use it so that a lock is always released from the thread that acquired it.
#[allow(dead_code)]
pub(crate) type PhantomUnsend = PhantomData<std::sync::MutexGuard<'static, ()>>;
