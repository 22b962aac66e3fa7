use super::policy::{Counters, Fairness, Policy, Wake};
use crate::error::ConstructionError;
use crate::sync::{self, Condvar, Mutex};

/// The reader/writer state machine without any protected data.
///
/// Every `*_lock` call must be paired with exactly one matching `*_unlock`
/// call. [`PriorityRwLock`](super::PriorityRwLock) does the pairing with
/// guards; use this type directly only when there's no data to wrap.
///
/// # Example
///
/// ```
/// use priority_sync::rwlock::{Policy, RawPriorityRwLock};
///
/// let lock = RawPriorityRwLock::new(Policy::WriterPriority).unwrap();
/// lock.reader_lock();
/// lock.reader_lock();
/// assert!(!lock.try_writer_lock());
/// lock.reader_unlock();
/// lock.reader_unlock();
/// assert!(lock.try_writer_lock());
/// lock.writer_unlock();
/// ```
pub struct RawPriorityRwLock {
    policy: Policy,
    counters: Mutex<Counters>,
    readers_may_proceed: Condvar,
    writer_may_proceed: Condvar,
}

impl RawPriorityRwLock {
    /// Creates an idle lock.
    ///
    /// Fails with [`ConstructionError::InvalidThreshold`] for [`Policy::NWay(0)`](Policy::NWay).
    pub fn new(policy: Policy) -> Result<Self, ConstructionError> {
        let policy = policy.validate().map_err(|e| {
            tracing::warn!(?policy, error = %e, "rejected rwlock construction");
            e
        })?;
        tracing::debug!(?policy, "created priority rwlock");
        Ok(Self {
            policy,
            counters: Mutex::new(Counters::default()),
            readers_may_proceed: Condvar::new(),
            writer_may_proceed: Condvar::new(),
        })
    }

    /// The policy this lock was created with.
    #[inline]
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Acquires shared access, blocking while the policy keeps readers out.
    pub fn reader_lock(&self) {
        let mut c = sync::lock(&self.counters);
        c.waiting_readers += 1;
        while self.policy.reader_must_wait(&c) {
            tracing::trace!(policy = ?self.policy, counters = ?*c, "reader waiting");
            c = sync::wait(&self.readers_may_proceed, c);
        }
        c.waiting_readers -= 1;
        admit_reader(&mut c);
    }

    /// Releases shared access.
    ///
    /// # Panics
    ///
    /// Panics if no reader holds the lock.
    pub fn reader_unlock(&self) {
        let mut c = sync::lock(&self.counters);
        assert!(
            c.active_readers > 0,
            "reader_unlock called on a lock without readers"
        );
        c.active_readers -= 1;
        self.wake(&c);
    }

    /// Acquires exclusive access, blocking while the lock is held or the
    /// policy lets readers go first.
    pub fn writer_lock(&self) {
        let mut c = sync::lock(&self.counters);
        c.waiting_writers += 1;
        while self.policy.writer_must_wait(&c) {
            tracing::trace!(policy = ?self.policy, counters = ?*c, "writer waiting");
            c = sync::wait(&self.writer_may_proceed, c);
        }
        c.waiting_writers -= 1;
        admit_writer(&mut c);
    }

    /// Releases exclusive access.
    ///
    /// # Panics
    ///
    /// Panics if no writer holds the lock.
    pub fn writer_unlock(&self) {
        let mut c = sync::lock(&self.counters);
        assert!(
            c.active_writer,
            "writer_unlock called on a lock without a writer"
        );
        c.active_writer = false;
        self.wake(&c);
    }

    /// Acquires shared access if that's possible without blocking.
    ///
    /// Never registers the caller as a waiting reader.
    pub fn try_reader_lock(&self) -> bool {
        let mut c = sync::lock(&self.counters);
        if self.policy.reader_must_wait(&c) {
            return false;
        }
        admit_reader(&mut c);
        true
    }

    /// Acquires exclusive access if that's possible without blocking.
    ///
    /// Never registers the caller as a waiting writer.
    pub fn try_writer_lock(&self) -> bool {
        let mut c = sync::lock(&self.counters);
        if self.policy.writer_must_wait(&c) {
            return false;
        }
        admit_writer(&mut c);
        true
    }

    /// Copies the current bookkeeping of the lock.
    pub fn snapshot(&self) -> Counters {
        *sync::lock(&self.counters)
    }

    /// Must be called with the counters locked, right after a release.
    fn wake(&self, c: &Counters) {
        let wake = self.policy.wake_after_release(c);
        tracing::trace!(policy = ?self.policy, counters = ?*c, ?wake, "lock released");
        match wake {
            Wake::Nobody => {}
            Wake::OneReader => self.readers_may_proceed.notify_one(),
            Wake::AllReaders => self.readers_may_proceed.notify_all(),
            Wake::Writer => self.writer_may_proceed.notify_one(),
        }
    }
}

#[inline]
fn admit_reader(c: &mut Counters) {
    debug_assert!(!c.active_writer, "reader admitted next to a writer");
    c.active_readers += 1;
    c.admitted_since_writer += 1;
}

#[inline]
fn admit_writer(c: &mut Counters) {
    debug_assert!(
        c.active_readers == 0 && !c.active_writer,
        "writer admitted into a busy lock"
    );
    c.active_writer = true;
    c.admitted_since_writer = 0;
}

impl std::fmt::Debug for RawPriorityRwLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawPriorityRwLock")
            .field("policy", &self.policy)
            .field("counters", &self.snapshot())
            .finish()
    }
}
