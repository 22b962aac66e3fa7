use crate::error::ConstructionError;

/// Decides which side of a [`PriorityRwLock`](super::PriorityRwLock) gets
/// the lock when both readers and writers want it.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum Policy {
    /// Readers are admitted whenever no writer holds the lock.
    ///
    /// A writer only gets the lock once no reader holds it or waits for it,
    /// so a continuous stream of readers delays writers until it stops.
    ReaderPriority,
    /// No reader is admitted while a writer holds or waits for the lock.
    WriterPriority,
    /// Readers and writers alternate: while a writer waits, at most `n`
    /// readers are admitted after the last writer released the lock.
    ///
    /// `n` must be at least 1. Use [`Policy::n_way`] to build it from a
    /// signed threshold.
    NWay(usize),
}

impl Policy {
    /// Creates a [`Policy::NWay`] with the given threshold.
    ///
    /// Fails with [`ConstructionError::InvalidThreshold`] if `threshold < 1`.
    pub fn n_way(threshold: i64) -> Result<Self, ConstructionError> {
        if threshold < 1 {
            return Err(ConstructionError::InvalidThreshold(threshold));
        }
        // a threshold past usize::MAX is never reached either way
        Ok(Policy::NWay(usize::try_from(threshold).unwrap_or(usize::MAX)))
    }

    pub(super) fn validate(self) -> Result<Self, ConstructionError> {
        match self {
            Policy::NWay(0) => Err(ConstructionError::InvalidThreshold(0)),
            policy => Ok(policy),
        }
    }
}

/// The bookkeeping of a [`RawPriorityRwLock`](super::RawPriorityRwLock).
///
/// Returned by the `snapshot` methods. A snapshot is only a hint: other
/// threads may change the lock's state as soon as it's taken.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct Counters {
    /// Readers currently holding the lock.
    pub active_readers: usize,
    /// Whether a writer currently holds the lock.
    pub active_writer: bool,
    /// Readers blocked in `reader_lock`.
    pub waiting_readers: usize,
    /// Writers blocked in `writer_lock`.
    pub waiting_writers: usize,
    /// Readers admitted since a writer last acquired the lock.
    ///
    /// Only [`Policy::NWay`] makes decisions based on it.
    pub admitted_since_writer: usize,
}

/// Who to wake after the lock is released.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub(super) enum Wake {
    Nobody,
    OneReader,
    AllReaders,
    Writer,
}

/// The admission tests and wake decision of one policy.
///
/// `wake_after_release` has to wake someone whenever the matching
/// `*_must_wait` test may have turned false for a waiter, or that waiter sleeps forever.
pub(super) trait Fairness {
    fn reader_must_wait(&self, c: &Counters) -> bool;
    fn writer_must_wait(&self, c: &Counters) -> bool;
    fn wake_after_release(&self, c: &Counters) -> Wake;
}

struct PreferReaders;
struct PreferWriters;
struct Alternate {
    threshold: usize,
}

/// A writer can only enter an idle lock, regardless of the policy.
#[inline]
fn busy(c: &Counters) -> bool {
    c.active_readers > 0 || c.active_writer
}

impl Fairness for PreferReaders {
    fn reader_must_wait(&self, c: &Counters) -> bool {
        c.active_writer
    }

    fn writer_must_wait(&self, c: &Counters) -> bool {
        busy(c) || c.waiting_readers > 0
    }

    fn wake_after_release(&self, c: &Counters) -> Wake {
        if c.waiting_readers > 0 {
            Wake::AllReaders
        } else if c.active_readers == 0 {
            Wake::Writer
        } else {
            Wake::Nobody
        }
    }
}

impl Fairness for PreferWriters {
    fn reader_must_wait(&self, c: &Counters) -> bool {
        c.active_writer || c.waiting_writers > 0
    }

    fn writer_must_wait(&self, c: &Counters) -> bool {
        busy(c)
    }

    fn wake_after_release(&self, c: &Counters) -> Wake {
        if c.waiting_writers == 0 {
            Wake::AllReaders
        } else if c.active_readers == 0 {
            Wake::Writer
        } else {
            Wake::Nobody
        }
    }
}

impl Alternate {
    #[inline]
    fn quota_exhausted(&self, c: &Counters) -> bool {
        c.admitted_since_writer >= self.threshold
    }
}

impl Fairness for Alternate {
    fn reader_must_wait(&self, c: &Counters) -> bool {
        c.active_writer
            || (c.waiting_writers > 0 && self.quota_exhausted(c))
            // strict reader/writer alternation for a threshold of 1
            || (c.active_writer && self.threshold == 1)
    }

    fn writer_must_wait(&self, c: &Counters) -> bool {
        busy(c) || (c.waiting_readers > 0 && !self.quota_exhausted(c))
    }

    fn wake_after_release(&self, c: &Counters) -> Wake {
        if c.waiting_writers == 0 {
            return Wake::AllReaders;
        }
        if self.quota_exhausted(c) && c.active_readers == 0 {
            Wake::Writer
        } else if c.waiting_readers > 0 {
            Wake::OneReader
        } else if c.active_readers == 0 {
            // can hand the lock to a writer before the quota is used up
            Wake::Writer
        } else {
            Wake::Nobody
        }
    }
}

impl Fairness for Policy {
    fn reader_must_wait(&self, c: &Counters) -> bool {
        match *self {
            Policy::ReaderPriority => PreferReaders.reader_must_wait(c),
            Policy::WriterPriority => PreferWriters.reader_must_wait(c),
            Policy::NWay(threshold) => Alternate { threshold }.reader_must_wait(c),
        }
    }

    fn writer_must_wait(&self, c: &Counters) -> bool {
        match *self {
            Policy::ReaderPriority => PreferReaders.writer_must_wait(c),
            Policy::WriterPriority => PreferWriters.writer_must_wait(c),
            Policy::NWay(threshold) => Alternate { threshold }.writer_must_wait(c),
        }
    }

    fn wake_after_release(&self, c: &Counters) -> Wake {
        match *self {
            Policy::ReaderPriority => PreferReaders.wake_after_release(c),
            Policy::WriterPriority => PreferWriters.wake_after_release(c),
            Policy::NWay(threshold) => Alternate { threshold }.wake_after_release(c),
        }
    }
}
