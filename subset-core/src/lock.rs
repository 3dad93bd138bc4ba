//! Advisory dataset locking
//!
//! A lock only tells observers that a dataset is being read for extraction;
//! it does not exclude concurrent access.

use tracing::trace;

use crate::dataset::DatasetId;

/// Something that can flag datasets as busy
pub trait DatasetLock: Send + Sync {
    /// Set or clear the busy flag of a dataset
    fn set_locked(&self, id: DatasetId, locked: bool);
}

/// Holds a dataset's lock for as long as it lives
///
/// The lock is released on drop, including on early returns and error paths.
#[must_use = "the dataset is unlocked as soon as the guard is dropped"]
pub struct LockGuard<'a, L: DatasetLock + ?Sized> {
    lock: &'a L,
    id: DatasetId,
}

impl<'a, L: DatasetLock + ?Sized> LockGuard<'a, L> {
    /// Lock `id` and return a guard that unlocks it
    pub fn acquire(lock: &'a L, id: DatasetId) -> Self {
        trace!(%id, "locking dataset");
        lock.set_locked(id, true);
        Self { lock, id }
    }

    /// The locked dataset
    pub fn id(&self) -> DatasetId {
        self.id
    }
}

impl<L: DatasetLock + ?Sized> Drop for LockGuard<'_, L> {
    fn drop(&mut self) {
        trace!(id = %self.id, "unlocking dataset");
        self.lock.set_locked(self.id, false);
    }
}
