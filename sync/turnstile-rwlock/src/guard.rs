///
/// Scoped lock roles.
///
/// A guard can only be built by the lock after the role was granted, so its
/// release cannot fail.
///

use crate::lock::PriorityRwLock;

#[must_use = "the read lock is released as soon as the guard is dropped"]
pub struct ReadGuard<'a> {
    lock: &'a PriorityRwLock,
}

#[must_use = "the write lock is released as soon as the guard is dropped"]
pub struct WriteGuard<'a> {
    lock: &'a PriorityRwLock,
}

impl<'a> ReadGuard<'a> {
    pub(crate) fn new(lock: &'a PriorityRwLock) -> Self {
        Self { lock }
    }
}

impl<'a> WriteGuard<'a> {
    pub(crate) fn new(lock: &'a PriorityRwLock) -> Self {
        Self { lock }
    }
}

impl Drop for ReadGuard<'_> {
    fn drop(&mut self) {
        let released = self.lock.release_read();
        debug_assert!(released.is_ok(), "read guard outlived its role");
    }
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        let released = self.lock.release_write();
        debug_assert!(released.is_ok(), "write guard outlived its role");
    }
}

impl std::fmt::Debug for ReadGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadGuard").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for WriteGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteGuard").finish_non_exhaustive()
    }
}
