///
/// PriorityRwLock
///
/// One mutex protects all bookkeeping. Blocked readers park on `readers`,
/// blocked writers on `writers`, and every release broadcasts to both. Each
/// woken thread re-runs its admission predicate in a loop, so a wake-up that
/// does not let it in just sends it back to sleep.
///
/// The lock guards no data of its own. Use `read`/`write` for scoped
/// sections, or the explicit acquire/release pairs when the role has to
/// outlive a lexical scope.
///

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::admission::{reader_must_wait, writer_must_wait, LockState, LockStats};
use crate::error::LockError;
use crate::guard::{ReadGuard, WriteGuard};
use crate::priority::Priority;

pub struct PriorityRwLock {
    priority: Priority,
    state: Mutex<LockState>,
    readers: Condvar,
    writers: Condvar,
}

impl PriorityRwLock {
    pub fn new(priority: Priority) -> Self {
        Self {
            priority,
            state: Mutex::new(LockState::default()),
            readers: Condvar::new(),
            writers: Condvar::new(),
        }
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Block until this thread is admitted as a reader.
    pub fn acquire_read(&self) {
        let mut state = self.lock_state();
        state.enqueue_reader();

        while reader_must_wait(&state, self.priority) {
            state = self
                .readers
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        state.admit_reader(self.priority);
    }

    /// Give up a reader role taken with `acquire_read`.
    pub fn release_read(&self) -> Result<(), LockError> {
        let mut state = self.lock_state();
        state.release_reader(self.priority).inspect_err(|err| {
            tracing::warn!(priority = %self.priority, "{}", err);
        })?;

        self.wake_all();
        Ok(())
    }

    /// Block until this thread is admitted as the writer.
    pub fn acquire_write(&self) {
        let mut state = self.lock_state();
        state.enqueue_writer();

        while writer_must_wait(&state, self.priority) {
            state = self
                .writers
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        state.admit_writer();
    }

    /// Give up the writer role taken with `acquire_write`.
    pub fn release_write(&self) -> Result<(), LockError> {
        let mut state = self.lock_state();
        state.release_writer(self.priority).inspect_err(|err| {
            tracing::warn!(priority = %self.priority, "{}", err);
        })?;

        self.wake_all();
        Ok(())
    }

    pub fn read(&self) -> ReadGuard<'_> {
        self.acquire_read();
        ReadGuard::new(self)
    }

    pub fn write(&self) -> WriteGuard<'_> {
        self.acquire_write();
        WriteGuard::new(self)
    }

    pub fn stats(&self) -> LockStats {
        self.lock_state().snapshot()
    }

    fn wake_all(&self) {
        self.readers.notify_all();
        self.writers.notify_all();
    }

    fn lock_state(&self) -> MutexGuard<'_, LockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for PriorityRwLock {
    fn default() -> Self {
        Self::new(Priority::Readers)
    }
}

impl std::fmt::Debug for PriorityRwLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriorityRwLock")
            .field("priority", &self.priority)
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rwlock_basic() {
        let lock = PriorityRwLock::new(Priority::Writers);

        lock.acquire_read();
        lock.acquire_read();
        assert_eq!(lock.stats().active_readers, 2);
        lock.release_read().unwrap();
        lock.release_read().unwrap();

        lock.acquire_write();
        assert_eq!(lock.stats().active_writers, 1);
        lock.release_write().unwrap();

        assert_eq!(lock.stats(), LockStats::default());
    }

    #[test]
    fn test_rwlock_unheld_release_leaves_state_alone() {
        let lock = PriorityRwLock::new(Priority::n_way(2).unwrap());
        assert_eq!(lock.release_read(), Err(LockError::ReadNotHeld));
        assert_eq!(lock.release_write(), Err(LockError::WriteNotHeld));

        lock.acquire_read();
        assert_eq!(lock.release_write(), Err(LockError::WriteNotHeld));
        assert_eq!(lock.stats().active_readers, 1);
        lock.release_read().unwrap();
    }

    #[test]
    fn test_rwlock_guards_release_on_drop() {
        let lock = PriorityRwLock::default();
        {
            let _a = lock.read();
            let _b = lock.read();
            assert_eq!(lock.stats().active_readers, 2);
        }
        {
            let _w = lock.write();
            assert_eq!(lock.stats().active_writers, 1);
        }
        assert_eq!(lock.stats(), LockStats::default());
    }

    #[test]
    fn test_rwlock_debug_shows_policy() {
        let lock = PriorityRwLock::new(Priority::n_way(3).unwrap());
        let rendered = format!("{:?}", lock);
        assert!(rendered.contains("NWay(3)"));
        assert!(rendered.contains("active_readers: 0"));
    }
}
