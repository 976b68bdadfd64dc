///
/// Counting semaphore built on `Mutex` + `Condvar`.
///
/// `acquire` waits until a permit is available and takes it. Closing never
/// discards permits: an acquirer still takes any that remain, and only fails
/// once the count is zero on a closed semaphore.
///

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

pub(crate) struct Semaphore {
    state: Mutex<Permits>,
    available: Condvar,
}

struct Permits {
    count: usize,
    closed: bool,
}

/// The semaphore is closed and has no permits left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Closed;

impl Semaphore {
    pub(crate) fn new(permits: usize) -> Self {
        Self {
            state: Mutex::new(Permits {
                count: permits,
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    pub(crate) fn acquire(&self) -> Result<(), Closed> {
        let mut state = self.lock();

        while state.count == 0 && !state.closed {
            state = self
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        if state.count == 0 {
            return Err(Closed);
        }
        state.count -= 1;
        Ok(())
    }

    pub(crate) fn release(&self) {
        let mut state = self.lock();
        state.count += 1;
        self.available.notify_one();
    }

    pub(crate) fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        self.available.notify_all();
    }

    #[cfg(test)]
    pub(crate) fn available(&self) -> usize {
        self.lock().count
    }

    fn lock(&self) -> MutexGuard<'_, Permits> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
