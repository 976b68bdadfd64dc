///
/// Admission predicates and state transitions.
///
/// Everything here is a pure function of `LockState` and `Priority`; the lock
/// evaluates it while holding its internal mutex. The policy terms below are
/// always combined with plain exclusion: a reader waits while a writer is
/// active, and a writer waits while anyone is active.
///
/// | Priority | extra reader wait                                       | extra writer wait                      |
/// |----------|---------------------------------------------------------|----------------------------------------|
/// | Readers  | -                                                       | -                                      |
/// | Writers  | `waiting_writers > 0`                                   | -                                      |
/// | NWay(n)  | readers active: `waiting_writers > 0 && (admitted >= n || writers_turn)`; idle: `writers_turn && waiting_writers > 0` | `!writers_turn && waiting_readers > 0` |
///
/// ## N-way turns
///
/// `admitted_since_turn` counts readers admitted into the current batch and
/// stops at `n`. A reader release that finds the batch full hands the turn
/// to writers (`writers_turn = true`) and resets the count. The first reader
/// admitted after that starts a new batch, and a writer release always hands
/// the turn back to readers. Whenever `writers_turn` is set the count is 0.
///

use crate::error::LockError;
use crate::priority::Priority;

#[derive(Debug, Default)]
pub(crate) struct LockState {
    active_readers: usize,
    active_writers: usize,
    waiting_readers: usize,
    waiting_writers: usize,
    admitted_since_turn: u32,
    writers_turn: bool,
}

/// Point-in-time copy of a lock's bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockStats {
    pub active_readers: usize,
    pub active_writers: usize,
    pub waiting_readers: usize,
    pub waiting_writers: usize,
    /// Readers admitted into the current N-way batch.
    pub admitted_since_turn: u32,
    /// The next N-way admission goes to a writer.
    pub writers_turn: bool,
}

pub(crate) fn reader_must_wait(state: &LockState, priority: Priority) -> bool {
    if state.active_writers > 0 {
        return true;
    }

    match priority {
        Priority::Readers => false,
        Priority::Writers => state.waiting_writers > 0,
        Priority::NWay(n) => {
            if state.waiting_writers == 0 {
                false
            } else if state.active_readers > 0 {
                state.admitted_since_turn >= n.get() || state.writers_turn
            } else {
                state.writers_turn
            }
        }
    }
}

pub(crate) fn writer_must_wait(state: &LockState, priority: Priority) -> bool {
    if state.active_writers > 0 || state.active_readers > 0 {
        return true;
    }

    match priority {
        Priority::Readers | Priority::Writers => false,
        Priority::NWay(_) => !state.writers_turn && state.waiting_readers > 0,
    }
}

impl LockState {
    pub(crate) fn enqueue_reader(&mut self) {
        self.waiting_readers += 1;
    }

    pub(crate) fn enqueue_writer(&mut self) {
        self.waiting_writers += 1;
    }

    pub(crate) fn admit_reader(&mut self, priority: Priority) {
        debug_assert_eq!(self.active_writers, 0, "reader admitted beside a writer");
        self.waiting_readers -= 1;
        self.active_readers += 1;

        if let Priority::NWay(n) = priority {
            if self.writers_turn && self.admitted_since_turn == 0 {
                self.writers_turn = false;
                tracing::trace!("n-way turn returns to readers");
            }
            if !self.writers_turn && self.admitted_since_turn < n.get() {
                self.admitted_since_turn += 1;
            }
        }
    }

    pub(crate) fn admit_writer(&mut self) {
        debug_assert_eq!(self.active_readers, 0, "writer admitted beside readers");
        debug_assert_eq!(self.active_writers, 0, "second writer admitted");
        self.waiting_writers -= 1;
        self.active_writers += 1;
    }

    pub(crate) fn release_reader(&mut self, priority: Priority) -> Result<(), LockError> {
        if self.active_readers == 0 {
            return Err(LockError::ReadNotHeld);
        }
        self.active_readers -= 1;

        if let Priority::NWay(n) = priority {
            if self.admitted_since_turn == n.get() {
                self.writers_turn = true;
                tracing::trace!(batch = n.get(), "n-way batch full, turn passes to writers");
            }
            if self.writers_turn {
                self.admitted_since_turn = 0;
            }
        }
        Ok(())
    }

    pub(crate) fn release_writer(&mut self, priority: Priority) -> Result<(), LockError> {
        if self.active_writers == 0 {
            return Err(LockError::WriteNotHeld);
        }
        self.active_writers -= 1;

        if let Priority::NWay(_) = priority {
            self.writers_turn = false;
        }
        Ok(())
    }

    pub(crate) fn snapshot(&self) -> LockStats {
        LockStats {
            active_readers: self.active_readers,
            active_writers: self.active_writers,
            waiting_readers: self.waiting_readers,
            waiting_writers: self.waiting_writers,
            admitted_since_turn: self.admitted_since_turn,
            writers_turn: self.writers_turn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(
        active_readers: usize,
        active_writers: usize,
        waiting_readers: usize,
        waiting_writers: usize,
    ) -> LockState {
        LockState {
            active_readers,
            active_writers,
            waiting_readers,
            waiting_writers,
            ..LockState::default()
        }
    }

    fn n_way(n: u32) -> Priority {
        Priority::n_way(n).unwrap()
    }

    #[test]
    fn test_readers_priority_predicates() {
        let p = Priority::Readers;
        assert!(!reader_must_wait(&state(2, 0, 0, 1), p));
        assert!(reader_must_wait(&state(0, 1, 0, 0), p));
        assert!(writer_must_wait(&state(1, 0, 0, 0), p));
        assert!(writer_must_wait(&state(0, 1, 0, 0), p));
        assert!(!writer_must_wait(&state(0, 0, 3, 0), p));
    }

    #[test]
    fn test_writers_priority_predicates() {
        let p = Priority::Writers;
        assert!(reader_must_wait(&state(1, 0, 0, 1), p));
        assert!(reader_must_wait(&state(0, 1, 0, 0), p));
        assert!(!reader_must_wait(&state(3, 0, 0, 0), p));
        assert!(writer_must_wait(&state(1, 0, 0, 0), p));
        assert!(!writer_must_wait(&state(0, 0, 5, 0), p));
    }

    #[test]
    fn test_n_way_reader_joins_batch_below_bound() {
        let mut s = state(1, 0, 0, 1);
        s.admitted_since_turn = 1;
        assert!(!reader_must_wait(&s, n_way(2)));

        s.admitted_since_turn = 2;
        assert!(reader_must_wait(&s, n_way(2)));

        s.waiting_writers = 0;
        assert!(!reader_must_wait(&s, n_way(2)));
    }

    #[test]
    fn test_n_way_writers_turn_blocks_new_readers() {
        let mut s = state(1, 0, 0, 1);
        s.writers_turn = true;
        assert!(reader_must_wait(&s, n_way(3)));

        let mut idle = state(0, 0, 0, 1);
        idle.writers_turn = true;
        assert!(reader_must_wait(&idle, n_way(3)));
        assert!(!writer_must_wait(&idle, n_way(3)));

        idle.waiting_writers = 0;
        assert!(!reader_must_wait(&idle, n_way(3)));
    }

    #[test]
    fn test_n_way_writer_yields_to_waiting_readers() {
        let mut s = state(0, 0, 2, 1);
        assert!(writer_must_wait(&s, n_way(2)));
        assert!(!reader_must_wait(&s, n_way(2)));

        s.writers_turn = true;
        assert!(!writer_must_wait(&s, n_way(2)));
    }

    #[test]
    fn test_n_way_batch_counting_and_turns() {
        let p = n_way(2);
        let mut s = LockState::default();

        for _ in 0..3 {
            s.enqueue_reader();
            s.admit_reader(p);
        }
        assert_eq!(s.admitted_since_turn, 2, "count stops at n");

        s.release_reader(p).unwrap();
        assert!(s.writers_turn);
        assert_eq!(s.admitted_since_turn, 0);

        s.release_reader(p).unwrap();
        s.release_reader(p).unwrap();
        assert!(s.writers_turn);

        s.enqueue_writer();
        s.admit_writer();
        s.release_writer(p).unwrap();
        assert!(!s.writers_turn);

        s.enqueue_reader();
        s.admit_reader(p);
        assert_eq!(s.admitted_since_turn, 1);
    }

    #[test]
    fn test_reader_after_unclaimed_turn_starts_new_batch() {
        let p = n_way(1);
        let mut s = LockState::default();
        s.enqueue_reader();
        s.admit_reader(p);
        s.release_reader(p).unwrap();
        assert!(s.writers_turn);

        // No writer showed up; the next reader takes the turn back.
        s.enqueue_reader();
        s.admit_reader(p);
        assert!(!s.writers_turn);
        assert_eq!(s.admitted_since_turn, 1);
    }

    #[test]
    fn test_release_unheld_roles_is_reported() {
        let mut s = LockState::default();
        assert_eq!(s.release_reader(Priority::Readers), Err(LockError::ReadNotHeld));
        assert_eq!(s.release_writer(Priority::Writers), Err(LockError::WriteNotHeld));
        assert_eq!(s.snapshot(), LockStats::default());
    }

    #[test]
    fn test_policies_never_admit_alongside_writer() {
        for p in [Priority::Readers, Priority::Writers, n_way(1), n_way(4)] {
            for waiting_readers in 0..2 {
                for waiting_writers in 0..2 {
                    let s = state(0, 1, waiting_readers, waiting_writers);
                    assert!(reader_must_wait(&s, p), "{p}: reader beside writer");
                    assert!(writer_must_wait(&s, p), "{p}: two writers");

                    let s = state(1, 0, waiting_readers, waiting_writers);
                    assert!(writer_must_wait(&s, p), "{p}: writer beside reader");
                }
            }
        }
    }
}
