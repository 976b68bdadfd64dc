///
/// # Mutual Exclusion Tests for turnstile-rwlock
///
/// Mixed reader/writer load under every priority. Each critical section
/// checks the occupancy counters it can see, and writers bump a counter that
/// must come out exact.
///

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use turnstile_rwlock::{LockStats, Priority, PriorityRwLock};

const READERS: usize = 6;
const WRITERS: usize = 3;
const ITERATIONS: usize = 300;

#[derive(Default)]
struct Occupancy {
    readers: AtomicUsize,
    writers: AtomicUsize,
    total_writes: AtomicUsize,
}

fn hammer(priority: Priority) {
    let lock = Arc::new(PriorityRwLock::new(priority));
    let occupancy = Arc::new(Occupancy::default());
    let mut handles = Vec::new();

    for _ in 0..READERS {
        let lock = Arc::clone(&lock);
        let occupancy = Arc::clone(&occupancy);
        handles.push(thread::spawn(move || {
            for _ in 0..ITERATIONS {
                let _guard = lock.read();
                occupancy.readers.fetch_add(1, Ordering::SeqCst);
                assert_eq!(occupancy.writers.load(Ordering::SeqCst), 0, "{priority}: reader beside writer");
                let stats = lock.stats();
                assert_eq!(stats.active_writers, 0);
                assert!(stats.active_readers >= 1);
                occupancy.readers.fetch_sub(1, Ordering::SeqCst);
            }
        }));
    }

    for _ in 0..WRITERS {
        let lock = Arc::clone(&lock);
        let occupancy = Arc::clone(&occupancy);
        handles.push(thread::spawn(move || {
            for _ in 0..ITERATIONS {
                lock.acquire_write();
                assert_eq!(occupancy.writers.fetch_add(1, Ordering::SeqCst), 0, "{priority}: two writers");
                assert_eq!(occupancy.readers.load(Ordering::SeqCst), 0, "{priority}: writer beside reader");
                let stats = lock.stats();
                assert_eq!((stats.active_writers, stats.active_readers), (1, 0));
                occupancy.total_writes.fetch_add(1, Ordering::SeqCst);
                occupancy.writers.fetch_sub(1, Ordering::SeqCst);
                lock.release_write().unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(occupancy.total_writes.load(Ordering::SeqCst), WRITERS * ITERATIONS);
    let stats = lock.stats();
    assert_eq!(
        (stats.active_readers, stats.active_writers, stats.waiting_readers, stats.waiting_writers),
        (0, 0, 0, 0)
    );
}

#[test]
fn test_exclusion_readers_priority() {
    hammer(Priority::Readers);
}

#[test]
fn test_exclusion_writers_priority() {
    hammer(Priority::Writers);
}

#[test]
fn test_exclusion_n_way_small_batch() {
    hammer(Priority::n_way(1).unwrap());
}

#[test]
fn test_exclusion_n_way_large_batch() {
    hammer(Priority::n_way(8).unwrap());
}

#[test]
fn test_idle_lock_reports_empty_stats() {
    let lock = PriorityRwLock::new(Priority::Writers);
    assert_eq!(lock.stats(), LockStats::default());
    assert_eq!(lock.priority(), Priority::Writers);
}
