///
/// Reader/writer workload over one `PriorityRwLock`.
///
/// Writers bump a pair of counters one after the other, yielding in between,
/// so a reader that slips in beside a writer can catch them unequal. Each
/// section also checks the occupancy counters directly, and the final pair
/// value must equal the number of writes performed.
///

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tracing::{debug, info};
use turnstile_rwlock::PriorityRwLock;

use super::{join_named, spawn_named};
use crate::config::LockWorkload;
use crate::errors::StressError;
use crate::report::LockReport;

#[derive(Default)]
struct Shared {
    readers_inside: AtomicUsize,
    writers_inside: AtomicUsize,
    max_readers_inside: AtomicUsize,
    breaches: AtomicUsize,
    torn_reads: AtomicUsize,
    first: AtomicUsize,
    second: AtomicUsize,
}

pub fn run_lock_workload(workload: &LockWorkload) -> Result<LockReport, StressError> {
    workload.validate()?;

    let lock = Arc::new(PriorityRwLock::new(workload.priority));
    let shared = Arc::new(Shared::default());
    info!(
        priority = %workload.priority,
        readers = workload.readers,
        writers = workload.writers,
        iterations = workload.iterations,
        "starting lock workload"
    );
    let started = Instant::now();

    let mut handles = Vec::with_capacity(workload.readers + workload.writers);
    for id in 0..workload.readers {
        let lock = Arc::clone(&lock);
        let shared = Arc::clone(&shared);
        let iterations = workload.iterations;
        handles.push(spawn_named(format!("reader-{id}"), move || {
            for _ in 0..iterations {
                read_section(&lock, &shared);
            }
            debug!(reader = id, "reader finished");
        })?);
    }
    for id in 0..workload.writers {
        let lock = Arc::clone(&lock);
        let shared = Arc::clone(&shared);
        let iterations = workload.iterations;
        handles.push(spawn_named(format!("writer-{id}"), move || {
            for _ in 0..iterations {
                write_section(&lock, &shared);
            }
            debug!(writer = id, "writer finished");
        })?);
    }

    for handle in handles {
        join_named(handle)?;
    }

    let priority = workload.priority.to_string();
    let breaches = shared.breaches.load(Ordering::SeqCst);
    if breaches > 0 {
        return Err(StressError::ExclusionBreach { priority, breaches });
    }
    let torn = shared.torn_reads.load(Ordering::SeqCst);
    if torn > 0 {
        return Err(StressError::TornRead { priority, torn });
    }

    let writes = workload.writers * workload.iterations;
    let actual = shared.second.load(Ordering::SeqCst);
    if actual != writes {
        return Err(StressError::LostWrites {
            expected: writes,
            actual,
        });
    }

    debug!(stats = ?lock.stats(), "lock idle after workload");

    let elapsed = started.elapsed();
    info!(writes, elapsed_ms = elapsed.as_millis() as u64, "lock workload clean");

    Ok(LockReport {
        priority: workload.priority,
        readers: workload.readers,
        writers: workload.writers,
        reads: workload.readers * workload.iterations,
        writes,
        max_concurrent_readers: shared.max_readers_inside.load(Ordering::SeqCst),
        elapsed,
    })
}

fn read_section(lock: &PriorityRwLock, shared: &Shared) {
    let _guard = lock.read();

    let inside = shared.readers_inside.fetch_add(1, Ordering::SeqCst) + 1;
    shared.max_readers_inside.fetch_max(inside, Ordering::SeqCst);
    if shared.writers_inside.load(Ordering::SeqCst) > 0 {
        shared.breaches.fetch_add(1, Ordering::SeqCst);
    }

    let second = shared.second.load(Ordering::SeqCst);
    let first = shared.first.load(Ordering::SeqCst);
    if first != second {
        shared.torn_reads.fetch_add(1, Ordering::SeqCst);
    }

    shared.readers_inside.fetch_sub(1, Ordering::SeqCst);
}

fn write_section(lock: &PriorityRwLock, shared: &Shared) {
    let _guard = lock.write();

    let other_writers = shared.writers_inside.fetch_add(1, Ordering::SeqCst);
    if other_writers > 0 || shared.readers_inside.load(Ordering::SeqCst) > 0 {
        shared.breaches.fetch_add(1, Ordering::SeqCst);
    }

    let next = shared.first.load(Ordering::SeqCst) + 1;
    shared.first.store(next, Ordering::SeqCst);
    thread::yield_now();
    shared.second.store(next, Ordering::SeqCst);

    shared.writers_inside.fetch_sub(1, Ordering::SeqCst);
}
