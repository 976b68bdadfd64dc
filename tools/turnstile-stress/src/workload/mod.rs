//!
//! Workloads
//!
//! Each workload spins up named worker threads, runs them to completion,
//! and turns whatever the threads observed into a report or the first law
//! violation found.
//!

pub mod lock;
pub mod queue;

use std::thread::{self, JoinHandle};

use crate::errors::StressError;

pub use lock::run_lock_workload;
pub use queue::run_queue_workload;

fn spawn_named<T, F>(name: String, body: F) -> Result<JoinHandle<T>, StressError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Ok(thread::Builder::new().name(name).spawn(body)?)
}

fn join_named<T>(handle: JoinHandle<T>) -> Result<T, StressError> {
    let name = handle.thread().name().unwrap_or("unnamed").to_string();
    handle.join().map_err(|_| StressError::WorkerPanicked(name))
}
