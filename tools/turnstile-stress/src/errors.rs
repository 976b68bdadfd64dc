///
/// Stress harness error types.
///
/// Covers loading the TOML config, building the primitives, and every law a
/// workload can catch being broken.
///

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;
use turnstile_queue::QueueError;
use turnstile_rwlock::LockError;

#[derive(Debug, Error, Diagnostic)]
pub enum StressError {
    #[error("Config not found at {path}")]
    #[diagnostic(code(turnstile::config::not_found))]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to parse config: {0}")]
    #[diagnostic(
        code(turnstile::config::parse),
        help("sections are [queue] and [lock]; priority is \"readers\", \"writers\", or \"n-way:<n>\"")
    )]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    #[diagnostic(code(turnstile::config::invalid))]
    InvalidConfig(String),

    #[error("Queue setup failed: {0}")]
    #[diagnostic(code(turnstile::queue))]
    Queue(#[from] QueueError),

    #[error("Lock setup failed: {0}")]
    #[diagnostic(code(turnstile::lock))]
    Lock(#[from] LockError),

    #[error("{missing} item(s) never delivered, first was producer {producer} seq {seq}")]
    #[diagnostic(code(turnstile::law::lost))]
    LostItems {
        missing: usize,
        producer: usize,
        seq: usize,
    },

    #[error("Item from producer {producer} seq {seq} delivered {times} times")]
    #[diagnostic(code(turnstile::law::duplicate))]
    DuplicateItem {
        producer: usize,
        seq: usize,
        times: usize,
    },

    #[error("Consumer {consumer} saw producer {producer} out of order: seq {previous} then {seq}")]
    #[diagnostic(code(turnstile::law::fifo))]
    OutOfOrder {
        consumer: usize,
        producer: usize,
        previous: usize,
        seq: usize,
    },

    #[error("Delivered item from unknown producer {producer} seq {seq}")]
    #[diagnostic(code(turnstile::law::unknown))]
    UnknownItem { producer: usize, seq: usize },

    #[error("Exclusion breached {breaches} time(s) under {priority}")]
    #[diagnostic(code(turnstile::law::exclusion))]
    ExclusionBreach { priority: String, breaches: usize },

    #[error("Readers saw {torn} torn write(s) under {priority}")]
    #[diagnostic(code(turnstile::law::torn_read))]
    TornRead { priority: String, torn: usize },

    #[error("Expected {expected} writes but counted {actual}")]
    #[diagnostic(code(turnstile::law::lost_write))]
    LostWrites { expected: usize, actual: usize },

    #[error("Worker thread '{0}' panicked")]
    #[diagnostic(code(turnstile::worker))]
    WorkerPanicked(String),

    #[error("{0}")]
    #[diagnostic(code(turnstile::io))]
    Io(#[from] std::io::Error),
}
