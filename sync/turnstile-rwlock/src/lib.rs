//!
//! turnstile-rwlock - Priority Reader-Writer Lock
//!
//! A lock that admits many readers or a single writer, with the order of
//! admission decided by a `Priority` chosen when the lock is built.
//!
//! ## Usage
//!
//! ```rust
//! use turnstile_rwlock::{Priority, PriorityRwLock};
//!
//! let lock = PriorityRwLock::new(Priority::n_way(4).unwrap());
//!
//! {
//!     let _read = lock.read();
//!     // shared section
//! }
//!
//! lock.acquire_write();
//! // exclusive section
//! lock.release_write().unwrap();
//! ```
//!
//! ## Policies
//!
//! - `Priority::Readers` - a reader enters whenever no writer holds the lock
//! - `Priority::Writers` - a reader also waits while any writer is queued
//! - `Priority::NWay(n)` - readers join the running batch until `n` have
//!   been admitted; a queued writer then gets the next turn, after which the
//!   turn goes back to readers
//!
//! No policy gives FIFO fairness between individual threads, and the lock
//! is not reentrant.
//!

pub mod admission;
pub mod error;
pub mod guard;
pub mod lock;
pub mod priority;

pub use admission::LockStats;
pub use error::LockError;
pub use guard::{ReadGuard, WriteGuard};
pub use lock::PriorityRwLock;
pub use priority::Priority;
