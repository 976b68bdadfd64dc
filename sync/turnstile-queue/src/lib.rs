//!
//! turnstile-queue - Fixed-Capacity Blocking Queue
//!
//! A circular buffer shared by any number of producer and consumer threads.
//!
//! ## Hand-off
//!
//! - `BoundedQueue::new(capacity)` - Create an empty queue
//! - `queue.push(item)` - Insert at the tail (blocks while full)
//! - `queue.pop()` - Remove from the head (blocks while empty)
//! - `queue.close()` - Refuse further items and wake every blocked caller
//!
//! Items come out in exactly the order they went in, across any mix of
//! producers. A queue that is never closed keeps `pop` blocked forever once
//! producers stop; closing is the only way to release idle consumers.
//!
//! ## Sharing
//!
//! The queue is `Sync` and is meant to be shared through an `Arc`. It is
//! dropped only after every handle is gone, so no thread can still be parked
//! inside `push` or `pop` when the buffer is released.
//!

pub mod error;
pub mod queue;
mod semaphore;

pub use error::{PushError, QueueError};
pub use queue::BoundedQueue;
