///
/// Lock error types.
///
/// Acquisition never fails. Errors cover building a policy from bad input
/// and releasing a role that no thread holds.
///

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    #[error("N-way batch size must be at least 1")]
    ZeroBatch,

    #[error("Invalid priority '{input}': {reason}")]
    InvalidPriority { input: String, reason: String },

    #[error("Released a read lock that no reader holds")]
    ReadNotHeld,

    #[error("Released a write lock that no writer holds")]
    WriteNotHeld,
}
