///
/// Admission priority for `PriorityRwLock`.
///
/// Text form, as accepted by `FromStr` and produced by `Display`:
/// - `readers`
/// - `writers`
/// - `n-way:<n>` (also `nway:<n>`), with `n >= 1`
///

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::error::LockError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    /// Readers enter whenever no writer is active.
    Readers,
    /// Readers wait while any writer is active or queued.
    Writers,
    /// Reader batches of at most `n` admissions alternate with writers.
    NWay(NonZeroU32),
}

impl Priority {
    pub fn n_way(n: u32) -> Result<Self, LockError> {
        NonZeroU32::new(n).map(Self::NWay).ok_or(LockError::ZeroBatch)
    }

    /// Batch bound for `NWay`, `None` for the other policies.
    pub fn batch_size(self) -> Option<u32> {
        match self {
            Self::NWay(n) => Some(n.get()),
            Self::Readers | Self::Writers => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Readers => write!(f, "readers"),
            Self::Writers => write!(f, "writers"),
            Self::NWay(n) => write!(f, "n-way:{}", n),
        }
    }
}

impl FromStr for Priority {
    type Err = LockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| LockError::InvalidPriority {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "readers" | "reader" => return Ok(Self::Readers),
            "writers" | "writer" => return Ok(Self::Writers),
            _ => {}
        }

        let Some((name, n)) = normalized.split_once(':') else {
            return Err(invalid("expected 'readers', 'writers', or 'n-way:<n>'"));
        };
        if name != "n-way" && name != "nway" {
            return Err(invalid("unknown policy"));
        }

        let n: u32 = n
            .trim()
            .parse()
            .map_err(|_| invalid("batch size is not a number"))?;
        Self::n_way(n).map_err(|_| invalid("batch size must be at least 1"))
    }
}
