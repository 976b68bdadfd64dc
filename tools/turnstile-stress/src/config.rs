///
/// # Stress Configuration
///
/// Workload settings read from a TOML file. Both sections and every key are
/// optional; missing values fall back to the defaults shown here, and unknown
/// keys are rejected so typos do not silently run the default workload.
///
/// ```toml
/// [queue]
/// capacity = 8
/// producers = 4
/// consumers = 3
/// items_per_producer = 1000
///
/// [lock]
/// priority = "n-way:4"
/// readers = 6
/// writers = 2
/// iterations = 500
/// ```
///

use std::num::NonZeroU32;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use turnstile_rwlock::Priority;

use crate::errors::StressError;

pub const DEFAULT_CAPACITY: usize = 8;
pub const DEFAULT_PRODUCERS: usize = 4;
pub const DEFAULT_CONSUMERS: usize = 3;
pub const DEFAULT_ITEMS_PER_PRODUCER: usize = 1_000;
pub const DEFAULT_PRIORITY: Priority = Priority::NWay(match NonZeroU32::new(4) {
    Some(n) => n,
    None => panic!("default batch size is non-zero"),
});
pub const DEFAULT_READERS: usize = 6;
pub const DEFAULT_WRITERS: usize = 2;
pub const DEFAULT_ITERATIONS: usize = 500;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StressConfig {
    pub queue: QueueWorkload,
    pub lock: LockWorkload,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueWorkload {
    pub capacity: usize,
    pub producers: usize,
    pub consumers: usize,
    pub items_per_producer: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LockWorkload {
    #[serde(deserialize_with = "deserialize_priority")]
    pub priority: Priority,
    pub readers: usize,
    pub writers: usize,
    pub iterations: usize,
}

impl Default for QueueWorkload {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            producers: DEFAULT_PRODUCERS,
            consumers: DEFAULT_CONSUMERS,
            items_per_producer: DEFAULT_ITEMS_PER_PRODUCER,
        }
    }
}

impl Default for LockWorkload {
    fn default() -> Self {
        Self {
            priority: DEFAULT_PRIORITY,
            readers: DEFAULT_READERS,
            writers: DEFAULT_WRITERS,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl QueueWorkload {
    pub fn validate(&self) -> Result<(), StressError> {
        if self.capacity == 0 {
            return Err(StressError::InvalidConfig(
                "queue.capacity must be at least 1".to_string(),
            ));
        }
        if self.producers == 0 || self.consumers == 0 {
            return Err(StressError::InvalidConfig(
                "queue needs at least one producer and one consumer".to_string(),
            ));
        }
        Ok(())
    }

    pub fn total_items(&self) -> usize {
        self.producers * self.items_per_producer
    }
}

impl LockWorkload {
    pub fn validate(&self) -> Result<(), StressError> {
        if self.readers == 0 && self.writers == 0 {
            return Err(StressError::InvalidConfig(
                "lock needs at least one reader or writer".to_string(),
            ));
        }
        if self.iterations == 0 {
            return Err(StressError::InvalidConfig(
                "lock.iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl StressConfig {
    pub fn validate(&self) -> Result<(), StressError> {
        self.queue.validate()?;
        self.lock.validate()
    }
}

pub fn parse_config(path: &Path) -> Result<StressConfig, StressError> {
    if !path.exists() {
        return Err(StressError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<StressConfig, StressError> {
    let config: StressConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

fn deserialize_priority<'de, D>(deserializer: D) -> Result<Priority, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}
