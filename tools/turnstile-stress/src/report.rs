///
/// Workload reports and their plain-text rendering.
///

use std::fmt;
use std::time::Duration;

use turnstile_rwlock::Priority;

#[derive(Debug, Clone, PartialEq)]
pub struct QueueReport {
    pub capacity: usize,
    pub producers: usize,
    pub consumers: usize,
    pub delivered: usize,
    /// Items popped by each consumer, in consumer order.
    pub per_consumer: Vec<usize>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LockReport {
    pub priority: Priority,
    pub readers: usize,
    pub writers: usize,
    pub reads: usize,
    pub writes: usize,
    pub max_concurrent_readers: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StressReport {
    pub queue: QueueReport,
    pub lock: LockReport,
}

fn millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1_000.0
}

impl fmt::Display for QueueReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min = self.per_consumer.iter().min().copied().unwrap_or(0);
        let max = self.per_consumer.iter().max().copied().unwrap_or(0);

        writeln!(
            f,
            "queue  capacity={} producers={} consumers={}",
            self.capacity, self.producers, self.consumers
        )?;
        writeln!(
            f,
            "  delivered {} items exactly once in {:.1} ms",
            self.delivered,
            millis(self.elapsed)
        )?;
        write!(f, "  per consumer min={} max={}", min, max)
    }
}

impl fmt::Display for LockReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "lock   priority={} readers={} writers={}",
            self.priority, self.readers, self.writers
        )?;
        writeln!(
            f,
            "  {} reads, {} writes in {:.1} ms",
            self.reads,
            self.writes,
            millis(self.elapsed)
        )?;
        write!(f, "  peak concurrent readers {}", self.max_concurrent_readers)
    }
}

impl fmt::Display for StressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.queue)?;
        write!(f, "{}", self.lock)
    }
}
