///
/// Producer/consumer workload over one `BoundedQueue`.
///
/// Every producer pushes `(producer, seq)` pairs with `seq` counting up from
/// zero. Consumers pop until the queue is closed and keep what they saw in
/// arrival order. Afterwards each pair must have been delivered exactly once,
/// and every consumer must have seen each producer's pairs in ascending
/// `seq` order.
///

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};
use turnstile_queue::BoundedQueue;

use super::{join_named, spawn_named};
use crate::config::QueueWorkload;
use crate::errors::StressError;
use crate::report::QueueReport;

/// `(producer, seq)`
pub type Delivery = (usize, usize);

/// Closes the queue on every exit path so no consumer is left parked.
struct CloseOnExit<'a, T>(&'a BoundedQueue<T>);

impl<T> Drop for CloseOnExit<'_, T> {
    fn drop(&mut self) {
        self.0.close();
    }
}

pub fn run_queue_workload(workload: &QueueWorkload) -> Result<QueueReport, StressError> {
    workload.validate()?;

    let queue = Arc::new(BoundedQueue::<Delivery>::new(workload.capacity)?);
    info!(
        capacity = workload.capacity,
        producers = workload.producers,
        consumers = workload.consumers,
        items = workload.total_items(),
        "starting queue workload"
    );
    let started = Instant::now();

    let per_consumer = {
        let closer = CloseOnExit(&*queue);

        let mut consumers = Vec::with_capacity(workload.consumers);
        for id in 0..workload.consumers {
            let queue = Arc::clone(&queue);
            consumers.push(spawn_named(format!("consumer-{id}"), move || {
                let mut received = Vec::new();
                while let Ok(item) = queue.pop() {
                    received.push(item);
                }
                debug!(consumer = id, received = received.len(), "consumer drained");
                received
            })?);
        }

        let mut producers = Vec::with_capacity(workload.producers);
        for id in 0..workload.producers {
            let queue = Arc::clone(&queue);
            let items = workload.items_per_producer;
            producers.push(spawn_named(format!("producer-{id}"), move || {
                for seq in 0..items {
                    if queue.push((id, seq)).is_err() {
                        break;
                    }
                }
            })?);
        }

        for producer in producers {
            join_named(producer)?;
        }
        drop(closer);

        consumers
            .into_iter()
            .map(join_named)
            .collect::<Result<Vec<_>, _>>()?
    };

    let delivered = verify_deliveries(workload.producers, workload.items_per_producer, &per_consumer)?;
    let elapsed = started.elapsed();
    info!(delivered, elapsed_ms = elapsed.as_millis() as u64, "queue workload clean");

    Ok(QueueReport {
        capacity: workload.capacity,
        producers: workload.producers,
        consumers: workload.consumers,
        delivered,
        per_consumer: per_consumer.iter().map(Vec::len).collect(),
        elapsed,
    })
}

/// Check exactly-once delivery and per-producer ordering. Returns the number
/// of items delivered.
pub fn verify_deliveries(
    producers: usize,
    items_per_producer: usize,
    per_consumer: &[Vec<Delivery>],
) -> Result<usize, StressError> {
    let mut seen = vec![0_usize; producers * items_per_producer];

    for (consumer, deliveries) in per_consumer.iter().enumerate() {
        let mut last_seq: Vec<Option<usize>> = vec![None; producers];

        for &(producer, seq) in deliveries {
            if producer >= producers || seq >= items_per_producer {
                return Err(StressError::UnknownItem { producer, seq });
            }
            if let Some(previous) = last_seq[producer] {
                if seq <= previous {
                    return Err(StressError::OutOfOrder {
                        consumer,
                        producer,
                        previous,
                        seq,
                    });
                }
            }
            last_seq[producer] = Some(seq);
            seen[producer * items_per_producer + seq] += 1;
        }
    }

    if let Some((index, &times)) = seen.iter().enumerate().find(|(_, times)| **times > 1) {
        return Err(StressError::DuplicateItem {
            producer: index / items_per_producer,
            seq: index % items_per_producer,
            times,
        });
    }

    let missing = seen.iter().filter(|times| **times == 0).count();
    if let Some(index) = seen.iter().position(|times| *times == 0) {
        return Err(StressError::LostItems {
            missing,
            producer: index / items_per_producer,
            seq: index % items_per_producer,
        });
    }

    Ok(seen.len())
}
