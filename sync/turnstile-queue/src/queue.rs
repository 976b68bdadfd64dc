///
/// Bounded MPMC Queue
///
/// Capacity is enforced by two counting semaphores: `free_slots` starts at
/// `capacity` and is taken by `push` before it touches the ring, `items`
/// starts at zero and is taken by `pop`. The ring itself sits behind one
/// mutex so head/tail updates are serialized across all callers, which is
/// what keeps delivery in insertion order.
///
/// ## Closing
///
/// `close` flips a flag under the ring mutex and then closes both
/// semaphores. Pushers fail from that point on and get their item back.
/// Poppers keep draining whatever was stored before the close and receive
/// `QueueError::Closed` once the ring is empty.
///

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{PushError, QueueError};
use crate::semaphore::Semaphore;

pub struct BoundedQueue<T> {
    capacity: usize,
    ring: Mutex<Ring<T>>,
    free_slots: Semaphore,
    items: Semaphore,
}

struct Ring<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    len: usize,
    closed: bool,
}

impl<T> Ring<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            tail: 0,
            len: 0,
            closed: false,
        }
    }

    fn push_back(&mut self, item: T) {
        debug_assert!(self.len < self.slots.len(), "ring overflow");
        self.slots[self.tail] = Some(item);
        self.tail = (self.tail + 1) % self.slots.len();
        self.len += 1;
    }

    fn pop_front(&mut self) -> Option<T> {
        let item = self.slots[self.head].take()?;
        self.head = (self.head + 1) % self.slots.len();
        self.len -= 1;
        Some(item)
    }
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        if capacity == 0 {
            return Err(QueueError::ZeroCapacity);
        }

        Ok(Self {
            capacity,
            ring: Mutex::new(Ring::with_capacity(capacity)),
            free_slots: Semaphore::new(capacity),
            items: Semaphore::new(0),
        })
    }

    /// Insert `item` at the tail, blocking while every slot is occupied.
    pub fn push(&self, item: T) -> Result<(), PushError<T>> {
        if self.free_slots.acquire().is_err() {
            return Err(PushError(item));
        }

        let mut ring = self.lock_ring();
        if ring.closed {
            drop(ring);
            self.free_slots.release();
            return Err(PushError(item));
        }

        ring.push_back(item);
        // Posted under the ring guard so a concurrent close cannot strand
        // an item without its permit.
        self.items.release();
        Ok(())
    }

    /// Remove the item at the head, blocking while the queue is empty.
    pub fn pop(&self) -> Result<T, QueueError> {
        self.items.acquire().map_err(|_| QueueError::Closed)?;

        let item = self.lock_ring().pop_front();
        match item {
            Some(item) => {
                self.free_slots.release();
                Ok(item)
            }
            None => Err(QueueError::Closed),
        }
    }

    /// Stop accepting items and wake every thread blocked in `push` or `pop`.
    pub fn close(&self) {
        let mut ring = self.lock_ring();
        if ring.closed {
            return;
        }
        ring.closed = true;
        self.free_slots.close();
        self.items.close();

        tracing::trace!(capacity = self.capacity, remaining = ring.len, "queue closed");
    }

    pub fn is_closed(&self) -> bool {
        self.lock_ring().closed
    }

    pub fn len(&self) -> usize {
        self.lock_ring().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock_ring(&self) -> MutexGuard<'_, Ring<T>> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> std::fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ring = self.lock_ring();
        f.debug_struct("BoundedQueue")
            .field("capacity", &self.capacity)
            .field("len", &ring.len)
            .field("closed", &ring.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_rejects_zero_capacity() {
        assert_eq!(
            BoundedQueue::<u32>::new(0).unwrap_err(),
            QueueError::ZeroCapacity
        );
    }

    #[test]
    fn test_queue_fifo_order() {
        let queue = BoundedQueue::new(4).unwrap();
        for i in 1..=4 {
            queue.push(i).unwrap();
        }
        assert_eq!(queue.len(), 4);

        let popped: Vec<_> = (0..4).map(|_| queue.pop().unwrap()).collect();
        assert_eq!(popped, vec![1, 2, 3, 4]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queue_wraps_around() {
        let queue = BoundedQueue::new(3).unwrap();

        for round in 0..5 {
            queue.push(round * 10).unwrap();
            queue.push(round * 10 + 1).unwrap();
            assert_eq!(queue.pop().unwrap(), round * 10);
            assert_eq!(queue.pop().unwrap(), round * 10 + 1);
        }

        let ring = queue.lock_ring();
        assert_eq!(ring.len, 0);
        assert_eq!(ring.head, ring.tail);
    }

    #[test]
    fn test_queue_close_drains_then_reports_closed() {
        let queue = BoundedQueue::new(4).unwrap();
        queue.push("a").unwrap();
        queue.push("b").unwrap();
        queue.close();

        assert!(queue.is_closed());
        assert_eq!(queue.push("c").unwrap_err().into_inner(), "c");
        assert_eq!(queue.pop(), Ok("a"));
        assert_eq!(queue.pop(), Ok("b"));
        assert_eq!(queue.pop(), Err(QueueError::Closed));
    }

    #[test]
    fn test_queue_close_is_idempotent() {
        let queue = BoundedQueue::<u8>::new(1).unwrap();
        queue.close();
        queue.close();
        assert!(queue.is_closed());
        assert_eq!(queue.pop(), Err(QueueError::Closed));
    }

    #[test]
    fn test_queue_closed_push_returns_slot() {
        let queue = BoundedQueue::new(2).unwrap();
        queue.close();
        assert!(queue.push(1).is_err());
        assert_eq!(queue.free_slots.available(), 2);
    }

    #[test]
    fn test_queue_drops_remaining_items() {
        use std::sync::Arc;

        let tracked = Arc::new(());
        let queue = BoundedQueue::new(2).unwrap();
        queue.push(Arc::clone(&tracked)).unwrap();
        queue.push(Arc::clone(&tracked)).unwrap();
        assert_eq!(Arc::strong_count(&tracked), 3);

        drop(queue);
        assert_eq!(Arc::strong_count(&tracked), 1);
    }
}
