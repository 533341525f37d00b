// src/engine/queue.rs

use std::collections::VecDeque;

use parking_lot::Mutex;
use tracing::{debug, warn};

/// Bounded FIFO that gates how many requests are in flight.
///
/// Semantics:
/// - An entry occupies a slot from `try_enqueue` until `release` is called
///   for it, i.e. while it sits in the queue *and* while it is being worked
///   on after `try_dequeue`.
/// - `try_enqueue` refuses new entries once `capacity` slots are occupied.
///   It never blocks.
/// - `try_dequeue` hands out entries in insertion order. It never blocks.
///
/// The capacity check and the insertion happen under one lock, so concurrent
/// producers can never push the queue past `capacity`.
#[derive(Debug)]
pub struct AdmissionQueue<T> {
    capacity: usize,
    state: Mutex<QueueState<T>>,
}

#[derive(Debug)]
struct QueueState<T> {
    entries: VecDeque<T>,
    /// Entries handed out by `try_dequeue` and not yet released.
    outstanding: usize,
}

impl<T> QueueState<T> {
    fn in_flight(&self) -> usize {
        self.entries.len() + self.outstanding
    }
}

impl<T> AdmissionQueue<T> {
    /// Create a queue with room for `capacity` entries.
    ///
    /// `capacity` is clamped to at least 1; a zero-capacity queue would turn
    /// every request away.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            state: Mutex::new(QueueState {
                entries: VecDeque::with_capacity(capacity),
                outstanding: 0,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries waiting to be dequeued.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Queued plus dequeued-but-unreleased entries.
    pub fn in_flight(&self) -> usize {
        self.state.lock().in_flight()
    }

    /// Add `item` unless every slot is taken. Returns whether it was added.
    pub fn try_enqueue(&self, item: T) -> bool {
        let mut state = self.state.lock();
        let in_flight = state.in_flight();

        if in_flight >= self.capacity {
            warn!(
                in_flight,
                capacity = self.capacity,
                "admission queue full; rejecting entry"
            );
            return false;
        }

        state.entries.push_back(item);
        debug!(
            in_flight = in_flight + 1,
            capacity = self.capacity,
            "entry admitted"
        );
        true
    }

    /// Remove the oldest waiting entry, if any. Its slot stays occupied until
    /// [`release`](Self::release) is called.
    pub fn try_dequeue(&self) -> Option<T> {
        let mut state = self.state.lock();
        let item = state.entries.pop_front()?;
        state.outstanding += 1;
        Some(item)
    }

    /// Free the slot of one previously dequeued entry.
    pub fn release(&self) {
        let mut state = self.state.lock();
        if state.outstanding == 0 {
            warn!("release called with no outstanding entries; ignoring");
            return;
        }
        state.outstanding -= 1;
        debug!(in_flight = state.in_flight(), "slot released");
    }
}
