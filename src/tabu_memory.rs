//! Short-term memory of recently visited tours.

use crate::tour::Tour;
use std::collections::{HashMap, VecDeque};

/// Bounded FIFO of tours with constant-time membership.
///
/// The queue keeps insertion order for eviction; the count map answers
/// `contains`. A tour recorded twice stays tabu until both copies have been
/// evicted, which is what a plain list scan would report.
#[derive(Debug, Clone)]
pub struct TabuMemory {
    capacity: usize,
    queue: VecDeque<Tour>,
    counts: HashMap<Tour, usize>,
}

impl TabuMemory {
    /// Create an empty memory holding at most `capacity` tours.
    ///
    /// A zero capacity is raised to one; the engine rejects it earlier.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        TabuMemory {
            capacity,
            queue: VecDeque::with_capacity(capacity + 1),
            counts: HashMap::with_capacity(capacity + 1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Whether `tour` is currently forbidden.
    pub fn contains(&self, tour: &Tour) -> bool {
        self.counts.contains_key(tour)
    }

    /// Append `tour`, evicting the oldest entry when over capacity.
    pub fn record(&mut self, tour: Tour) {
        *self.counts.entry(tour.clone()).or_insert(0) += 1;
        self.queue.push_back(tour);

        while self.queue.len() > self.capacity {
            if let Some(oldest) = self.queue.pop_front() {
                self.forget(&oldest);
            }
        }
    }

    fn forget(&mut self, tour: &Tour) {
        if let Some(count) = self.counts.get_mut(tour) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(tour);
            }
        }
    }

    /// Recorded tours, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Tour> {
        self.queue.iter()
    }
}
