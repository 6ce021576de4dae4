//! Deferred single-shot tasks keyed by the entity that owns them.
//!
//! Replaces fire-and-forget timed callbacks: every task names its owner, so
//! destroying an entity cancels its pending work explicitly via
//! [`Scheduler::cancel_owner`]. Tasks are evaluated once per tick against
//! scaled simulation time.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hecs::Entity;

#[derive(Debug)]
struct Scheduled<T> {
    fire_at: f64,
    seq: u64,
    owner: Entity,
    task: T,
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scheduled<T> {
    // Reversed so the max-heap pops the earliest (fire_at, seq) first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .total_cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Priority queue of `(fire_at, owner, task)`.
#[derive(Debug)]
pub struct Scheduler<T> {
    queue: BinaryHeap<Scheduled<T>>,
    next_seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Queue `task` for `owner` at simulation time `fire_at`.
    pub fn schedule(&mut self, owner: Entity, fire_at: f64, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Scheduled {
            fire_at,
            seq,
            owner,
            task,
        });
    }

    /// Drop every pending task owned by `owner`. Returns how many were removed.
    pub fn cancel_owner(&mut self, owner: Entity) -> usize {
        let before = self.queue.len();
        self.queue.retain(|s| s.owner != owner);
        let removed = before - self.queue.len();
        if removed > 0 {
            log::trace!("Cancelled {} scheduled task(s) for {:?}", removed, owner);
        }
        removed
    }

    /// Pop every task with `fire_at <= now`, earliest first (ties in insertion order).
    pub fn drain_due(&mut self, now: f64) -> Vec<(Entity, T)> {
        let mut due = Vec::new();
        while self.queue.peek().is_some_and(|s| s.fire_at <= now) {
            if let Some(s) = self.queue.pop() {
                due.push((s.owner, s.task));
            }
        }
        due
    }

    /// Time of the earliest pending task.
    pub fn next_fire_at(&self) -> Option<f64> {
        self.queue.peek().map(|s| s.fire_at)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
