//! Discrete-event timer queue
//!
//! Delayed and recurring work is stored as entries keyed by fire time and
//! drained by the controller each frame. Entries with equal fire times pop in
//! the order they were scheduled.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

/// Handle for cancelling a scheduled entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Entry<E> {
    fire_at: f64,
    seq: u64,
    id: TimerId,
    repeat: Option<f64>,
    event: E,
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    // Reversed so the max-heap yields the earliest deadline first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .total_cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A fired entry
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<E> {
    pub id: TimerId,
    /// Deadline the entry was scheduled for
    pub fire_at: f64,
    pub event: E,
}

/// Priority queue of timed events
#[derive(Debug, Clone)]
pub struct TimerQueue<E> {
    heap: BinaryHeap<Entry<E>>,
    cancelled: HashSet<TimerId>,
    next_id: u64,
    next_seq: u64,
}

impl<E: Clone> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            cancelled: HashSet::new(),
            next_id: 0,
            next_seq: 0,
        }
    }

    /// Schedule `event` to fire once at `fire_at`
    pub fn schedule_at(&mut self, fire_at: f64, event: E) -> TimerId {
        self.push(fire_at, None, event)
    }

    /// Schedule `event` every `interval` seconds, first at `first_at`
    pub fn schedule_repeating(&mut self, first_at: f64, interval: f64, event: E) -> TimerId {
        debug_assert!(interval > 0.0, "repeating timer needs a positive interval");
        self.push(first_at, Some(interval), event)
    }

    /// Cancel a pending entry. Returns false if it already fired or is unknown.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        if self.heap.iter().any(|e| e.id == id) {
            self.cancelled.insert(id)
        } else {
            false
        }
    }

    /// Drop every pending entry
    pub fn clear(&mut self) {
        self.heap.clear();
        self.cancelled.clear();
    }

    /// Number of live (not cancelled) entries
    pub fn len(&self) -> usize {
        self.heap
            .iter()
            .filter(|e| !self.cancelled.contains(&e.id))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deadline of the earliest live entry
    pub fn next_deadline(&mut self) -> Option<f64> {
        self.discard_cancelled();
        self.heap.peek().map(|e| e.fire_at)
    }

    /// Pop the earliest entry due at or before `now`.
    ///
    /// Repeating entries are re-armed at `fire_at + interval` before returning.
    pub fn pop_due(&mut self, now: f64) -> Option<Fired<E>> {
        self.discard_cancelled();
        if self.heap.peek().is_none_or(|e| e.fire_at > now) {
            return None;
        }
        let entry = self.heap.pop()?;
        if let Some(interval) = entry.repeat {
            let seq = self.bump_seq();
            self.heap.push(Entry {
                fire_at: entry.fire_at + interval,
                seq,
                id: entry.id,
                repeat: entry.repeat,
                event: entry.event.clone(),
            });
        }
        Some(Fired {
            id: entry.id,
            fire_at: entry.fire_at,
            event: entry.event,
        })
    }

    fn push(&mut self, fire_at: f64, repeat: Option<f64>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let seq = self.bump_seq();
        self.heap.push(Entry {
            fire_at,
            seq,
            id,
            repeat,
            event,
        });
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn discard_cancelled(&mut self) {
        while let Some(top) = self.heap.peek() {
            if self.cancelled.remove(&top.id) {
                self.heap.pop();
            } else {
                break;
            }
        }
    }
}
