//! Pointer input and long-press tracking
//!
//! Each pointer that lands on a bubble owns a press. The press holds the
//! timer for its long-press deadline so a release or a drift can cancel it.

use std::collections::HashMap;

use glam::Vec2;

use crate::sim::state::GameState;
use crate::sim::timer::TimerId;

/// Identifies one finger / mouse button for the lifetime of a touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

/// Raw pointer stream from the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { pointer: PointerId, pos: Vec2 },
    Move { pointer: PointerId, pos: Vec2 },
    Up { pointer: PointerId },
}

/// A pointer held on a bubble
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Press {
    pub bubble_id: u32,
    /// Where the pointer went down
    pub origin: Vec2,
    /// Pending long-press deadline; `None` once fired or cancelled
    pub timer: Option<TimerId>,
}

/// Active presses keyed by pointer
#[derive(Debug, Clone, Default)]
pub struct PressTracker {
    presses: HashMap<PointerId, Press>,
}

impl PressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a press. Returns the press this pointer had before, if any.
    pub fn begin(&mut self, pointer: PointerId, press: Press) -> Option<Press> {
        self.presses.insert(pointer, press)
    }

    /// Stop tracking a press
    pub fn end(&mut self, pointer: PointerId) -> Option<Press> {
        self.presses.remove(&pointer)
    }

    pub fn get(&self, pointer: PointerId) -> Option<&Press> {
        self.presses.get(&pointer)
    }

    /// Pointer moved to `pos`. Returns the long-press timer to cancel when the
    /// pointer drifted further than `max_drift` from where it went down.
    pub fn moved(&mut self, pointer: PointerId, pos: Vec2, max_drift: f32) -> Option<TimerId> {
        let press = self.presses.get_mut(&pointer)?;
        if press.origin.distance(pos) > max_drift {
            press.timer.take()
        } else {
            None
        }
    }

    /// Long-press deadline for `pointer` fired. Returns the bubble to pop if
    /// the press is still waiting on exactly this timer.
    pub fn fire(&mut self, pointer: PointerId, timer: TimerId) -> Option<u32> {
        let press = self.presses.get_mut(&pointer)?;
        if press.timer == Some(timer) {
            press.timer = None;
            Some(press.bubble_id)
        } else {
            None
        }
    }

    /// Whether any pointer is still holding `bubble_id`
    pub fn is_pressing(&self, bubble_id: u32) -> bool {
        self.presses.values().any(|p| p.bubble_id == bubble_id)
    }

    /// Forget every press, returning the pending timers
    pub fn clear(&mut self) -> Vec<TimerId> {
        self.presses.drain().filter_map(|(_, p)| p.timer).collect()
    }

    pub fn len(&self) -> usize {
        self.presses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presses.is_empty()
    }
}

/// Topmost non-popped bubble whose circle contains `pos`
///
/// Later bubbles draw on top, so the search runs back to front.
pub fn hit_test(state: &GameState, pos: Vec2, bubble_size: f32) -> Option<u32> {
    let radius = bubble_size / 2.0;
    state
        .bubbles
        .iter()
        .rev()
        .filter(|b| !b.is_popped())
        .find(|b| b.pos.distance(pos) <= radius)
        .map(|b| b.id)
}
