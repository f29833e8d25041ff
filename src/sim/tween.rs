//! Time-based value animation
//!
//! A tween holds a start time instead of a progress counter, so it can be
//! sampled at any clock time without per-frame mutation.

use serde::{Deserialize, Serialize};

use crate::lerp;

/// Easing curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Map linear progress in [0, 1] onto the curve
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// A scalar animated from `from` to `to`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    /// Clock time the animation begins
    pub start: f64,
    /// Seconds
    pub duration: f64,
    pub easing: Easing,
}

impl Tween {
    /// A value that never changes
    pub const fn fixed(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            start: 0.0,
            duration: 0.0,
            easing: Easing::Linear,
        }
    }

    pub fn new(from: f32, to: f32, start: f64, duration: f64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            easing,
        }
    }

    /// Value at clock time `now`
    pub fn sample(&self, now: f64) -> f32 {
        if now <= self.start {
            return self.from;
        }
        if self.duration <= 0.0 || now >= self.start + self.duration {
            return self.to;
        }
        let t = ((now - self.start) / self.duration) as f32;
        lerp(self.from, self.to, self.easing.apply(t))
    }

    /// Restart toward a new target from wherever the value is at `now`
    pub fn retarget(&mut self, now: f64, to: f32, duration: f64, easing: Easing) {
        *self = Self::new(self.sample(now), to, now, duration, easing);
    }

    pub fn is_finished(&self, now: f64) -> bool {
        now >= self.start + self.duration
    }
}

/// Progress of an endlessly repeating, auto-reversing animation.
///
/// Goes 0 → 1 over `period` seconds, then back to 0, and so on.
pub fn ping_pong(elapsed: f64, period: f64, easing: Easing) -> f32 {
    if period <= 0.0 || elapsed <= 0.0 {
        return 0.0;
    }
    let cycles = elapsed / period;
    let frac = cycles.fract() as f32;
    let forward = (cycles.floor() as u64).is_multiple_of(2);
    let t = if forward { frac } else { 1.0 - frac };
    easing.apply(t)
}
