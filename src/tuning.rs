//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a config file can adjust
//! pacing without a rebuild. Defaults mirror `crate::consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Lifecycle ===
    /// Bubbles kept on screen
    pub target_bubbles: usize,
    /// Seconds between refill ticks
    pub refill_interval: f64,

    // === Layout ===
    pub bubble_size: f32,
    pub separation_factor: f32,
    pub max_placement_attempts: u32,
    pub edge_padding: f32,
    pub bottom_inset: f32,

    // === Gestures ===
    pub long_press_duration: f64,
    pub long_press_max_drift: f32,
    pub press_scale: f32,

    // === Effects ===
    pub particles_min: usize,
    pub particles_max: usize,
    pub wave_count: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            target_bubbles: TARGET_BUBBLES,
            refill_interval: REFILL_INTERVAL,

            bubble_size: BUBBLE_SIZE,
            separation_factor: SEPARATION_FACTOR,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
            edge_padding: EDGE_PADDING,
            bottom_inset: BOTTOM_INSET,

            long_press_duration: LONG_PRESS_DURATION,
            long_press_max_drift: LONG_PRESS_MAX_DRIFT,
            press_scale: PRESS_SCALE,

            particles_min: PARTICLES_MIN,
            particles_max: PARTICLES_MAX,
            wave_count: WAVE_COUNT,
        }
    }
}

impl Tuning {
    /// Minimum centre-to-centre distance between bubbles of `bubble_size`
    pub fn min_separation(&self, bubble_size: f32) -> f32 {
        bubble_size * self.separation_factor
    }

    /// Distance kept between a bubble centre and the screen edges
    pub fn margin(&self, bubble_size: f32) -> f32 {
        bubble_size / 2.0 + self.edge_padding
    }

    /// Clamp values that would stall or panic the simulation
    pub fn sanitized(mut self) -> Self {
        if !(self.refill_interval.is_finite() && self.refill_interval >= MIN_REFILL_INTERVAL) {
            log::warn!(
                "refill_interval {} is below {}s, using {}",
                self.refill_interval,
                MIN_REFILL_INTERVAL,
                REFILL_INTERVAL
            );
            self.refill_interval = REFILL_INTERVAL;
        }
        if !self.long_press_duration.is_finite() || self.long_press_duration < 0.0 {
            log::warn!("long_press_duration {} is invalid", self.long_press_duration);
            self.long_press_duration = LONG_PRESS_DURATION;
        }
        self.separation_factor = finite_or(self.separation_factor, SEPARATION_FACTOR, "separation_factor");
        self.edge_padding = finite_or(self.edge_padding, EDGE_PADDING, "edge_padding");
        self.bottom_inset = finite_or(self.bottom_inset, BOTTOM_INSET, "bottom_inset");
        self.long_press_max_drift =
            finite_or(self.long_press_max_drift, LONG_PRESS_MAX_DRIFT, "long_press_max_drift");
        self.press_scale = finite_or(self.press_scale, PRESS_SCALE, "press_scale");

        self.max_placement_attempts = self.max_placement_attempts.max(1);
        self.bubble_size = finite_or(self.bubble_size, BUBBLE_SIZE, "bubble_size").max(1.0);
        if self.particles_max < self.particles_min {
            std::mem::swap(&mut self.particles_min, &mut self.particles_max);
        }
        self
    }
}

/// Shortest refill period accepted; anything faster would flood the timer queue
const MIN_REFILL_INTERVAL: f64 = 0.05;

fn finite_or(value: f32, default: f32, name: &str) -> f32 {
    if value.is_finite() {
        value
    } else {
        log::warn!("{name} {value} is not finite, using {default}");
        default
    }
}
