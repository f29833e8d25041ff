//! Bubble Joy - A long-press bubble popping game
//!
//! Core modules:
//! - `sim`: Game model (bubbles, effects, layout, timers, tweens)
//! - `game`: Controller that owns the state and drives the clock
//! - `input`: Pointer stream to long-press recognition
//! - `renderer`: Draw-list snapshots and vertex meshes
//! - `platform`: Screen bounds provided by the host
//! - `audio` / `haptics`: Feedback collaborators
//! - `settings` / `tuning`: Player preferences and data-driven game balance

pub mod audio;
pub mod error;
pub mod game;
pub mod haptics;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{AudioError, ConfigError};
pub use game::Game;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Simulation frame step used by the headless driver (60 Hz)
    pub const FRAME_DT: f64 = 1.0 / 60.0;

    /// Number of bubbles kept on screen
    pub const TARGET_BUBBLES: usize = 4;
    /// Seconds between refill ticks
    pub const REFILL_INTERVAL: f64 = 1.5;

    /// Bubble diameter (points)
    pub const BUBBLE_SIZE: f32 = 60.0;
    /// Minimum centre distance as a multiple of the diameter
    pub const SEPARATION_FACTOR: f32 = 1.2;
    /// Reject-sampling budget per placement
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;
    /// Extra padding beyond the bubble radius at every screen edge
    pub const EDGE_PADDING: f32 = 5.0;
    /// Strip at the bottom of the screen kept free of bubbles
    pub const BOTTOM_INSET: f32 = 40.0;

    /// Hold time before a press pops the bubble
    pub const LONG_PRESS_DURATION: f64 = 0.3;
    /// Pointer travel that cancels a pending long press
    pub const LONG_PRESS_MAX_DRIFT: f32 = 10.0;
    /// Visual scale of the bubble under the finger
    pub const PRESS_SCALE: f32 = 1.3;
    pub const PRESS_SCALE_DURATION: f64 = 0.3;

    /// Idle "breathing" pulse (scale 1.0 <-> 1.1, 1.5s each way)
    pub const BREATHE_SCALE: f32 = 1.1;
    pub const BREATHE_PERIOD: f64 = 1.5;

    /// Pop sequence timings (seconds after the pop starts)
    pub const POP_SWELL_SCALE: f32 = 1.2;
    pub const POP_SWELL_DURATION: f64 = 0.2;
    pub const POP_SHRINK_SCALE: f32 = 0.1;
    pub const POP_SHRINK_DURATION: f64 = 0.15;
    pub const POP_FINISH_DELAY: f64 = 0.35;
    /// Haptic pulse offsets
    pub const HAPTIC_OFFSETS: [f64; 3] = [0.0, 0.05, 0.1];

    /// Explosion particles
    pub const PARTICLES_MIN: usize = 8;
    pub const PARTICLES_MAX: usize = 12;
    pub const PARTICLE_DISTANCE_MIN: f32 = 20.0;
    pub const PARTICLE_DISTANCE_MAX: f32 = 50.0;
    pub const PARTICLE_SIZE_MIN: f32 = 3.0;
    pub const PARTICLE_SIZE_MAX: f32 = 8.0;
    pub const PARTICLE_START_OPACITY: f32 = 1.2;
    pub const PARTICLE_DURATION_MIN: f64 = 0.3;
    pub const PARTICLE_DURATION_MAX: f64 = 0.6;

    /// Explosion rings
    pub const WAVE_COUNT: usize = 3;
    pub const WAVE_START_SIZE: f32 = 10.0;
    pub const WAVE_BASE_SIZE: f32 = 80.0;
    pub const WAVE_SIZE_STEP: f32 = 20.0;
    pub const WAVE_START_OPACITY: f32 = 0.8;
    pub const WAVE_DURATION: f64 = 0.5;
    pub const WAVE_STAGGER: f64 = 0.1;
    pub const WAVE_LINE_WIDTH: f32 = 2.0;

    /// Effects at or below this opacity are dropped before the next batch
    pub const PRUNE_OPACITY: f32 = 0.05;

    /// Bundled pop sound
    pub const POP_SOUND: &str = "bo.wav";
    /// Where the bundled sound ships, relative to the crate root
    pub const ASSET_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Point on a circle of radius `r` around `center` at angle `theta`
#[inline]
pub fn polar_offset(center: glam::Vec2, r: f32, theta: f32) -> glam::Vec2 {
    center + glam::Vec2::new(r * theta.cos(), r * theta.sin())
}
