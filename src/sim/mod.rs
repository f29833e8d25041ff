//! Game model
//!
//! All gameplay logic lives here. This module must stay free of platform code:
//! - Time comes in as an explicit clock value
//! - Seeded RNG only
//! - Stable iteration order (bubbles sorted by id)

pub mod effects;
pub mod layout;
pub mod state;
pub mod timer;
pub mod tween;

pub use effects::{PendingWave, prune_faded, spawn_particles, spawn_waves, start_wave};
pub use layout::{Placement, place, place_detailed, placement_bounds};
pub use state::{
    Bubble, BubblePhase, BubbleStyle, ExplosionParticle, ExplosionWave, GameState, palette,
};
pub use timer::{Fired, TimerId, TimerQueue};
pub use tween::{Easing, Tween, ping_pong};
