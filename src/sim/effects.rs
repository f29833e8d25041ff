//! Explosion effects spawned when a bubble pops
//!
//! Particles and rings are self-contained tweens. Faded ones are pruned
//! lazily right before the next batch is created.

use glam::Vec2;
use rand::Rng;

use super::state::{BubbleStyle, ExplosionParticle, ExplosionWave, GameState};
use super::tween::{Easing, Tween};
use crate::consts::*;
use crate::polar_offset;
use crate::tuning::Tuning;

/// A ring whose growth still has to be armed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingWave {
    pub id: u64,
    /// Seconds after the pop the ring starts growing
    pub delay: f64,
}

/// Drop particles and rings that have faded out
pub fn prune_faded(state: &mut GameState, now: f64) {
    state
        .particles
        .retain(|p| p.opacity_at(now) > PRUNE_OPACITY);
    state.waves.retain(|w| w.opacity_at(now) > PRUNE_OPACITY);
}

/// Spawn a batch of particles bursting out of `origin`. Returns the count.
pub fn spawn_particles(
    state: &mut GameState,
    origin: Vec2,
    style: BubbleStyle,
    now: f64,
    tuning: &Tuning,
) -> usize {
    let main = style.main_color();
    let secondary = style.secondary_color();
    let count = state
        .rng
        .random_range(tuning.particles_min..=tuning.particles_max);

    state.particles.reserve(count);
    for i in 0..count {
        let angle = state.rng.random_range(0.0..std::f32::consts::TAU);
        let distance = state
            .rng
            .random_range(PARTICLE_DISTANCE_MIN..=PARTICLE_DISTANCE_MAX);
        let size = state.rng.random_range(PARTICLE_SIZE_MIN..=PARTICLE_SIZE_MAX);
        let duration = state
            .rng
            .random_range(PARTICLE_DURATION_MIN..=PARTICLE_DURATION_MAX);
        let color = if i % 2 == 0 { main } else { secondary };

        let id = state.next_effect_id();
        state.particles.push(ExplosionParticle {
            id,
            origin,
            target: polar_offset(origin, distance, angle),
            size,
            color,
            travel: Tween::new(0.0, 1.0, now, duration, Easing::EaseOut),
            opacity: Tween::new(PARTICLE_START_OPACITY, 0.0, now, duration, Easing::EaseOut),
            duration,
        });
    }
    count
}

/// Spawn the rings for a pop. Each ring sits at its start size until
/// [`start_wave`] arms it after its stagger delay.
pub fn spawn_waves(
    state: &mut GameState,
    pos: Vec2,
    style: BubbleStyle,
    tuning: &Tuning,
) -> Vec<PendingWave> {
    let color = style.main_color();
    (0..tuning.wave_count)
        .map(|k| {
            let id = state.next_effect_id();
            state.waves.push(ExplosionWave {
                id,
                pos,
                size: Tween::fixed(WAVE_START_SIZE),
                target_size: WAVE_BASE_SIZE + WAVE_SIZE_STEP * k as f32,
                color,
                opacity: Tween::fixed(WAVE_START_OPACITY),
                duration: WAVE_DURATION,
                started: false,
            });
            PendingWave {
                id,
                delay: WAVE_STAGGER * k as f64,
            }
        })
        .collect()
}

/// Begin a ring's growth and fade. No-op if the ring was already pruned.
pub fn start_wave(state: &mut GameState, id: u64, now: f64) {
    if let Some(wave) = state.wave_mut(id) {
        if wave.started {
            return;
        }
        wave.size = Tween::new(wave.size_at(now), wave.target_size, now, wave.duration, Easing::EaseOut);
        wave.opacity = Tween::new(wave.opacity_at(now), 0.0, now, wave.duration, Easing::EaseOut);
        wave.started = true;
    }
}
