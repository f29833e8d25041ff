//! Immediate-mode draw list
//!
//! A snapshot copies everything visible at one clock instant, already sampled
//! and in back-to-front order, so the host never touches live game state.

use glam::Vec2;

use super::vertex::colors;
use crate::consts::{BREATHE_PERIOD, BREATHE_SCALE, WAVE_LINE_WIDTH};
use crate::lerp;
use crate::settings::Settings;
use crate::sim::palette::{Color, with_opacity};
use crate::sim::state::{BubbleStyle, GameState};
use crate::sim::tween::{Easing, ping_pong};

/// Stroked circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingDraw {
    pub center: Vec2,
    pub diameter: f32,
    pub line_width: f32,
    pub color: Color,
}

/// Filled circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscDraw {
    pub center: Vec2,
    pub diameter: f32,
    pub color: Color,
}

/// One bubble with every animated factor folded in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleDraw {
    pub id: u32,
    pub center: Vec2,
    /// Diameter after pop, press and breathing scale
    pub diameter: f32,
    pub opacity: f32,
    pub style: BubbleStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub screen: Vec2,
    pub background: Color,
    pub waves: Vec<RingDraw>,
    pub particles: Vec<DiscDraw>,
    pub bubbles: Vec<BubbleDraw>,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState, now: f64, screen: Vec2, settings: &Settings) -> Self {
        let waves = state
            .waves
            .iter()
            .filter_map(|w| {
                let opacity = w.opacity_at(now);
                (opacity > 0.0).then(|| RingDraw {
                    center: w.pos,
                    diameter: w.size_at(now),
                    line_width: WAVE_LINE_WIDTH,
                    color: with_opacity(w.color, opacity),
                })
            })
            .collect();

        let particles = state
            .particles
            .iter()
            .filter_map(|p| {
                let opacity = p.opacity_at(now).clamp(0.0, 1.0);
                (opacity > 0.0).then(|| DiscDraw {
                    center: p.position_at(now),
                    diameter: p.size,
                    color: with_opacity(p.color, opacity),
                })
            })
            .collect();

        let size = settings.tuning.bubble_size;
        let bubbles = state
            .active_bubbles()
            .map(|b| {
                let breathe = if settings.breathing_enabled() {
                    let t = ping_pong(now - b.spawned_at, BREATHE_PERIOD, Easing::EaseInOut);
                    lerp(1.0, BREATHE_SCALE, t)
                } else {
                    1.0
                };
                let scale = b.scale.sample(now) * b.press_scale.sample(now) * breathe;
                BubbleDraw {
                    id: b.id,
                    center: b.pos,
                    diameter: size * scale,
                    opacity: b.opacity.sample(now).clamp(0.0, 1.0),
                    style: b.style,
                }
            })
            .collect();

        Self {
            screen,
            background: colors::BACKGROUND,
            waves,
            particles,
            bubbles,
        }
    }

    /// Number of drawable items
    pub fn len(&self) -> usize {
        self.waves.len() + self.particles.len() + self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Bubble, BubblePhase};
    use crate::sim::tween::Tween;
    use crate::sim::{spawn_particles, spawn_waves, start_wave};

    fn calm_settings() -> Settings {
        Settings {
            reduced_motion: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_popped_bubbles_hidden() {
        let mut state = GameState::new(0);
        state
            .bubbles
            .push(Bubble::new(0, Vec2::new(50.0, 50.0), BubbleStyle::White, 0.0));
        state
            .bubbles
            .push(Bubble::new(1, Vec2::new(130.0, 50.0), BubbleStyle::Rainbow, 0.0));
        state.bubbles[0].phase = BubblePhase::Popped;

        let snap = RenderSnapshot::capture(&state, 1.0, Vec2::new(184.0, 224.0), &calm_settings());
        assert_eq!(snap.bubbles.len(), 1);
        assert_eq!(snap.bubbles[0].id, 1);
        assert_eq!(snap.bubbles[0].diameter, 60.0);
        assert_eq!(snap.background, colors::BACKGROUND);
    }

    #[test]
    fn test_scale_factors_multiply() {
        let mut state = GameState::new(0);
        let mut bubble = Bubble::new(0, Vec2::new(50.0, 50.0), BubbleStyle::LightBlue, 0.0);
        bubble.scale = Tween::fixed(1.2);
        bubble.press_scale = Tween::fixed(1.3);
        bubble.opacity = Tween::fixed(0.5);
        state.bubbles.push(bubble);

        let snap = RenderSnapshot::capture(&state, 0.0, Vec2::ONE, &calm_settings());
        let draw = snap.bubbles[0];
        assert!((draw.diameter - 60.0 * 1.2 * 1.3).abs() < 1e-3);
        assert_eq!(draw.opacity, 0.5);
    }

    #[test]
    fn test_breathing() {
        let mut state = GameState::new(0);
        state
            .bubbles
            .push(Bubble::new(0, Vec2::ZERO, BubbleStyle::LightBlue, 0.0));
        let settings = Settings::default();

        let at = |t: f64| RenderSnapshot::capture(&state, t, Vec2::ONE, &settings).bubbles[0].diameter;
        assert_eq!(at(0.0), 60.0);
        assert!((at(1.5) - 66.0).abs() < 1e-3);
        assert!(at(0.75) > 60.0 && at(0.75) < 66.0);
        assert!((at(3.0) - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_effects_in_snapshot() {
        let tuning = crate::tuning::Tuning::default();
        let mut state = GameState::new(3);
        let count = spawn_particles(&mut state, Vec2::splat(80.0), BubbleStyle::MultiGradient, 0.0, &tuning);
        let pending = spawn_waves(&mut state, Vec2::splat(80.0), BubbleStyle::MultiGradient, &tuning);
        start_wave(&mut state, pending[0].id, 0.0);

        let snap = RenderSnapshot::capture(&state, 0.1, Vec2::ONE, &calm_settings());
        assert_eq!(snap.particles.len(), count);
        assert_eq!(snap.waves.len(), 3);
        // Particle opacity starts above 1 and is clamped
        assert!(snap.particles.iter().all(|p| p.color[3] <= 1.0));

        // Everything faded except the two rings that were never armed
        let snap = RenderSnapshot::capture(&state, 5.0, Vec2::ONE, &calm_settings());
        assert!(snap.particles.is_empty());
        assert_eq!(snap.waves.len(), 2);
        assert_eq!(snap.len(), 2);
    }
}
