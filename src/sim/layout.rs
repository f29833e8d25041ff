//! Non-overlapping random bubble placement
//!
//! Reject sampling with a fixed attempt budget. When the budget runs out the
//! last candidate is accepted, so placement always terminates even on a
//! crowded screen.

use glam::Vec2;
use rand::Rng;

use crate::tuning::Tuning;

/// Result of a placement with diagnostics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pos: Vec2,
    /// Candidates drawn, including the accepted one
    pub attempts: u32,
    /// True when the attempt budget ran out and separation was not met
    pub overlapping: bool,
}

/// Allowed range for bubble centres on a screen of the given size
///
/// The bottom inset keeps bubbles clear of the strip at the bottom edge.
/// An axis too small for the margin collapses to its midpoint.
pub fn placement_bounds(bubble_size: f32, screen: Vec2, tuning: &Tuning) -> (Vec2, Vec2) {
    let margin = tuning.margin(bubble_size);
    let usable = Vec2::new(screen.x, screen.y - tuning.bottom_inset);
    let lo = Vec2::splat(margin);
    let hi = usable - Vec2::splat(margin);
    let mid = usable / 2.0;
    let (x_lo, x_hi) = axis_range(lo.x, hi.x, mid.x);
    let (y_lo, y_hi) = axis_range(lo.y, hi.y, mid.y);
    (Vec2::new(x_lo, y_lo), Vec2::new(x_hi, y_hi))
}

fn axis_range(lo: f32, hi: f32, mid: f32) -> (f32, f32) {
    if hi < lo { (mid, mid) } else { (lo, hi) }
}

/// Place a bubble of `bubble_size` on a `screen` sized area
pub fn place<R: Rng + ?Sized>(
    existing: &[Vec2],
    bubble_size: f32,
    screen: Vec2,
    tuning: &Tuning,
    rng: &mut R,
) -> Vec2 {
    place_detailed(existing, bubble_size, screen, tuning, rng).pos
}

/// Like [`place`], also reporting how the placement went
pub fn place_detailed<R: Rng + ?Sized>(
    existing: &[Vec2],
    bubble_size: f32,
    screen: Vec2,
    tuning: &Tuning,
    rng: &mut R,
) -> Placement {
    let (lo, hi) = placement_bounds(bubble_size, screen, tuning);
    let min_distance = tuning.min_separation(bubble_size);
    let max_attempts = tuning.max_placement_attempts.max(1);

    let mut pos = lo;
    for attempt in 1..=max_attempts {
        pos = Vec2::new(
            rng.random_range(lo.x..=hi.x),
            rng.random_range(lo.y..=hi.y),
        );
        if existing.iter().all(|p| p.distance(pos) >= min_distance) {
            return Placement {
                pos,
                attempts: attempt,
                overlapping: false,
            };
        }
    }

    log::warn!(
        "No free spot after {} attempts, placing at ({:.1}, {:.1})",
        max_attempts,
        pos.x,
        pos.y
    );
    Placement {
        pos,
        attempts: max_attempts,
        overlapping: true,
    }
}
