//! Shape generation for 2D primitives
//!
//! Everything is emitted as a plain triangle list, back to front.

use glam::Vec2;
use std::f32::consts::PI;

use super::snapshot::{BubbleDraw, RenderSnapshot};
use super::vertex::{Vertex, colors};
use crate::sim::palette::{Color, with_opacity};

const CIRCLE_SEGMENTS: u32 = 32;
const SMALL_CIRCLE_SEGMENTS: u32 = 12;
const RIM_WIDTH: f32 = 1.0;
const HIGHLIGHT_SIZE: f32 = 0.2;
const HIGHLIGHT_OFFSET: f32 = -0.2;
/// Shadow disc grows past the bubble to read as a glow
const SHADOW_SCALE: f32 = 1.1;

/// Build the full triangle list for a snapshot
pub fn build_mesh(snapshot: &RenderSnapshot) -> Vec<Vertex> {
    let mut vertices = rect(Vec2::ZERO, snapshot.screen, snapshot.background);

    for wave in &snapshot.waves {
        let outer = wave.diameter / 2.0;
        let inner = (outer - wave.line_width).max(0.0);
        vertices.extend(ring(wave.center, inner, outer, wave.color, CIRCLE_SEGMENTS));
    }

    for particle in &snapshot.particles {
        vertices.extend(circle(
            particle.center,
            particle.diameter / 2.0,
            particle.color,
            SMALL_CIRCLE_SEGMENTS,
        ));
    }

    for bubble in &snapshot.bubbles {
        vertices.extend(bubble_mesh(bubble));
    }

    vertices
}

/// Shadow, gradient body, rim and highlight of one bubble
pub fn bubble_mesh(bubble: &BubbleDraw) -> Vec<Vertex> {
    let radius = bubble.diameter / 2.0;
    if radius <= 0.0 || bubble.opacity <= 0.0 {
        return Vec::new();
    }
    let fade = |c: Color| with_opacity(c, bubble.opacity);

    let mut vertices = circle(
        bubble.center,
        radius * SHADOW_SCALE,
        fade(bubble.style.shadow_color()),
        CIRCLE_SEGMENTS,
    );

    let stops: Vec<Color> = bubble.style.gradient().into_iter().map(fade).collect();
    vertices.extend(gradient_circle(bubble.center, radius, &stops, CIRCLE_SEGMENTS));

    vertices.extend(ring(
        bubble.center,
        (radius - RIM_WIDTH).max(0.0),
        radius,
        fade(colors::BUBBLE_RIM),
        CIRCLE_SEGMENTS,
    ));

    let highlight = bubble.center + Vec2::splat(HIGHLIGHT_OFFSET * bubble.diameter);
    vertices.extend(circle(
        highlight,
        HIGHLIGHT_SIZE * bubble.diameter / 2.0,
        fade(colors::BUBBLE_HIGHLIGHT),
        SMALL_CIRCLE_SEGMENTS,
    ));

    vertices
}

/// Sample a multi-stop gradient at `t` in [0, 1]
pub fn gradient_at(stops: &[Color], t: f32) -> Color {
    match stops {
        [] => colors::BACKGROUND,
        [only] => *only,
        _ => {
            let scaled = t.clamp(0.0, 1.0) * (stops.len() - 1) as f32;
            let i = (scaled.floor() as usize).min(stops.len() - 2);
            let u = scaled - i as f32;
            let (a, b) = (stops[i], stops[i + 1]);
            std::array::from_fn(|k| crate::lerp(a[k], b[k], u))
        }
    }
}

/// Filled circle shaded along the top-left to bottom-right diagonal
pub fn gradient_circle(center: Vec2, radius: f32, stops: &[Color], segments: u32) -> Vec<Vertex> {
    // Projection of a point onto the diagonal, normalised to [0, 1] over the circle
    let shade = |p: Vec2| {
        let d = (p - center).dot(Vec2::ONE.normalize());
        gradient_at(stops, 0.5 + d / (2.0 * radius))
    };
    let center_color = shade(center);

    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    for i in 0..segments {
        let p1 = on_circle(center, radius, i, segments);
        let p2 = on_circle(center, radius, i + 1, segments);
        vertices.push(Vertex::new(center.x, center.y, center_color));
        vertices.push(Vertex::new(p1.x, p1.y, shade(p1)));
        vertices.push(Vertex::new(p2.x, p2.y, shade(p2)));
    }
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let p1 = on_circle(center, radius, i, segments);
        let p2 = on_circle(center, radius, i + 1, segments);

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: Color,
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let inner1 = on_circle(center, inner_radius, i, segments);
        let outer1 = on_circle(center, outer_radius, i, segments);
        let inner2 = on_circle(center, inner_radius, i + 1, segments);
        let outer2 = on_circle(center, outer_radius, i + 1, segments);

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Axis-aligned rectangle from `min` to `max`
pub fn rect(min: Vec2, max: Vec2, color: Color) -> Vec<Vertex> {
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

fn on_circle(center: Vec2, radius: f32, i: u32, segments: u32) -> Vec2 {
    let theta = (i as f32 / segments as f32) * 2.0 * PI;
    crate::polar_offset(center, radius, theta)
}
