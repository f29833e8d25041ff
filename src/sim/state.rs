//! Game state and core simulation types
//!
//! Everything the renderer reads lives here. Animated fields are tweens
//! sampled against the controller clock.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::tween::Tween;

/// RGBA colours used by bubble styles (system palette)
pub mod palette {
    pub type Color = [f32; 4];

    pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const GRAY: Color = [0.557, 0.557, 0.576, 1.0];
    pub const RED: Color = [1.0, 0.231, 0.188, 1.0];
    pub const ORANGE: Color = [1.0, 0.584, 0.0, 1.0];
    pub const YELLOW: Color = [1.0, 0.8, 0.0, 1.0];
    pub const GREEN: Color = [0.204, 0.78, 0.349, 1.0];
    pub const MINT: Color = [0.0, 0.78, 0.745, 1.0];
    pub const CYAN: Color = [0.196, 0.678, 0.902, 1.0];
    pub const BLUE: Color = [0.0, 0.478, 1.0, 1.0];
    pub const PURPLE: Color = [0.686, 0.322, 0.871, 1.0];
    pub const PINK: Color = [1.0, 0.176, 0.333, 1.0];

    /// Multiply a colour's alpha
    pub const fn with_opacity(c: Color, opacity: f32) -> Color {
        [c[0], c[1], c[2], c[3] * opacity]
    }
}

use palette::{Color, with_opacity};

/// Visual style of a bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BubbleStyle {
    #[default]
    LightBlue,
    White,
    Rainbow,
    MultiGradient,
}

impl BubbleStyle {
    pub const ALL: [BubbleStyle; 4] = [
        BubbleStyle::LightBlue,
        BubbleStyle::White,
        BubbleStyle::Rainbow,
        BubbleStyle::MultiGradient,
    ];

    /// Uniformly random style
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Main colour (rings and even-indexed particles)
    pub fn main_color(&self) -> Color {
        match self {
            BubbleStyle::LightBlue => with_opacity(palette::BLUE, 0.8),
            BubbleStyle::White => with_opacity(palette::WHITE, 0.8),
            BubbleStyle::Rainbow => with_opacity(palette::PINK, 0.7),
            BubbleStyle::MultiGradient => with_opacity(palette::PURPLE, 0.7),
        }
    }

    pub fn secondary_color(&self) -> Color {
        match self {
            BubbleStyle::LightBlue => with_opacity(palette::CYAN, 0.3),
            BubbleStyle::White => with_opacity(palette::GRAY, 0.2),
            BubbleStyle::Rainbow => with_opacity(palette::BLUE, 0.4),
            BubbleStyle::MultiGradient => with_opacity(palette::ORANGE, 0.4),
        }
    }

    /// Fill gradient stops, top-leading to bottom-trailing
    pub fn gradient(&self) -> Vec<Color> {
        match self {
            BubbleStyle::LightBlue | BubbleStyle::White => {
                vec![self.main_color(), self.secondary_color()]
            }
            BubbleStyle::Rainbow => vec![
                palette::RED,
                palette::ORANGE,
                palette::YELLOW,
                palette::GREEN,
                palette::BLUE,
                palette::PURPLE,
                with_opacity(palette::PINK, 0.7),
            ],
            BubbleStyle::MultiGradient => vec![
                palette::PURPLE,
                palette::BLUE,
                palette::CYAN,
                palette::MINT,
                palette::GREEN,
            ],
        }
    }

    /// Soft glow drawn behind the bubble
    pub fn shadow_color(&self) -> Color {
        match self {
            BubbleStyle::White => with_opacity(palette::GRAY, 0.5),
            _ => with_opacity(self.main_color(), 0.5),
        }
    }
}

/// Pop lifecycle of a bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BubblePhase {
    /// On screen, poppable
    Active,
    /// Pop animation running; still drawn and still occupies its spot
    Popping,
    /// Gone from rendering, gestures and placement
    Popped,
}

/// A poppable bubble
#[derive(Debug, Clone)]
pub struct Bubble {
    pub id: u32,
    pub phase: BubblePhase,
    pub pos: Vec2,
    pub style: BubbleStyle,
    /// Pop swell/shrink
    pub scale: Tween,
    pub opacity: Tween,
    /// Scale-up while a finger is on the bubble
    pub press_scale: Tween,
    /// Clock time the bubble appeared (phase of the idle breathing)
    pub spawned_at: f64,
}

impl Bubble {
    pub fn new(id: u32, pos: Vec2, style: BubbleStyle, now: f64) -> Self {
        Self {
            id,
            phase: BubblePhase::Active,
            pos,
            style,
            scale: Tween::fixed(1.0),
            opacity: Tween::fixed(1.0),
            press_scale: Tween::fixed(1.0),
            spawned_at: now,
        }
    }

    pub fn is_popped(&self) -> bool {
        self.phase == BubblePhase::Popped
    }

    /// Only untouched bubbles may start a pop
    pub fn can_pop(&self) -> bool {
        self.phase == BubblePhase::Active
    }
}

/// A spark flying out of a popped bubble
#[derive(Debug, Clone)]
pub struct ExplosionParticle {
    pub id: u64,
    pub origin: Vec2,
    pub target: Vec2,
    pub size: f32,
    pub color: Color,
    /// Progress from origin (0) to target (1)
    pub travel: Tween,
    pub opacity: Tween,
    pub duration: f64,
}

impl ExplosionParticle {
    pub fn position_at(&self, now: f64) -> Vec2 {
        self.origin.lerp(self.target, self.travel.sample(now))
    }

    pub fn opacity_at(&self, now: f64) -> f32 {
        self.opacity.sample(now)
    }
}

/// An expanding ring around a popped bubble
#[derive(Debug, Clone)]
pub struct ExplosionWave {
    pub id: u64,
    pub pos: Vec2,
    /// Diameter
    pub size: Tween,
    pub target_size: f32,
    pub color: Color,
    pub opacity: Tween,
    pub duration: f64,
    /// Whether the growth animation has been armed
    pub started: bool,
}

impl ExplosionWave {
    pub fn size_at(&self, now: f64) -> f32 {
        self.size.sample(now)
    }

    pub fn opacity_at(&self, now: f64) -> f32 {
        self.opacity.sample(now)
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Every bubble ever spawned this run, popped ones included (sorted by id)
    pub bubbles: Vec<Bubble>,
    pub particles: Vec<ExplosionParticle>,
    pub waves: Vec<ExplosionWave>,
    /// Bubble currently under a finger (visual only)
    pub pressed_bubble: Option<u32>,
    next_effect_id: u64,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            bubbles: Vec::new(),
            particles: Vec::new(),
            waves: Vec::new(),
            pressed_bubble: None,
            next_effect_id: 0,
        }
    }

    /// Bubbles that are not popped
    pub fn active_bubbles(&self) -> impl Iterator<Item = &Bubble> + '_ {
        self.bubbles.iter().filter(|b| !b.is_popped())
    }

    pub fn active_count(&self) -> usize {
        self.active_bubbles().count()
    }

    /// Positions new bubbles must keep their distance from
    pub fn active_positions(&self) -> Vec<Vec2> {
        self.active_bubbles().map(|b| b.pos).collect()
    }

    /// One past the largest id ever assigned (0 for an empty run)
    pub fn next_bubble_id(&self) -> u32 {
        self.bubbles.iter().map(|b| b.id).max().map_or(0, |id| id + 1)
    }

    pub fn bubble(&self, id: u32) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id == id)
    }

    pub fn bubble_mut(&mut self, id: u32) -> Option<&mut Bubble> {
        self.bubbles.iter_mut().find(|b| b.id == id)
    }

    pub fn wave_mut(&mut self, id: u64) -> Option<&mut ExplosionWave> {
        self.waves.iter_mut().find(|w| w.id == id)
    }

    /// Allocate an id for a particle or wave
    pub fn next_effect_id(&mut self) -> u64 {
        let id = self.next_effect_id;
        self.next_effect_id += 1;
        id
    }
}
