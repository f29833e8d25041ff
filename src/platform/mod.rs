//! Platform abstraction layer
//!
//! The host owns the screen. Bounds are queried on every placement so a
//! rotation or resize is picked up without an explicit event.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

/// Screen-bounds collaborator
pub trait ScreenBounds {
    /// Current drawable size in points
    fn current_bounds(&self) -> Vec2;
}

/// A screen whose size never changes
#[derive(Debug, Clone, Copy)]
pub struct FixedBounds(pub Vec2);

impl FixedBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self(Vec2::new(width, height))
    }
}

impl ScreenBounds for FixedBounds {
    fn current_bounds(&self) -> Vec2 {
        self.0
    }
}

/// Bounds shared with the host, which updates them on resize
#[derive(Debug, Clone, Default)]
pub struct SharedBounds(Rc<Cell<Vec2>>);

impl SharedBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self(Rc::new(Cell::new(Vec2::new(width, height))))
    }

    pub fn resize(&self, width: f32, height: f32) {
        self.0.set(Vec2::new(width, height));
    }
}

impl ScreenBounds for SharedBounds {
    fn current_bounds(&self) -> Vec2 {
        self.0.get()
    }
}
