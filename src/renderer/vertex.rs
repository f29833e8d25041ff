//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex with position in screen points and straight-alpha RGBA
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Byte stride for hosts uploading `bytemuck::cast_slice` output
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// Fixed colours that don't depend on bubble style
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const BUBBLE_RIM: [f32; 4] = [1.0, 1.0, 1.0, 0.3];
    pub const BUBBLE_HIGHLIGHT: [f32; 4] = [1.0, 1.0, 1.0, 0.3];
}
