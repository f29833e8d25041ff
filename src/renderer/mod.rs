//! Rendering support
//!
//! The crate never owns a GPU surface. It hands the host a [`RenderSnapshot`]
//! draw list, and optionally a flat triangle list built from it.

pub mod shapes;
pub mod snapshot;
pub mod vertex;

pub use shapes::build_mesh;
pub use snapshot::{BubbleDraw, DiscDraw, RenderSnapshot, RingDraw};
pub use vertex::Vertex;
