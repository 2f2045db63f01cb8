//! Rendering seam
//!
//! The simulation never talks to a GPU. Each frame it captures a settled
//! [`FrameSnapshot`], and whatever draws implements [`RenderBackend`] to
//! receive it. Terrain and spheres go through the same interface.

pub mod snapshot;
pub mod vertex;

pub use snapshot::{FrameSnapshot, SnapshotBuffer};
pub use vertex::{SphereInstance, TerrainVertex};

/// Anything that can display terrain and spheres
pub trait RenderBackend {
    /// Replace the terrain geometry
    fn upload_terrain(&mut self, vertices: &[TerrainVertex], indices: &[u32], color: Option<[f32; 4]>);

    /// Replace the sphere instances
    fn upload_spheres(&mut self, spheres: &[SphereInstance]);
}
