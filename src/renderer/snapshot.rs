//! Settled per-frame copies of simulation state
//!
//! The simulation writes into the back snapshot and publishes it once the
//! tick is complete; readers only ever see the front one, never a partial
//! step.

use super::RenderBackend;
use super::vertex::{SphereInstance, TerrainVertex};
use crate::sim::SphereSet;
use crate::terrain::{Mesh, SurfaceStyle};

/// Everything a backend needs to draw one frame
#[derive(Debug, Clone, Default)]
pub struct FrameSnapshot {
    /// Tick number the snapshot was taken after
    pub frame: u64,
    pub terrain_vertices: Vec<TerrainVertex>,
    pub terrain_indices: Vec<u32>,
    /// Flat surface color, None when textured
    pub terrain_color: Option<[f32; 4]>,
    pub spheres: Vec<SphereInstance>,
}

impl FrameSnapshot {
    /// Overwrite this snapshot in place, reusing its allocations
    pub fn capture(
        &mut self,
        frame: u64,
        mesh: Option<&Mesh>,
        surface: &SurfaceStyle,
        spheres: &SphereSet,
    ) {
        self.frame = frame;

        self.terrain_vertices.clear();
        self.terrain_indices.clear();
        if let Some(mesh) = mesh.filter(|m| m.indices_valid()) {
            self.terrain_vertices.extend(TerrainVertex::from_mesh(mesh));
            self.terrain_indices
                .extend(mesh.triangles.iter().flatten().copied());
        }
        if mesh.is_some() && !self.has_terrain() {
            log::error!("Terrain mesh has out-of-range indices, not drawing it");
        }
        self.terrain_color = surface.color();

        self.spheres.clear();
        self.spheres.extend(spheres.iter().map(SphereInstance::from));
    }

    pub fn has_terrain(&self) -> bool {
        !self.terrain_vertices.is_empty()
    }

    /// Hand the snapshot to a backend
    pub fn submit(&self, backend: &mut impl RenderBackend) {
        if self.has_terrain() {
            backend.upload_terrain(
                &self.terrain_vertices,
                &self.terrain_indices,
                self.terrain_color,
            );
        }
        backend.upload_spheres(&self.spheres);
    }
}

/// Double buffer of snapshots
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuffer {
    front: FrameSnapshot,
    back: FrameSnapshot,
}

impl SnapshotBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last published snapshot
    pub fn front(&self) -> &FrameSnapshot {
        &self.front
    }

    /// Snapshot being written for the next publish
    pub fn back_mut(&mut self) -> &mut FrameSnapshot {
        &mut self.back
    }

    /// Make the back snapshot visible
    pub fn publish(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngState;
    use crate::settings::SphereSettings;
    use crate::terrain::{compute_vertex_normals, generate_grid};

    #[derive(Default)]
    struct RecordingBackend {
        terrain_uploads: Vec<(usize, usize)>,
        sphere_uploads: Vec<usize>,
    }

    impl RenderBackend for RecordingBackend {
        fn upload_terrain(&mut self, vertices: &[TerrainVertex], indices: &[u32], _color: Option<[f32; 4]>) {
            self.terrain_uploads.push((vertices.len(), indices.len()));
        }

        fn upload_spheres(&mut self, spheres: &[SphereInstance]) {
            self.sphere_uploads.push(spheres.len());
        }
    }

    fn spheres(count: usize) -> SphereSet {
        SphereSet::spawn(count, 2.0, &SphereSettings::default(), &mut RngState::new(1).to_rng()).unwrap()
    }

    #[test]
    fn test_capture_and_submit() {
        let mut mesh = generate_grid(4).unwrap();
        compute_vertex_normals(&mut mesh).unwrap();

        let mut snap = FrameSnapshot::default();
        snap.capture(7, Some(&mesh), &SurfaceStyle::default(), &spheres(5));
        assert_eq!(snap.frame, 7);
        assert_eq!(snap.terrain_vertices.len(), 16);
        assert_eq!(snap.terrain_indices.len(), 18 * 3);

        let mut backend = RecordingBackend::default();
        snap.submit(&mut backend);
        assert_eq!(backend.terrain_uploads, vec![(16, 54)]);
        assert_eq!(backend.sphere_uploads, vec![5]);
    }

    #[test]
    fn test_no_terrain_skips_terrain_upload() {
        let mut snap = FrameSnapshot::default();
        snap.capture(1, None, &SurfaceStyle::default(), &spheres(3));
        let mut backend = RecordingBackend::default();
        snap.submit(&mut backend);
        assert!(backend.terrain_uploads.is_empty());
        assert_eq!(backend.sphere_uploads, vec![3]);
    }

    #[test]
    fn test_mesh_with_bad_indices_is_not_drawn() {
        let mut mesh = generate_grid(3).unwrap();
        mesh.triangles.push([0, 1, 9]);

        let mut snap = FrameSnapshot::default();
        snap.capture(2, Some(&mesh), &SurfaceStyle::default(), &spheres(2));
        assert!(!snap.has_terrain());
        assert!(snap.terrain_indices.is_empty());

        let mut backend = RecordingBackend::default();
        snap.submit(&mut backend);
        assert!(backend.terrain_uploads.is_empty());
        assert_eq!(backend.sphere_uploads, vec![2]);
    }

    #[test]
    fn test_front_only_changes_on_publish() {
        let mut buffer = SnapshotBuffer::new();
        buffer
            .back_mut()
            .capture(1, None, &SurfaceStyle::default(), &spheres(4));
        assert_eq!(buffer.front().frame, 0);
        assert!(buffer.front().spheres.is_empty());

        buffer.publish();
        assert_eq!(buffer.front().frame, 1);
        assert_eq!(buffer.front().spheres.len(), 4);
    }
}
