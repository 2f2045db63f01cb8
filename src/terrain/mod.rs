//! Terrain generation
//!
//! The pipeline is strictly ordered: grid, faults (optional), height
//! normalization, then normals. [`TerrainGenerator`] owns the current mesh
//! and keeps it intact when a request is invalid.

pub mod fault;
pub mod mesh;
pub mod shading;
pub mod surface;

pub use fault::{apply_fault, apply_random_faults, fault_radius_for};
pub use mesh::{Mesh, generate_grid};
pub use shading::{compute_vertex_normals, normalize_heights};
pub use surface::SurfaceStyle;

use crate::error::SimError;
use crate::rng::RandomSource;
use crate::settings::TerrainSettings;

/// Holds the current terrain mesh between regenerations
#[derive(Debug, Clone, Default)]
pub struct TerrainGenerator {
    mesh: Option<Mesh>,
    surface: SurfaceStyle,
}

impl TerrainGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current mesh, if one has been generated
    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn surface(&self) -> &SurfaceStyle {
        &self.surface
    }

    pub fn set_surface(&mut self, input: &str) {
        self.surface = SurfaceStyle::parse(input);
    }

    /// Replace the mesh with a flat grid. Invalid sizes keep the old mesh.
    pub fn generate_grid(&mut self, grid_size: usize) -> Result<(), SimError> {
        self.mesh = Some(generate_grid(grid_size)?);
        Ok(())
    }

    pub fn apply_random_faults(
        &mut self,
        fault_count: usize,
        rng: &mut impl RandomSource,
    ) -> Result<(), SimError> {
        let mesh = self.mesh_mut("apply faults")?;
        apply_random_faults(mesh, fault_count, rng);
        Ok(())
    }

    pub fn normalize_heights(&mut self) -> Result<(), SimError> {
        let mesh = self.mesh_mut("normalize heights")?;
        normalize_heights(mesh);
        Ok(())
    }

    pub fn compute_vertex_normals(&mut self) -> Result<(), SimError> {
        let mesh = self.mesh_mut("compute normals")?;
        compute_vertex_normals(mesh)
    }

    /// Run the whole pipeline from settings
    ///
    /// The new mesh is built off to the side and only swapped in once
    /// complete, so a bad grid size leaves the previous terrain in place.
    pub fn regenerate(
        &mut self,
        settings: &TerrainSettings,
        rng: &mut impl RandomSource,
    ) -> Result<(), SimError> {
        let mut mesh = generate_grid(settings.grid_size)?;
        apply_random_faults(&mut mesh, settings.fault_count, rng);
        normalize_heights(&mut mesh);
        compute_vertex_normals(&mut mesh)?;

        if let Some(surface) = &settings.surface {
            self.surface = SurfaceStyle::parse(surface);
        }

        log::info!(
            "Terrain regenerated: {}x{} grid, {} faults",
            settings.grid_size,
            settings.grid_size,
            settings.fault_count
        );
        self.mesh = Some(mesh);
        Ok(())
    }

    fn mesh_mut(&mut self, action: &str) -> Result<&mut Mesh, SimError> {
        match self.mesh.as_mut() {
            Some(mesh) => Ok(mesh),
            None => {
                log::error!("Cannot {}: no mesh generated yet", action);
                Err(SimError::MeshNotGenerated)
            }
        }
    }
}
