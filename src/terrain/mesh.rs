//! Regular grid mesh
//!
//! Vertices are laid out row-major over [-1, 1]² in the XY plane:
//! `index = row * grid_size + col`, with Z holding the height.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_GRID_SIZE, MIN_GRID_SIZE};
use crate::error::SimError;

/// Triangle mesh over a square height grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertices per side
    pub grid_size: usize,
    pub vertices: Vec<Vec3>,
    /// Texture coordinates, one per vertex, spanning [0, 1]²
    pub uvs: Vec<Vec2>,
    pub triangles: Vec<[u32; 3]>,
    /// Derived; empty until `compute_vertex_normals` runs
    pub normals: Vec<Vec3>,
}

impl Mesh {
    /// True once any vertices exist
    pub fn is_generated(&self) -> bool {
        !self.vertices.is_empty()
    }

    /// Convert a vertex index to (row, col)
    #[inline]
    pub fn row_col(&self, index: usize) -> (usize, usize) {
        (index / self.grid_size, index % self.grid_size)
    }

    /// Lowest and highest Z, or None for an empty mesh
    pub fn height_range(&self) -> Option<(f32, f32)> {
        if self.vertices.is_empty() {
            return None;
        }
        let (min, max) = self
            .vertices
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v.z), hi.max(v.z))
            });
        Some((min, max))
    }

    /// Every triangle index refers to an existing vertex
    pub fn indices_valid(&self) -> bool {
        let n = self.vertices.len() as u32;
        self.triangles.iter().flatten().all(|&i| i < n)
    }

    /// Drop derived normals after a height change
    pub(crate) fn invalidate_normals(&mut self) {
        self.normals.clear();
    }
}

/// Build a flat `grid_size` x `grid_size` lattice
///
/// Each cell becomes two triangles, `(bottom_left, bottom_right, top_right)`
/// and `(top_left, bottom_left, top_right)`, so winding is consistent across
/// the grid. Out-of-range sizes return an error and build nothing.
pub fn generate_grid(grid_size: usize) -> Result<Mesh, SimError> {
    if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&grid_size) {
        log::warn!("Ignoring grid size {}", grid_size);
        return Err(SimError::InvalidGridSize(grid_size));
    }

    let n = grid_size;
    let step = 2.0 / (n - 1) as f32;
    let uv_step = 1.0 / (n - 1) as f32;

    let mut vertices = Vec::with_capacity(n * n);
    let mut uvs = Vec::with_capacity(n * n);
    for row in 0..n {
        for col in 0..n {
            vertices.push(Vec3::new(-1.0 + col as f32 * step, -1.0 + row as f32 * step, 0.0));
            uvs.push(Vec2::new(col as f32 * uv_step, row as f32 * uv_step));
        }
    }

    let mut triangles = Vec::with_capacity(2 * (n - 1) * (n - 1));
    for row in 0..n - 1 {
        for col in 0..n - 1 {
            let top_left = (row * n + col) as u32;
            let top_right = top_left + 1;
            let bottom_left = top_left + n as u32;
            let bottom_right = bottom_left + 1;

            triangles.push([bottom_left, bottom_right, top_right]);
            triangles.push([top_left, bottom_left, top_right]);
        }
    }

    log::debug!(
        "Generated {}x{} grid: {} vertices, {} triangles",
        n,
        n,
        vertices.len(),
        triangles.len()
    );

    Ok(Mesh {
        grid_size: n,
        vertices,
        uvs,
        triangles,
        normals: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_small_grid_layout() {
        let mesh = generate_grid(3).unwrap();
        assert_eq!(mesh.vertices.len(), 9);
        assert_eq!(mesh.triangles.len(), 8);

        // Corners
        assert_eq!(mesh.vertices[0], Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(mesh.vertices[2], Vec3::new(1.0, -1.0, 0.0));
        assert_eq!(mesh.vertices[8], Vec3::new(1.0, 1.0, 0.0));
        // Row-major: index 3 is row 1, col 0
        assert_eq!(mesh.vertices[3], Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(mesh.row_col(5), (1, 2));

        // First cell's two triangles
        assert_eq!(mesh.triangles[0], [3, 4, 1]);
        assert_eq!(mesh.triangles[1], [0, 3, 1]);
    }

    #[test]
    fn test_uvs_span_unit_square() {
        let mesh = generate_grid(5).unwrap();
        assert_eq!(mesh.uvs.len(), 25);
        assert_eq!(mesh.uvs[0], Vec2::ZERO);
        assert_eq!(mesh.uvs[24], Vec2::ONE);
        assert_eq!(mesh.uvs[1], Vec2::new(0.25, 0.0));
    }

    #[test]
    fn test_out_of_range_sizes_rejected() {
        for n in [0, 1, 256, 1000] {
            assert!(matches!(generate_grid(n), Err(SimError::InvalidGridSize(m)) if m == n));
        }
        assert!(generate_grid(2).is_ok());
        assert!(generate_grid(255).is_ok());
    }

    #[test]
    fn test_height_range() {
        let mut mesh = generate_grid(2).unwrap();
        assert_eq!(mesh.height_range(), Some((0.0, 0.0)));
        mesh.vertices[1].z = 2.0;
        mesh.vertices[2].z = -1.0;
        assert_eq!(mesh.height_range(), Some((-1.0, 2.0)));
        assert_eq!(Mesh::default().height_range(), None);
    }

    proptest! {
        #[test]
        fn prop_grid_counts(n in 2usize..=255) {
            let mesh = generate_grid(n).unwrap();
            prop_assert_eq!(mesh.vertices.len(), n * n);
            prop_assert_eq!(mesh.uvs.len(), n * n);
            prop_assert_eq!(mesh.triangles.len(), 2 * (n - 1) * (n - 1));
            prop_assert!(mesh.indices_valid());
            prop_assert!(mesh.vertices.iter().all(|v| v.z == 0.0));
        }
    }
}
