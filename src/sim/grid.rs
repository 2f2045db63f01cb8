//! Uniform spatial hash for broad-phase collision pruning
//!
//! Rebuilt from scratch every step. Cells are keyed by integer coordinates
//! `floor(position / cell_size)`; the grid only stores sphere indices.

use std::collections::HashMap;

use glam::{IVec3, Vec3};

use super::state::SphereSet;
use crate::consts::{CELL_SIZE_FACTOR, MIN_CELL_SIZE};

/// The cell itself plus every neighbor that is lexicographically after it
///
/// Of any two adjacent cells exactly one lies in the other's forward set,
/// so a cross-cell pair is visited once, including across mixed-sign
/// diagonals such as `(1, -1, 0)`.
pub const FORWARD_OFFSETS: [IVec3; 14] = [
    IVec3::new(0, 0, 0),
    IVec3::new(0, 0, 1),
    IVec3::new(0, 1, -1),
    IVec3::new(0, 1, 0),
    IVec3::new(0, 1, 1),
    IVec3::new(1, -1, -1),
    IVec3::new(1, -1, 0),
    IVec3::new(1, -1, 1),
    IVec3::new(1, 0, -1),
    IVec3::new(1, 0, 0),
    IVec3::new(1, 0, 1),
    IVec3::new(1, 1, -1),
    IVec3::new(1, 1, 0),
    IVec3::new(1, 1, 1),
];

/// Sphere indices bucketed by cell
#[derive(Debug, Clone, Default)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<IVec3, Vec<usize>>,
    /// Cell of each sphere at the last rebuild, by sphere index
    sphere_cells: Vec<IVec3>,
}

impl SpatialGrid {
    /// Create an empty grid with the given cell size
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(MIN_CELL_SIZE),
            cells: HashMap::new(),
            sphere_cells: Vec::new(),
        }
    }

    /// Cell size for a sphere set: three times its largest radius
    pub fn cell_size_for(set: &SphereSet) -> f32 {
        (set.max_radius() * CELL_SIZE_FACTOR).max(MIN_CELL_SIZE)
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Convert a world position to a cell coordinate
    #[inline]
    pub fn cell_of(&self, pos: Vec3) -> IVec3 {
        (pos / self.cell_size).floor().as_ivec3()
    }

    /// Re-bucket every sphere, sizing cells from the set's largest radius
    pub fn rebuild(&mut self, set: &SphereSet) {
        self.cell_size = Self::cell_size_for(set);
        self.cells.clear();
        self.sphere_cells.clear();
        self.sphere_cells.reserve(set.len());

        for (i, sphere) in set.iter().enumerate() {
            let cell = self.cell_of(sphere.position);
            self.cells.entry(cell).or_default().push(i);
            self.sphere_cells.push(cell);
        }
    }

    /// Sphere indices in a cell, ascending
    pub fn members(&self, cell: IVec3) -> &[usize] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Total number of sphere placements across all cells
    pub fn total_placements(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    /// Candidate pairs `(i, j)` with `i < j`, each listed once
    ///
    /// Walks spheres in index order so the result does not depend on hash
    /// map iteration order. Within a cell only `i < j` is kept; across cells
    /// the forward offsets already rule out duplicates.
    pub fn candidate_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, &cell) in self.sphere_cells.iter().enumerate() {
            for offset in FORWARD_OFFSETS {
                let same_cell = offset == IVec3::ZERO;
                for &j in self.members(cell + offset) {
                    if same_cell && j <= i {
                        continue;
                    }
                    pairs.push((i.min(j), i.max(j)));
                }
            }
        }
        pairs
    }
}
