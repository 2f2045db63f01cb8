//! Circular fault displacement
//!
//! A fault raises (or sinks) every vertex within `radius` grid units of a
//! center vertex, falling off linearly to zero at the radius.

use super::mesh::Mesh;
use crate::consts::{FAULT_DISPLACEMENT, LARGE_FAULT_DIVISOR, SMALL_FAULT_DIVISOR};
use crate::rng::RandomSource;

/// Displace heights around `center_index`
///
/// Distance is measured in (row, col) units, not world units. Vertices at or
/// beyond the radius are untouched, so a radius of zero is a no-op.
pub fn apply_fault(mesh: &mut Mesh, center_index: usize, fault_radius: f32, displacement: f32) {
    if center_index >= mesh.vertices.len() {
        log::warn!(
            "Fault center {} outside mesh of {} vertices",
            center_index,
            mesh.vertices.len()
        );
        return;
    }
    if fault_radius <= 0.0 || displacement == 0.0 {
        return;
    }

    let n = mesh.grid_size;
    let (cy, cx) = mesh.row_col(center_index);
    // No vertex is further than n - 1 away in either axis
    let reach = (fault_radius.ceil() as usize).min(n);

    // Only the bounding square of the circle can be affected
    let row_lo = cy.saturating_sub(reach);
    let row_hi = (cy + reach).min(n - 1);
    let col_lo = cx.saturating_sub(reach);
    let col_hi = (cx + reach).min(n - 1);

    for row in row_lo..=row_hi {
        for col in col_lo..=col_hi {
            let dx = cx as f32 - col as f32;
            let dy = cy as f32 - row as f32;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance < fault_radius {
                let factor = (fault_radius - distance) / fault_radius;
                mesh.vertices[row * n + col].z += displacement * factor;
            }
        }
    }
    mesh.invalidate_normals();
}

/// Fault radius for the `iteration`-th random fault
///
/// Even iterations get the small radius, odd ones the large radius.
pub fn fault_radius_for(grid_size: usize, iteration: usize) -> f32 {
    let divisor = if iteration % 2 == 0 {
        SMALL_FAULT_DIVISOR
    } else {
        LARGE_FAULT_DIVISOR
    };
    (grid_size / divisor) as f32
}

/// Apply `fault_count` faults at random centers
///
/// Each fault draws its center first, then a displacement in
/// [-0.5, 0.5). Radii alternate via [`fault_radius_for`].
pub fn apply_random_faults(mesh: &mut Mesh, fault_count: usize, rng: &mut impl RandomSource) {
    if fault_count == 0 || !mesh.is_generated() {
        return;
    }

    let vertex_count = mesh.vertices.len();
    for i in 0..fault_count {
        let center = rng.index(vertex_count);
        let displacement = rng.range(-FAULT_DISPLACEMENT, FAULT_DISPLACEMENT);
        let radius = fault_radius_for(mesh.grid_size, i);
        apply_fault(mesh, center, radius, displacement);
    }

    log::debug!(
        "Applied {} faults to {}x{} grid",
        fault_count,
        mesh.grid_size,
        mesh.grid_size
    );
}
