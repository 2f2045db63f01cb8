//! Height normalization and per-vertex normals

use glam::Vec3;

use super::mesh::Mesh;
use crate::error::SimError;

/// Remap heights so they are centered on zero with a total range of one
///
/// `z' = (z - (max + min) / 2) / (max - min)`. A flat mesh has no range to
/// divide by and is left as is.
pub fn normalize_heights(mesh: &mut Mesh) {
    let Some((min, max)) = mesh.height_range() else {
        return;
    };
    if max <= min {
        log::debug!("Flat terrain at z={}, skipping normalization", min);
        return;
    }

    let mid = 0.5 * (max + min);
    let range = max - min;
    for v in &mut mesh.vertices {
        v.z = (v.z - mid) / range;
    }
    mesh.invalidate_normals();
}

/// Smooth vertex normals from the triangle list
///
/// Each face normal is the raw cross product of two edges, so larger
/// triangles weigh more. The sums are normalized at the end; a vertex with
/// no usable faces gets a zero normal.
pub fn compute_vertex_normals(mesh: &mut Mesh) -> Result<(), SimError> {
    if !mesh.is_generated() {
        log::error!("Cannot compute normals: no vertices");
        return Err(SimError::MeshNotGenerated);
    }

    let mut normals = vec![Vec3::ZERO; mesh.vertices.len()];
    for tri in &mesh.triangles {
        let [a, b, c] = tri.map(|i| i as usize);
        let p0 = mesh.vertices[a];
        let e1 = mesh.vertices[b] - p0;
        let e2 = mesh.vertices[c] - p0;
        let face = e1.cross(e2);

        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }

    for n in &mut normals {
        *n = n.normalize_or_zero();
    }
    mesh.normals = normals;
    Ok(())
}
