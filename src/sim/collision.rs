//! Sphere collision detection and response
//!
//! The response is deliberately approximate: overlapping spheres are pushed
//! apart along the contact normal, and approaching spheres exchange a damped
//! normal impulse. Stable, not energy conserving.

use glam::Vec3;

use super::grid::SpatialGrid;
use super::state::{Sphere, SphereSet};
use crate::settings::{BroadPhase, SphereSettings};

/// Contact response tuning, pulled out of the sphere settings
#[derive(Debug, Clone, Copy)]
pub struct ContactParams {
    /// Fraction of the overlap each sphere is moved
    pub overlap_correction: f32,
    /// Scale on the normal impulse
    pub restitution: f32,
    /// Overlaps at or below this are ignored
    pub min_overlap: f32,
}

impl From<&SphereSettings> for ContactParams {
    fn from(settings: &SphereSettings) -> Self {
        Self {
            overlap_correction: settings.overlap_correction,
            restitution: settings.restitution,
            min_overlap: settings.min_overlap,
        }
    }
}

/// Clamp a sphere inside the cube, bouncing off any wall it crossed
///
/// Returns true if a wall was hit.
pub fn resolve_walls(sphere: &mut Sphere, half_width: f32, elasticity: f32) -> bool {
    let limit = (half_width - sphere.radius).max(0.0);
    let mut hit = false;
    for axis in 0..3 {
        if sphere.position[axis].abs() > limit {
            sphere.position[axis] = sphere.position[axis].signum() * limit;
            sphere.velocity[axis] *= -elasticity;
            hit = true;
        }
    }
    hit
}

/// Pull a sphere back inside the cube without touching its velocity
pub fn contain(sphere: &mut Sphere, half_width: f32) {
    let limit = (half_width - sphere.radius).max(0.0);
    sphere.position = sphere.position.clamp(Vec3::splat(-limit), Vec3::splat(limit));
}

/// Separate and bounce two spheres if they overlap
///
/// Returns true if a correction was applied.
pub fn resolve_pair(a: &mut Sphere, b: &mut Sphere, params: &ContactParams) -> bool {
    let delta = a.position - b.position;
    let distance_sq = delta.length_squared();
    let radius_sum = a.radius + b.radius;
    if distance_sq >= radius_sum * radius_sum {
        return false;
    }

    let distance = distance_sq.sqrt();
    let overlap = radius_sum - distance;
    if overlap <= params.min_overlap {
        return false;
    }

    // Coincident centers have no direction; pick one
    let normal = if distance > 0.0 { delta / distance } else { Vec3::Y };

    let correction = normal * (overlap * params.overlap_correction);
    a.position += correction;
    b.position -= correction;

    let velocity_along_normal = (a.velocity - b.velocity).dot(normal);
    if velocity_along_normal < 0.0 {
        let impulse = normal * (velocity_along_normal * params.restitution);
        a.velocity -= impulse;
        b.velocity += impulse;
    }
    true
}

/// Mutable references to two distinct spheres
fn pair_mut(spheres: &mut [Sphere], i: usize, j: usize) -> (&mut Sphere, &mut Sphere) {
    debug_assert!(i < j);
    let (head, tail) = spheres.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

/// Check every pair directly
pub fn resolve_brute_force(spheres: &mut [Sphere], params: &ContactParams) -> usize {
    let mut contacts = 0;
    for i in 0..spheres.len() {
        for j in i + 1..spheres.len() {
            let (a, b) = pair_mut(spheres, i, j);
            if resolve_pair(a, b, params) {
                contacts += 1;
            }
        }
    }
    contacts
}

/// Rebuild the grid and check only pairs in the same or forward cells
pub fn resolve_spatial_hash(
    set: &mut SphereSet,
    grid: &mut SpatialGrid,
    params: &ContactParams,
) -> usize {
    grid.rebuild(set);
    let spheres = set.as_mut_slice();
    let mut contacts = 0;
    for (i, j) in grid.candidate_pairs() {
        let (a, b) = pair_mut(spheres, i, j);
        if resolve_pair(a, b, params) {
            contacts += 1;
        }
    }
    contacts
}

/// Resolve all sphere-sphere contacts with the configured broad phase
pub fn resolve_contacts(
    set: &mut SphereSet,
    grid: &mut SpatialGrid,
    settings: &SphereSettings,
) -> usize {
    let params = ContactParams::from(settings);
    match settings.broad_phase {
        BroadPhase::BruteForce => resolve_brute_force(set.as_mut_slice(), &params),
        BroadPhase::SpatialHash => resolve_spatial_hash(set, grid, &params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ContactParams {
        ContactParams {
            overlap_correction: 0.5,
            restitution: 0.9,
            min_overlap: 1.0e-6,
        }
    }

    #[test]
    fn test_wall_bounce_clamps_and_reverses() {
        let mut s = Sphere::new(Vec3::new(0.0, -0.95, 0.0), 0.1)
            .with_velocity(Vec3::new(0.0, -2.0, 0.0));
        assert!(resolve_walls(&mut s, 1.0, 0.9));
        assert!((s.position.y + 0.9).abs() < 1e-6);
        assert!((s.velocity.y - 1.8).abs() < 1e-6);
    }

    #[test]
    fn test_no_wall_hit_inside() {
        let mut s = Sphere::new(Vec3::new(0.5, 0.5, -0.5), 0.1).with_velocity(Vec3::ONE);
        assert!(!resolve_walls(&mut s, 1.0, 0.9));
        assert_eq!(s.velocity, Vec3::ONE);
    }

    #[test]
    fn test_contain_keeps_velocity() {
        let mut s = Sphere::new(Vec3::new(1.2, -0.3, -1.5), 0.1).with_velocity(Vec3::X);
        contain(&mut s, 1.0);
        assert!((s.position - Vec3::new(0.9, -0.3, -0.9)).length() < 1e-6);
        assert_eq!(s.velocity, Vec3::X);
    }

    #[test]
    fn test_pair_separates_fully_at_half_correction() {
        let mut a = Sphere::new(Vec3::new(0.05, 0.0, 0.0), 0.1);
        let mut b = Sphere::new(Vec3::new(-0.05, 0.0, 0.0), 0.1);
        assert!(resolve_pair(&mut a, &mut b, &params()));
        let d = (a.position - b.position).length();
        assert!((d - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_impulse_only_when_approaching() {
        // Approaching along X
        let mut a = Sphere::new(Vec3::new(0.09, 0.0, 0.0), 0.05).with_velocity(Vec3::new(-1.0, 0.0, 0.0));
        let mut b = Sphere::new(Vec3::new(0.0, 0.0, 0.0), 0.05).with_velocity(Vec3::new(1.0, 0.0, 0.0));
        resolve_pair(&mut a, &mut b, &params());
        // v_n = -2, impulse = -1.8 along +X
        assert!((a.velocity.x - 0.8).abs() < 1e-5);
        assert!((b.velocity.x + 0.8).abs() < 1e-5);

        // Separating: positions corrected, velocities untouched
        let mut a = Sphere::new(Vec3::new(0.09, 0.0, 0.0), 0.05).with_velocity(Vec3::new(1.0, 0.0, 0.0));
        let mut b = Sphere::new(Vec3::new(0.0, 0.0, 0.0), 0.05);
        resolve_pair(&mut a, &mut b, &params());
        assert_eq!(a.velocity, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(b.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_tiny_overlap_ignored() {
        let mut a = Sphere::new(Vec3::new(0.2 - 1.0e-7, 0.0, 0.0), 0.1);
        let mut b = Sphere::new(Vec3::ZERO, 0.1);
        let before = a.position;
        assert!(!resolve_pair(&mut a, &mut b, &params()));
        assert_eq!(a.position, before);
    }

    #[test]
    fn test_coincident_centers_pushed_apart() {
        let mut a = Sphere::new(Vec3::ZERO, 0.1);
        let mut b = Sphere::new(Vec3::ZERO, 0.1);
        assert!(resolve_pair(&mut a, &mut b, &params()));
        assert!(((a.position - b.position).length() - 0.2).abs() < 1e-6);
        assert!(!a.position.is_nan());
    }

    #[test]
    fn test_hash_and_brute_force_agree_on_small_cluster() {
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.15, 0.0, 0.0),
            Vec3::new(0.0, 0.15, 0.0),
            Vec3::new(0.8, 0.8, 0.8),
        ];
        let spheres: Vec<Sphere> = positions.iter().map(|&p| Sphere::new(p, 0.1)).collect();

        let mut hashed = SphereSet::from_spheres(spheres.clone(), 2.0);
        let mut grid = SpatialGrid::default();
        let hashed_contacts = resolve_spatial_hash(&mut hashed, &mut grid, &params());

        let mut brute = spheres;
        let brute_contacts = resolve_brute_force(&mut brute, &params());

        assert_eq!(hashed_contacts, brute_contacts);
        assert_eq!(hashed.as_slice(), brute.as_slice());
    }
}
