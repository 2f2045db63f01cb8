//! Sphere state and reset
//!
//! A sphere set is created wholesale on reset and never grows or shrinks
//! mid-run. Spheres are kept sorted by descending radius.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::rng::RandomSource;
use crate::settings::{SpawnLayout, SphereSettings};

/// A physical sphere
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Fixed at creation
    pub radius: f32,
    /// radius³, fixed at creation
    pub mass: f32,
    /// Cosmetic RGB in [0, 1)
    pub color: Vec3,
}

impl Sphere {
    /// Sphere at rest with mass derived from its radius
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            radius,
            mass: radius.powi(3),
            color: Vec3::ONE,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
    }
}

/// All spheres inside one bounding cube
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SphereSet {
    spheres: Vec<Sphere>,
    cube_width: f32,
    max_radius: f32,
}

impl SphereSet {
    /// Wrap existing spheres, sorting them by descending radius
    pub fn from_spheres(mut spheres: Vec<Sphere>, cube_width: f32) -> Self {
        spheres.sort_by(|a, b| b.radius.total_cmp(&a.radius));
        let max_radius = spheres.first().map(|s| s.radius).unwrap_or(0.0);
        Self {
            spheres,
            cube_width,
            max_radius,
        }
    }

    /// Spawn `count` random spheres in a cube of edge `cube_width`
    ///
    /// Radii follow `(u + 0.25) * k / cbrt(count)` so packing density stays
    /// about the same as the count changes. Positions are kept a radius away
    /// from every wall.
    pub fn spawn(
        count: usize,
        cube_width: f32,
        settings: &SphereSettings,
        rng: &mut impl RandomSource,
    ) -> Result<Self, SimError> {
        if count == 0 {
            log::warn!("Ignoring reset with zero spheres");
            return Err(SimError::InvalidSphereCount(count));
        }
        if !(cube_width > 0.0) {
            log::warn!("Ignoring reset with cube width {}", cube_width);
            return Err(SimError::InvalidCubeWidth(cube_width));
        }

        let half = cube_width * 0.5;
        let scale = settings.radius_scale / (count as f32).cbrt();
        let spheres = (0..count)
            .map(|_| {
                // Never let a sphere be wider than the cube
                let radius = ((rng.next_f32() + 0.25) * scale).min(half);
                let limit = half - radius;
                let x = rng.range(-limit, limit);
                let y = match settings.layout {
                    SpawnLayout::FullCube => rng.range(-limit, limit),
                    SpawnLayout::UpperHalf => rng.range(0.0, limit),
                };
                let z = rng.range(-limit, limit);
                let velocity = Vec3::new(
                    rng.range(-settings.initial_speed, settings.initial_speed),
                    0.0,
                    rng.range(-settings.initial_speed, settings.initial_speed),
                );
                let color = Vec3::new(rng.next_f32(), rng.next_f32(), rng.next_f32());
                Sphere {
                    color,
                    ..Sphere::new(Vec3::new(x, y, z), radius).with_velocity(velocity)
                }
            })
            .collect();

        Ok(Self::from_spheres(spheres, cube_width))
    }

    /// Edge length of the bounding cube
    pub fn cube_width(&self) -> f32 {
        self.cube_width
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.cube_width * 0.5
    }

    /// Radius of the largest sphere (0 when empty)
    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sphere> {
        self.spheres.iter()
    }

    pub fn as_slice(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Positions and velocities are mutable; the set itself is not
    pub fn as_mut_slice(&mut self) -> &mut [Sphere] {
        &mut self.spheres
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.spheres.iter().map(Sphere::kinetic_energy).sum()
    }
}

/// Replace `set` with `count` freshly spawned spheres
///
/// Invalid counts or cube sizes leave `set` exactly as it was.
pub fn reset(
    set: &mut SphereSet,
    count: usize,
    cube_width: f32,
    settings: &SphereSettings,
    rng: &mut impl RandomSource,
) -> Result<(), SimError> {
    *set = SphereSet::spawn(count, cube_width, settings, rng)?;
    log::info!(
        "Reset {} spheres in cube of width {} (max radius {:.4})",
        set.len(),
        cube_width,
        set.max_radius()
    );
    Ok(())
}
