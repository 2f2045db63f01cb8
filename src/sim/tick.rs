//! Simulation stepping
//!
//! `step` advances a sphere set by one frame. `Simulation` wraps it with the
//! reset clock the demos run on.

use rand_pcg::Pcg32;

use super::collision::{contain, resolve_contacts, resolve_walls};
use super::grid::SpatialGrid;
use super::state::{SphereSet, reset};
use crate::error::SimError;
use crate::rng::RngState;
use crate::settings::SphereSettings;

/// Per-step counters, mostly for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub wall_hits: usize,
    pub contacts: usize,
}

/// Effective dt after time scaling and clamping
#[inline]
pub fn effective_dt(dt: f32, settings: &SphereSettings) -> f32 {
    // max/min drop NaN where clamp would pass it through
    (dt * settings.time_scale).max(0.0).min(settings.max_dt)
}

/// Advance every sphere by one semi-implicit Euler step
///
/// Gravity and damping update the velocity first, the new velocity moves the
/// sphere, then walls and sphere-sphere contacts are resolved. Contact
/// pushes can cross a wall, so positions are clamped once more at the end.
/// An empty set is a no-op.
pub fn step(
    set: &mut SphereSet,
    grid: &mut SpatialGrid,
    settings: &SphereSettings,
    dt: f32,
) -> StepStats {
    let mut stats = StepStats::default();
    if set.is_empty() {
        return stats;
    }

    let dt = effective_dt(dt, settings);
    let half = set.half_width();
    for sphere in set.as_mut_slice() {
        sphere.velocity.y += settings.gravity * dt;
        sphere.velocity *= settings.damping;
        sphere.position += sphere.velocity * dt;

        if resolve_walls(sphere, half, settings.elasticity) {
            stats.wall_hits += 1;
        }
    }

    stats.contacts = resolve_contacts(set, grid, settings);
    if stats.contacts > 0 {
        for sphere in set.as_mut_slice() {
            contain(sphere, half);
        }
    }
    stats
}

/// Sphere simulation with periodic and on-demand resets
#[derive(Debug, Clone)]
pub struct Simulation {
    pub settings: SphereSettings,
    spheres: SphereSet,
    grid: SpatialGrid,
    rng_state: RngState,
    rng: Pcg32,
    /// Seconds of wall-clock time since the last reset
    elapsed_since_reset: f32,
    resets: u32,
    reset_requested: bool,
}

impl Simulation {
    /// Create a simulation and spawn its first sphere set
    pub fn new(settings: SphereSettings, seed: u64) -> Result<Self, SimError> {
        let rng_state = RngState::new(seed);
        let mut sim = Self {
            settings,
            spheres: SphereSet::default(),
            grid: SpatialGrid::default(),
            rng_state,
            rng: rng_state.to_rng(),
            elapsed_since_reset: 0.0,
            resets: 0,
            reset_requested: false,
        };
        sim.reset()?;
        Ok(sim)
    }

    pub fn spheres(&self) -> &SphereSet {
        &self.spheres
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    /// Number of resets so far, including the initial spawn
    pub fn resets(&self) -> u32 {
        self.resets
    }

    pub fn elapsed_since_reset(&self) -> f32 {
        self.elapsed_since_reset
    }

    /// Respawn the sphere set from the current settings
    pub fn reset(&mut self) -> Result<(), SimError> {
        reset(
            &mut self.spheres,
            self.settings.count,
            self.settings.cube_width,
            &self.settings,
            &mut self.rng,
        )?;
        self.grid = SpatialGrid::new(SpatialGrid::cell_size_for(&self.spheres));
        self.elapsed_since_reset = 0.0;
        self.resets += 1;
        Ok(())
    }

    /// Reset before the next step
    pub fn request_reset(&mut self) {
        self.reset_requested = true;
    }

    /// Change the sphere count and reset
    ///
    /// A zero count is ignored and the current spheres keep running.
    pub fn set_count(&mut self, count: usize) -> Result<(), SimError> {
        if count == 0 {
            log::warn!("Ignoring sphere count 0, keeping {}", self.settings.count);
            return Err(SimError::InvalidSphereCount(count));
        }
        self.settings.count = count;
        self.reset()
    }

    /// Advance one frame of `dt` seconds
    ///
    /// The reset clock runs on the raw frame time; the step itself sees the
    /// scaled and clamped dt.
    pub fn tick(&mut self, dt: f32) -> StepStats {
        self.elapsed_since_reset += dt.max(0.0);

        let interval = self.settings.reset_interval;
        let due = interval > 0.0 && self.elapsed_since_reset > interval;
        if due || self.reset_requested {
            self.reset_requested = false;
            match self.reset() {
                Ok(()) => {}
                Err(e) if e.is_invalid_parameter() => log::warn!("Reset skipped: {}", e),
                Err(e) => log::error!("Reset failed: {}", e),
            }
        }

        step(&mut self.spheres, &mut self.grid, &self.settings, dt)
    }
}
