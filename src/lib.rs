//! Terrasim - terrain faulting and sphere physics
//!
//! Core modules:
//! - `terrain`: Grid mesh generation, fault displacement, height normalization, vertex normals
//! - `sim`: Sphere simulation (integration, wall bounces, spatial-hash collisions)
//! - `renderer`: GPU-ready snapshots and the backend seam shared by both visualizations
//! - `settings`: Serializable tuning for terrain and sphere variants
//! - `rng`: Injectable random source for reproducible runs

pub mod error;
pub mod renderer;
pub mod rng;
pub mod settings;
pub mod sim;
pub mod terrain;

pub use error::SimError;
pub use rng::{RandomSource, RngState, SequenceSource};
pub use settings::{BroadPhase, Settings, SpawnLayout, SphereSettings, SphereVariant, TerrainSettings};

/// Configuration constants
pub mod consts {
    /// Smallest grid accepted by terrain generation
    pub const MIN_GRID_SIZE: usize = 2;
    /// Largest grid accepted by terrain generation (keeps indices 16-bit friendly)
    pub const MAX_GRID_SIZE: usize = 255;

    /// Fault displacement is drawn from [-FAULT_DISPLACEMENT, FAULT_DISPLACEMENT)
    pub const FAULT_DISPLACEMENT: f32 = 0.5;
    /// Even iterations use grid_size / SMALL_FAULT_DIVISOR as the fault radius
    pub const SMALL_FAULT_DIVISOR: usize = 20;
    /// Odd iterations use grid_size / LARGE_FAULT_DIVISOR as the fault radius
    pub const LARGE_FAULT_DIVISOR: usize = 5;

    /// Sandy ground color used when no surface style is given
    pub const GROUND_COLOR: [f32; 4] = [0.827, 0.737, 0.459, 1.0];
    /// Translucent white used when a surface style can't be parsed
    pub const FALLBACK_SURFACE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.3];

    /// Spatial hash cell size as a multiple of the largest sphere radius
    pub const CELL_SIZE_FACTOR: f32 = 3.0;
    /// Lower bound on the spatial hash cell size
    pub const MIN_CELL_SIZE: f32 = 1.0e-4;

    /// Seconds between automatic sphere resets
    pub const RESET_INTERVAL: f32 = 15.0;
}
