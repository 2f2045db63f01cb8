//! Sphere physics
//!
//! Single-threaded and frame-synchronous:
//! - Each step runs to completion before the next is scheduled
//! - Randomness only through a seeded source
//! - Stable iteration order (by sphere index), never by hash order

pub mod collision;
pub mod grid;
pub mod state;
pub mod tick;

pub use collision::{ContactParams, contain, resolve_contacts, resolve_pair, resolve_walls};
pub use grid::{FORWARD_OFFSETS, SpatialGrid};
pub use state::{Sphere, SphereSet, reset};
pub use tick::{Simulation, StepStats, effective_dt, step};
