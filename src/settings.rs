//! Terrain and sphere-simulation settings
//!
//! Persisted as JSON. Every field has a default so partial files load.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::RESET_INTERVAL;
use crate::error::SimError;

/// Which of the two sphere demos to reproduce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SphereVariant {
    /// Handful of equal-ish spheres, gentle gravity, brute-force pairs
    Simple,
    /// Many spheres of varied size in a spatial hash
    #[default]
    Many,
}

impl SphereVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            SphereVariant::Simple => "Simple",
            SphereVariant::Many => "Many",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "simple" => Some(SphereVariant::Simple),
            "many" => Some(SphereVariant::Many),
            _ => None,
        }
    }
}

/// Broad-phase strategy for sphere-sphere collisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BroadPhase {
    /// Check every pair
    BruteForce,
    /// Uniform grid keyed by integer cell coordinates
    #[default]
    SpatialHash,
}

/// Where spheres are placed on reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpawnLayout {
    /// Anywhere inside the cube
    FullCube,
    /// Upper half only, so the set visibly falls
    #[default]
    UpperHalf,
}

/// Terrain generation inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Vertices per side, valid in [2, 255]
    pub grid_size: usize,
    /// Number of random faults applied after generation
    pub fault_count: usize,
    /// Ground surface: `#RRGGBBAA` color or a `.png`/`.jpg` texture name
    pub surface: Option<String>,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            grid_size: 64,
            fault_count: 100,
            surface: None,
        }
    }
}

/// Sphere simulation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereSettings {
    pub variant: SphereVariant,
    /// Spheres created per reset
    pub count: usize,
    /// Edge length of the bounding cube (centered on the origin)
    pub cube_width: f32,
    /// Radius scale `k` in `(u + 0.25) * k / cbrt(count)`
    pub radius_scale: f32,
    pub layout: SpawnLayout,
    /// Half-width of the random initial X/Z velocity (0 = start at rest)
    pub initial_speed: f32,
    /// Acceleration on Y (negative = down)
    pub gravity: f32,
    /// Velocity multiplier applied every step
    pub damping: f32,
    /// Fraction of velocity kept (and reversed) on a wall bounce
    pub elasticity: f32,
    /// Upper bound on a single step's dt
    pub max_dt: f32,
    /// Frame dt is multiplied by this before clamping
    pub time_scale: f32,
    /// Fraction of the overlap each sphere is pushed out by
    pub overlap_correction: f32,
    /// Scale on the normal impulse between approaching spheres
    pub restitution: f32,
    /// Overlaps at or below this are ignored
    pub min_overlap: f32,
    pub broad_phase: BroadPhase,
    /// Seconds between automatic resets (<= 0 disables)
    pub reset_interval: f32,
}

impl Default for SphereSettings {
    fn default() -> Self {
        Self::from_variant(SphereVariant::Many)
    }
}

impl SphereSettings {
    /// Create settings from a variant preset
    pub fn from_variant(variant: SphereVariant) -> Self {
        match variant {
            SphereVariant::Many => Self {
                variant,
                count: 50,
                cube_width: 2.0,
                radius_scale: 0.375,
                layout: SpawnLayout::UpperHalf,
                initial_speed: 0.0,
                gravity: -4.0,
                damping: 0.995,
                elasticity: 0.9,
                max_dt: 0.1,
                time_scale: 1.0,
                overlap_correction: 0.5,
                restitution: 0.9,
                min_overlap: 1.0e-6,
                broad_phase: BroadPhase::SpatialHash,
                reset_interval: RESET_INTERVAL,
            },
            SphereVariant::Simple => Self {
                variant,
                count: 50,
                cube_width: 2.5,
                radius_scale: 0.5,
                layout: SpawnLayout::FullCube,
                initial_speed: 0.025,
                gravity: -0.03,
                damping: 0.99,
                elasticity: 0.9,
                max_dt: 0.1,
                time_scale: 0.2,
                overlap_correction: 0.5,
                restitution: 1.0,
                min_overlap: 1.0e-6,
                broad_phase: BroadPhase::BruteForce,
                reset_interval: RESET_INTERVAL,
            },
        }
    }

    /// Half the cube edge; walls sit at +/- this on every axis
    #[inline]
    pub fn half_width(&self) -> f32 {
        self.cube_width * 0.5
    }
}

/// Everything the driver needs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub terrain: TerrainSettings,
    pub spheres: SphereSettings,
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!(
                    "Using default settings ({}: {})",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_round_trips_through_str() {
        for v in [SphereVariant::Simple, SphereVariant::Many] {
            assert_eq!(SphereVariant::from_str(v.as_str()), Some(v));
        }
        assert_eq!(SphereVariant::from_str("MANY"), Some(SphereVariant::Many));
        assert_eq!(SphereVariant::from_str("lots"), None);
    }

    #[test]
    fn test_presets_differ_where_demos_differ() {
        let many = SphereSettings::from_variant(SphereVariant::Many);
        let simple = SphereSettings::from_variant(SphereVariant::Simple);
        assert_eq!(many.broad_phase, BroadPhase::SpatialHash);
        assert_eq!(simple.broad_phase, BroadPhase::BruteForce);
        assert_eq!(many.layout, SpawnLayout::UpperHalf);
        assert_eq!(simple.layout, SpawnLayout::FullCube);
        assert_eq!(many.initial_speed, 0.0);
        assert!(simple.initial_speed > 0.0);
        assert!(many.elasticity > 0.0 && many.elasticity < 1.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{ "terrain": { "grid_size": 10 } }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.terrain.grid_size, 10);
        assert_eq!(settings.terrain.fault_count, 100);
        assert_eq!(settings.spheres.count, 50);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("terrasim-settings-{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.terrain.grid_size = 17;
        settings.spheres = SphereSettings::from_variant(SphereVariant::Simple);
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.terrain.grid_size, 17);
        assert_eq!(loaded.spheres.variant, SphereVariant::Simple);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/definitely/not/here.json");
        assert_eq!(settings.terrain.grid_size, 64);
    }
}
