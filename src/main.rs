//! Terrasim headless driver
//!
//! Generates a terrain, runs the sphere simulation for a number of frames
//! at a fixed frame time, and logs what a renderer would have received.

use std::path::PathBuf;

use clap::Parser;

use terrasim::renderer::{RenderBackend, SnapshotBuffer, SphereInstance, TerrainVertex};
use terrasim::sim::Simulation;
use terrasim::terrain::TerrainGenerator;
use terrasim::{RngState, Settings, SimError, SphereSettings, SphereVariant};

#[derive(Debug, Parser)]
#[command(name = "terrasim", about = "Fault terrain and sphere physics, headless")]
struct Cli {
    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective settings to this file and exit
    #[arg(long)]
    dump_config: Option<PathBuf>,

    /// Sphere preset: simple or many (overrides the settings file)
    #[arg(long)]
    variant: Option<String>,

    /// Terrain grid size (overrides the settings file)
    #[arg(long)]
    grid_size: Option<usize>,

    /// Number of terrain faults (overrides the settings file)
    #[arg(long)]
    faults: Option<usize>,

    /// Number of spheres (overrides the settings file)
    #[arg(long)]
    spheres: Option<usize>,

    /// Frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// RNG seed
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,
}

/// Backend that only tallies what it is given
#[derive(Default)]
struct LogBackend {
    terrain_uploads: u32,
    last_terrain: (usize, usize),
    sphere_uploads: u64,
}

impl RenderBackend for LogBackend {
    fn upload_terrain(&mut self, vertices: &[TerrainVertex], indices: &[u32], _color: Option<[f32; 4]>) {
        let shape = (vertices.len(), indices.len() / 3);
        if shape != self.last_terrain {
            log::debug!("Terrain upload: {} vertices, {} triangles", shape.0, shape.1);
            self.last_terrain = shape;
        }
        self.terrain_uploads += 1;
    }

    fn upload_spheres(&mut self, spheres: &[SphereInstance]) {
        self.sphere_uploads += spheres.len() as u64;
    }
}

fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(name) = &cli.variant {
        match SphereVariant::from_str(name) {
            Some(variant) => {
                let count = settings.spheres.count;
                settings.spheres = SphereSettings::from_variant(variant);
                settings.spheres.count = count;
            }
            None => log::warn!("Unknown variant '{}', keeping {}", name, settings.spheres.variant.as_str()),
        }
    }
    if let Some(n) = cli.grid_size {
        settings.terrain.grid_size = n;
    }
    if let Some(n) = cli.faults {
        settings.terrain.fault_count = n;
    }
    if let Some(n) = cli.spheres {
        settings.spheres.count = n;
    }
}

fn describe_spheres(spheres: &SphereSettings) -> String {
    format!("{} spheres ({})", spheres.count, spheres.variant.as_str())
}

fn main() -> Result<(), SimError> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    apply_overrides(&mut settings, &cli);

    if let Some(path) = &cli.dump_config {
        return settings.save(path);
    }

    log::info!(
        "Terrasim starting: seed {}, {} frames of {:.4}s, {}",
        cli.seed,
        cli.frames,
        cli.dt,
        describe_spheres(&settings.spheres)
    );

    let mut terrain = TerrainGenerator::new();
    let mut terrain_rng = RngState::new(cli.seed).to_rng();
    if let Err(e) = terrain.regenerate(&settings.terrain, &mut terrain_rng) {
        // Keep going with spheres only
        log::warn!("No terrain: {}", e);
    }
    if let Some((min, max)) = terrain.mesh().and_then(|m| m.height_range()) {
        log::info!("Terrain heights in [{:.3}, {:.3}]", min, max);
    }
    if terrain.surface().is_textured() {
        log::info!("Terrain surface: {:?}", terrain.surface());
    }

    let mut sim = Simulation::new(settings.spheres.clone(), cli.seed.wrapping_add(1))?;
    let mut buffer = SnapshotBuffer::new();
    let mut backend = LogBackend::default();
    let mut contacts = 0usize;
    let mut wall_hits = 0usize;

    for frame in 1..=cli.frames {
        let stats = sim.tick(cli.dt);
        contacts += stats.contacts;
        wall_hits += stats.wall_hits;

        buffer
            .back_mut()
            .capture(frame, terrain.mesh(), terrain.surface(), sim.spheres());
        buffer.publish();
        buffer.front().submit(&mut backend);

        if frame % 60 == 0 {
            log::debug!(
                "Frame {}: kinetic energy {:.5}, {} spheres in {} cells",
                frame,
                sim.spheres().kinetic_energy(),
                sim.grid().total_placements(),
                sim.grid().cell_count()
            );
        }
    }

    log::info!(
        "Done: {} resets, {} contacts, {} wall hits, {} sphere instances drawn, {} terrain uploads",
        sim.resets(),
        contacts,
        wall_hits,
        backend.sphere_uploads,
        backend.terrain_uploads
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_spheres_names_count_and_variant() {
        let mut spheres = SphereSettings::from_variant(SphereVariant::Simple);
        spheres.count = 12;
        assert_eq!(describe_spheres(&spheres), "12 spheres (Simple)");
    }

    #[test]
    fn test_variant_override_keeps_count() {
        let cli = Cli::parse_from(["terrasim", "--variant", "simple", "--spheres", "30"]);
        let mut settings = Settings::default();
        apply_overrides(&mut settings, &cli);
        assert_eq!(settings.spheres.variant, SphereVariant::Simple);
        assert_eq!(settings.spheres.count, 30);
    }
}
