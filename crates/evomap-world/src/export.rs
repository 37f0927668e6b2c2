//! Batch map generation and export records.

use crate::entity::SpawnRecord;
use crate::grid::WorldGrid;
use crate::simulation::spawn_creatures;
use chrono::{DateTime, Utc};
use evomap_core::{Result, RunConfig};
use evomap_genome::{MapEvolver, MapGenome};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

/// One generated map with its creature spawns, ready to write out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapExport {
    /// Shared by every map of one batch
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub seed: u64,
    pub index: usize,
    pub fitness: f64,
    pub rows: Vec<String>,
    pub spawns: Vec<SpawnRecord>,
}

impl MapExport {
    /// Evolve one map from `seed` and spawn creatures on it (no observer)
    pub fn generate(config: &RunConfig, run_id: Uuid, index: usize, seed: u64) -> Result<Self> {
        config.world.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let evolver = MapEvolver::new(config.generator.clone(), config.fitness.clone())?;
        let outcome = evolver.run(&mut rng)?;

        let grid = WorldGrid::freeze(&outcome.best);
        let creatures = spawn_creatures(&grid, &config.world, &mut rng, 0)?;

        Ok(Self {
            run_id,
            generated_at: Utc::now(),
            seed,
            index,
            fitness: outcome.best_fitness,
            rows: outcome.best.to_rows(),
            spawns: creatures.iter().map(|c| c.spawn_record()).collect(),
        })
    }

    /// Rebuild the genome from the exported symbol rows
    pub fn genome(&self) -> Result<MapGenome> {
        MapGenome::from_rows(self.rows.as_slice())
    }

    pub fn file_name(&self, extension: &str) -> String {
        format!("landscape_{}.{}", self.index, extension)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Generate `count` maps; map `i` uses seed `config.seed + i`
#[instrument(skip(config), fields(seed = config.seed))]
pub fn generate_batch(config: &RunConfig, count: usize) -> Result<Vec<MapExport>> {
    let run_id = Uuid::new_v4();
    let mut exports = Vec::with_capacity(count);

    for index in 0..count {
        let seed = config.seed.wrapping_add(index as u64);
        let export = MapExport::generate(config, run_id, index, seed)?;
        info!(
            %run_id,
            index,
            seed,
            fitness = export.fitness,
            spawns = export.spawns.len(),
            "Map generated"
        );
        exports.push(export);
    }

    Ok(exports)
}
