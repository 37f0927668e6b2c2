//! Mutation and crossover operators for map genomes.

use crate::genome::{draw_tile, MapGenome};
use crate::validation::validate_parents;
use evomap_core::{GeneratorConfig, Result};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Probability of redrawing each cell
    pub mutation_rate: f64,
    /// Half-width of the grass block re-applied after breeding
    pub safe_zone_radius: usize,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self::from(&GeneratorConfig::default())
    }
}

impl From<&GeneratorConfig> for MutationConfig {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            mutation_rate: config.mutation_rate,
            safe_zone_radius: config.safe_zone_radius,
        }
    }
}

pub struct Mutator {
    config: MutationConfig,
}

impl Mutator {
    pub fn new(config: MutationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MutationConfig {
        &self.config
    }

    /// Copy of `genome` with each cell independently redrawn at the mutation rate
    pub fn mutate(&self, genome: &MapGenome, rng: &mut ChaCha8Rng) -> MapGenome {
        let cells = genome
            .cells()
            .iter()
            .map(|&kind| {
                if rng.gen::<f64>() < self.config.mutation_rate {
                    draw_tile(rng)
                } else {
                    kind
                }
            })
            .collect();

        MapGenome::from_parts(genome.rows(), genome.cols(), cells)
    }

    /// Row-band crossover: rows `[0, rows / 2)` from `parent_a`, the rest from `parent_b`
    pub fn crossover(&self, parent_a: &MapGenome, parent_b: &MapGenome) -> Result<MapGenome> {
        validate_parents(parent_a, parent_b)?;

        let split = parent_a.rows() / 2;
        let mut cells = Vec::with_capacity(parent_a.len());
        for row in 0..parent_a.rows() {
            let source = if row < split { parent_a } else { parent_b };
            cells.extend_from_slice(source.row(row));
        }

        Ok(MapGenome::from_parts(parent_a.rows(), parent_a.cols(), cells))
    }

    /// Crossover, then mutate, then re-apply the safe zone
    pub fn breed(
        &self,
        parent_a: &MapGenome,
        parent_b: &MapGenome,
        rng: &mut ChaCha8Rng,
    ) -> Result<MapGenome> {
        let child = self.crossover(parent_a, parent_b)?;
        let child = self.mutate(&child, rng);
        Ok(child.with_safe_zone(self.config.safe_zone_radius))
    }
}
