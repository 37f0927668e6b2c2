//! Fitness scoring for map genomes.

use crate::genome::MapGenome;
use evomap_core::{FitnessConfig, TileCatalog};
use serde::{Deserialize, Serialize};

/// Walkable and blocked coverage of a genome. Every cell counts toward
/// exactly one of the two, so the counts always sum to `total`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub walkable: usize,
    pub blocked: usize,
    pub total: usize,
}

impl Coverage {
    pub fn walkable_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.walkable as f64 / self.total as f64
    }

    pub fn blocked_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.blocked as f64 / self.total as f64
    }
}

pub struct FitnessEvaluator {
    catalog: &'static TileCatalog,
    config: FitnessConfig,
}

impl FitnessEvaluator {
    pub fn new(config: FitnessConfig) -> Self {
        Self {
            catalog: TileCatalog::global(),
            config,
        }
    }

    pub fn coverage(&self, genome: &MapGenome) -> Coverage {
        let mut walkable = 0;
        let mut blocked = 0;

        for &kind in genome.cells() {
            if self.catalog.tile(kind).walkable {
                walkable += 1;
            } else {
                blocked += 1;
            }
        }

        Coverage {
            walkable,
            blocked,
            total: genome.len(),
        }
    }

    /// `(1 - |walkable - target|) - penalty * blocked`; higher is better
    pub fn score(&self, genome: &MapGenome) -> f64 {
        let coverage = self.coverage(genome);
        let distance = (coverage.walkable_ratio() - self.config.target_walkable_ratio).abs();
        (1.0 - distance) - self.config.blocked_penalty * coverage.blocked_ratio()
    }
}

impl Default for FitnessEvaluator {
    fn default() -> Self {
        Self::new(FitnessConfig::default())
    }
}
