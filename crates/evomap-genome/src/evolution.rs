//! Generational search for a map genome.

use crate::fitness::FitnessEvaluator;
use crate::genome::MapGenome;
use crate::mutation::{MutationConfig, Mutator};
use evomap_core::{Error, FitnessConfig, GeneratorConfig, Result};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Fitness summary of one generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub worst_fitness: f64,
}

/// Winner of a search plus the per-generation history
#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    pub best: MapGenome,
    pub best_fitness: f64,
    pub history: Vec<GenerationStats>,
}

pub struct MapEvolver {
    config: GeneratorConfig,
    mutator: Mutator,
    evaluator: FitnessEvaluator,
}

impl MapEvolver {
    pub fn new(config: GeneratorConfig, fitness: FitnessConfig) -> Result<Self> {
        config.validate()?;
        let mutator = Mutator::new(MutationConfig::from(&config));
        let evaluator = FitnessEvaluator::new(fitness);

        Ok(Self {
            config,
            mutator,
            evaluator,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }

    /// Fresh random population, each member seeded with the safe zone
    pub fn initial_population(&self, rng: &mut ChaCha8Rng) -> Vec<MapGenome> {
        (0..self.config.population_size)
            .map(|_| {
                MapGenome::random(self.config.rows, self.config.cols, rng)
                    .with_safe_zone(self.config.safe_zone_radius)
            })
            .collect()
    }

    /// Score and sort descending. The sort is stable, so equal scores keep
    /// their population order.
    pub fn rank<'a>(&self, population: &'a [MapGenome]) -> Vec<(f64, &'a MapGenome)> {
        let mut scored: Vec<(f64, &MapGenome)> = population
            .iter()
            .map(|genome| (self.evaluator.score(genome), genome))
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored
    }

    /// One generation: keep the top two verbatim, fill the rest with their offspring
    pub fn next_generation(
        &self,
        generation: usize,
        population: &[MapGenome],
        rng: &mut ChaCha8Rng,
    ) -> Result<(Vec<MapGenome>, GenerationStats)> {
        if population.len() < 2 {
            return Err(Error::Validation(format!(
                "Breeding needs at least 2 genomes, got {}",
                population.len()
            )));
        }

        let ranked = self.rank(population);
        let stats = summarize(generation, &ranked);

        let parent_a = ranked[0].1;
        let parent_b = ranked[1].1;

        let mut next = Vec::with_capacity(self.config.population_size);
        next.push(parent_a.clone());
        next.push(parent_b.clone());

        while next.len() < self.config.population_size {
            next.push(self.mutator.breed(parent_a, parent_b, rng)?);
        }

        Ok((next, stats))
    }

    /// Run the full search and return the best genome of the final population
    #[instrument(skip(self, rng), fields(
        rows = self.config.rows,
        cols = self.config.cols,
        population = self.config.population_size,
        generations = self.config.generations,
    ))]
    pub fn run(&self, rng: &mut ChaCha8Rng) -> Result<EvolutionOutcome> {
        let mut population = self.initial_population(rng);
        let mut history = Vec::with_capacity(self.config.generations);

        for generation in 0..self.config.generations {
            let (next, stats) = self.next_generation(generation, &population, rng)?;

            info!(
                generation,
                best_fitness = stats.best_fitness,
                mean_fitness = stats.mean_fitness,
                "Generation scored"
            );

            history.push(stats);
            population = next;
        }

        let ranked = self.rank(&population);
        let (best_fitness, best) = ranked[0];
        debug!(
            worst_fitness = ranked[ranked.len() - 1].0,
            "Final population ranked"
        );
        info!(best_fitness, "Search complete");

        Ok(EvolutionOutcome {
            best: best.clone(),
            best_fitness,
            history,
        })
    }
}

fn summarize(generation: usize, ranked: &[(f64, &MapGenome)]) -> GenerationStats {
    let total: f64 = ranked.iter().map(|(score, _)| score).sum();

    GenerationStats {
        generation,
        best_fitness: ranked.first().map(|(s, _)| *s).unwrap_or(f64::NAN),
        mean_fitness: total / ranked.len().max(1) as f64,
        worst_fitness: ranked.last().map(|(s, _)| *s).unwrap_or(f64::NAN),
    }
}
