//! Configuration types for map generation and simulation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Evolutionary map search parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of grid rows
    pub rows: usize,
    /// Number of grid columns
    pub cols: usize,
    /// Genomes per generation (at least 2)
    pub population_size: usize,
    /// Generations to run before picking the winner
    pub generations: usize,
    /// Per-cell probability of redrawing a tile during mutation
    pub mutation_rate: f64,
    /// Half-width of the forced grass block at the grid center
    pub safe_zone_radius: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: 15,
            cols: 20,
            population_size: 6,
            generations: 4,
            mutation_rate: 0.05,
            safe_zone_radius: 3,
        }
    }
}

impl GeneratorConfig {
    /// Side length of the safe zone when it is not clipped
    pub fn safe_zone_span(&self) -> usize {
        self.safe_zone_radius * 2 + 1
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::Validation(format!(
                "Grid must be non-empty, got {}x{}",
                self.rows, self.cols
            )));
        }

        if self.population_size < 2 {
            return Err(Error::Validation(format!(
                "Population size must be at least 2, got {}",
                self.population_size
            )));
        }

        let span = self.safe_zone_span();
        if self.rows < span || self.cols < span {
            return Err(Error::Validation(format!(
                "Grid {}x{} is smaller than the {}x{} safe zone",
                self.rows, self.cols, span, span
            )));
        }

        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(Error::Validation(format!(
                "Mutation rate must be within [0, 1], got {}",
                self.mutation_rate
            )));
        }

        Ok(())
    }
}

/// Fitness target and penalty
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    /// Walkable share of the map the search aims for
    pub target_walkable_ratio: f64,
    /// Penalty multiplier on the blocked share
    pub blocked_penalty: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            target_walkable_ratio: 0.75,
            blocked_penalty: 0.3,
        }
    }
}

/// Simulation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Visibility window radius; the window side is `2 * view_radius + 1`
    pub view_radius: i32,
    /// Passive creatures spawned at construction
    pub passive_count: usize,
    /// Aggressive creatures spawned at construction
    pub aggressive_count: usize,
    /// Starting hit points of the observer
    pub observer_hp: i32,
    /// Starting hit points of each creature
    pub creature_hp: i32,
    /// Damage a passive creature deals to the observer
    pub passive_damage: i32,
    /// Damage an aggressive creature deals to the observer or a passive creature
    pub aggressive_damage: i32,
    /// Manhattan distance at which a passive creature feels threatened
    pub threat_radius: i32,
    /// Random retries when the center cell is blocked
    pub observer_spawn_attempts: usize,
    /// Random retries per creature before giving up
    pub creature_spawn_attempts: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            view_radius: 4,
            passive_count: 4,
            aggressive_count: 2,
            observer_hp: 10,
            creature_hp: 10,
            passive_damage: 1,
            aggressive_damage: 2,
            threat_radius: 2,
            observer_spawn_attempts: 100,
            creature_spawn_attempts: 1000,
        }
    }
}

impl WorldConfig {
    /// Largest accepted view radius; keeps the window cell count inside `i32`
    pub const MAX_VIEW_RADIUS: i32 = 1024;

    /// Visibility window side length
    pub fn view_size(&self) -> i32 {
        self.view_radius * 2 + 1
    }

    pub fn validate(&self) -> Result<()> {
        if !(0..=Self::MAX_VIEW_RADIUS).contains(&self.view_radius) {
            return Err(Error::Validation(format!(
                "View radius must be in 0..={}, got {}",
                Self::MAX_VIEW_RADIUS,
                self.view_radius
            )));
        }

        if self.observer_hp <= 0 || self.creature_hp <= 0 {
            return Err(Error::Validation(format!(
                "Hit points must be positive, got observer {} and creature {}",
                self.observer_hp, self.creature_hp
            )));
        }

        if self.passive_damage < 0 || self.aggressive_damage < 0 {
            return Err(Error::Validation(format!(
                "Damage must not be negative, got passive {} and aggressive {}",
                self.passive_damage, self.aggressive_damage
            )));
        }

        if self.threat_radius < 0 {
            return Err(Error::Validation(format!(
                "Threat radius must not be negative, got {}",
                self.threat_radius
            )));
        }

        Ok(())
    }
}

/// Everything needed to reproduce one generated world
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    pub generator: GeneratorConfig,
    pub fitness: FitnessConfig,
    pub world: WorldConfig,
}

impl RunConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RunConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.generator.validate()?;
        self.world.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let generator = GeneratorConfig::default();
        assert_eq!(generator.rows, 15);
        assert_eq!(generator.cols, 20);
        assert_eq!(generator.population_size, 6);
        assert_eq!(generator.generations, 4);
        assert_eq!(generator.mutation_rate, 0.05);
        assert_eq!(generator.safe_zone_radius, 3);
        assert!(generator.validate().is_ok());

        let world = WorldConfig::default();
        assert_eq!(world.view_radius, 4);
        assert_eq!(world.view_size(), 9);
        assert_eq!(world.passive_count, 4);
        assert_eq!(world.aggressive_count, 2);
    }

    #[test]
    fn test_validate_rejects_small_population() {
        let config = GeneratorConfig {
            population_size: 1,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_grid_smaller_than_safe_zone() {
        let config = GeneratorConfig {
            rows: 6,
            cols: 20,
            safe_zone_radius: 3,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GeneratorConfig {
            rows: 7,
            cols: 7,
            safe_zone_radius: 3,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RunConfig::from_json(r#"{"seed": 7, "generator": {"generations": 1}}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.generator.generations, 1);
        assert_eq!(config.generator.rows, 15);
        assert_eq!(config.world.aggressive_damage, 2);
    }

    #[test]
    fn test_world_validate_rejects_bad_values() {
        assert!(WorldConfig::default().validate().is_ok());

        let invalid = [
            WorldConfig { view_radius: -3, ..Default::default() },
            WorldConfig { view_radius: WorldConfig::MAX_VIEW_RADIUS + 1, ..Default::default() },
            WorldConfig { observer_hp: 0, ..Default::default() },
            WorldConfig { creature_hp: 0, ..Default::default() },
            WorldConfig { passive_damage: -1, ..Default::default() },
            WorldConfig { aggressive_damage: -5, ..Default::default() },
            WorldConfig { threat_radius: -1, ..Default::default() },
        ];
        for config in invalid {
            assert!(
                matches!(config.validate(), Err(Error::Validation(_))),
                "accepted {:?}",
                config
            );
        }

        let edge = WorldConfig {
            view_radius: 0,
            passive_damage: 0,
            aggressive_damage: 0,
            threat_radius: 0,
            ..Default::default()
        };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_json_with_invalid_world_is_rejected() {
        let result = RunConfig::from_json(
            r#"{"world": {"view_radius": -3, "aggressive_damage": -5, "creature_hp": 0}}"#,
        );
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_json_with_invalid_generator_is_rejected() {
        let result = RunConfig::from_json(r#"{"generator": {"population_size": 0}}"#);
        assert!(result.is_err());
    }
}
