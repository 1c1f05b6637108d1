//! Configuration types for the simulation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Largest accepted map edge length
pub const MAX_MAP_EDGE: i32 = 200;

/// Which grass-growth bias the world uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthVariant {
    /// A fixed horizontal band around the map middle is always preferred
    Equator,
    /// Cells adjacent to existing grass are preferred
    MovingJungle,
}

/// Which mutation operator is applied to newborn genomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationVariant {
    /// Replace selected genes with fresh random values
    Random,
    /// Nudge selected genes by one, modulo the gene range
    IncrementDecrement,
}

/// Validated parameter bundle a simulation is constructed from.
///
/// The intake is assumed range-checked by the host UI; [`SimulationConfig::validate`]
/// re-checks the cross-parameter dependences and is the only fatal error source
/// once a simulation is running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Width of the world grid
    pub map_width: i32,
    /// Height of the world grid
    pub map_height: i32,
    /// Grass-growth bias variant
    pub growth_variant: GrowthVariant,
    /// Grass units seeded before day one
    pub initial_grass: u32,
    /// Grass units grown at the end of every day
    pub daily_grass: u32,
    /// Energy gained from eating one grass unit
    pub energy_from_grass: i32,
    /// Animals seeded before day one
    pub initial_animals: u32,
    /// Starting energy of seeded animals
    pub initial_energy: i32,
    /// Minimum energy both parents need to reproduce
    pub reproduction_threshold: i32,
    /// Energy each parent pays on reproduction
    pub reproduction_cost: i32,
    /// Minimum genes mutated in a newborn genome
    pub min_mutations: usize,
    /// Maximum genes mutated in a newborn genome
    pub max_mutations: usize,
    /// Mutation operator variant
    pub mutation_variant: MutationVariant,
    /// Gene count of every genome
    pub genome_length: usize,
    /// Seed for the simulation's random source
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            map_width: 20,
            map_height: 20,
            growth_variant: GrowthVariant::Equator,
            initial_grass: 40,
            daily_grass: 8,
            energy_from_grass: 10,
            initial_animals: 12,
            initial_energy: 50,
            reproduction_threshold: 25,
            reproduction_cost: 10,
            min_mutations: 1,
            max_mutations: 3,
            mutation_variant: MutationVariant::Random,
            genome_length: 8,
            seed: 0,
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn cell_count(&self) -> u32 {
        (self.map_width * self.map_height) as u32
    }

    /// Check the cross-parameter dependences; rejects simulation creation entirely
    pub fn validate(&self) -> Result<()> {
        if self.map_width < 1 || self.map_width > MAX_MAP_EDGE {
            return Err(Error::InvalidParameters(format!(
                "map width must be between 1 and {MAX_MAP_EDGE}"
            )));
        }
        if self.map_height < 1 || self.map_height > MAX_MAP_EDGE {
            return Err(Error::InvalidParameters(format!(
                "map height must be between 1 and {MAX_MAP_EDGE}"
            )));
        }
        if self.genome_length == 0 {
            return Err(Error::InvalidParameters(
                "genome length must be greater than zero".into(),
            ));
        }
        if self.energy_from_grass <= 0 {
            return Err(Error::InvalidParameters(
                "energy from grass must be greater than zero".into(),
            ));
        }
        if self.initial_animals == 0 {
            return Err(Error::InvalidParameters(
                "initial animal count must be greater than zero".into(),
            ));
        }
        if self.initial_energy <= 0 {
            return Err(Error::InvalidParameters(
                "initial animal energy must be greater than zero".into(),
            ));
        }
        if self.reproduction_cost <= 0 {
            return Err(Error::InvalidParameters(
                "reproduction cost must be greater than zero".into(),
            ));
        }
        if self.reproduction_threshold <= self.reproduction_cost {
            return Err(Error::InvalidParameters(
                "reproduction threshold must exceed reproduction cost".into(),
            ));
        }
        if self.min_mutations > self.max_mutations {
            return Err(Error::InvalidParameters(
                "minimum mutation count exceeds the maximum".into(),
            ));
        }
        if self.max_mutations > self.genome_length {
            return Err(Error::InvalidParameters(
                "maximum mutation count exceeds the genome length".into(),
            ));
        }
        let cells = self.cell_count();
        if self.initial_grass > cells {
            return Err(Error::InvalidParameters(
                "initial grass count exceeds the number of cells".into(),
            ));
        }
        if self.daily_grass > cells {
            return Err(Error::InvalidParameters(
                "daily grass count exceeds the number of cells".into(),
            ));
        }
        if self.initial_animals > cells {
            return Err(Error::InvalidParameters(
                "initial animal count exceeds the number of cells".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.map_width, 20);
        assert_eq!(config.cell_count(), 400);
    }

    #[test]
    fn test_rejects_threshold_not_above_cost() {
        let config = SimulationConfig {
            reproduction_threshold: 10,
            reproduction_cost: 10,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_rejects_mutation_bounds_out_of_order() {
        let config = SimulationConfig {
            min_mutations: 4,
            max_mutations: 2,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SimulationConfig {
            max_mutations: 9,
            genome_length: 8,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_counts_exceeding_cells() {
        let config = SimulationConfig {
            map_width: 3,
            map_height: 3,
            initial_grass: 10,
            daily_grass: 2,
            initial_animals: 2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_growth_is_allowed() {
        // A world without daily regrowth is a legal, if bleak, configuration.
        let config = SimulationConfig {
            initial_grass: 0,
            daily_grass: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let config = SimulationConfig {
            growth_variant: GrowthVariant::MovingJungle,
            mutation_variant: MutationVariant::IncrementDecrement,
            seed: 7,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed = SimulationConfig::from_json(&json).unwrap();
        assert_eq!(parsed.growth_variant, GrowthVariant::MovingJungle);
        assert_eq!(parsed.mutation_variant, MutationVariant::IncrementDecrement);
        assert_eq!(parsed.seed, 7);
    }

    #[test]
    fn test_from_json_rejects_invalid_bundle() {
        let json = r#"{
            "map_width": 0, "map_height": 20,
            "growth_variant": "Equator",
            "initial_grass": 10, "daily_grass": 2, "energy_from_grass": 10,
            "initial_animals": 5, "initial_energy": 50,
            "reproduction_threshold": 25, "reproduction_cost": 10,
            "min_mutations": 1, "max_mutations": 3,
            "mutation_variant": "Random",
            "genome_length": 8, "seed": 0
        }"#;
        assert!(SimulationConfig::from_json(json).is_err());
    }
}
