//! Statistics aggregation over the world state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use veldt_world::{Animal, WorldMap};

/// Snapshot of one day's aggregate numbers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticsRecord {
    pub day: u32,
    pub animal_count: usize,
    pub grass_count: usize,
    pub empty_cell_count: usize,
    pub genotype_counts: HashMap<String, u32>,
    pub average_energy: f64,
    pub average_dead_lifespan: f64,
    pub average_children: f64,
}

impl StatisticsRecord {
    /// Most frequent genotype; count ties resolve to the smallest string
    pub fn most_popular_genotype(&self) -> Option<(&str, u32)> {
        self.genotype_counts
            .iter()
            .map(|(genotype, count)| (genotype.as_str(), *count))
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
    }
}

/// Per-day aggregator.
///
/// Everything in the record is recomputed from the world each day, except
/// the dead-animal lifespan average, which accumulates incrementally as
/// animals are removed.
#[derive(Debug, Default)]
pub struct SimulationStatistics {
    dead_animals: u64,
    dead_days_total: u64,
    record: StatisticsRecord,
}

impl SimulationStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a removed animal into the running lifespan average
    pub fn register_dead(&mut self, animal: &Animal) {
        self.dead_animals += 1;
        self.dead_days_total += u64::from(animal.days_lived());
    }

    pub fn record(&self) -> &StatisticsRecord {
        &self.record
    }

    /// Recompute the record from the current world state
    pub fn update(&mut self, map: &WorldMap, day: u32) {
        let animal_count = map.animal_count();
        let mut genotype_counts: HashMap<String, u32> = HashMap::new();
        let mut total_energy: i64 = 0;
        let mut total_children: usize = 0;

        for animal in map.animals() {
            total_energy += i64::from(animal.energy());
            total_children += animal.offspring().len();
            *genotype_counts.entry(animal.genome_string()).or_insert(0) += 1;
        }

        let over_living = |total: f64| {
            if animal_count > 0 {
                total / animal_count as f64
            } else {
                0.0
            }
        };

        self.record = StatisticsRecord {
            day,
            animal_count,
            grass_count: map.grass_count(),
            empty_cell_count: map.empty_cell_count(),
            genotype_counts,
            average_energy: over_living(total_energy as f64),
            average_dead_lifespan: if self.dead_animals > 0 {
                self.dead_days_total as f64 / self.dead_animals as f64
            } else {
                0.0
            },
            average_children: over_living(total_children as f64),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use veldt_core::{GrowthVariant, Position};
    use veldt_genome::MutationStrategy;

    fn animal(position: Position, energy: i32, rng: &mut ChaCha8Rng) -> Animal {
        let strategy = MutationStrategy::Random { min: 0, max: 0 };
        Animal::new(position, 8, energy, 25, 10, strategy, rng).unwrap()
    }

    #[test]
    fn test_update_counts_world_contents() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut map = WorldMap::new(10, 10, GrowthVariant::Equator).unwrap();
        map.place_animal(animal(Position::new(1, 1), 40, &mut rng))
            .unwrap();
        map.place_animal(animal(Position::new(2, 2), 20, &mut rng))
            .unwrap();
        map.place_grass(Position::new(5, 5)).unwrap();
        map.place_grass(Position::new(2, 2)).unwrap();

        let mut statistics = SimulationStatistics::new();
        statistics.update(&map, 3);

        let record = statistics.record();
        assert_eq!(record.day, 3);
        assert_eq!(record.animal_count, 2);
        assert_eq!(record.grass_count, 2);
        // The animal at (2, 2) shares its cell with grass
        assert_eq!(record.empty_cell_count, 100 - 3);
        assert_eq!(record.average_energy, 30.0);
        assert_eq!(record.average_children, 0.0);
        assert_eq!(record.genotype_counts.values().sum::<u32>(), 2);
    }

    #[test]
    fn test_dead_lifespan_average_accumulates_across_days() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let map = WorldMap::new(10, 10, GrowthVariant::Equator).unwrap();
        let mut statistics = SimulationStatistics::new();

        let mut first = animal(Position::new(0, 0), 5, &mut rng);
        let mut second = animal(Position::new(0, 0), 5, &mut rng);
        for _ in 0..2 {
            first.rotate().unwrap();
        }
        for _ in 0..4 {
            second.rotate().unwrap();
        }

        statistics.register_dead(&first);
        statistics.update(&map, 1);
        assert_eq!(statistics.record().average_dead_lifespan, 2.0);

        statistics.register_dead(&second);
        statistics.update(&map, 2);
        assert_eq!(statistics.record().average_dead_lifespan, 3.0);
    }

    #[test]
    fn test_empty_world_averages_are_zero() {
        let map = WorldMap::new(4, 4, GrowthVariant::Equator).unwrap();
        let mut statistics = SimulationStatistics::new();
        statistics.update(&map, 1);

        let record = statistics.record();
        assert_eq!(record.animal_count, 0);
        assert_eq!(record.average_energy, 0.0);
        assert_eq!(record.average_dead_lifespan, 0.0);
        assert_eq!(record.empty_cell_count, 16);
    }

    #[test]
    fn test_most_popular_genotype_breaks_ties_lexicographically() {
        let mut record = StatisticsRecord::default();
        record.genotype_counts.insert("7777".into(), 3);
        record.genotype_counts.insert("0123".into(), 3);
        record.genotype_counts.insert("1111".into(), 1);
        assert_eq!(record.most_popular_genotype(), Some(("0123", 3)));
    }

    #[test]
    fn test_histogram_is_rebuilt_every_update() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut map = WorldMap::new(10, 10, GrowthVariant::Equator).unwrap();
        let id = map
            .place_animal(animal(Position::new(1, 1), 40, &mut rng))
            .unwrap();

        let mut statistics = SimulationStatistics::new();
        statistics.update(&map, 1);
        assert_eq!(statistics.record().genotype_counts.values().sum::<u32>(), 1);

        map.remove_animal(id).unwrap();
        statistics.update(&map, 2);
        assert!(statistics.record().genotype_counts.is_empty());
    }
}
