//! Animal state and behavior.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use veldt_core::{AnimalId, Direction, Error, Position, Result};
use veldt_genome::{Genome, MutationStrategy};

/// A mobile agent on the map.
///
/// Alive while its energy is positive. The reproduction constants and the
/// mutation strategy are fixed at birth. The offspring list holds identity
/// links only; removing an animal never touches the animals it points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animal {
    id: AnimalId,
    position: Position,
    heading: Direction,
    energy: i32,
    genome: Genome,
    days_lived: u32,
    plants_eaten: u32,
    offspring: Vec<AnimalId>,
    reproduction_threshold: i32,
    reproduction_cost: i32,
    mutation: MutationStrategy,
}

impl Animal {
    /// Create an animal with a random genome and heading
    pub fn new(
        position: Position,
        genome_length: usize,
        initial_energy: i32,
        reproduction_threshold: i32,
        reproduction_cost: i32,
        mutation: MutationStrategy,
        rng: &mut ChaCha8Rng,
    ) -> Result<Self> {
        let genome = Genome::random(genome_length, rng)?;
        Self::build(
            position,
            genome,
            initial_energy,
            reproduction_threshold,
            reproduction_cost,
            mutation,
            rng,
        )
    }

    /// Create an animal from explicit genes; used for newborns
    pub fn with_genes(
        position: Position,
        genes: Vec<u8>,
        initial_energy: i32,
        reproduction_threshold: i32,
        reproduction_cost: i32,
        mutation: MutationStrategy,
        rng: &mut ChaCha8Rng,
    ) -> Result<Self> {
        let genome = Genome::from_genes(genes, rng)?;
        Self::build(
            position,
            genome,
            initial_energy,
            reproduction_threshold,
            reproduction_cost,
            mutation,
            rng,
        )
    }

    fn build(
        position: Position,
        genome: Genome,
        initial_energy: i32,
        reproduction_threshold: i32,
        reproduction_cost: i32,
        mutation: MutationStrategy,
        rng: &mut ChaCha8Rng,
    ) -> Result<Self> {
        if initial_energy <= 0 || reproduction_threshold <= 0 || reproduction_cost <= 0 {
            return Err(Error::InvalidParameters(
                "initial energy, reproduction threshold and reproduction cost must all be greater than zero"
                    .into(),
            ));
        }
        Ok(Self {
            id: AnimalId::new(),
            position,
            heading: Direction::from_index(rng.gen_range(0..8)),
            energy: initial_energy,
            genome,
            days_lived: 0,
            plants_eaten: 0,
            offspring: Vec::new(),
            reproduction_threshold,
            reproduction_cost,
            mutation,
        })
    }

    pub fn id(&self) -> AnimalId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn energy(&self) -> i32 {
        self.energy
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Genome rendered as a digit string, used as the genotype key
    pub fn genome_string(&self) -> String {
        self.genome.to_string()
    }

    pub fn days_lived(&self) -> u32 {
        self.days_lived
    }

    pub fn plants_eaten(&self) -> u32 {
        self.plants_eaten
    }

    pub fn offspring(&self) -> &[AnimalId] {
        &self.offspring
    }

    pub fn reproduction_threshold(&self) -> i32 {
        self.reproduction_threshold
    }

    pub fn reproduction_cost(&self) -> i32 {
        self.reproduction_cost
    }

    pub fn mutation_strategy(&self) -> MutationStrategy {
        self.mutation
    }

    pub fn is_alive(&self) -> bool {
        self.energy > 0
    }

    /// Cell the animal would enter by stepping along its heading
    pub fn next_position(&self) -> Position {
        let (dx, dy) = self.heading.unit();
        self.position.add(dx, dy)
    }

    /// Turn by the active gene, advance the gene pointer and age one day
    pub fn rotate(&mut self) -> Result<()> {
        if !self.is_alive() {
            return Err(Error::AnimalDead(self.id));
        }
        self.heading = self.heading.rotate(self.genome.active_gene());
        self.genome.advance();
        self.days_lived += 1;
        Ok(())
    }

    pub fn eat(&mut self, energy_from_grass: i32) {
        self.energy += energy_from_grass;
        self.plants_eaten += 1;
    }

    /// Flip the heading after bouncing off a horizontal map edge
    pub(crate) fn reverse_heading(&mut self) {
        self.heading = self.heading.reversed();
    }

    /// Enter a new cell; each relocation costs one energy
    pub(crate) fn relocate(&mut self, position: Position) {
        self.position = position;
        self.energy -= 1;
    }

    pub(crate) fn record_offspring(&mut self, child: AnimalId) {
        self.offspring.push(child);
    }

    pub(crate) fn pay_reproduction_cost(&mut self, cost: i32) {
        self.energy -= cost;
    }

    #[cfg(test)]
    pub(crate) fn set_heading(&mut self, heading: Direction) {
        self.heading = heading;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn strategy() -> MutationStrategy {
        MutationStrategy::Random { min: 1, max: 3 }
    }

    fn animal(energy: i32) -> Animal {
        Animal::new(Position::new(2, 2), 8, energy, 25, 10, strategy(), &mut rng()).unwrap()
    }

    #[test]
    fn test_new_animal_has_random_valid_genome() {
        let animal = animal(50);
        assert_eq!(animal.genome().len(), 8);
        assert!(animal.genome().genes().iter().all(|&g| g < 8));
        assert!(animal.is_alive());
        assert_eq!(animal.days_lived(), 0);
    }

    #[test]
    fn test_rejects_non_positive_energy_constants() {
        let result = Animal::new(Position::new(0, 0), 8, 0, 25, 10, strategy(), &mut rng());
        assert!(result.is_err());
        let result = Animal::new(Position::new(0, 0), 8, 50, 25, 0, strategy(), &mut rng());
        assert!(result.is_err());
    }

    #[test]
    fn test_rotate_advances_gene_and_lifespan() {
        let mut animal = animal(50);
        let start_heading = animal.heading();
        let gene = animal.genome().active_gene();
        let index = animal.genome().active_index();

        animal.rotate().unwrap();

        assert_eq!(animal.heading(), start_heading.rotate(gene));
        assert_eq!(animal.genome().active_index(), (index + 1) % 8);
        assert_eq!(animal.days_lived(), 1);
    }

    #[test]
    fn test_dead_animal_cannot_rotate() {
        let mut animal = animal(1);
        animal.relocate(Position::new(2, 3));
        assert!(!animal.is_alive());
        assert!(matches!(animal.rotate(), Err(Error::AnimalDead(_))));
    }

    #[test]
    fn test_relocation_costs_one_energy() {
        let mut animal = animal(50);
        animal.relocate(Position::new(3, 3));
        animal.relocate(Position::new(3, 4));
        assert_eq!(animal.energy(), 48);
    }

    #[test]
    fn test_eating_adds_energy_and_counts_plants() {
        let mut animal = animal(10);
        animal.eat(25);
        assert_eq!(animal.energy(), 35);
        assert_eq!(animal.plants_eaten(), 1);
    }

    #[test]
    fn test_next_position_follows_heading() {
        let animal = animal(50);
        let (dx, dy) = animal.heading().unit();
        assert_eq!(animal.next_position(), Position::new(2 + dx, 2 + dy));
    }
}
