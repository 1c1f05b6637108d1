//! The world map: a spatial index of animals and grass.

use crate::animal::Animal;
use crate::growth::{self, GrowthPolicy, PREFERRED_SHARE};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, trace};
use veldt_core::{AnimalId, Boundary, Error, GrowthVariant, MapId, Position, Result};
use veldt_genome::crossover;

/// A grass unit; its identity is its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grass {
    position: Position,
}

impl Grass {
    pub fn new(position: Position) -> Self {
        Self { position }
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

/// Free positions a growth quota draws from, with uniform random removal
#[derive(Debug, Clone, Default)]
struct PositionPool {
    positions: Vec<Position>,
    index: HashMap<Position, usize>,
}

impl PositionPool {
    fn insert(&mut self, position: Position) -> bool {
        if self.index.contains_key(&position) {
            return false;
        }
        self.index.insert(position, self.positions.len());
        self.positions.push(position);
        true
    }

    fn remove(&mut self, position: Position) -> bool {
        match self.index.remove(&position) {
            Some(slot) => {
                self.positions.swap_remove(slot);
                if let Some(&moved) = self.positions.get(slot) {
                    self.index.insert(moved, slot);
                }
                true
            }
            None => false,
        }
    }

    /// Remove and return a uniformly random position
    fn draw(&mut self, rng: &mut ChaCha8Rng) -> Option<Position> {
        if self.positions.is_empty() {
            return None;
        }
        let slot = rng.gen_range(0..self.positions.len());
        let position = self.positions.swap_remove(slot);
        self.index.remove(&position);
        if let Some(&moved) = self.positions.get(slot) {
            self.index.insert(moved, slot);
        }
        Some(position)
    }

    fn len(&self) -> usize {
        self.positions.len()
    }

    fn as_slice(&self) -> &[Position] {
        &self.positions
    }
}

/// The bounded grid world.
///
/// Owns every live animal and grass unit. Animals are kept in an arena keyed
/// by id with a per-cell index preserving insertion order; the two free pools
/// plus the grass cells partition all in-bounds cells. The lineage registry
/// outlives the animals it mentions so descendant counting keeps working
/// after deaths.
#[derive(Debug)]
pub struct WorldMap {
    id: MapId,
    width: i32,
    height: i32,
    bounds: Boundary,
    policy: GrowthPolicy,
    animals: HashMap<AnimalId, Animal>,
    cells: HashMap<Position, Vec<AnimalId>>,
    grass: HashMap<Position, Grass>,
    preferred: PositionPool,
    not_preferred: PositionPool,
    lineage: HashMap<AnimalId, Vec<AnimalId>>,
}

impl WorldMap {
    pub fn new(width: i32, height: i32, variant: GrowthVariant) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidParameters(
                "map width and height must be greater than zero".into(),
            ));
        }

        let policy = GrowthPolicy::new(variant, width, height);
        let mut map = Self {
            id: MapId::new(),
            width,
            height,
            bounds: Boundary::new(Position::new(0, 0), Position::new(width - 1, height - 1)),
            policy,
            animals: HashMap::new(),
            cells: HashMap::new(),
            grass: HashMap::new(),
            preferred: PositionPool::default(),
            not_preferred: PositionPool::default(),
            lineage: HashMap::new(),
        };

        for y in 0..height {
            for x in 0..width {
                let position = Position::new(x, y);
                if map.policy.is_preferred(position, &map.grass) {
                    map.preferred.insert(position);
                } else {
                    map.not_preferred.insert(position);
                }
            }
        }
        Ok(map)
    }

    pub fn id(&self) -> MapId {
        self.id
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn bounds(&self) -> Boundary {
        self.bounds
    }

    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    pub fn animal_count(&self) -> usize {
        self.animals.len()
    }

    pub fn grass_count(&self) -> usize {
        self.grass.len()
    }

    /// Cells occupied by neither an animal nor grass
    pub fn empty_cell_count(&self) -> usize {
        let mut occupied: HashSet<Position> = self.cells.keys().copied().collect();
        occupied.extend(self.grass.keys().copied());
        (self.width * self.height) as usize - occupied.len()
    }

    pub fn animal(&self, id: AnimalId) -> Option<&Animal> {
        self.animals.get(&id)
    }

    pub fn animal_mut(&mut self, id: AnimalId) -> Option<&mut Animal> {
        self.animals.get_mut(&id)
    }

    pub fn animals(&self) -> impl Iterator<Item = &Animal> {
        self.animals.values()
    }

    /// Animals at a cell, in insertion order
    pub fn animals_at(&self, position: Position) -> Vec<&Animal> {
        self.cells
            .get(&position)
            .map(|ids| ids.iter().filter_map(|id| self.animals.get(id)).collect())
            .unwrap_or_default()
    }

    /// Occupied cells, sorted for deterministic phase processing
    pub fn animal_positions_sorted(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self.cells.keys().copied().collect();
        positions.sort();
        positions
    }

    /// All animal ids, ordered by position and per-cell insertion order
    pub fn ordered_animal_ids(&self) -> Vec<AnimalId> {
        self.animal_positions_sorted()
            .into_iter()
            .flat_map(|position| self.cells[&position].iter().copied())
            .collect()
    }

    pub fn is_grass_at(&self, position: Position) -> bool {
        self.grass.contains_key(&position)
    }

    pub fn preferred_positions(&self) -> &[Position] {
        self.preferred.as_slice()
    }

    pub fn not_preferred_positions(&self) -> &[Position] {
        self.not_preferred.as_slice()
    }

    /// Place an animal on the map
    pub fn place_animal(&mut self, animal: Animal) -> Result<AnimalId> {
        let position = animal.position();
        if !self.bounds.contains(position) {
            return Err(Error::InvalidPosition(position));
        }
        let id = animal.id();
        if self.animals.contains_key(&id) {
            return Err(Error::DuplicateAnimal(id));
        }
        self.cells.entry(position).or_default().push(id);
        self.animals.insert(id, animal);
        trace!(animal = %id, %position, "animal placed");
        Ok(id)
    }

    /// Place a grass unit, claiming the cell from its free pool
    pub fn place_grass(&mut self, position: Position) -> Result<()> {
        if !self.bounds.contains(position) {
            return Err(Error::InvalidPosition(position));
        }
        if self.grass.contains_key(&position) {
            return Err(Error::PositionOccupied(position));
        }
        if !self.preferred.remove(position) {
            self.not_preferred.remove(position);
        }
        self.insert_grass(position);
        Ok(())
    }

    /// Move an animal one step along its heading.
    ///
    /// In-bounds moves relocate and cost one energy. A vertically
    /// out-of-bounds step flips the heading and clamps the row; if the
    /// clamped column is still in bounds the animal stays where it is.
    /// A horizontally out-of-bounds step wraps around the map.
    pub fn move_animal(&mut self, id: AnimalId) -> Result<()> {
        let (alive, current, candidate) = {
            let animal = self.animals.get(&id).ok_or(Error::AnimalNotFound(id))?;
            (animal.is_alive(), animal.position(), animal.next_position())
        };
        if !alive {
            return Err(Error::AnimalDead(id));
        }

        if self.bounds.contains(candidate) {
            self.relocate(id, current, candidate);
            return Ok(());
        }

        let mut next = candidate;
        if next.y < self.bounds.lower_left.y || next.y > self.bounds.upper_right.y {
            if let Some(animal) = self.animals.get_mut(&id) {
                animal.reverse_heading();
            }
            next.y = current.y;
        }
        if next.x < self.bounds.lower_left.x || next.x > self.bounds.upper_right.x {
            next.x = (next.x + self.width) % self.width;
            self.relocate(id, current, next);
        }
        Ok(())
    }

    /// Remove an animal, returning it for bookkeeping
    pub fn remove_animal(&mut self, id: AnimalId) -> Result<Animal> {
        let animal = self.animals.remove(&id).ok_or(Error::AnimalNotFound(id))?;
        self.detach(id, animal.position());
        trace!(animal = %id, "animal removed");
        Ok(animal)
    }

    /// Remove a grass unit, returning the freed cell to the correct pool
    pub fn remove_grass(&mut self, position: Position) -> Result<()> {
        if self.grass.remove(&position).is_none() {
            return Err(Error::GrassNotFound(position));
        }

        if let GrowthPolicy::MovingJungle = self.policy {
            // Neighbors keep their preferred status only while some grass
            // of their own remains adjacent.
            for neighbor in self.neighbors_in_bounds(position) {
                if !self.grass.contains_key(&neighbor)
                    && !growth::has_adjacent_grass(neighbor, &self.grass)
                    && self.preferred.remove(neighbor)
                {
                    self.not_preferred.insert(neighbor);
                }
            }
        }

        if self.policy.is_preferred(position, &self.grass) {
            self.preferred.insert(position);
        } else {
            self.not_preferred.insert(position);
        }
        Ok(())
    }

    /// Spawn up to `count` grass units, 80% into the preferred pool.
    ///
    /// A pool that runs dry spills its remaining quota into the other pool;
    /// when both are empty the spawn stops early. Returns the number grown.
    pub fn spawn_grass(&mut self, count: u32, rng: &mut ChaCha8Rng) -> usize {
        let preferred_quota = (count as f64 * PREFERRED_SHARE).round() as u32;
        let grown = self.grow_quota(preferred_quota, true, rng)
            + self.grow_quota(count - preferred_quota, false, rng);
        debug!(requested = count, grown, "grass spawned");
        grown
    }

    fn grow_quota(&mut self, quota: u32, prefer: bool, rng: &mut ChaCha8Rng) -> usize {
        let mut grown = 0;
        for _ in 0..quota {
            let drawn = {
                let primary = if prefer {
                    &mut self.preferred
                } else {
                    &mut self.not_preferred
                };
                primary.draw(rng)
            };
            let drawn = drawn.or_else(|| {
                let fallback = if prefer {
                    &mut self.not_preferred
                } else {
                    &mut self.preferred
                };
                fallback.draw(rng)
            });

            match drawn {
                Some(position) => {
                    self.insert_grass(position);
                    grown += 1;
                }
                None => break,
            }
        }
        grown
    }

    /// Breed two animals sharing a cell.
    ///
    /// Checked against each parent's reproduction threshold; both pay the
    /// reproduction cost and the child spawns at the shared cell with twice
    /// that cost as energy and a crossed-over, mutated genome.
    pub fn reproduce(
        &mut self,
        first: AnimalId,
        second: AnimalId,
        rng: &mut ChaCha8Rng,
    ) -> Result<AnimalId> {
        let (first_position, first_energy, first_genes, threshold, cost, strategy) = {
            let animal = self.animals.get(&first).ok_or(Error::AnimalNotFound(first))?;
            (
                animal.position(),
                animal.energy(),
                animal.genome().genes().to_vec(),
                animal.reproduction_threshold(),
                animal.reproduction_cost(),
                animal.mutation_strategy(),
            )
        };
        let (second_position, second_energy, second_genes) = {
            let animal = self
                .animals
                .get(&second)
                .ok_or(Error::AnimalNotFound(second))?;
            (
                animal.position(),
                animal.energy(),
                animal.genome().genes().to_vec(),
            )
        };

        if first_position != second_position {
            return Err(Error::PositionMismatch(first_position, second_position));
        }
        for energy in [first_energy, second_energy] {
            if energy < threshold {
                return Err(Error::InsufficientEnergy {
                    actual: energy,
                    required: threshold,
                });
            }
        }

        let mut child_genes = crossover(
            &first_genes,
            first_energy,
            &second_genes,
            second_energy,
            rng,
        );
        strategy.mutate(&mut child_genes, rng);

        let child = Animal::with_genes(
            first_position,
            child_genes,
            cost * 2,
            threshold,
            cost,
            strategy,
            rng,
        )?;
        let child_id = child.id();

        for parent in [first, second] {
            if let Some(animal) = self.animals.get_mut(&parent) {
                animal.pay_reproduction_cost(cost);
                animal.record_offspring(child_id);
            }
            self.lineage.entry(parent).or_default().push(child_id);
        }

        self.place_animal(child)?;
        debug!(parent_a = %first, parent_b = %second, child = %child_id, "animal born");
        Ok(child_id)
    }

    /// Count distinct descendants reachable over identity links.
    ///
    /// Traverses the lineage registry, so removed animals still contribute.
    pub fn descendants_of(&self, id: AnimalId) -> usize {
        let mut seen: HashSet<AnimalId> = HashSet::new();
        let mut queue: VecDeque<AnimalId> = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            if let Some(children) = self.lineage.get(&current) {
                for &child in children {
                    if seen.insert(child) {
                        queue.push_back(child);
                    }
                }
            }
        }
        seen.len()
    }

    fn insert_grass(&mut self, position: Position) {
        self.grass.insert(position, Grass::new(position));
        if let GrowthPolicy::MovingJungle = self.policy {
            // Fresh grass promotes every free neighbor to preferred.
            for neighbor in self.neighbors_in_bounds(position) {
                if !self.grass.contains_key(&neighbor) && self.not_preferred.remove(neighbor) {
                    self.preferred.insert(neighbor);
                }
            }
        }
    }

    fn neighbors_in_bounds(&self, position: Position) -> Vec<Position> {
        veldt_core::Direction::all()
            .iter()
            .map(|direction| {
                let (dx, dy) = direction.unit();
                position.add(dx, dy)
            })
            .filter(|neighbor| self.bounds.contains(*neighbor))
            .collect()
    }

    fn relocate(&mut self, id: AnimalId, from: Position, to: Position) {
        self.detach(id, from);
        self.cells.entry(to).or_default().push(id);
        if let Some(animal) = self.animals.get_mut(&id) {
            animal.relocate(to);
        }
    }

    fn detach(&mut self, id: AnimalId, position: Position) {
        if let Some(ids) = self.cells.get_mut(&position) {
            ids.retain(|entry| *entry != id);
            if ids.is_empty() {
                self.cells.remove(&position);
            }
        }
    }

    #[cfg(test)]
    fn pool_partition_holds(&self) -> bool {
        self.preferred.len() + self.not_preferred.len() + self.grass.len()
            == (self.width * self.height) as usize
    }
}
