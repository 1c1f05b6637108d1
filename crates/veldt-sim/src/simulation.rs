//! Day-cycle orchestrator.

use crate::conflict;
use crate::observer::{ObserverId, Phase, PhaseGate, SimulationObserver};
use crate::stats::{SimulationStatistics, StatisticsRecord};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use veldt_core::{Position, Result, SimulationConfig};
use veldt_genome::MutationStrategy;
use veldt_world::{Animal, WorldMap};

struct Shared {
    running: AtomicBool,
    phase_delay_ms: AtomicU64,
    gate: Mutex<Option<Sender<()>>>,
}

type ObserverSlot = (ObserverId, Box<dyn SimulationObserver>);

/// One running ecosystem.
///
/// Owns the world and drives the phase loop on its caller's thread:
/// `RemoveDead -> Rotate -> Move -> ConsumeAndReproduce -> GrowGrass ->
/// DayEnded`, then the next day. After each phase the registered observers
/// are notified and the loop blocks until any one of them releases the gate.
/// All randomness flows from the seed in the configuration.
pub struct Simulation {
    world: WorldMap,
    config: SimulationConfig,
    statistics: SimulationStatistics,
    rng: ChaCha8Rng,
    day: u32,
    observers: Arc<Mutex<Vec<ObserverSlot>>>,
    next_observer: Arc<AtomicU64>,
    shared: Arc<Shared>,
}

impl Simulation {
    /// Build a simulation from a validated parameter bundle.
    ///
    /// Seeds the initial grass and animals. Construction is the only fatal
    /// error source; steady-state phase errors are logged and skipped.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut world = WorldMap::new(config.map_width, config.map_height, config.growth_variant)?;
        world.spawn_grass(config.initial_grass, &mut rng);

        let strategy = MutationStrategy::from_config(
            config.mutation_variant,
            config.min_mutations,
            config.max_mutations,
        );
        for _ in 0..config.initial_animals {
            let position = Position::new(
                rng.gen_range(0..config.map_width),
                rng.gen_range(0..config.map_height),
            );
            let animal = Animal::new(
                position,
                config.genome_length,
                config.initial_energy,
                config.reproduction_threshold,
                config.reproduction_cost,
                strategy,
                &mut rng,
            )?;
            world.place_animal(animal)?;
        }

        let mut statistics = SimulationStatistics::new();
        statistics.update(&world, 1);

        Ok(Self {
            world,
            config,
            statistics,
            rng,
            day: 1,
            observers: Arc::new(Mutex::new(Vec::new())),
            next_observer: Arc::new(AtomicU64::new(0)),
            shared: Arc::new(Shared {
                running: AtomicBool::new(true),
                phase_delay_ms: AtomicU64::new(0),
                gate: Mutex::new(None),
            }),
        })
    }

    pub fn world(&self) -> &WorldMap {
        &self.world
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn statistics(&self) -> &StatisticsRecord {
        self.statistics.record()
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Handle for stopping, pacing and observer registration
    pub fn control(&self) -> SimulationControl {
        SimulationControl {
            shared: Arc::clone(&self.shared),
            observers: Arc::clone(&self.observers),
            next_observer: Arc::clone(&self.next_observer),
        }
    }

    /// Run day cycles until stopped
    pub fn run(&mut self) {
        info!(map = %self.world.id(), seed = self.config.seed, "simulation started");
        while self.shared.running.load(Ordering::SeqCst) {
            self.remove_dead_animals();
            if !self.publish_and_wait(Phase::RemoveDead) {
                break;
            }
            self.rotate_animals();
            if !self.publish_and_wait(Phase::Rotate) {
                break;
            }
            self.move_animals();
            if !self.publish_and_wait(Phase::Move) {
                break;
            }
            self.consume_and_reproduce();
            if !self.publish_and_wait(Phase::ConsumeAndReproduce) {
                break;
            }
            self.grow_grass();
            if !self.publish_and_wait(Phase::GrowGrass) {
                break;
            }

            self.statistics.update(&self.world, self.day);
            let stopped = !self.publish_and_wait(Phase::DayEnded);
            debug!(
                day = self.day,
                animals = self.world.animal_count(),
                grass = self.world.grass_count(),
                "day ended"
            );
            self.day += 1;
            if stopped {
                break;
            }
        }
        info!(map = %self.world.id(), day = self.day, "simulation stopped");
    }

    /// Publish a phase event, then wait for the first release.
    ///
    /// Returns false once a stop was requested. The gate sender parked in
    /// the shared slot keeps the channel open, so a silent observer stalls
    /// the loop instead of ending the wait; with no observers at all there
    /// is nobody to wait for and the loop proceeds.
    fn publish_and_wait(&mut self, phase: Phase) -> bool {
        let (tx, rx) = mpsc::channel();
        *self.shared.gate.lock() = Some(tx.clone());

        let notified = {
            let mut observers = self.observers.lock();
            for (_, observer) in observers.iter_mut() {
                observer.on_phase(
                    &self.world,
                    phase,
                    self.statistics.record(),
                    PhaseGate::new(tx.clone()),
                );
            }
            observers.len()
        };
        drop(tx);

        let delay = self.shared.phase_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            thread::sleep(Duration::from_millis(delay));
        }

        if notified > 0 {
            let _ = rx.recv();
        }
        *self.shared.gate.lock() = None;
        self.shared.running.load(Ordering::SeqCst)
    }

    fn remove_dead_animals(&mut self) {
        for id in self.world.ordered_animal_ids() {
            let dead = self
                .world
                .animal(id)
                .map(|animal| !animal.is_alive())
                .unwrap_or(false);
            if !dead {
                continue;
            }
            match self.world.remove_animal(id) {
                Ok(animal) => {
                    self.statistics.register_dead(&animal);
                    debug!(animal = %id, days = animal.days_lived(), "animal died");
                }
                Err(error) => {
                    error!(animal = %id, error = %error, "failed to remove dead animal")
                }
            }
        }
    }

    fn rotate_animals(&mut self) {
        for id in self.world.ordered_animal_ids() {
            if let Some(animal) = self.world.animal_mut(id) {
                if let Err(error) = animal.rotate() {
                    warn!(animal = %id, error = %error, "rotation skipped");
                }
            }
        }
    }

    fn move_animals(&mut self) {
        for id in self.world.ordered_animal_ids() {
            if let Err(error) = self.world.move_animal(id) {
                warn!(animal = %id, error = %error, "move skipped");
            }
        }
    }

    /// Per occupied cell: the conflict winner eats, the top two may breed.
    fn consume_and_reproduce(&mut self) {
        for position in self.world.animal_positions_sorted() {
            let ranked: Vec<_> = conflict::resolve(self.world.animals_at(position))
                .iter()
                .map(|animal| animal.id())
                .collect();
            let Some(&strongest) = ranked.first() else {
                continue;
            };

            if self.world.is_grass_at(position) {
                match self.world.remove_grass(position) {
                    Ok(()) => {
                        if let Some(animal) = self.world.animal_mut(strongest) {
                            animal.eat(self.config.energy_from_grass);
                        }
                    }
                    Err(error) => {
                        error!(%position, error = %error, "failed to remove eaten grass")
                    }
                }
            }

            if ranked.len() < 2 {
                continue;
            }
            let both_fed = ranked[..2].iter().all(|id| {
                self.world
                    .animal(*id)
                    .map(|animal| animal.energy() >= self.config.reproduction_threshold)
                    .unwrap_or(false)
            });
            if !both_fed {
                continue;
            }
            match self.world.reproduce(ranked[0], ranked[1], &mut self.rng) {
                Ok(child) => debug!(%position, child = %child, "offspring born"),
                Err(error) => warn!(%position, error = %error, "reproduction skipped"),
            }
        }
    }

    fn grow_grass(&mut self) {
        let grown = self.world.spawn_grass(self.config.daily_grass, &mut self.rng);
        if grown < self.config.daily_grass as usize {
            debug!(
                requested = self.config.daily_grass,
                grown, "grass growth cut short by a full map"
            );
        }
    }
}

/// Cloneable control surface for a simulation.
///
/// Safe to use from any thread. Must not be called from inside an
/// observer's `on_phase` for the same simulation, except for `stop` and
/// `set_phase_delay`; the observer registry lock is held during dispatch.
#[derive(Clone)]
pub struct SimulationControl {
    shared: Arc<Shared>,
    observers: Arc<Mutex<Vec<ObserverSlot>>>,
    next_observer: Arc<AtomicU64>,
}

impl SimulationControl {
    /// Request a cooperative stop and force-release the current gate
    pub fn stop(&self) {
        self.shared.running.store(false, Ordering::SeqCst);
        if let Some(gate) = self.shared.gate.lock().as_ref() {
            let _ = gate.send(());
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Fixed sleep inserted after each phase event, independent of observers
    pub fn set_phase_delay(&self, delay: Duration) {
        self.shared
            .phase_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn add_observer(&self, observer: Box<dyn SimulationObserver>) -> ObserverId {
        let id = ObserverId(self.next_observer.fetch_add(1, Ordering::SeqCst));
        self.observers.lock().push((id, observer));
        id
    }

    /// Unregister and hand back an observer so it can flush and drop
    pub fn remove_observer(&self, id: ObserverId) -> Option<Box<dyn SimulationObserver>> {
        let mut observers = self.observers.lock();
        let slot = observers.iter().position(|(entry, _)| *entry == id)?;
        Some(observers.remove(slot).1)
    }
}
