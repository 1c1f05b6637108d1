//! Thread-per-simulation engine.

use crate::simulation::{Simulation, SimulationControl};
use std::thread::{self, JoinHandle};
use tracing::{error, info};
use veldt_core::Result;

struct Worker {
    control: SimulationControl,
    handle: JoinHandle<()>,
}

/// Runs simulations, each on a dedicated worker thread.
///
/// Simulations are fully independent; the engine only hands out controls
/// and joins the workers on shutdown.
#[derive(Default)]
pub struct SimulationEngine {
    workers: Vec<Worker>,
}

impl SimulationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move a simulation onto a new worker thread and return its control
    pub fn spawn(&mut self, mut simulation: Simulation) -> Result<SimulationControl> {
        let control = simulation.control();
        let name = format!("veldt-sim-{}", simulation.world().id());
        let handle = thread::Builder::new()
            .name(name)
            .spawn(move || simulation.run())?;
        info!(workers = self.workers.len() + 1, "simulation worker started");
        self.workers.push(Worker {
            control: control.clone(),
            handle,
        });
        Ok(control)
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn controls(&self) -> impl Iterator<Item = &SimulationControl> {
        self.workers.iter().map(|worker| &worker.control)
    }

    /// Request every running simulation to stop
    pub fn stop_all(&self) {
        for worker in &self.workers {
            worker.control.stop();
        }
    }

    /// Wait for every worker thread to finish
    pub fn join_all(&mut self) {
        for worker in self.workers.drain(..) {
            if worker.handle.join().is_err() {
                error!("simulation worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::AutoRelease;
    use std::time::Duration;
    use veldt_core::SimulationConfig;

    #[test]
    fn test_engine_runs_and_stops_workers() {
        let mut engine = SimulationEngine::new();
        for seed in [1, 2] {
            let config = SimulationConfig {
                seed,
                ..Default::default()
            };
            let simulation = Simulation::new(config).unwrap();
            let control = engine.spawn(simulation).unwrap();
            control.add_observer(Box::new(AutoRelease));
        }
        assert_eq!(engine.worker_count(), 2);

        let controls: Vec<_> = engine.controls().cloned().collect();
        thread::sleep(Duration::from_millis(50));
        engine.stop_all();
        engine.join_all();
        assert_eq!(engine.worker_count(), 0);
        for control in controls {
            assert!(!control.is_running());
        }
    }

    #[test]
    fn test_stop_all_on_empty_engine_is_a_no_op() {
        let engine = SimulationEngine::new();
        engine.stop_all();
    }
}
