//! Veldt command-line runner.
//!
//! Runs one simulation on a worker thread with a console renderer and a CSV
//! statistics recorder attached, for a configurable number of days.

mod console;

use anyhow::{Context, Result};
use console::ConsoleObserver;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use veldt_core::SimulationConfig;
use veldt_sim::{
    CsvRecorder, Phase, PhaseGate, Simulation, SimulationControl, SimulationEngine,
    SimulationObserver, StatisticsRecord,
};
use veldt_world::WorldMap;

const DEFAULT_DAYS: u32 = 100;
const STATISTICS_DIR: &str = "simulation_statistics";

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,veldt_sim=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Stops the simulation once the requested number of days has finished
struct DayLimit {
    days_left: u32,
    control: SimulationControl,
}

impl SimulationObserver for DayLimit {
    fn on_phase(
        &mut self,
        _world: &WorldMap,
        phase: Phase,
        _stats: &StatisticsRecord,
        gate: PhaseGate,
    ) {
        if phase == Phase::DayEnded {
            self.days_left = self.days_left.saturating_sub(1);
            if self.days_left == 0 {
                info!("day limit reached, stopping");
                self.control.stop();
            }
        }
        gate.release();
    }
}

/// Optional JSON configuration file as the first argument, defaults otherwise
fn load_config() -> Result<SimulationConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading configuration from {path}"))?;
            Ok(SimulationConfig::from_json(&json)?)
        }
        None => Ok(SimulationConfig::default()),
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn main() -> Result<()> {
    init_tracing();

    let config = load_config()?;
    info!(
        width = config.map_width,
        height = config.map_height,
        seed = config.seed,
        "starting veldt"
    );

    let simulation = Simulation::new(config)?;
    let control = simulation.control();
    let map_id = simulation.world().id();

    control.add_observer(Box::new(ConsoleObserver));
    match CsvRecorder::create(STATISTICS_DIR, map_id) {
        Ok(recorder) => {
            info!(path = %recorder.path().display(), "recording statistics");
            control.add_observer(Box::new(recorder));
        }
        Err(error) => warn!(error = %error, "statistics recording disabled"),
    }
    control.add_observer(Box::new(DayLimit {
        days_left: env_u64("VELDT_DAYS", u64::from(DEFAULT_DAYS)) as u32,
        control: control.clone(),
    }));
    control.set_phase_delay(Duration::from_millis(env_u64("VELDT_PHASE_DELAY_MS", 0)));

    let mut engine = SimulationEngine::new();
    engine.spawn(simulation)?;
    engine.join_all();

    info!("veldt finished");
    Ok(())
}
