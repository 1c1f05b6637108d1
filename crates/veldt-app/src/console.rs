//! Console rendering observer.

use veldt_sim::{Phase, PhaseGate, SimulationObserver, StatisticsRecord};
use veldt_world::{render, WorldMap};

/// Redraws the grid and prints the day summary after every finished day
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl SimulationObserver for ConsoleObserver {
    fn on_phase(
        &mut self,
        world: &WorldMap,
        phase: Phase,
        stats: &StatisticsRecord,
        gate: PhaseGate,
    ) {
        if phase == Phase::DayEnded {
            println!("{}", render(world));
            println!(
                "day {}: {} animals, {} grass, avg energy {:.1}, avg lifespan of dead {:.1}",
                stats.day,
                stats.animal_count,
                stats.grass_count,
                stats.average_energy,
                stats.average_dead_lifespan,
            );
        }
        gate.release();
    }
}
