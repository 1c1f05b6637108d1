//! Simulation driver for Veldt.
//!
//! Runs the day cycle over a world map: dead-animal removal, rotation,
//! movement, feeding and reproduction, grass growth. After every phase the
//! orchestrator publishes an event to its observers and waits on a
//! single-use gate released by the first acknowledgment.

pub mod conflict;
pub mod engine;
pub mod observer;
pub mod recorder;
pub mod simulation;
pub mod stats;

pub use engine::SimulationEngine;
pub use observer::{AutoRelease, ObserverId, Phase, PhaseGate, SimulationObserver};
pub use recorder::CsvRecorder;
pub use simulation::{Simulation, SimulationControl};
pub use stats::{SimulationStatistics, StatisticsRecord};
