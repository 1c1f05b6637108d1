//! Observer protocol and the per-phase release gate.

use crate::stats::StatisticsRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::mpsc::Sender;
use veldt_world::WorldMap;

/// Tag identifying which phase a published event closes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    RemoveDead,
    Rotate,
    Move,
    ConsumeAndReproduce,
    GrowGrass,
    DayEnded,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::RemoveDead => "remove_dead",
            Phase::Rotate => "rotate",
            Phase::Move => "move",
            Phase::ConsumeAndReproduce => "consume_and_reproduce",
            Phase::GrowGrass => "grow_grass",
            Phase::DayEnded => "day_ended",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Release handle for one phase gate.
///
/// Every observer gets a clone per event. The orchestrator resumes on the
/// first release it receives; later releases are ignored. Dropping the
/// handle without releasing keeps the gate closed.
#[derive(Clone)]
pub struct PhaseGate {
    release_tx: Sender<()>,
}

impl PhaseGate {
    pub(crate) fn new(release_tx: Sender<()>) -> Self {
        Self { release_tx }
    }

    /// Let the orchestrator proceed past the current phase
    pub fn release(&self) {
        let _ = self.release_tx.send(());
    }
}

impl fmt::Debug for PhaseGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PhaseGate")
    }
}

/// Handle to a registered observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u64);

/// Phase-event consumer.
///
/// Called on the simulation's worker thread after every phase. An
/// implementation must arrange for `gate.release()` to happen eventually,
/// either on the spot or from another thread, or the simulation stalls;
/// releasing is a shared duty, one responder is enough for all observers.
pub trait SimulationObserver: Send {
    fn on_phase(
        &mut self,
        world: &WorldMap,
        phase: Phase,
        stats: &StatisticsRecord,
        gate: PhaseGate,
    );
}

/// Observer that releases every gate immediately; useful as a pacer
#[derive(Debug, Default)]
pub struct AutoRelease;

impl SimulationObserver for AutoRelease {
    fn on_phase(
        &mut self,
        _world: &WorldMap,
        _phase: Phase,
        _stats: &StatisticsRecord,
        gate: PhaseGate,
    ) {
        gate.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_release_signals_the_channel_once_per_call() {
        let (tx, rx) = mpsc::channel();
        let gate = PhaseGate::new(tx);
        let clone = gate.clone();

        gate.release();
        clone.release();
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_release_after_receiver_dropped_is_ignored() {
        let (tx, rx) = mpsc::channel();
        let gate = PhaseGate::new(tx);
        drop(rx);
        // A stopped simulation has dropped its receiver; releasing must not panic
        gate.release();
    }

    #[test]
    fn test_phase_tags_are_stable() {
        assert_eq!(Phase::RemoveDead.to_string(), "remove_dead");
        assert_eq!(Phase::DayEnded.to_string(), "day_ended");
    }
}
