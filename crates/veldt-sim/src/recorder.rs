//! CSV persistence of day-end statistics.

use crate::observer::{Phase, PhaseGate, SimulationObserver};
use crate::stats::StatisticsRecord;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;
use veldt_core::MapId;
use veldt_world::WorldMap;

const HEADER: &str =
    "day,animals_count,grass_count,average_energy,average_lifetime,average_kids_number,most_popular_genotype";

/// Rows buffered between writes
const BUFFER_ROWS: usize = 20;

/// Observer appending one CSV row per finished day.
///
/// Rows are buffered and flushed in batches, and once more when the
/// recorder is dropped. IO failures are logged and never fatal; the buffer
/// is kept for the next attempt. Releases every gate immediately.
pub struct CsvRecorder {
    path: PathBuf,
    buffer: Vec<String>,
}

impl CsvRecorder {
    /// Create the target directory and the per-map CSV file with its header
    pub fn create(directory: impl AsRef<Path>, map_id: MapId) -> std::io::Result<Self> {
        let directory = directory.as_ref();
        fs::create_dir_all(directory)?;
        let path = directory.join(format!("{map_id}.csv"));
        if !path.exists() {
            fs::write(&path, format!("{HEADER}\n"))?;
        }
        Ok(Self {
            path,
            buffer: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let result = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(self.buffer.concat().as_bytes()));
        match result {
            Ok(()) => self.buffer.clear(),
            Err(error) => {
                warn!(error = %error, path = %self.path.display(), "failed to write statistics")
            }
        }
    }
}

impl SimulationObserver for CsvRecorder {
    fn on_phase(
        &mut self,
        _world: &WorldMap,
        phase: Phase,
        stats: &StatisticsRecord,
        gate: PhaseGate,
    ) {
        if phase == Phase::DayEnded {
            let genotype = stats
                .most_popular_genotype()
                .map(|(genotype, _)| genotype)
                .unwrap_or("");
            self.buffer.push(format!(
                "{},{},{},{:.2},{:.2},{:.2},{}\n",
                stats.day,
                stats.animal_count,
                stats.grass_count,
                stats.average_energy,
                stats.average_dead_lifespan,
                stats.average_children,
                genotype,
            ));
            if self.buffer.len() >= BUFFER_ROWS {
                self.flush();
            }
        }
        gate.release();
    }
}

impl Drop for CsvRecorder {
    fn drop(&mut self) {
        self.flush();
    }
}
