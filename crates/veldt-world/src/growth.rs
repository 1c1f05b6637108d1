//! Grass-growth bias policies.

use crate::map::Grass;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use veldt_core::{Boundary, Direction, GrowthVariant, Position};

/// Share of daily grass allotted to the preferred pool
pub const PREFERRED_SHARE: f64 = 0.8;

/// Share of the map height covered by the equator band
const EQUATOR_SHARE: f64 = 0.2;

/// Policy deciding which free cells are preferred for new grass.
///
/// Chosen once at map construction. The equator classification never changes;
/// the moving-jungle classification follows grass adjacency and is
/// re-evaluated by the map on every grass placement and removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthPolicy {
    /// A fixed horizontal band around the map middle is always preferred
    Equator { band: Boundary },
    /// Cells adjacent to at least one grass cell are preferred
    MovingJungle,
}

impl GrowthPolicy {
    pub fn new(variant: GrowthVariant, width: i32, height: i32) -> Self {
        match variant {
            GrowthVariant::Equator => {
                let band_height = (height as f64 * EQUATOR_SHARE).round() as i32;
                let start = height / 2 - band_height / 2;
                let end = start + band_height - 1;
                Self::Equator {
                    band: Boundary::new(Position::new(0, start), Position::new(width - 1, end)),
                }
            }
            GrowthVariant::MovingJungle => Self::MovingJungle,
        }
    }

    /// Classify a cell given the current grass layout
    pub fn is_preferred(&self, position: Position, grass: &HashMap<Position, Grass>) -> bool {
        match self {
            Self::Equator { band } => band.contains(position),
            Self::MovingJungle => has_adjacent_grass(position, grass),
        }
    }
}

/// Whether any of the eight neighboring cells carries grass
pub(crate) fn has_adjacent_grass(position: Position, grass: &HashMap<Position, Grass>) -> bool {
    Direction::all().iter().any(|direction| {
        let (dx, dy) = direction.unit();
        grass.contains_key(&position.add(dx, dy))
    })
}
