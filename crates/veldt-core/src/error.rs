//! Error types for the simulation.

use crate::types::{AnimalId, Position};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("position {0} is outside the map boundary")]
    InvalidPosition(Position),

    #[error("grass is already present at {0}")]
    PositionOccupied(Position),

    #[error("animal {0} is already placed on the map")]
    DuplicateAnimal(AnimalId),

    #[error("animal {0} not found on the map")]
    AnimalNotFound(AnimalId),

    #[error("no grass at {0}")]
    GrassNotFound(Position),

    #[error("animal {0} is dead")]
    AnimalDead(AnimalId),

    #[error("not enough energy to reproduce: {actual} < {required}")]
    InsufficientEnergy { actual: i32, required: i32 },

    #[error("parents occupy different positions: {0} and {1}")]
    PositionMismatch(Position, Position),

    #[error("invalid gene value {0}, genes must be in 0..8")]
    InvalidGene(u8),

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidParameters(err.to_string())
    }
}
