//! World model for the Veldt simulation.
//!
//! This crate implements the 2D grid world: animals with genomes and an
//! energy budget, grass with biased regrowth, and the map holding both.

pub mod animal;
pub mod growth;
pub mod map;
pub mod render;

pub use animal::Animal;
pub use growth::GrowthPolicy;
pub use map::{Grass, WorldMap};
pub use render::render;
