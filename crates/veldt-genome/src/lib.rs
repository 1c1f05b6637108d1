//! Genomes for the Veldt simulation.
//!
//! A genome is a fixed-length sequence of small integer genes controlling an
//! animal's turning. This crate covers genome construction, the mutation
//! variants applied to newborns, and the energy-weighted crossover.

pub mod crossover;
pub mod genome;
pub mod mutation;

pub use crossover::crossover;
pub use genome::{Genome, GENE_RANGE};
pub use mutation::MutationStrategy;
