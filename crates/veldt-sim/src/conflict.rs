//! Deterministic ordering of animals sharing a cell.

use std::cmp::Ordering;
use veldt_world::Animal;

/// Compare two animals for precedence at a shared cell.
///
/// Energy first, then days lived, then direct-offspring count, each
/// descending.
pub fn dominance(first: &Animal, second: &Animal) -> Ordering {
    second
        .energy()
        .cmp(&first.energy())
        .then_with(|| second.days_lived().cmp(&first.days_lived()))
        .then_with(|| second.offspring().len().cmp(&first.offspring().len()))
}

/// Rank the animals of one cell, strongest first.
///
/// The sort is stable, so full ties keep the cell's insertion order. The
/// first element eats any grass present; the first two may reproduce.
pub fn resolve(mut animals: Vec<&Animal>) -> Vec<&Animal> {
    animals.sort_by(|a, b| dominance(a, b));
    animals
}
