//! Plain-text rendering of the world grid.

use crate::map::WorldMap;
use veldt_core::{Direction, Position};

/// Render the map as a character grid, top row first.
///
/// Grass is `*`, a lone animal is drawn as its heading arrow, a crowded cell
/// shows the animal count (capped at 9), and empty cells are dots.
pub fn render(map: &WorldMap) -> String {
    let mut out = String::with_capacity(((map.width() + 1) * map.height()) as usize);
    for y in (0..map.height()).rev() {
        for x in 0..map.width() {
            let position = Position::new(x, y);
            let animals = map.animals_at(position);
            let glyph = if animals.len() > 1 {
                char::from_digit(animals.len().min(9) as u32, 10).unwrap_or('9')
            } else if let Some(animal) = animals.first() {
                heading_glyph(animal.heading())
            } else if map.is_grass_at(position) {
                '*'
            } else {
                '.'
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn heading_glyph(heading: Direction) -> char {
    match heading {
        Direction::North => '^',
        Direction::NorthEast => '7',
        Direction::East => '>',
        Direction::SouthEast => 'J',
        Direction::South => 'v',
        Direction::SouthWest => 'L',
        Direction::West => '<',
        Direction::NorthWest => 'F',
    }
}
