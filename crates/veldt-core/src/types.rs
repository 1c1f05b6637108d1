//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an animal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimalId(pub Uuid);

impl AnimalId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AnimalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a world map instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapId(pub Uuid);

impl MapId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MapId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 2D position in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Inclusive axis-aligned boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    pub lower_left: Position,
    pub upper_right: Position,
}

impl Boundary {
    pub fn new(lower_left: Position, upper_right: Position) -> Self {
        Self {
            lower_left,
            upper_right,
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= self.lower_left.x
            && position.x <= self.upper_right.x
            && position.y >= self.lower_left.y
            && position.y <= self.upper_right.y
    }
}

/// 8-way heading, clockwise from North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub fn all() -> [Direction; 8] {
        [
            Direction::North,
            Direction::NorthEast,
            Direction::East,
            Direction::SouthEast,
            Direction::South,
            Direction::SouthWest,
            Direction::West,
            Direction::NorthWest,
        ]
    }

    /// Heading for an index in 0..8, clockwise from North
    pub fn from_index(index: u8) -> Self {
        Self::all()[(index % 8) as usize]
    }

    pub fn index(&self) -> u8 {
        Self::all().iter().position(|d| d == self).unwrap_or(0) as u8
    }

    /// Unit offset of this heading; North is (0, 1)
    pub fn unit(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
        }
    }

    /// Rotate clockwise by the given number of 45-degree steps
    pub fn rotate(&self, steps: u8) -> Self {
        Self::from_index(self.index().wrapping_add(steps))
    }

    /// The opposite heading
    pub fn reversed(&self) -> Self {
        self.rotate(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_contains() {
        let bounds = Boundary::new(Position::new(0, 0), Position::new(9, 9));
        assert!(bounds.contains(Position::new(0, 0)));
        assert!(bounds.contains(Position::new(9, 9)));
        assert!(bounds.contains(Position::new(4, 7)));
        assert!(!bounds.contains(Position::new(-1, 3)));
        assert!(!bounds.contains(Position::new(3, 10)));
    }

    #[test]
    fn test_direction_rotation() {
        assert_eq!(Direction::North.rotate(2), Direction::East);
        assert_eq!(Direction::West.rotate(4), Direction::East);
        assert_eq!(Direction::NorthWest.rotate(1), Direction::North);
        // Full turn is a no-op
        for direction in Direction::all() {
            assert_eq!(direction.rotate(8), direction);
        }
    }

    #[test]
    fn test_direction_units() {
        assert_eq!(Direction::North.unit(), (0, 1));
        assert_eq!(Direction::South.unit(), (0, -1));
        assert_eq!(Direction::East.unit(), (1, 0));
        assert_eq!(Direction::SouthWest.unit(), (-1, -1));
    }

    #[test]
    fn test_reversed_is_opposite_unit() {
        for direction in Direction::all() {
            let (dx, dy) = direction.unit();
            let (rx, ry) = direction.reversed().unit();
            assert_eq!((dx, dy), (-rx, -ry));
        }
    }

    #[test]
    fn test_position_ordering_is_by_x_then_y() {
        let mut positions = vec![
            Position::new(2, 1),
            Position::new(0, 5),
            Position::new(2, 0),
            Position::new(1, 9),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![
                Position::new(0, 5),
                Position::new(1, 9),
                Position::new(2, 0),
                Position::new(2, 1),
            ]
        );
    }
}
