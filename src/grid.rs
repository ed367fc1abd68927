use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i16,
    pub y: i16,
}

impl Cell {
    pub const fn new(x: i16, y: i16) -> Self {
        Cell { x, y }
    }

    pub fn offset(self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    /// No movement yet; only valid before the first accepted input.
    Neutral,
}

impl Direction {
    pub fn delta(self) -> (i16, i16) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Neutral => (0, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Neutral => Direction::Neutral,
        }
    }

    pub fn is_neutral(self) -> bool {
        self == Direction::Neutral
    }
}

/// Square playing field, `tile_count` cells per side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub tile_count: i16,
}

impl Grid {
    pub fn new(tile_count: i16) -> Self {
        Grid {
            tile_count: tile_count.max(1),
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.tile_count).contains(&cell.x) && (0..self.tile_count).contains(&cell.y)
    }

    pub fn center(&self) -> Cell {
        Cell::new(self.tile_count / 2, self.tile_count / 2)
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.tile_count).flat_map(move |y| (0..self.tile_count).map(move |x| Cell::new(x, y)))
    }

    pub fn area(&self) -> usize {
        self.tile_count as usize * self.tile_count as usize
    }
}
