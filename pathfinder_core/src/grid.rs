// grid.rs - Shared grid, position and direction types for the maze game

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{PathfinderError, Result};

/// A single maze cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Free,
    Blocked,
}

impl Cell {
    #[inline]
    pub fn is_free(self) -> bool {
        self == Cell::Free
    }
}

/// Row/column coordinate, 0-indexed from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Neighbour one step in `direction`, or `None` when that step leaves a
    /// `width x height` grid.
    pub fn step(self, direction: Direction, width: usize, height: usize) -> Option<Position> {
        let (row, col) = match direction {
            Direction::Up => (self.row.checked_sub(1)?, self.col),
            Direction::Down => (self.row + 1, self.col),
            Direction::Left => (self.row, self.col.checked_sub(1)?),
            Direction::Right => (self.row, self.col + 1),
        };
        (row < height && col < width).then_some(Position::new(row, col))
    }

    /// Manhattan distance, the lower bound on steps between two cells.
    pub fn manhattan(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Position::new(row, col)
    }
}

/// The four move commands a player can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// BFS neighbour order: up, down, left, right.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = PathfinderError;

    /// Accepts names, initials and compass points, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" | "north" | "n" => Ok(Direction::Up),
            "down" | "d" | "south" | "s" => Ok(Direction::Down),
            "left" | "l" | "west" | "w" => Ok(Direction::Left),
            "right" | "r" | "east" | "e" => Ok(Direction::Right),
            _ => Err(PathfinderError::InvalidDirection(s.to_string())),
        }
    }
}

/// Rectangular maze of free and blocked cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an all-free grid.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PathfinderError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![Cell::Free; width * height],
        })
    }

    /// Parses a grid from text rows, `#` blocked and `.` free.
    ///
    /// Blank lines and surrounding whitespace are ignored. Rows must all have
    /// the same length.
    pub fn from_ascii(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut grid = Grid::new(width, height)?;

        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != width {
                return Err(PathfinderError::InvalidDimensions {
                    width: line.chars().count(),
                    height,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '#' => Cell::Blocked,
                    '.' => Cell::Free,
                    other => {
                        return Err(PathfinderError::InvalidConfig(format!(
                            "unexpected grid character {other:?} at {}",
                            Position::new(row, col)
                        )))
                    }
                };
                grid.set(Position::new(row, col), cell);
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Top-left cell, where every session starts.
    #[inline]
    pub fn start(&self) -> Position {
        Position::new(0, 0)
    }

    /// Bottom-right cell.
    #[inline]
    pub fn goal(&self) -> Position {
        Position::new(self.height - 1, self.width - 1)
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        pos.row * self.width + pos.col
    }

    /// Cell at `pos`, or `None` when out of bounds.
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.contains(pos).then(|| self.cells[self.index(pos)])
    }

    /// Out-of-bounds positions count as not free.
    pub fn is_free(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(Cell::is_free)
    }

    /// Sets a cell; out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        if self.contains(pos) {
            let idx = self.index(pos);
            self.cells[idx] = cell;
        }
    }

    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_free()).count()
    }

    /// Rows as cell slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    /// Renders the grid as text, letting `overlay` replace the glyph of any
    /// cell (player, goal, path markers).
    pub fn render_with<F>(&self, overlay: F) -> String
    where
        F: Fn(Position) -> Option<char>,
    {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for (row, cells) in self.rows().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let glyph = overlay(Position::new(row, col)).unwrap_or(match cell {
                    Cell::Free => '.',
                    Cell::Blocked => '#',
                });
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(|_| None))
    }
}
