// pathfinding.rs - Breadth-first shortest path search over the maze grid

use serde::Serialize;
use std::collections::VecDeque;

use crate::grid::{Direction, Grid, Position};

/// Ordered cells from a start to a goal, both included.
///
/// An empty path means the goal is unreachable. A one-cell path means start
/// and goal coincide.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Path(Vec<Position>);

impl Path {
    pub fn empty() -> Self {
        Path(Vec::new())
    }

    /// Number of cells, start and goal included.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of moves needed to walk the path.
    pub fn steps(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn cells(&self) -> &[Position] {
        &self.0
    }

    pub fn first(&self) -> Option<Position> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<Position> {
        self.0.last().copied()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.0.contains(&pos)
    }

    /// Checks the path invariants against `grid`: every cell free and in
    /// bounds, consecutive cells one cardinal step apart, no cell repeated.
    pub fn is_valid_on(&self, grid: &Grid) -> bool {
        if !self.0.iter().all(|&p| grid.is_free(p)) {
            return false;
        }
        if !self.0.windows(2).all(|w| w[0].manhattan(w[1]) == 1) {
            return false;
        }
        let mut seen = vec![false; grid.width() * grid.height()];
        self.0.iter().all(|p| {
            let idx = p.row * grid.width() + p.col;
            !std::mem::replace(&mut seen[idx], true)
        })
    }
}

impl IntoIterator for Path {
    type Item = Position;
    type IntoIter = std::vec::IntoIter<Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// --------------------------------------------
// PathFinder - BFS with parent pointers
// --------------------------------------------

/// Reusable BFS state for one grid.
///
/// Buffers are sized once per grid, so repeated searches on the same grid do
/// not reallocate.
pub struct PathFinder<'a> {
    grid: &'a Grid,
    // parent[idx] = index of the cell we came from; usize::MAX = unvisited
    parent: Vec<usize>,
    queue: VecDeque<usize>,
}

const UNVISITED: usize = usize::MAX;

impl<'a> PathFinder<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        let cell_count = grid.width() * grid.height();
        Self {
            grid,
            parent: vec![UNVISITED; cell_count],
            queue: VecDeque::with_capacity(cell_count),
        }
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        pos.row * self.grid.width() + pos.col
    }

    #[inline]
    fn position(&self, idx: usize) -> Position {
        Position::new(idx / self.grid.width(), idx % self.grid.width())
    }

    /// Shortest path from `start` to `goal`, neighbours explored up, down,
    /// left, right. Returns an empty path when either end is out of bounds
    /// or blocked, or when the goal is unreachable.
    pub fn find(&mut self, start: Position, goal: Position) -> Path {
        if !self.grid.is_free(start) || !self.grid.is_free(goal) {
            return Path::empty();
        }

        self.parent.fill(UNVISITED);
        self.queue.clear();

        let start_idx = self.index(start);
        let goal_idx = self.index(goal);
        self.parent[start_idx] = start_idx;
        self.queue.push_back(start_idx);

        let (width, height) = (self.grid.width(), self.grid.height());

        while let Some(current) = self.queue.pop_front() {
            if current == goal_idx {
                return self.reconstruct(start_idx, goal_idx);
            }

            let pos = self.position(current);
            for direction in Direction::ALL {
                let Some(next) = pos.step(direction, width, height) else {
                    continue;
                };
                if !self.grid.is_free(next) {
                    continue;
                }
                let next_idx = self.index(next);
                if self.parent[next_idx] != UNVISITED {
                    continue;
                }
                self.parent[next_idx] = current;
                self.queue.push_back(next_idx);
            }
        }

        Path::empty()
    }

    /// Walks parent pointers back from the goal.
    fn reconstruct(&self, start_idx: usize, goal_idx: usize) -> Path {
        let mut cells = vec![self.position(goal_idx)];
        let mut current = goal_idx;
        while current != start_idx {
            current = self.parent[current];
            cells.push(self.position(current));
        }
        cells.reverse();
        Path(cells)
    }
}

/// One-shot shortest path search.
pub fn find_path(grid: &Grid, start: Position, goal: Position) -> Path {
    PathFinder::new(grid).find(start, goal)
}

/// True when the goal corner is reachable from the start corner.
pub fn is_solvable(grid: &Grid) -> bool {
    !find_path(grid, grid.start(), grid.goal()).is_empty()
}
