// lib.rs - Library exports for pathfinder_core
// Maze generation, BFS pathfinding and the Pathfinder game session

pub mod analysis;
pub mod clock;
pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod pathfinding;
pub mod scoring;
pub mod session;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ScoreParams, SessionConfig};
pub use error::{PathfinderError, Result};
pub use generator::{generate, generate_solvable, obstacle_chance};
pub use grid::{Cell, Direction, Grid, Position};
pub use pathfinding::{find_path, is_solvable, Path, PathFinder};
pub use scoring::{coins_for_score, compute_score, ScoreBreakdown, ScoreInput};
pub use session::{GameSession, MoveOutcome, SessionSnapshot, SessionState};

// Grids and paths are handed across threads by the analysis code and by
// shells that run several sessions.
static_assertions::assert_impl_all!(Grid: Send, Sync, Clone);
static_assertions::assert_impl_all!(Path: Send, Sync, Clone);
static_assertions::assert_impl_all!(PathfinderError: Send, Sync, std::error::Error);
