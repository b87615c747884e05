// error.rs - Error taxonomy for maze generation and session play

use thiserror::Error;

use crate::grid::{Direction, Position};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathfinderError {
    #[error("Invalid direction: {0:?} (expected up, down, left or right)")]
    InvalidDirection(String),

    #[error("Move {direction} from {position} would leave the grid")]
    MoveRejectedBoundary {
        position: Position,
        direction: Direction,
    },

    #[error("Move rejected: cell {target} is blocked")]
    MoveRejectedBlocked { target: Position },

    #[error("Session already completed; restart to play again")]
    SessionCompleted,

    #[error(
        "No solvable {width}x{height} maze at difficulty {difficulty} after {attempts} attempts"
    )]
    MazeUnsolvableAfterRetries {
        attempts: u32,
        width: usize,
        height: usize,
        difficulty: f64,
    },

    #[error("Invalid grid dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PathfinderError {
    /// Whether the error aborts session initialization.
    ///
    /// Move rejections are informational; the session is left untouched and
    /// play can continue.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PathfinderError::MazeUnsolvableAfterRetries { .. }
                | PathfinderError::InvalidDimensions { .. }
                | PathfinderError::InvalidConfig(_)
        )
    }

    /// True for the rejections a move command can produce.
    pub fn is_move_rejection(&self) -> bool {
        matches!(
            self,
            PathfinderError::InvalidDirection(_)
                | PathfinderError::MoveRejectedBoundary { .. }
                | PathfinderError::MoveRejectedBlocked { .. }
                | PathfinderError::SessionCompleted
        )
    }
}

pub type Result<T> = std::result::Result<T, PathfinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatality_split() {
        let fatal = PathfinderError::MazeUnsolvableAfterRetries {
            attempts: 1000,
            width: 15,
            height: 15,
            difficulty: 90.0,
        };
        assert!(fatal.is_fatal());
        assert!(!fatal.is_move_rejection());

        let blocked = PathfinderError::MoveRejectedBlocked {
            target: Position::new(1, 2),
        };
        assert!(!blocked.is_fatal());
        assert!(blocked.is_move_rejection());
        assert!(PathfinderError::SessionCompleted.is_move_rejection());
    }

    #[test]
    fn test_messages_name_the_cell() {
        let err = PathfinderError::MoveRejectedBoundary {
            position: Position::new(0, 3),
            direction: Direction::Up,
        };
        assert_eq!(err.to_string(), "Move up from (0, 3) would leave the grid");
    }
}
