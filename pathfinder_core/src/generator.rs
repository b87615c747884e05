// generator.rs - Random obstacle mazes scaled by difficulty
//
// Cells are blocked independently (Bernoulli per cell); there is no carved
// topology, so solvability has to be checked after the fact.

use rand::Rng;

use crate::error::{PathfinderError, Result};
use crate::grid::{Cell, Grid, Position};
use crate::pathfinding::{find_path, Path};

/// Base chance of a cell being blocked at difficulty 0.
pub const BASE_OBSTACLE_CHANCE: f64 = 0.1;

/// Obstacle chance never rises above this.
pub const MAX_OBSTACLE_CHANCE: f64 = 0.4;

/// Default cap on regenerate-until-solvable attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

/// Probability that a non-endpoint cell is blocked at `difficulty`.
///
/// `min(0.1 + difficulty / 100, 0.4)`; negative or NaN difficulty counts as 0.
pub fn obstacle_chance(difficulty: f64) -> f64 {
    let difficulty = if difficulty.is_nan() { 0.0 } else { difficulty.max(0.0) };
    (BASE_OBSTACLE_CHANCE + difficulty / 100.0).min(MAX_OBSTACLE_CHANCE)
}

/// Generates a `width x height` grid with randomly blocked cells.
///
/// The start (0,0) and goal (height-1, width-1) cells are always free.
pub fn generate<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    difficulty: f64,
    rng: &mut R,
) -> Result<Grid> {
    let mut grid = Grid::new(width, height)?;
    let chance = obstacle_chance(difficulty);
    let (start, goal) = (grid.start(), grid.goal());

    for row in 0..height {
        for col in 0..width {
            let pos = Position::new(row, col);
            if pos == start || pos == goal {
                continue;
            }
            if rng.random::<f64>() < chance {
                grid.set(pos, Cell::Blocked);
            }
        }
    }

    Ok(grid)
}

/// Regenerates until the goal is reachable from the start.
///
/// Returns the grid with its optimal path. Gives up after `max_attempts`
/// grids with [`PathfinderError::MazeUnsolvableAfterRetries`].
pub fn generate_solvable<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    difficulty: f64,
    rng: &mut R,
    max_attempts: u32,
) -> Result<(Grid, Path)> {
    for attempt in 1..=max_attempts {
        let grid = generate(width, height, difficulty, rng)?;
        let path = find_path(&grid, grid.start(), grid.goal());
        if !path.is_empty() {
            if attempt > 1 {
                log::debug!(
                    "Solvable {}x{} maze after {} attempts (difficulty {})",
                    width, height, attempt, difficulty
                );
            }
            return Ok((grid, path));
        }
        log::trace!("Attempt {attempt}: {width}x{height} maze unsolvable, regenerating");
    }

    log::warn!(
        "Gave up on {}x{} maze at difficulty {} after {} attempts",
        width, height, difficulty, max_attempts
    );
    Err(PathfinderError::MazeUnsolvableAfterRetries {
        attempts: max_attempts,
        width,
        height,
        difficulty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Rng stub that always yields zero bits, so every cell rolls 0.0.
    struct AlwaysBlock;

    impl rand::RngCore for AlwaysBlock {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    #[test]
    fn test_obstacle_chance_scaling() {
        assert!((obstacle_chance(0.0) - 0.1).abs() < 1e-12);
        assert!((obstacle_chance(15.0) - 0.25).abs() < 1e-12);
        assert_eq!(obstacle_chance(30.0), MAX_OBSTACLE_CHANCE);
        assert_eq!(obstacle_chance(500.0), MAX_OBSTACLE_CHANCE);
        assert!((obstacle_chance(-20.0) - 0.1).abs() < 1e-12);
        assert!((obstacle_chance(f64::NAN) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate(8, 6, 20.0, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = generate(8, 6, 20.0, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.width(), 8);
        assert_eq!(a.height(), 6);
    }

    #[test]
    fn test_zero_size_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            generate(0, 5, 0.0, &mut rng),
            Err(PathfinderError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_endpoints_survive_forced_obstacles() {
        let grid = generate(4, 4, 100.0, &mut AlwaysBlock).unwrap();
        assert!(grid.is_free(grid.start()));
        assert!(grid.is_free(grid.goal()));
        assert_eq!(grid.blocked_count(), 14);
    }

    #[test]
    fn test_single_cell_is_trivially_solvable() {
        let (grid, path) = generate_solvable(1, 1, 100.0, &mut AlwaysBlock, 3).unwrap();
        assert_eq!(grid.blocked_count(), 0);
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_retry_cap_is_enforced() {
        let err = generate_solvable(5, 5, 100.0, &mut AlwaysBlock, 12).unwrap_err();
        assert_eq!(
            err,
            PathfinderError::MazeUnsolvableAfterRetries {
                attempts: 12,
                width: 5,
                height: 5,
                difficulty: 100.0,
            }
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn test_blocked_ratio_tracks_chance() {
        // 20_000 interior cells at p = 0.25: the ratio should land well
        // inside +/- 0.02.
        let mut rng = StdRng::seed_from_u64(2024);
        let mut blocked = 0usize;
        let mut interior = 0usize;
        for _ in 0..200 {
            let grid = generate(10, 10, 15.0, &mut rng).unwrap();
            blocked += grid.blocked_count();
            interior += 98;
        }
        let ratio = blocked as f64 / interior as f64;
        assert!((ratio - 0.25).abs() < 0.02, "ratio was {ratio}");
    }

    proptest! {
        #[test]
        fn prop_endpoints_always_free(
            width in 1usize..=16,
            height in 1usize..=16,
            difficulty in 0.0f64..200.0,
            seed in any::<u64>(),
        ) {
            let grid = generate(width, height, difficulty, &mut StdRng::seed_from_u64(seed)).unwrap();
            prop_assert!(grid.is_free(grid.start()));
            prop_assert!(grid.is_free(grid.goal()));
        }

        #[test]
        fn prop_solvable_output_has_valid_path(
            size in 1usize..=10,
            difficulty in 0.0f64..40.0,
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let (grid, path) = generate_solvable(size, size, difficulty, &mut rng, DEFAULT_MAX_ATTEMPTS).unwrap();
            prop_assert!(path.is_valid_on(&grid));
            prop_assert_eq!(path.first(), Some(grid.start()));
            prop_assert_eq!(path.last(), Some(grid.goal()));
        }
    }
}
