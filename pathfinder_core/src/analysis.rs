// analysis.rs - Monte Carlo solvability estimates for tuning retry caps
//
// Each sample is generated from its own seed, so reports are reproducible
// regardless of how rayon schedules the work.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::SessionConfig;
use crate::error::Result;
use crate::generator::{generate, obstacle_chance};
use crate::grid::Grid;
use crate::pathfinding::find_path;

/// First-attempt statistics for one grid shape and difficulty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolvabilityReport {
    pub width: usize,
    pub height: usize,
    pub difficulty: f64,
    pub obstacle_chance: f64,
    pub samples: usize,
    pub solvable: usize,
    /// `solvable / samples`
    pub solvable_rate: f64,
    /// Mean blocked share of all cells.
    pub mean_blocked_ratio: f64,
    /// Mean optimal path length in steps, over solvable samples only.
    pub mean_optimal_steps: Option<f64>,
    /// Expected generations per session, `1 / solvable_rate`.
    pub expected_attempts: Option<f64>,
}

struct Sample {
    blocked_ratio: f64,
    optimal_steps: Option<usize>,
}

fn sample(width: usize, height: usize, difficulty: f64, seed: u64) -> Result<Sample> {
    let mut rng = StdRng::seed_from_u64(seed);
    let grid: Grid = generate(width, height, difficulty, &mut rng)?;
    let path = find_path(&grid, grid.start(), grid.goal());
    Ok(Sample {
        blocked_ratio: grid.blocked_count() as f64 / (width * height) as f64,
        optimal_steps: (!path.is_empty()).then(|| path.steps()),
    })
}

/// Generates `samples` grids in parallel, seeds `seed..seed + samples`.
pub fn solvability_report(
    width: usize,
    height: usize,
    difficulty: f64,
    samples: usize,
    seed: u64,
) -> Result<SolvabilityReport> {
    let results: Vec<Sample> = (0..samples as u64)
        .into_par_iter()
        .map(|i| sample(width, height, difficulty, seed.wrapping_add(i)))
        .collect::<Result<_>>()?;

    let solvable_steps: Vec<usize> = results.iter().filter_map(|s| s.optimal_steps).collect();
    let solvable = solvable_steps.len();
    let solvable_rate = if samples == 0 {
        0.0
    } else {
        solvable as f64 / samples as f64
    };
    let mean_blocked_ratio = if samples == 0 {
        0.0
    } else {
        results.iter().map(|s| s.blocked_ratio).sum::<f64>() / samples as f64
    };
    let mean_optimal_steps = (solvable > 0)
        .then(|| solvable_steps.iter().sum::<usize>() as f64 / solvable as f64);

    Ok(SolvabilityReport {
        width,
        height,
        difficulty,
        obstacle_chance: obstacle_chance(difficulty),
        samples,
        solvable,
        solvable_rate,
        mean_blocked_ratio,
        mean_optimal_steps,
        expected_attempts: (solvable_rate > 0.0).then(|| 1.0 / solvable_rate),
    })
}

/// One report per mind level in `levels`, sized the way sessions size them.
pub fn mind_level_reports(
    config: &SessionConfig,
    levels: impl IntoIterator<Item = u32>,
    samples: usize,
    seed: u64,
) -> Result<Vec<SolvabilityReport>> {
    levels
        .into_iter()
        .map(|level| {
            let size = config.grid_size(level);
            solvability_report(size, size, f64::from(level), samples, seed)
        })
        .collect()
}
