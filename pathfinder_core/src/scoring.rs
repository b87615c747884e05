// scoring.rs - Completion score and reward conversion

use serde::{Deserialize, Serialize};

use crate::config::ScoreParams;

/// Inputs to the score formula, captured at the moment the goal is reached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreInput {
    /// Cells on the optimal path, start and goal included.
    pub optimal_path_cells: usize,
    /// Counted moves, the final one included.
    pub moves_taken: u32,
    pub elapsed_seconds: f64,
    pub mind_level: u32,
}

/// Score with its components, for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// `optimal_path_cells / max(1, moves_taken + 1)`
    pub efficiency: f64,
    pub multiplier: f64,
    pub time_bonus: f64,
    pub total: u64,
}

/// Applies
/// `round(efficiency * base_points * multiplier + time_bonus)` with
/// `multiplier = max(1, mind_level / multiplier_divisor)` and
/// `time_bonus = max(0, window - elapsed) * per_sec`.
pub fn score_breakdown(params: &ScoreParams, input: &ScoreInput) -> ScoreBreakdown {
    let denominator = (u64::from(input.moves_taken) + 1).max(1) as f64;
    let efficiency = input.optimal_path_cells as f64 / denominator;
    let multiplier = (f64::from(input.mind_level) / params.multiplier_divisor).max(1.0);
    let time_bonus =
        (params.time_bonus_window_secs - input.elapsed_seconds).max(0.0) * params.time_bonus_per_sec;

    let raw = efficiency * params.base_points * multiplier + time_bonus;
    ScoreBreakdown {
        efficiency,
        multiplier,
        time_bonus,
        total: raw.max(0.0).round() as u64,
    }
}

pub fn compute_score(params: &ScoreParams, input: &ScoreInput) -> u64 {
    score_breakdown(params, input).total
}

/// In-game coins the dashboard credits for a finished run: `floor(score / 10)`.
pub fn coins_for_score(score: u64) -> u64 {
    score / 10
}
