// config.rs - Session tuning: grid sizing, retry cap and score parameters

use serde::{Deserialize, Serialize};

use crate::error::{PathfinderError, Result};
use crate::generator::DEFAULT_MAX_ATTEMPTS;

/// Constants of the score formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreParams {
    /// Seconds after which the time bonus reaches zero.
    pub time_bonus_window_secs: f64,
    /// Bonus points per second left in the window.
    pub time_bonus_per_sec: f64,
    /// Points for a run as efficient as the optimal path.
    pub base_points: f64,
    /// Mind levels per unit of score multiplier.
    pub multiplier_divisor: f64,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            time_bonus_window_secs: 50.0,
            time_bonus_per_sec: 2.0,
            base_points: 100.0,
            multiplier_divisor: 10.0,
        }
    }
}

/// Everything a session needs besides the mind level, clock and rng.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Grid side at mind level 0.
    pub base_size: usize,
    /// Grid side cap.
    pub max_size: usize,
    /// Mind levels per extra row and column.
    pub levels_per_size_step: u32,
    /// Regenerate-until-solvable cap.
    pub max_generation_attempts: u32,
    pub scoring: ScoreParams,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_size: 5,
            max_size: 15,
            levels_per_size_step: 10,
            max_generation_attempts: DEFAULT_MAX_ATTEMPTS,
            scoring: ScoreParams::default(),
        }
    }
}

impl SessionConfig {
    /// Parses a JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SessionConfig = serde_json::from_str(json)
            .map_err(|e| PathfinderError::InvalidConfig(format!("JSON error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(PathfinderError::InvalidConfig(msg.to_string()));

        // a 1x1 maze starts on its goal and has no legal move
        if self.base_size < 2 {
            return fail("base_size must be at least 2");
        }
        if self.base_size > self.max_size {
            return fail("base_size must not exceed max_size");
        }
        if self.levels_per_size_step == 0 {
            return fail("levels_per_size_step must be positive");
        }
        if self.max_generation_attempts == 0 {
            return fail("max_generation_attempts must be positive");
        }
        let s = &self.scoring;
        if !(s.multiplier_divisor.is_finite() && s.multiplier_divisor > 0.0) {
            return fail("scoring.multiplier_divisor must be a positive number");
        }
        if [s.time_bonus_window_secs, s.time_bonus_per_sec, s.base_points]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return fail("scoring values must be finite and non-negative");
        }
        Ok(())
    }

    /// Square grid side for `mind_level`:
    /// `min(base_size + floor(mind_level / levels_per_size_step), max_size)`.
    pub fn grid_size(&self, mind_level: u32) -> usize {
        let steps = (mind_level / self.levels_per_size_step.max(1)) as usize;
        self.base_size.saturating_add(steps).min(self.max_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_size_scaling() {
        let config = SessionConfig::default();
        assert_eq!(config.grid_size(0), 5);
        assert_eq!(config.grid_size(9), 5);
        assert_eq!(config.grid_size(10), 6);
        assert_eq!(config.grid_size(57), 10);
        assert_eq!(config.grid_size(100), 15);
        assert_eq!(config.grid_size(u32::MAX), 15);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SessionConfig::from_json_str(
            r#"{ "max_size": 9, "scoring": { "base_points": 50 } }"#,
        )
        .unwrap();
        assert_eq!(config.max_size, 9);
        assert_eq!(config.base_size, 5);
        assert_eq!(config.scoring.base_points, 50.0);
        assert_eq!(config.scoring.time_bonus_window_secs, 50.0);
        assert_eq!(config.max_generation_attempts, 1000);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let bad = [
            r#"{ "base_size": 0 }"#,
            r#"{ "base_size": 1, "max_size": 1 }"#,
            r#"{ "base_size": 20, "max_size": 10 }"#,
            r#"{ "levels_per_size_step": 0 }"#,
            r#"{ "max_generation_attempts": 0 }"#,
            r#"{ "scoring": { "multiplier_divisor": 0 } }"#,
            r#"{ "scoring": { "time_bonus_per_sec": -1 } }"#,
            r#"{ "base_size": "five" }"#,
        ];
        for json in bad {
            let err = SessionConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, PathfinderError::InvalidConfig(_)), "{json}: {err}");
        }
    }
}
