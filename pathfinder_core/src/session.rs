// session.rs - One playthrough: maze ownership, move validation, scoring
//
// Lifecycle: Initializing -> InProgress -> Completed. Initialization runs
// inside the constructors and `restart`, and only commits once a solvable
// grid exists, so callers never observe a half-initialized session.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::config::SessionConfig;
use crate::error::{PathfinderError, Result};
use crate::generator::generate_solvable;
use crate::grid::{Direction, Grid, Position};
use crate::pathfinding::find_path;
use crate::scoring::{score_breakdown, ScoreBreakdown, ScoreInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    InProgress,
    Completed,
}

/// Result of an accepted move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    Moved { position: Position, move_count: u32 },
    Completed { score: u64, breakdown: ScoreBreakdown },
}

/// Everything the UI shell renders, in one serializable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub mind_level: u32,
    pub grid: Grid,
    pub player: Position,
    pub goal: Position,
    pub move_count: u32,
    pub elapsed_seconds: f64,
    pub terminal: bool,
    pub score: Option<u64>,
    pub breakdown: Option<ScoreBreakdown>,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

type CompletionHook = Box<dyn FnMut(u64)>;

pub struct GameSession<C = SystemClock, R = StdRng> {
    config: SessionConfig,
    mind_level: u32,
    clock: C,
    rng: R,
    grid: Grid,
    player: Position,
    goal: Position,
    move_count: u32,
    started_at: Duration,
    elapsed_seconds: f64,
    state: SessionState,
    result: Option<ScoreBreakdown>,
    on_complete: Option<CompletionHook>,
}

impl GameSession<SystemClock, StdRng> {
    /// Session on the system clock with an OS-seeded rng and default config.
    pub fn new(mind_level: u32) -> Result<Self> {
        Self::with_parts(
            SessionConfig::default(),
            mind_level,
            SystemClock::new(),
            StdRng::from_os_rng(),
        )
    }

    /// Reproducible mazes from `seed`; time still comes from the system clock.
    pub fn seeded(mind_level: u32, seed: u64) -> Result<Self> {
        Self::with_parts(
            SessionConfig::default(),
            mind_level,
            SystemClock::new(),
            StdRng::seed_from_u64(seed),
        )
    }
}

impl<C: Clock, R: Rng> GameSession<C, R> {
    /// Builds a session and generates its first maze.
    pub fn with_parts(config: SessionConfig, mind_level: u32, clock: C, mut rng: R) -> Result<Self> {
        config.validate()?;
        let grid = Self::fresh_grid(&config, mind_level, &mut rng)?;
        Ok(Self::assemble(config, mind_level, clock, rng, grid))
    }

    /// Builds a session around a caller-supplied maze, e.g. a fixed puzzle.
    ///
    /// The grid must be solvable from its top-left to bottom-right corner,
    /// and those corners must differ. A later [`restart`](Self::restart) switches to generated mazes.
    pub fn with_grid(
        config: SessionConfig,
        mind_level: u32,
        grid: Grid,
        clock: C,
        rng: R,
    ) -> Result<Self> {
        config.validate()?;
        if grid.start() == grid.goal() {
            return Err(PathfinderError::InvalidConfig(
                "supplied 1x1 grid starts on its goal".to_string(),
            ));
        }
        if find_path(&grid, grid.start(), grid.goal()).is_empty() {
            return Err(PathfinderError::InvalidConfig(format!(
                "supplied {}x{} grid has no path from {} to {}",
                grid.width(),
                grid.height(),
                grid.start(),
                grid.goal()
            )));
        }
        Ok(Self::assemble(config, mind_level, clock, rng, grid))
    }

    fn fresh_grid(config: &SessionConfig, mind_level: u32, rng: &mut R) -> Result<Grid> {
        let size = config.grid_size(mind_level);
        let (grid, _) = generate_solvable(
            size,
            size,
            f64::from(mind_level),
            rng,
            config.max_generation_attempts,
        )?;
        Ok(grid)
    }

    fn assemble(config: SessionConfig, mind_level: u32, clock: C, rng: R, grid: Grid) -> Self {
        let mut session = Self {
            config,
            mind_level,
            started_at: clock.now(),
            clock,
            rng,
            player: grid.start(),
            goal: grid.goal(),
            grid,
            move_count: 0,
            elapsed_seconds: 0.0,
            state: SessionState::InProgress,
            result: None,
            on_complete: None,
        };
        session.reset_progress();
        session
    }

    fn reset_progress(&mut self) {
        self.player = self.grid.start();
        self.goal = self.grid.goal();
        self.move_count = 0;
        self.started_at = self.clock.now();
        self.elapsed_seconds = 0.0;
        self.state = SessionState::InProgress;
        self.result = None;
        log::info!(
            "Session started: {}x{} maze, mind level {}, {} blocked cells",
            self.grid.width(),
            self.grid.height(),
            self.mind_level,
            self.grid.blocked_count()
        );
    }

    /// Starts over on a newly generated maze.
    ///
    /// On failure the current session is left as it was.
    pub fn restart(&mut self) -> Result<()> {
        let grid = Self::fresh_grid(&self.config, self.mind_level, &mut self.rng)?;
        self.grid = grid;
        self.reset_progress();
        Ok(())
    }

    /// Registers a callback that receives the final score on completion.
    pub fn on_complete<F>(&mut self, hook: F)
    where
        F: FnMut(u64) + 'static,
    {
        self.on_complete = Some(Box::new(hook));
    }

    /// Parses a textual command and applies it as a move.
    pub fn apply_command(&mut self, command: &str) -> Result<MoveOutcome> {
        let direction: Direction = command.parse()?;
        self.apply_move(direction)
    }

    /// Moves the player one cell.
    ///
    /// Rejected moves (off the grid, into a blocked cell, or after completion)
    /// return an error and change nothing.
    pub fn apply_move(&mut self, direction: Direction) -> Result<MoveOutcome> {
        if self.state == SessionState::Completed {
            return Err(PathfinderError::SessionCompleted);
        }

        let Some(target) = self
            .player
            .step(direction, self.grid.width(), self.grid.height())
        else {
            log::debug!("Boundary: {} from {}", direction, self.player);
            return Err(PathfinderError::MoveRejectedBoundary {
                position: self.player,
                direction,
            });
        };

        if !self.grid.is_free(target) {
            log::debug!("Blocked: {} from {} into {}", direction, self.player, target);
            return Err(PathfinderError::MoveRejectedBlocked { target });
        }

        self.player = target;
        self.move_count += 1;
        self.elapsed_seconds = self.read_elapsed();

        if self.player != self.goal {
            return Ok(MoveOutcome::Moved {
                position: self.player,
                move_count: self.move_count,
            });
        }

        let breakdown = self.finish();
        Ok(MoveOutcome::Completed {
            score: breakdown.total,
            breakdown,
        })
    }

    fn finish(&mut self) -> ScoreBreakdown {
        let optimal = find_path(&self.grid, self.grid.start(), self.goal);
        let breakdown = score_breakdown(
            &self.config.scoring,
            &ScoreInput {
                optimal_path_cells: optimal.len(),
                moves_taken: self.move_count,
                elapsed_seconds: self.elapsed_seconds,
                mind_level: self.mind_level,
            },
        );

        self.state = SessionState::Completed;
        self.result = Some(breakdown);
        log::info!(
            "Session completed: score {} ({} moves, optimal {} steps, {:.1}s)",
            breakdown.total,
            self.move_count,
            optimal.steps(),
            self.elapsed_seconds
        );

        if let Some(hook) = self.on_complete.as_mut() {
            hook(breakdown.total);
        }
        breakdown
    }

    fn read_elapsed(&self) -> f64 {
        self.clock.now().saturating_sub(self.started_at).as_secs_f64()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn mind_level(&self) -> u32 {
        self.mind_level
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state == SessionState::Completed
    }

    /// Elapsed seconds as of the last accepted move.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    /// Elapsed seconds right now, for a running timer display. Frozen at
    /// the finishing time once the session completes. Does not mutate state.
    pub fn live_elapsed_seconds(&self) -> f64 {
        match self.state {
            SessionState::InProgress => self.read_elapsed(),
            SessionState::Completed => self.elapsed_seconds,
        }
    }

    pub fn score(&self) -> Option<u64> {
        self.result.map(|b| b.total)
    }

    pub fn score_breakdown(&self) -> Option<ScoreBreakdown> {
        self.result
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mind_level: self.mind_level,
            grid: self.grid.clone(),
            player: self.player,
            goal: self.goal,
            move_count: self.move_count,
            elapsed_seconds: self.elapsed_seconds,
            terminal: self.is_terminal(),
            score: self.score(),
            breakdown: self.result,
        }
    }

    /// Text view: `P` player, `G` goal, `#` blocked, `.` free.
    pub fn render(&self) -> String {
        self.grid.render_with(|pos| {
            if pos == self.player {
                Some('P')
            } else if pos == self.goal {
                Some('G')
            } else {
                None
            }
        })
    }
}

impl<C, R> fmt::Debug for GameSession<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("mind_level", &self.mind_level)
            .field("size", &(self.grid.width(), self.grid.height()))
            .field("player", &self.player)
            .field("goal", &self.goal)
            .field("move_count", &self.move_count)
            .field("elapsed_seconds", &self.elapsed_seconds)
            .field("state", &self.state)
            .field("score", &self.result.map(|b| b.total))
            .finish()
    }
}
