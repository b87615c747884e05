// shell.rs - Line-oriented game shell: parses commands, drives a session,
// prints the board and keeps the coin tally across restarts

use anyhow::Result;
use pathfinder_core::{
    coins_for_score, Clock, Direction, GameSession, Grid, MoveOutcome, Path, PathfinderError,
    SessionSnapshot, SystemClock,
};
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    Move(Direction),
    Restart,
    Show,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = PathfinderError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restart" | "new" | "again" => Ok(ShellCommand::Restart),
            "show" | "p" | "print" => Ok(ShellCommand::Show),
            "help" | "?" => Ok(ShellCommand::Help),
            "quit" | "q" | "exit" => Ok(ShellCommand::Quit),
            other => other.parse().map(ShellCommand::Move),
        }
    }
}

/// Splits a move script into commands.
///
/// Tokens are separated by whitespace or commas, e.g. `"down, down, right"`
/// or `"restart"`. A single token that is not itself a command, such as
/// `"ddrr"`, is read one letter per move.
pub fn parse_script(script: &str) -> std::result::Result<Vec<ShellCommand>, PathfinderError> {
    let tokens: Vec<&str> = script
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .collect();

    match tokens.as_slice() {
        [token] if token.parse::<ShellCommand>().is_err() => token
            .chars()
            .map(|c| c.to_string().parse::<Direction>().map(ShellCommand::Move))
            .collect(),
        _ => tokens.into_iter().map(str::parse::<ShellCommand>).collect(),
    }
}

/// Grid text with the optimal path drawn as `*`.
pub fn render_solution(grid: &Grid, path: &Path) -> String {
    grid.render_with(|pos| {
        if pos == grid.start() {
            Some('S')
        } else if pos == grid.goal() {
            Some('G')
        } else if path.contains(pos) {
            Some('*')
        } else {
            None
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// End-of-run summary for `--json` output.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub sessions_completed: u32,
    pub total_coins: u64,
    pub last_session: SessionSnapshot,
}

const HELP: &str = "commands: up/down/left/right (or u/d/l/r, n/s/w/e), restart, show, help, quit";

pub struct Shell<W, C = SystemClock, R = StdRng> {
    session: GameSession<C, R>,
    out: W,
    sessions_completed: u32,
    total_coins: u64,
}

impl<W: Write, C: Clock, R: Rng> Shell<W, C, R> {
    pub fn new(session: GameSession<C, R>, out: W) -> Self {
        Self {
            session,
            out,
            sessions_completed: 0,
            total_coins: 0,
        }
    }

    pub fn session(&self) -> &GameSession<C, R> {
        &self.session
    }

    pub fn total_coins(&self) -> u64 {
        self.total_coins
    }

    pub fn sessions_completed(&self) -> u32 {
        self.sessions_completed
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            sessions_completed: self.sessions_completed,
            total_coins: self.total_coins,
            last_session: self.session.snapshot(),
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Interactive opening: help, a blank line, the board, then a prompt.
    pub fn greet(&mut self) -> Result<()> {
        writeln!(self.out, "{HELP}")?;
        writeln!(self.out)?;
        self.show()?;
        self.prompt()
    }

    pub fn prompt(&mut self) -> Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()?;
        Ok(())
    }

    /// Parses and runs one input line. Unparseable lines are reported and
    /// ignored.
    pub fn handle_line(&mut self, line: &str) -> Result<Flow> {
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }
        match line.parse::<ShellCommand>() {
            Ok(cmd) => self.handle(cmd),
            Err(e) => {
                writeln!(self.out, "{e}")?;
                writeln!(self.out, "{HELP}")?;
                Ok(Flow::Continue)
            }
        }
    }

    pub fn handle(&mut self, command: ShellCommand) -> Result<Flow> {
        match command {
            ShellCommand::Move(direction) => self.handle_move(direction)?,
            ShellCommand::Restart => {
                self.session.restart()?;
                writeln!(self.out, "New maze:")?;
                self.show()?;
            }
            ShellCommand::Show => self.show()?,
            ShellCommand::Help => writeln!(self.out, "{HELP}")?,
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn handle_move(&mut self, direction: Direction) -> Result<()> {
        match self.session.apply_move(direction) {
            Ok(MoveOutcome::Moved { .. }) => self.show()?,
            Ok(MoveOutcome::Completed { score, breakdown }) => {
                let coins = coins_for_score(score);
                self.sessions_completed += 1;
                self.total_coins += coins;
                write!(self.out, "{}", self.session.render())?;
                writeln!(
                    self.out,
                    "Goal reached in {} moves ({:.1}s). Score: {} (efficiency {:.2}, x{:.1}, time bonus {:.0}). +{} coins, {} total.",
                    self.session.move_count(),
                    self.session.elapsed_seconds(),
                    score,
                    breakdown.efficiency,
                    breakdown.multiplier,
                    breakdown.time_bonus,
                    coins,
                    self.total_coins
                )?;
                writeln!(self.out, "Type `restart` to play again.")?;
            }
            Err(e) if e.is_move_rejection() => writeln!(self.out, "{e}")?,
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        write!(self.out, "{}", self.session.render())?;
        writeln!(
            self.out,
            "moves: {}  time: {:.0}s",
            self.session.move_count(),
            self.session.live_elapsed_seconds()
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathfinder_core::{ManualClock, SessionConfig};
    use rand::SeedableRng;
    use std::time::Duration;

    fn shell(text: &str) -> (Shell<Vec<u8>, ManualClock, StdRng>, ManualClock) {
        let clock = ManualClock::new();
        let session = GameSession::with_grid(
            SessionConfig::default(),
            0,
            Grid::from_ascii(text).unwrap(),
            clock.clone(),
            StdRng::seed_from_u64(3),
        )
        .unwrap();
        (Shell::new(session, Vec::new()), clock)
    }

    fn output(shell: Shell<Vec<u8>, ManualClock, StdRng>) -> String {
        String::from_utf8(shell.into_output()).unwrap()
    }

    #[test]
    fn test_parse_script_forms() {
        use Direction::*;
        assert_eq!(
            parse_script("ddrr").unwrap(),
            vec![
                ShellCommand::Move(Down),
                ShellCommand::Move(Down),
                ShellCommand::Move(Right),
                ShellCommand::Move(Right),
            ]
        );
        assert_eq!(
            parse_script("down, right restart  quit").unwrap(),
            vec![
                ShellCommand::Move(Down),
                ShellCommand::Move(Right),
                ShellCommand::Restart,
                ShellCommand::Quit,
            ]
        );
        assert!(matches!(
            parse_script("ddx"),
            Err(PathfinderError::InvalidDirection(_))
        ));
    }

    #[test]
    fn test_parse_script_single_word() {
        assert_eq!(
            parse_script("down").unwrap(),
            vec![ShellCommand::Move(Direction::Down)]
        );
        assert_eq!(
            parse_script(" restart ").unwrap(),
            vec![ShellCommand::Restart]
        );
        assert_eq!(
            parse_script("up").unwrap(),
            vec![ShellCommand::Move(Direction::Up)]
        );
        assert_eq!(
            parse_script("r").unwrap(),
            vec![ShellCommand::Move(Direction::Right)]
        );
        assert_eq!(
            parse_script("rl").unwrap(),
            vec![
                ShellCommand::Move(Direction::Right),
                ShellCommand::Move(Direction::Left)
            ]
        );
        assert!(parse_script("").unwrap().is_empty());
    }

    #[test]
    fn test_greeting_separates_help_from_board() {
        let (mut sh, _clock) = shell("..\n..\n");
        sh.greet().unwrap();
        let text = output(sh);
        assert!(text.starts_with(HELP));
        assert!(text.contains(&format!("{HELP}\n\nP.\n.G\n")));
        assert!(text.ends_with("> "));
    }

    #[test]
    fn test_rejections_are_printed_not_fatal() {
        let (mut sh, _clock) = shell(".#\n..\n");
        assert_eq!(sh.handle_line("up").unwrap(), Flow::Continue);
        assert_eq!(sh.handle_line("right").unwrap(), Flow::Continue);
        assert_eq!(sh.handle_line("jump").unwrap(), Flow::Continue);
        assert_eq!(sh.session().move_count(), 0);

        let text = output(sh);
        assert!(text.contains("would leave the grid"));
        assert!(text.contains("is blocked"));
        assert!(text.contains("Invalid direction"));
    }

    #[test]
    fn test_completion_credits_coins() {
        let (mut sh, clock) = shell("..\n..\n");
        clock.advance(Duration::from_secs(20));
        for cmd in parse_script("dr").unwrap() {
            sh.handle(cmd).unwrap();
        }
        // 100 + (50 - 20) * 2 = 160 -> 16 coins
        assert_eq!(sh.session().score(), Some(160));
        assert_eq!(sh.total_coins(), 16);
        assert_eq!(sh.sessions_completed(), 1);

        assert_eq!(sh.handle_line("down").unwrap(), Flow::Continue);
        assert_eq!(sh.handle_line("q").unwrap(), Flow::Quit);

        let summary = serde_json::to_value(sh.summary()).unwrap();
        assert_eq!(summary["total_coins"], 16);
        assert_eq!(summary["last_session"]["terminal"], true);

        let text = output(sh);
        assert!(text.contains("Score: 160"));
        assert!(text.contains("+16 coins"));
        assert!(text.contains("to play again"));
    }

    #[test]
    fn test_restart_keeps_coin_tally() {
        let (mut sh, _clock) = shell("..\n..\n");
        for cmd in parse_script("rd").unwrap() {
            sh.handle(cmd).unwrap();
        }
        assert_eq!(sh.total_coins(), 20);
        sh.handle(ShellCommand::Restart).unwrap();
        assert!(!sh.session().is_terminal());
        assert_eq!(sh.total_coins(), 20);
        assert_eq!(sh.session().grid().width(), 5);
    }

    proptest::proptest! {
        #[test]
        fn prop_letter_and_word_scripts_agree(dirs in proptest::collection::vec(0usize..4, 1..40)) {
            let dirs: Vec<Direction> = dirs.into_iter().map(|i| Direction::ALL[i]).collect();
            let letters: String = dirs.iter().map(|d| &d.as_str()[..1]).collect();
            let words = dirs.iter().map(|d| d.as_str()).collect::<Vec<_>>().join(", ");

            let expected: Vec<ShellCommand> = dirs.into_iter().map(ShellCommand::Move).collect();
            proptest::prop_assert_eq!(parse_script(&letters).unwrap(), expected.clone());
            proptest::prop_assert_eq!(parse_script(&words).unwrap(), expected);
        }
    }

    #[test]
    fn test_render_solution_overlay() {
        let grid = Grid::from_ascii("..#\n#..\n#..\n").unwrap();
        let path = pathfinder_core::find_path(&grid, grid.start(), grid.goal());
        assert_eq!(render_solution(&grid, &path), "S*#\n#*.\n#*G\n");
    }
}
