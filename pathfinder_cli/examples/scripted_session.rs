// examples/scripted_session.rs - Plays a seeded session along its optimal path
// Shows driving the shell with a manual clock and collecting the run summary

use anyhow::{Context, Result};
use pathfinder_cli::{render_solution, Shell, ShellCommand};
use pathfinder_core::{find_path, Direction, GameSession, ManualClock, Position, SessionConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

fn direction_between(from: Position, to: Position) -> Option<Direction> {
    Direction::ALL
        .into_iter()
        .find(|&dir| from.step(dir, usize::MAX, usize::MAX) == Some(to))
}

fn main() -> Result<()> {
    env_logger::init();

    println!("Pathfinder scripted session");
    println!("===========================");

    let clock = ManualClock::new();
    let session = GameSession::with_parts(
        SessionConfig::default(),
        25,
        clock.clone(),
        StdRng::seed_from_u64(2024),
    )?;

    let grid = session.grid().clone();
    let path = find_path(&grid, grid.start(), grid.goal());
    println!("Optimal route ({} steps):", path.steps());
    print!("{}", render_solution(&grid, &path));
    println!();

    let mut shell = Shell::new(session, std::io::stdout());
    for pair in path.cells().windows(2) {
        let dir = direction_between(pair[0], pair[1]).context("path cells are not adjacent")?;
        clock.advance(Duration::from_millis(1500));
        shell.handle(ShellCommand::Move(dir))?;
    }

    let summary = shell.summary();
    println!();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
