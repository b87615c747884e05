// main.rs - `pathfinder` command line: play sessions, inspect mazes, tune difficulty

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use pathfinder_cli::{parse_script, render_solution, Flow, Shell};
use pathfinder_core::analysis::mind_level_reports;
use pathfinder_core::{generate_solvable, GameSession, SessionConfig, SystemClock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Session config JSON; missing fields use defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a session, from a move script or interactively on stdin
    Play {
        /// Mind level: sets maze size, obstacle density and score multiplier
        #[arg(short, long, default_value = "0")]
        mind_level: u32,

        /// Seed for reproducible mazes
        #[arg(short, long)]
        seed: Option<u64>,

        /// Move script, e.g. "ddrr" or "down,down,right,right"
        #[arg(long)]
        moves: Option<String>,

        /// Print a JSON run summary at the end
        #[arg(long)]
        json: bool,
    },

    /// Print a generated maze with its optimal path
    Solve {
        #[arg(short, long, default_value = "0")]
        mind_level: u32,

        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// First-attempt solvability statistics per mind level, as JSON
    Stats {
        #[arg(long, default_value = "0")]
        from: u32,

        #[arg(long, default_value = "100")]
        to: u32,

        #[arg(long, default_value = "10")]
        step: u32,

        /// Grids sampled per level
        #[arg(long, default_value = "1000")]
        samples: usize,

        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

/// Load session config (path or defaults)
fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    SessionConfig::from_json_str(&s)
        .with_context(|| format!("Failed to load session config from {}", path.display()))
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn play(
    config: SessionConfig,
    mind_level: u32,
    seed: Option<u64>,
    moves: Option<&str>,
    json: bool,
) -> Result<()> {
    let session = GameSession::with_parts(config, mind_level, SystemClock::new(), make_rng(seed))
        .context("Failed to start session")?;
    let stdout = io::stdout();
    let mut shell = Shell::new(session, stdout.lock());

    if let Some(script) = moves {
        let commands = parse_script(script).context("Invalid move script")?;
        info!("Replaying {} scripted commands", commands.len());
        for command in commands {
            if shell.handle(command)? == Flow::Quit {
                break;
            }
        }
    } else {
        shell.greet()?;
        for line in io::stdin().lock().lines() {
            let line = line.context("Failed to read stdin")?;
            if shell.handle_line(&line)? == Flow::Quit {
                break;
            }
            shell.prompt()?;
        }
    }

    if json {
        let summary = serde_json::to_string_pretty(&shell.summary())?;
        let mut out = shell.into_output();
        writeln!(out, "{summary}")?;
    }
    Ok(())
}

fn solve(config: &SessionConfig, mind_level: u32, seed: Option<u64>) -> Result<()> {
    let size = config.grid_size(mind_level);
    let (grid, path) = generate_solvable(
        size,
        size,
        f64::from(mind_level),
        &mut make_rng(seed),
        config.max_generation_attempts,
    )?;

    print!("{}", render_solution(&grid, &path));
    println!(
        "{}x{} maze, {} blocked cells, optimal path {} steps",
        grid.width(),
        grid.height(),
        grid.blocked_count(),
        path.steps()
    );
    Ok(())
}

fn stats(config: &SessionConfig, from: u32, to: u32, step: u32, samples: usize, seed: u64) -> Result<()> {
    anyhow::ensure!(from <= to, "--from ({from}) must not exceed --to ({to})");
    anyhow::ensure!(step > 0, "--step must be positive");

    let start = Instant::now();
    let levels = (from..=to).step_by(step as usize);
    let reports = mind_level_reports(config, levels, samples, seed)?;
    info!(
        "Sampled {} levels x {} grids in {:?}",
        reports.len(),
        samples,
        start.elapsed()
    );

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    info!("Starting with {args:?}");

    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Play {
            mind_level,
            seed,
            moves,
            json,
        } => play(config, mind_level, seed, moves.as_deref(), json),
        Command::Solve { mind_level, seed } => solve(&config, mind_level, seed),
        Command::Stats {
            from,
            to,
            step,
            samples,
            seed,
        } => stats(&config, from, to, step, samples, seed),
    }
}
