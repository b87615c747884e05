// lib.rs - Text shell for the Pathfinder game
// Shared by the `pathfinder` binary and the scripted example

pub mod shell;

pub use shell::{parse_script, render_solution, Flow, RunSummary, Shell, ShellCommand};
