//! stakeline-sim: headless driver for the stakeline engine.
//!
//! Plays a scripted input sequence through a session on a fixed-step
//! clock and prints where the session ended up. Useful for:
//!
//! - Reproducing a claim or failure from a recorded input sequence
//! - Checking level parameters without a front end
//! - Measuring claim resolution time on large fields
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin stakeline-sim -- [OPTIONS]
//! ```
//!
//! A script is a JSON array of steps:
//!
//! ```text
//! [{"step": "confirm"}, {"step": "move", "direction": "right", "frames": 30},
//!  {"step": "push"}, {"step": "steer", "dx": 0.2, "dy": 1.0, "frames": 5},
//!  {"step": "idle", "frames": 10}, {"step": "quit"}]
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod script;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use stakeline_field::{FrameClock, LevelConfig, Session};

/// Headless stakeline session driver.
///
/// Runs a script (or the built-in demo) against a level and prints the
/// final phase, claimed share and every claim made.
#[derive(Parser)]
#[command(name = "stakeline-sim", version)]
struct Cli {
    /// JSON script of steps; the built-in demo runs when omitted.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Level to start on.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    level: u32,

    /// Seed for hostile movement.
    #[arg(long, default_value_t = LevelConfig::DEFAULT_SEED)]
    seed: u64,

    /// Frame length in milliseconds (60 Hz when omitted).
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<u64>::new().range(1..))]
    frame_ms: Option<u64>,

    /// Print the report as JSON instead of human-readable text.
    #[arg(long)]
    json: bool,
}

fn load_steps(cli: &Cli) -> Result<Vec<script::Step>, String> {
    let Some(path) = &cli.script else {
        return Ok(script::demo());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    script::parse(&text).map_err(|e| format!("Error parsing {}: {e}", path.display()))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let steps = match load_steps(&cli) {
        Ok(steps) => steps,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let config = LevelConfig::for_level(cli.level).with_seed(cli.seed);
    let mut session = match Session::new(config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Invalid level configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut clock = cli
        .frame_ms
        .map_or_else(FrameClock::default, |ms| {
            FrameClock::new(Duration::from_millis(ms))
        });

    log::info!(
        "playing {} step(s) on level {} (seed {:#x})",
        steps.len(),
        cli.level,
        cli.seed
    );
    let report = match script::run(&mut session, &mut clock, &steps) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Session error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", report.render());
    }
    ExitCode::SUCCESS
}
