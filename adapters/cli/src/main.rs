#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Jungle Ruins levels headlessly.

mod explorer;
mod logging;
mod runner;
mod script;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use jungle_ruins_world::{query, LevelDescription, World, WorldConfig};
use log::info;

use crate::{explorer::Explorer, script::MoveScript};

/// Walks up to the button, across to the door, and back.
const DEFAULT_SCRIPT: &str = "U6,R40,D6,L20";

/// Runs a Jungle Ruins level with a scripted explorer and prints a summary.
#[derive(Debug, Parser)]
#[command(name = "jungle-ruins", author, version, about, long_about = None)]
struct Args {
    /// Level file in TOML format. The built-in demo level is used when omitted.
    #[arg(long)]
    level: Option<PathBuf>,

    /// Number of fixed simulation steps to run.
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Length of one simulation step in milliseconds.
    #[arg(long = "dt-ms", default_value_t = 16)]
    dt_ms: u64,

    /// Comma-separated moves such as `R12,U4`: a direction letter and a tick count.
    #[arg(long, default_value = DEFAULT_SCRIPT)]
    script: MoveScript,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the Jungle Ruins command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);
    ensure!(args.dt_ms > 0, "--dt-ms must be greater than zero");

    let level = match &args.level {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read level {}", path.display()))?;
            LevelDescription::from_toml(&source)
                .with_context(|| format!("failed to parse level {}", path.display()))?
        }
        None => LevelDescription::demo().context("failed to parse the built-in demo level")?,
    };

    let mut world = World::from_level(&level, WorldConfig::default())
        .context("failed to assemble the level")?;
    let mut explorer = Explorer::new(query::spawn_point(&world));
    info!(
        "running {} ticks, script covers {}",
        args.ticks,
        args.script.len()
    );

    let summary = runner::run(
        &mut world,
        &mut explorer,
        &args.script,
        args.ticks,
        Duration::from_millis(args.dt_ms),
    );

    if summary.won() {
        info!("level cleared");
    } else if summary.doors_open() {
        info!("doors opened but the level is not cleared");
    }
    println!("{summary}");
    Ok(())
}
