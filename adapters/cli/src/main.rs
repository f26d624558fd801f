#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless driver: paints a demo grid, generates a deck for it and plays
//! the level to completion under automatic launching.

mod pattern;
mod report;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pixel_rail_core::MismatchPolicy;
use pixel_rail_system_deck_generation::{DeckGenerator, GeneratorConfig};
use pixel_rail_world::State;
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

use crate::{pattern::Pattern, report::Report};

#[derive(Debug, Parser)]
#[command(name = "pixel-rail")]
#[command(about = "Generate and autoplay a Pixel Rail level")]
struct Args {
    /// Grid columns.
    #[arg(long, default_value_t = 12)]
    width: u32,
    /// Grid rows.
    #[arg(long, default_value_t = 12)]
    height: u32,
    /// How the demo grid is painted.
    #[arg(long, value_enum, default_value_t = Pattern::Stripes)]
    pattern: Pattern,
    /// Number of distinct colors on the grid.
    #[arg(long, default_value_t = 3)]
    colors: usize,
    /// Root seed; overrides the style file.
    #[arg(long)]
    seed: Option<u64>,
    /// Shooters allowed on the rail; overrides the style file.
    #[arg(long)]
    capacity: Option<usize>,
    /// Number of deck queues; overrides the style file.
    #[arg(long)]
    queues: Option<usize>,
    /// TOML file with generator settings.
    #[arg(long)]
    style: Option<PathBuf>,
    /// Reaction to mismatched pixels; overrides the style file.
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,
    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
    /// Log generation attempts.
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    /// Keep moving and look for matching pixels further on.
    Skip,
    /// Stop firing for the rest of the lap.
    Dry,
}

impl From<PolicyArg> for MismatchPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Skip => Self::SkipAndContinue,
            PolicyArg::Dry => Self::DryForLap,
        }
    }
}

impl Args {
    /// Style file settings with command-line overrides applied.
    fn generator_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.style {
            Some(path) => load_style(path)?,
            None => GeneratorConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(capacity) = self.capacity {
            config.capacity = capacity;
        }
        if let Some(queues) = self.queues {
            config.queue_count = queues;
        }
        if let Some(policy) = self.policy {
            config.policy = policy.into();
        }
        Ok(config)
    }
}

fn load_style(path: &Path) -> Result<GeneratorConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read style file at {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse style file at {}", path.display()))
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<Report> {
    let config = args.generator_config()?;
    let grid = args
        .pattern
        .build(args.width, args.height, args.colors, config.seed);
    info!(
        width = grid.width(),
        height = grid.height(),
        pixels = grid.filled_count(),
        "demo grid painted"
    );

    let mut generator =
        DeckGenerator::new(config.clone()).context("invalid generator settings")?;
    let generated = generator
        .generate(&grid)
        .context("could not generate a solvable deck")?;

    let mut state = State::new(grid.clone(), generated.deck.clone(), config.capacity)
        .with_policy(config.policy);
    let outcome = state.run_until_idle(config.max_sim_steps);
    Ok(Report::new(
        &grid,
        args.pattern,
        config.seed,
        &generated,
        outcome,
        &state,
    ))
}

/// Entry point for the Pixel Rail command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let report = run(&args)?;
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to encode report")?
        );
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}
