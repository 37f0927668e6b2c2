//! `evomap`: evolve grid maps and run the creature simulation on them.

mod driver;
mod telemetry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use evomap_core::RunConfig;
use evomap_world::{generate_batch, SimulationWorld};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "evomap")]
#[command(about = "Evolve tile maps and simulate creatures on them")]
struct Args {
    /// JSON run configuration; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed, overriding the one in the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evolve a batch of maps and write them out as landscape files
    Generate {
        /// Number of maps; map i uses seed + i
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,

        /// Directory to write the files into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,
    },
    /// Evolve one map and drive the observer on it, printing the view each tick
    Simulate {
        /// Observer moves as N/S/E/W letters, '.' for a tick without input
        #[arg(short, long)]
        moves: Option<String>,

        /// Tick count when moves are random
        #[arg(short, long, default_value = "50")]
        ticks: usize,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ExportFormat {
    Json,
    Bin,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Bin => "bin",
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_telemetry(args.log_json)?;

    let config = load_config(&args)?;
    info!(seed = config.seed, "Starting evomap");

    match args.command {
        Command::Generate {
            count,
            out_dir,
            format,
        } => run_generate(&config, count, &out_dir, format),
        Command::Simulate { moves, ticks } => run_simulate(&config, moves.as_deref(), ticks),
    }
}

fn load_config(args: &Args) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            RunConfig::from_json(&json)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => RunConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate().context("invalid run config")?;
    Ok(config)
}

fn run_generate(config: &RunConfig, count: usize, out_dir: &Path, format: ExportFormat) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    for export in generate_batch(config, count)? {
        let path = out_dir.join(export.file_name(format.extension()));
        let bytes = match format {
            ExportFormat::Json => export.to_json()?.into_bytes(),
            ExportFormat::Bin => export.to_bytes()?,
        };
        std::fs::write(&path, bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), fitness = export.fitness, "Map written");
    }

    Ok(())
}

fn run_simulate(config: &RunConfig, moves: Option<&str>, ticks: usize) -> Result<()> {
    let (mut world, outcome) = SimulationWorld::generate(config)?;
    info!(
        best_fitness = outcome.best_fitness,
        generations = outcome.history.len(),
        "Map ready"
    );

    let input = match moves {
        Some(moves) => driver::InputSource::scripted(moves)?,
        None => {
            let rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(1));
            driver::InputSource::random(rng, ticks)
        }
    };

    let stdout = std::io::stdout();
    let summary = driver::drive(&mut world, input, &mut stdout.lock())?;
    println!(
        "finished after {} ticks: {:?}, observer hp {}, {} creatures left",
        summary.ticks, summary.status, summary.observer_hp, summary.creatures_left
    );
    Ok(())
}
