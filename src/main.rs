//! nupilot CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use nupilot::{generate_beam, replay, ReplayEvent, Settings};

#[derive(Parser)]
#[command(name = "nupilot")]
#[command(about = "nupilot - muon beam sampling and emulsion energy-flow bookkeeping")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error). `RUST_LOG`
    /// directives are applied on top.
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    /// Settings file (JSON). Built-in defaults when absent.
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the beam spectrum table
    Spectrum {
        /// Output file (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sample beam primaries
    Sample {
        /// Number of events (overrides the settings file)
        #[arg(short = 'n', long)]
        events: Option<usize>,

        /// Master seed (overrides the settings file)
        #[arg(long)]
        seed: Option<u64>,

        /// Parallel workers (overrides the settings file)
        #[arg(long)]
        workers: Option<usize>,

        /// Include every event record in the output
        #[arg(long)]
        keep_events: bool,

        /// Output file (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Digest transport steps recorded as JSON
    Replay {
        /// Recorded events: a JSON array of `{beam, steps}` objects
        #[arg(short, long)]
        input: PathBuf,

        /// Include every event record in the output
        #[arg(long)]
        keep_events: bool,

        /// Output file (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = log_filter(cli.log_level, std::env::var("RUST_LOG").ok().as_deref());
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let settings = load_settings(cli.settings.as_ref())?;

    match cli.command {
        Commands::Spectrum { output } => cmd_spectrum(&settings, output.as_ref()),
        Commands::Sample {
            events,
            seed,
            workers,
            keep_events,
            output,
        } => {
            let mut settings = settings;
            if let Some(events) = events {
                settings.events = events;
            }
            if seed.is_some() {
                settings.seed = seed;
            }
            if let Some(workers) = workers {
                settings.workers = workers;
            }
            settings.keep_events |= keep_events;
            cmd_sample(&settings, output.as_ref())
        }
        Commands::Replay {
            input,
            keep_events,
            output,
        } => {
            let mut settings = settings;
            settings.keep_events |= keep_events;
            cmd_replay(&settings, &input, output.as_ref())
        }
    }
}

/// `--log-level` as the default directive, refined by `RUST_LOG` when set.
fn log_filter(level: tracing::Level, directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .parse_lossy(directives.unwrap_or_default())
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    match path {
        Some(path) => Settings::from_json_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Ok(Settings::default()),
    }
}

fn cmd_spectrum(settings: &Settings, output: Option<&PathBuf>) -> Result<()> {
    let sampler = settings.spectrum.build_sampler()?;
    let rows: Vec<serde_json::Value> = (0..nupilot::SPECTRUM_BINS)
        .map(|bin| {
            let (low, high) = sampler.bin_range(bin);
            serde_json::json!({
                "bin": bin,
                "low": low,
                "high": high,
                "weight": sampler.weights()[bin],
                "probability": sampler.probability(bin),
                "cumulative": sampler.cumulative()[bin],
            })
        })
        .collect();
    write_json(output, serde_json::Value::Array(rows))
}

fn cmd_sample(settings: &Settings, output: Option<&PathBuf>) -> Result<()> {
    let summary = generate_beam(settings)?;
    tracing::info!(
        events = summary.events,
        hits = summary.hits,
        hits_per_event = summary.hits_per_event(),
        "sampling complete"
    );
    write_json(output, serde_json::to_value(&summary)?)
}

fn cmd_replay(settings: &Settings, input: &PathBuf, output: Option<&PathBuf>) -> Result<()> {
    let bytes = std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;
    let events: Vec<ReplayEvent> =
        serde_json::from_str(&bytes).with_context(|| format!("failed to parse {}", input.display()))?;
    let summary = replay(settings, &events)?;
    tracing::info!(
        events = summary.events,
        hits = summary.hits,
        hits_per_event = summary.hits_per_event(),
        "replay complete"
    );
    write_json(output, serde_json::to_value(&summary)?)
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
