//! GamePulse Replay CLI
//!
//! Telemetry CSV → tick JSON lines
//! Beat-interval CSV → respiration JSON lines

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use gp_replay::Preset;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "gp_replay")]
#[command(about = "Replay tracking and beat-interval captures through gp_core", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Run telemetry through the kinematic event detector
    Kinematics {
        /// Input CSV (timestamp,entityId,x,y,speed,direction)
        #[arg(long)]
        input: PathBuf,

        /// Output JSON-lines file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Calibration file (.yaml / .json)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Unit preset used when no calibration file is given
        #[arg(long, value_enum, default_value_t = Preset::Yards)]
        preset: Preset,

        /// Attach the physiological feature vector to every tick
        #[arg(long, default_value = "false")]
        features: bool,
    },

    /// Estimate respiration rate from beat intervals
    Respiration {
        /// Input CSV (entityId,timestamp,interval)
        #[arg(long)]
        input: PathBuf,

        /// Output JSON-lines file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Calibration file (.yaml / .json)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Resampling rate in Hz
        #[arg(long)]
        rate: Option<f64>,

        /// Analysis window in seconds
        #[arg(long)]
        window: Option<f64>,
    },

    /// Print the JSON schemas of the output records
    Schema,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Kinematics { input, output, config, preset, features } => {
            let cfg = gp_replay::load_config(config.as_deref(), preset)?;
            tracing::info!(input = %input.display(), ?preset, features, "kinematics replay");

            let summary = gp_replay::replay_telemetry_file(
                &input,
                output.as_deref(),
                cfg.kinematics,
                features,
            )?;
            tracing::info!(
                rows = summary.stats.total_rows,
                failed = summary.stats.failed,
                entities = summary.entities.len(),
                "kinematics replay finished"
            );
        }

        Commands::Respiration { input, output, config, rate, window } => {
            let mut cfg = gp_replay::load_config(config.as_deref(), Preset::default())?.respiration;
            if let Some(rate) = rate {
                cfg.sample_rate_hz = rate;
            }
            if let Some(window) = window {
                cfg.window_s = window;
            }
            cfg.validate()?;
            tracing::info!(
                input = %input.display(),
                rate = cfg.sample_rate_hz,
                window = cfg.window_s,
                "respiration replay"
            );

            let summary = gp_replay::replay_beats_file(&input, output.as_deref(), cfg)?;
            tracing::info!(
                rows = summary.stats.total_rows,
                failed = summary.stats.failed,
                beats = summary.beats,
                estimates = summary.estimates,
                "respiration replay finished"
            );
        }

        Commands::Schema => {
            let schemas = serde_json::json!({
                "TickResult": schemars::schema_for!(gp_core::TickResult),
                "PhysioFeatures": schemars::schema_for!(gp_core::PhysioFeatures),
                "RespirationEstimate": schemars::schema_for!(gp_core::RespirationEstimate),
            });
            println!("{}", serde_json::to_string_pretty(&schemas)?);
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries the JSON-lines output.
#[cfg(feature = "cli")]
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("gp_replay CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
