//! Cadence CLI - run and inspect scenes driven by the update manager

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{inspect, run};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Centralized per-frame tick dispatcher", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scene headlessly for a number of frames
    Run {
        /// Path to scene file
        scene: String,

        /// Number of frames to run
        #[arg(long, default_value = "600")]
        frames: u64,

        /// Runtime config file (TOML with a [runtime] table)
        #[arg(long)]
        config: Option<String>,

        /// Directory containing .rhai scripts (default: <scene dir>/scripts)
        #[arg(long)]
        scripts: Option<String>,

        /// Fixed-update rate in Hz
        #[arg(long)]
        fixed_hz: Option<f64>,

        /// Simulated seconds per frame
        #[arg(long)]
        frame_time: Option<f64>,

        /// Scan child objects at bootstrap, not just roots
        #[arg(long)]
        hierarchy: bool,
    },

    /// Show which pass each behaviour in a scene is dispatched in
    Inspect {
        /// Path to scene file
        scene: String,

        /// Directory containing .rhai scripts (default: <scene dir>/scripts)
        #[arg(long)]
        scripts: Option<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scene,
            frames,
            config,
            scripts,
            fixed_hz,
            frame_time,
            hierarchy,
        } => run::run(run::RunArgs {
            scene,
            frames,
            config,
            scripts,
            fixed_hz,
            frame_time,
            hierarchy,
        }),
        Commands::Inspect {
            scene,
            scripts,
            format,
        } => inspect::run(&scene, scripts.as_deref(), &format),
    }
}
