use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Headless host for the hyperbolic graph layout engine.
#[derive(Parser, Debug)]
#[command(name = "hyperlayout")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a graph, run the layout search, then simulate
    Layout {
        /// Seed for graph generation (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum layout search trials (overrides the config file)
        #[arg(short, long)]
        trials: Option<usize>,

        /// Simulation ticks to run after the search
        #[arg(long, default_value = "100")]
        ticks: usize,

        /// Engine configuration file (.yaml, .yml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the final snapshot here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replay a recorded session of host events
    Replay {
        /// Script file (.yaml, .yml or .json)
        #[arg(long)]
        script: PathBuf,

        /// Engine configuration file (.yaml, .yml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the final snapshot here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration as YAML
    Config {
        /// Engine configuration file (.yaml, .yml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
