use std::fs;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hyperlayout::config::{EngineConfig, load_config};
use hyperlayout::engine::SimulationEngine;
use hyperlayout::render::{RecordingBackend, RenderSnapshot};
use hyperlayout::script::load_script;

mod cli;

use cli::{Cli, Commands};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// Pretty JSON to `output`, or to stdout when no file is given
fn write_snapshot(snapshot: &RenderSnapshot, output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    match output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
            println!("Wrote snapshot to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn layout(
    mut config: EngineConfig,
    seed: Option<u64>,
    trials: Option<usize>,
    ticks: usize,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    if seed.is_some() {
        config.seed = seed;
    }
    if let Some(trials) = trials {
        config.optimizer.max_trials = trials;
    }

    let mut engine = SimulationEngine::from_config(&config)?;
    let report = engine.optimize();

    engine.set_running(true);
    let mut ran = 0;
    while ran < ticks && engine.on_tick().is_some() {
        ran += 1;
    }

    let energy = engine.last_tick().map(|tick| tick.energy).unwrap_or(0.0);
    tracing::info!(
        crossings_before = report.initial_crossings,
        crossings_after = engine.crossings(),
        ticks = ran,
        energy,
        "layout finished"
    );

    write_snapshot(&engine.snapshot(), output)
}

fn replay(config: EngineConfig, script: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let script = load_script(script)
        .with_context(|| format!("failed to load script from {}", script.display()))?;

    let mut engine = SimulationEngine::from_config(&config)?;
    let mut backend = RecordingBackend::default();
    let summary = script.replay(&mut engine, &mut backend);
    tracing::info!(
        events = summary.events,
        redraws = summary.redraws,
        "replay finished"
    );

    write_snapshot(&engine.snapshot(), output)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Layout {
            seed,
            trials,
            ticks,
            config,
            output,
        } => {
            let config = read_config(config.as_deref())?;
            layout(config, seed, trials, ticks, output.as_deref())?;
        }
        Commands::Replay {
            script,
            config,
            output,
        } => {
            let config = read_config(config.as_deref())?;
            replay(config, &script, output.as_deref())?;
        }
        Commands::Config { config } => {
            let config = read_config(config.as_deref())?;
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}
