//! Loads configuration, drives a simulation and writes its recording.

use anyhow::{Context, Result};
use eco_core::{RunSummary, SimulationConfig};
use eco_world::{Recording, Simulation};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument};

/// On-disk encoding of a recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON array of tick records
    Json,
    /// bincode
    Bincode,
}

/// Read a JSON configuration file, or fall back to defaults
pub fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        info!("No configuration file given, using defaults");
        return Ok(SimulationConfig::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: SimulationConfig = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Build the world and run it to completion
#[instrument(skip(config), fields(ticks = config.num_ticks, seed = config.seed))]
pub fn execute(config: SimulationConfig) -> Result<(Recording, RunSummary)> {
    let start = Instant::now();

    let mut simulation = Simulation::new(config).context("failed to initialise world")?;
    let summary = simulation.run().context("simulation aborted")?;

    info!(
        duration_ms = start.elapsed().as_millis() as u64,
        final_creatures = summary.final_creatures,
        "Simulation finished"
    );

    Ok((simulation.into_recording(), summary))
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}

pub fn write_recording(recording: &Recording, path: &Path, format: OutputFormat) -> Result<()> {
    create_parent_dir(path)?;

    let bytes = match format {
        OutputFormat::Json => recording.to_json_pretty()?.into_bytes(),
        OutputFormat::Bincode => recording.to_bytes()?,
    };
    fs::write(path, &bytes).with_context(|| format!("failed to write {}", path.display()))?;

    info!(
        ticks = recording.len(),
        bytes = bytes.len(),
        "Recording written to {}",
        path.display()
    );
    Ok(())
}

/// Write the default configuration as pretty JSON
pub fn write_default_config(path: &Path) -> Result<()> {
    create_parent_dir(path)?;
    let json = serde_json::to_string_pretty(&SimulationConfig::default())?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    info!("Default configuration written to {}", path.display());
    Ok(())
}
