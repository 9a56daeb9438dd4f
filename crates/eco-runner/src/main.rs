//! Command-line runner for the Eco-Sim agent simulation.

mod runner;
mod telemetry;

use anyhow::Result;
use clap::{Parser, Subcommand};
use runner::OutputFormat;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "eco-runner")]
#[command(version)]
#[command(about = "Simulate foraging, mating creatures on a toroidal grid and record every tick")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation and write its recording
    Run {
        /// Configuration file (JSON); defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the number of ticks
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Override the random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Where to write the recording
        #[arg(short, long, default_value = "data_collection.json")]
        output: PathBuf,

        /// Recording encoding
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Write the default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init_telemetry(cli.json_logs)?;

    match cli.command {
        Commands::Run {
            config,
            ticks,
            seed,
            output,
            format,
        } => {
            let mut config = runner::load_config(config.as_deref())?;
            if let Some(ticks) = ticks {
                config.num_ticks = ticks;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }

            info!(
                "Starting Eco-Sim run: {}x{} grid, {} creatures, {} ticks",
                config.world.width, config.world.height, config.population, config.num_ticks
            );

            let (recording, summary) = runner::execute(config)?;
            runner::write_recording(&recording, &output, format)?;

            info!(
                births = summary.total_births,
                deaths = summary.total_deaths,
                survivors = summary.final_creatures,
                "Done"
            );
        }

        Commands::Init { output } => {
            runner::write_default_config(&output)?;
        }
    }

    Ok(())
}
