//! neurosim command-line interface.
//!
//! # Usage
//!
//! ```bash
//! # Default LIF run, CSV on stdout
//! neurosim run lif
//!
//! # Izhikevich with a preset and a stronger drive, as JSON
//! neurosim run izhikevich --preset chattering --current 14 --format json
//!
//! # Everything from a config file
//! neurosim run --config hh.toml --output hh.csv
//!
//! # List the Izhikevich presets
//! neurosim presets
//! ```

use clap::{Parser, Subcommand};

pub mod run;

/// Single-neuron simulator
#[derive(Parser, Debug)]
#[command(name = "neurosim")]
#[command(author, version, about = "Simulate single-neuron models")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Simulate a model and write its trajectory
    Run(run::RunArgs),

    /// List the Izhikevich presets
    Presets,
}

/// Runs a parsed command line.
///
/// # Errors
///
/// Returns any configuration, simulation or output error.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run(args) => run::execute(&args),
        Commands::Presets => {
            let mut out = std::io::stdout().lock();
            run::write_presets(&mut out)?;
            Ok(())
        }
    }
}
