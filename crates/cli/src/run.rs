//! The `run` and `presets` commands.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use neurosim_models::{
    IzhikevichPreset, ModelKind, ModelParameters, SimulationConfig, Trajectory, simulate,
};

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Model to simulate (lif, izhikevich, fitzhugh-nagumo, hodgkin-huxley)
    pub model: Option<ModelKind>,

    /// TOML config file with the model and parameter overrides
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Izhikevich preset, by id or name
    #[arg(short, long)]
    pub preset: Option<IzhikevichPreset>,

    /// Injected current, in the model's own units (amperes for LIF)
    #[arg(short = 'i', long, allow_negative_numbers = true)]
    pub current: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Trajectory output format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// One row per sample: time, stimulus, then each state variable
    Csv,
    /// The full trajectory as a JSON document
    Json,
}

/// Resolves, simulates and writes one run.
///
/// # Errors
///
/// Returns an error if the arguments conflict, the config cannot be loaded,
/// the simulation fails or the output cannot be written.
pub fn execute(args: &RunArgs) -> Result<()> {
    let parameters = resolve_parameters(args)?;
    let kind = parameters.kind();

    tracing::info!(model = kind.name(), current = parameters.current(), "simulating");

    let trajectory =
        simulate(&parameters).with_context(|| format!("{} simulation failed", kind.name()))?;

    tracing::info!(
        samples = trajectory.len(),
        spikes = trajectory.spikes().map(|spikes| spikes.count()),
        "simulation finished"
    );

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_trajectory(&trajectory, args.format, BufWriter::new(file))?;
            tracing::info!(path = %path.display(), "wrote trajectory");
        }
        None => write_trajectory(&trajectory, args.format, io::stdout().lock())?,
    }

    Ok(())
}

/// Builds the model parameters from a config file and command-line overrides.
///
/// Overrides apply in order: config table, preset, then current.
///
/// # Errors
///
/// Returns an error if no model is named, the positional model disagrees
/// with the config, or the config cannot be loaded or resolved.
pub fn resolve_parameters(args: &RunArgs) -> Result<ModelParameters> {
    let mut config = match (&args.config, args.model) {
        (Some(path), model) => {
            let config = SimulationConfig::load(path)?;
            if let Some(model) = model
                && model != config.model
            {
                bail!(
                    "{} names model {}, but {model} was requested",
                    path.display(),
                    config.model
                );
            }
            config
        }
        (None, Some(model)) => SimulationConfig::new(model),
        (None, None) => bail!("a model or a config file is required"),
    };

    if let Some(preset) = args.preset {
        config.preset = Some(preset);
    }

    let parameters = config.resolve()?;

    Ok(match args.current {
        Some(current) => parameters.with_current(current),
        None => parameters,
    })
}

/// Writes a trajectory in the requested format.
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails.
pub fn write_trajectory(
    trajectory: &Trajectory,
    format: OutputFormat,
    mut out: impl Write,
) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(trajectory, &mut out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, trajectory)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn write_csv(trajectory: &Trajectory, out: impl Write) -> Result<()> {
    let variables = trajectory.variables();
    let stimulus = trajectory.stimulus();

    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(
        ["time", "stimulus"]
            .into_iter()
            .chain(variables.iter().map(|(name, _)| *name)),
    )?;

    let mut row = Vec::with_capacity(variables.len() + 2);
    for (index, time) in trajectory.grid().times().enumerate() {
        row.clear();
        row.push(time);
        row.push(stimulus.at(index));
        row.extend(variables.iter().map(|(_, values)| values[index]));
        wtr.serialize(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the preset table: id, name and coefficients.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_presets(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{:<24}{:<24}{:>6}{:>7}{:>7}{:>5}", "ID", "NAME", "a", "b", "c", "d")?;
    for preset in IzhikevichPreset::ALL {
        let (a, b, c, d) = preset.coefficients();
        writeln!(
            out,
            "{:<24}{:<24}{a:>6}{b:>7}{c:>7}{d:>5}",
            preset.id(),
            preset.name()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use neurosim_models::izhikevich::IzhikevichParameters;

    fn args(model: Option<ModelKind>) -> RunArgs {
        RunArgs {
            model,
            config: None,
            preset: None,
            current: None,
            format: OutputFormat::Csv,
            output: None,
        }
    }

    #[test]
    fn model_alone_gives_defaults() {
        for kind in ModelKind::ALL {
            assert_eq!(
                resolve_parameters(&args(Some(kind))).unwrap(),
                ModelParameters::defaults(kind)
            );
        }
    }

    #[test]
    fn preset_then_current() {
        let args = RunArgs {
            preset: Some(IzhikevichPreset::Resonator),
            current: Some(3.0),
            ..args(Some(ModelKind::Izhikevich))
        };

        assert_eq!(
            resolve_parameters(&args).unwrap(),
            ModelParameters::Izhikevich(
                IzhikevichPreset::Resonator.apply(&IzhikevichParameters {
                    current: 3.0,
                    ..IzhikevichParameters::default()
                })
            )
        );
    }

    #[test]
    fn preset_needs_izhikevich() {
        let args = RunArgs {
            preset: Some(IzhikevichPreset::Chattering),
            ..args(Some(ModelKind::Lif))
        };

        assert!(resolve_parameters(&args).is_err());
    }

    #[test]
    fn model_or_config_required() {
        assert!(resolve_parameters(&args(None)).is_err());
    }

    #[test]
    fn config_file_is_loaded_and_checked() {
        let path = std::env::temp_dir().join(format!("neurosim-cli-{}.toml", std::process::id()));
        std::fs::write(&path, "model = \"fitzhugh-nagumo\"\nparameters = { b = 0.5 }\n").unwrap();

        let from_file = RunArgs {
            config: Some(path.clone()),
            current: Some(0.2),
            ..args(None)
        };
        let ModelParameters::FitzHughNagumo(parameters) = resolve_parameters(&from_file).unwrap()
        else {
            panic!("expected FitzHugh-Nagumo parameters");
        };
        assert_relative_eq!(parameters.b, 0.5);
        assert_relative_eq!(parameters.current, 0.2);

        let conflicting = RunArgs {
            config: Some(path.clone()),
            ..args(Some(ModelKind::Lif))
        };
        assert!(resolve_parameters(&conflicting).is_err());

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn csv_has_header_and_one_row_per_sample() {
        let trajectory = simulate(&ModelParameters::defaults(ModelKind::Izhikevich)).unwrap();
        let mut buffer = Vec::new();

        write_trajectory(&trajectory, OutputFormat::Csv, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("time,stimulus,potential,recovery"));

        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), trajectory.len());
        assert_eq!(rows[0], "0.0,0.0,-70.0,-14.0");

        let last: Vec<f64> = rows[2000].split(',').map(|v| v.parse().unwrap()).collect();
        assert_relative_eq!(last[0], 1000.0);
        assert_relative_eq!(last[2], trajectory.potential()[2000]);
    }

    #[test]
    fn json_names_the_model() {
        let trajectory = simulate(&ModelParameters::defaults(ModelKind::Lif)).unwrap();
        let mut buffer = Vec::new();

        write_trajectory(&trajectory, OutputFormat::Json, &mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["model"], "lif");
        assert_eq!(value["potential"].as_array().unwrap().len(), 5001);
    }

    #[test]
    fn presets_table_lists_every_preset() {
        let mut buffer = Vec::new();

        write_presets(&mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), IzhikevichPreset::ALL.len() + 1);
        assert!(text.contains("low-threshold-spiking"));
        assert!(text.contains("Intrinsically Bursting"));
    }
}
