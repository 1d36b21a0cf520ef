//! TOML simulation configs.
//!
//! A config names a model, optionally an Izhikevich preset, and optionally
//! a partial parameter table. Missing parameters take their defaults.
//!
//! ```toml
//! model = "izhikevich"
//! preset = "chattering"
//!
//! [parameters]
//! current = 12.0
//! ```
//!
//! A preset replaces `(a, b, c, d)` after the table is applied, so it wins
//! over any coefficients in the table while the table's `current` is kept.

use std::{fs, io, path::Path, path::PathBuf};

use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{
    izhikevich::IzhikevichPreset,
    simulate::{ModelKind, ModelParameters},
};

/// A parsed, unresolved simulation config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    pub model: ModelKind,

    #[serde(default)]
    pub preset: Option<IzhikevichPreset>,

    #[serde(default)]
    pub parameters: toml::Table,
}

/// Errors that can occur when loading or resolving a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid {model} parameters: {source}")]
    Parameters {
        model: ModelKind,
        #[source]
        source: toml::de::Error,
    },

    #[error("presets apply only to the izhikevich model, not {model}")]
    PresetNotSupported { model: ModelKind },
}

impl SimulationConfig {
    /// Returns a config selecting the defaults of `model`.
    #[must_use]
    pub fn new(model: ModelKind) -> Self {
        Self {
            model,
            preset: None,
            parameters: toml::Table::new(),
        }
    }

    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not valid TOML or
    /// does not have the expected shape.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "loaded config");

        Self::from_toml_str(&text)
    }

    /// Resolves the config into concrete model parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parameters`] if the table holds unknown keys or
    /// values of the wrong type, or [`ConfigError::PresetNotSupported`] if a
    /// preset is given for a model other than Izhikevich.
    pub fn resolve(&self) -> Result<ModelParameters, ConfigError> {
        if let Some(preset) = self.preset
            && self.model != ModelKind::Izhikevich
        {
            tracing::warn!(%preset, model = %self.model, "preset given for non-Izhikevich model");
            return Err(ConfigError::PresetNotSupported { model: self.model });
        }

        let parameters = match self.model {
            ModelKind::Lif => ModelParameters::Lif(self.table()?),
            ModelKind::Izhikevich => {
                let parameters = self.table()?;
                let parameters = match self.preset {
                    Some(preset) => preset.apply(&parameters),
                    None => parameters,
                };
                ModelParameters::Izhikevich(parameters)
            }
            ModelKind::FitzHughNagumo => ModelParameters::FitzHughNagumo(self.table()?),
            ModelKind::HodgkinHuxley => ModelParameters::HodgkinHuxley(self.table()?),
        };

        Ok(parameters)
    }

    fn table<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        toml::Value::Table(self.parameters.clone())
            .try_into()
            .map_err(|source| ConfigError::Parameters {
                model: self.model,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{electric_current::ampere, f64::ElectricCurrent};

    use crate::{
        fitzhugh_nagumo::FitzHughNagumoParameters, hodgkin_huxley::HodgkinHuxleyParameters,
        izhikevich::IzhikevichParameters, lif::LifParameters,
    };

    #[test]
    fn model_only_resolves_to_defaults() {
        for kind in ModelKind::ALL {
            let config = SimulationConfig::from_toml_str(&format!("model = \"{kind}\"")).unwrap();

            assert_eq!(config, SimulationConfig::new(kind));
            assert_eq!(config.resolve().unwrap(), ModelParameters::defaults(kind));
        }
    }

    #[test]
    fn partial_table_overrides_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            model = "hodgkin-huxley"

            [parameters]
            current = 10.0
            g_k = 30
            "#,
        )
        .unwrap();

        assert_eq!(
            config.resolve().unwrap(),
            ModelParameters::HodgkinHuxley(HodgkinHuxleyParameters {
                current: 10.0,
                g_k: 30.0,
                ..HodgkinHuxleyParameters::default()
            })
        );
    }

    #[test]
    fn lif_table_is_in_si_units() {
        let config = SimulationConfig::from_toml_str(
            r#"
            model = "lif"
            parameters = { current = 0.002 }
            "#,
        )
        .unwrap();

        let ModelParameters::Lif(parameters) = config.resolve().unwrap() else {
            panic!("expected LIF parameters");
        };
        assert_relative_eq!(parameters.current.get::<ampere>(), 0.002);
        assert_eq!(
            parameters,
            LifParameters::default().current(ElectricCurrent::new::<ampere>(0.002))
        );
    }

    #[test]
    fn preset_replaces_coefficients_and_keeps_current() {
        let config = SimulationConfig::from_toml_str(
            r#"
            model = "izhikevich"
            preset = "chattering"

            [parameters]
            current = 12.0
            c = -70.0
            "#,
        )
        .unwrap();

        assert_eq!(
            config.resolve().unwrap(),
            ModelParameters::Izhikevich(IzhikevichParameters {
                current: 12.0,
                a: 0.02,
                b: 0.2,
                c: -50.0,
                d: 2.0,
            })
        );
    }

    #[test]
    fn preset_on_other_model_is_rejected() {
        let config = SimulationConfig::from_toml_str(
            r#"
            model = "fitzhugh-nagumo"
            preset = "resonator"
            "#,
        )
        .unwrap();

        assert!(matches!(
            config.resolve(),
            Err(ConfigError::PresetNotSupported {
                model: ModelKind::FitzHughNagumo
            })
        ));
    }

    #[test]
    fn unknown_parameter_is_rejected() {
        let config = SimulationConfig::from_toml_str(
            r#"
            model = "fitzhugh-nagumo"
            parameters = { tua = 3.0 }
            "#,
        )
        .unwrap();

        let err = config.resolve().unwrap_err();
        assert!(matches!(err, ConfigError::Parameters { .. }));
        assert!(err.to_string().starts_with("invalid fitzhugh-nagumo parameters"));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let config = SimulationConfig::from_toml_str(
            r#"
            model = "fitzhugh-nagumo"
            parameters = { tau = "slow" }
            "#,
        )
        .unwrap();

        assert!(matches!(config.resolve(), Err(ConfigError::Parameters { .. })));
    }

    #[test]
    fn unknown_model_or_key_fails_to_parse() {
        for text in [
            "model = \"cable\"",
            "model = \"lif\"\nduration = 3.0",
            "preset = \"chattering\"",
        ] {
            assert!(matches!(
                SimulationConfig::from_toml_str(text),
                Err(ConfigError::Parse(_))
            ));
        }
    }

    #[test]
    fn tau_default_survives_partial_table() {
        let config = SimulationConfig::from_toml_str(
            r#"
            model = "fitzhugh-nagumo"
            parameters = { current = 0.3 }
            "#,
        )
        .unwrap();

        let ModelParameters::FitzHughNagumo(FitzHughNagumoParameters { current, tau, .. }) =
            config.resolve().unwrap()
        else {
            panic!("expected FitzHugh-Nagumo parameters");
        };
        assert_relative_eq!(current, 0.3);
        assert_relative_eq!(tau, 12.5);
    }

    #[test]
    fn load_reports_missing_file() {
        let path = std::env::temp_dir().join("neurosim-config-that-does-not-exist.toml");

        assert!(matches!(
            SimulationConfig::load(&path),
            Err(ConfigError::Io { .. })
        ));
    }
}
