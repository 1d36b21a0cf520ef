//! Shared helpers for the cross-crate tests.

use std::path::PathBuf;

use neurosim_models::{ModelParameters, SimulationConfig};

/// Returns the path of a file in the `configs/` fixture directory.
pub fn config_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("configs")
        .join(name)
}

/// Loads and resolves a TOML fixture.
///
/// # Panics
///
/// Panics if the fixture is missing or invalid.
pub fn resolve_toml(name: &str) -> ModelParameters {
    SimulationConfig::load(config_path(name))
        .and_then(|config| config.resolve())
        .unwrap_or_else(|err| panic!("{name}: {err}"))
}

/// Returns the sample indices where `values` first rises to or above `level`.
pub fn upward_crossings(values: &[f64], level: f64) -> Vec<usize> {
    values
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] < level && pair[1] >= level)
        .map(|(index, _)| index + 1)
        .collect()
}
