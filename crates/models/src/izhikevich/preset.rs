use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::IzhikevichParameters;

/// Named `(a, b, c, d)` bundles for common cortical firing patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IzhikevichPreset {
    RegularSpiking,
    IntrinsicallyBursting,
    Chattering,
    FastSpiking,
    LowThresholdSpiking,
    Resonator,
}

/// Error returned when parsing an unknown preset name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown Izhikevich preset `{name}`")]
pub struct UnknownPresetError {
    pub name: String,
}

impl IzhikevichPreset {
    /// Every preset, in display order.
    pub const ALL: [Self; 6] = [
        Self::RegularSpiking,
        Self::IntrinsicallyBursting,
        Self::Chattering,
        Self::FastSpiking,
        Self::LowThresholdSpiking,
        Self::Resonator,
    ];

    /// Returns the `(a, b, c, d)` coefficients of the preset.
    #[must_use]
    pub fn coefficients(self) -> (f64, f64, f64, f64) {
        match self {
            Self::RegularSpiking => (0.02, 0.2, -65.0, 8.0),
            Self::IntrinsicallyBursting => (0.02, 0.2, -55.0, 4.0),
            Self::Chattering => (0.02, 0.2, -50.0, 2.0),
            Self::FastSpiking => (0.1, 0.2, -65.0, 8.0),
            Self::LowThresholdSpiking => (0.02, 0.25, -65.0, 8.0),
            Self::Resonator => (0.1, 0.26, -65.0, 8.0),
        }
    }

    /// Returns `parameters` with the preset's coefficients substituted.
    ///
    /// The injected current is kept.
    #[must_use]
    pub fn apply(self, parameters: &IzhikevichParameters) -> IzhikevichParameters {
        let (a, b, c, d) = self.coefficients();
        IzhikevichParameters {
            current: parameters.current,
            a,
            b,
            c,
            d,
        }
    }

    /// Returns the kebab-case identifier used in configs and on the command line.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::RegularSpiking => "regular-spiking",
            Self::IntrinsicallyBursting => "intrinsically-bursting",
            Self::Chattering => "chattering",
            Self::FastSpiking => "fast-spiking",
            Self::LowThresholdSpiking => "low-threshold-spiking",
            Self::Resonator => "resonator",
        }
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::RegularSpiking => "Regular Spiking",
            Self::IntrinsicallyBursting => "Intrinsically Bursting",
            Self::Chattering => "Chattering",
            Self::FastSpiking => "Fast Spiking",
            Self::LowThresholdSpiking => "Low-Threshold Spiking",
            Self::Resonator => "Resonator",
        }
    }
}

impl fmt::Display for IzhikevichPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IzhikevichPreset {
    type Err = UnknownPresetError;

    /// Parses either the identifier or the display name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|preset| {
                preset.id().eq_ignore_ascii_case(trimmed)
                    || preset.name().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| UnknownPresetError { name: s.to_owned() })
    }
}
