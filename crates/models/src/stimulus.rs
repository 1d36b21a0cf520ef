use std::{convert::Infallible, ops::Range};

use neurosim_core::{Model, TimeGrid};
use serde::{Deserialize, Serialize};

/// A piecewise-constant injected current sampled on a [`TimeGrid`].
///
/// The waveform holds one value per grid sample. Every value is zero except
/// those in the half-open "on" window `[start, end)`, which equal the
/// amplitude.
///
/// # Examples
///
/// ```
/// use neurosim_core::TimeGrid;
/// use neurosim_models::stimulus::StimulusWaveform;
///
/// let grid = TimeGrid::with_steps(1.0, 5).unwrap();
/// let stimulus = StimulusWaveform::generate(&grid, 2.5, 1..3);
///
/// assert_eq!(stimulus.values(), &[0.0, 2.5, 2.5, 0.0, 0.0, 0.0]);
/// assert_eq!(stimulus.at(100), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StimulusWaveform {
    amplitude: f64,
    window: Range<usize>,
    values: Vec<f64>,
}

impl StimulusWaveform {
    /// Builds a waveform over `grid` that equals `amplitude` inside `window`.
    ///
    /// Window bounds past the end of the grid are clamped to its length. A
    /// window whose start lies after its end is empty.
    #[must_use]
    pub fn generate(grid: &TimeGrid, amplitude: f64, window: Range<usize>) -> Self {
        let len = grid.samples();
        let start = window.start.min(len);
        let end = window.end.min(len).max(start);

        let mut values = vec![0.0; len];
        values[start..end].fill(amplitude);

        Self {
            amplitude,
            window: start..end,
            values,
        }
    }

    /// Returns the current at sample `index`, or zero past the end.
    #[must_use]
    pub fn at(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(0.0)
    }

    /// Returns every sample of the waveform.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the waveform holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the amplitude applied inside the window.
    #[must_use]
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Returns the clamped "on" window.
    #[must_use]
    pub fn window(&self) -> Range<usize> {
        self.window.clone()
    }
}

/// Builds a [`StimulusWaveform`] from explicit window indices.
///
/// Equivalent to [`StimulusWaveform::generate`] with `on_start..on_end`.
#[must_use]
pub fn generate_stimulus(
    grid: &TimeGrid,
    amplitude: f64,
    on_start: usize,
    on_end: usize,
) -> StimulusWaveform {
    StimulusWaveform::generate(grid, amplitude, on_start..on_end)
}

/// A rectangular current pulse in continuous time.
///
/// Equals `amplitude` for `start < t < end` and zero elsewhere, including at
/// the two edges. Adaptive solvers evaluate it at arbitrary times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentPulse {
    pub amplitude: f64,
    pub start: f64,
    pub end: f64,
}

impl CurrentPulse {
    /// Returns the injected current at time `t`.
    #[must_use]
    pub fn at(&self, t: f64) -> f64 {
        if self.start < t && t < self.end {
            self.amplitude
        } else {
            0.0
        }
    }
}

impl Model for CurrentPulse {
    type Input = f64;
    type Output = f64;
    type Error = Infallible;

    fn call(&self, t: &f64) -> Result<f64, Infallible> {
        Ok(self.at(*t))
    }
}
