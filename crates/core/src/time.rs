use serde::Serialize;
use thiserror::Error;

/// Relative tolerance used to decide that `duration / dt` is an integer.
///
/// Durations and steps like `0.1` and `0.00002` are not exactly representable,
/// so their ratio can land a hair below the intended integer. Within this
/// tolerance the ratio is rounded instead of floored.
const INTEGER_RATIO_TOLERANCE: f64 = 1e-9;

/// Uniformly spaced sample times `t_k = k * dt` for `k = 0..=steps`.
///
/// A grid always holds at least one sample (`t_0 = 0`). Its length is
/// `floor(duration / dt) + 1`, the same number of samples as
/// `arange(0, duration + dt, dt)`.
///
/// # Examples
///
/// ```
/// use neurosim_core::TimeGrid;
///
/// let grid = TimeGrid::new(1000.0, 0.5).unwrap();
///
/// assert_eq!(grid.samples(), 2001);
/// assert_eq!(grid.time(2), 1.0);
/// assert_eq!(grid.end(), 1000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeGrid {
    dt: f64,
    steps: usize,
}

/// Errors returned when constructing a [`TimeGrid`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum TimeGridError {
    #[error("time step must be finite and positive, got {dt}")]
    InvalidStep { dt: f64 },

    #[error("duration must be finite and non-negative, got {duration}")]
    InvalidDuration { duration: f64 },

    #[error("grid of duration {duration} with step {dt} has too many samples")]
    TooManySamples { duration: f64, dt: f64 },
}

impl TimeGrid {
    /// Creates a grid covering `[0, duration]` with step `dt`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dt` is not finite and positive, if `duration` is
    /// not finite and non-negative, or if the sample count overflows `usize`.
    pub fn new(duration: f64, dt: f64) -> Result<Self, TimeGridError> {
        validate_step(dt)?;
        if !duration.is_finite() || duration < 0.0 {
            return Err(TimeGridError::InvalidDuration { duration });
        }

        let ratio = duration / dt;
        let steps = near_integer(ratio).unwrap_or_else(|| ratio.floor());

        if !steps.is_finite() || steps >= usize::MAX as f64 {
            return Err(TimeGridError::TooManySamples { duration, dt });
        }

        let steps = steps as usize;

        Ok(Self { dt, steps })
    }

    /// Creates a grid with an explicit number of steps.
    ///
    /// # Errors
    ///
    /// Returns an error if `dt` is not finite and positive.
    pub fn with_steps(dt: f64, steps: usize) -> Result<Self, TimeGridError> {
        validate_step(dt)?;
        Ok(Self { dt, steps })
    }

    /// Returns the step size.
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the number of steps between the first and last sample.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns the number of samples, `steps + 1`.
    #[must_use]
    pub fn samples(&self) -> usize {
        self.steps + 1
    }

    /// Returns the time of sample `index`.
    ///
    /// The index is not bounds checked; times past the end are extrapolated.
    #[must_use]
    pub fn time(&self, index: usize) -> f64 {
        index as f64 * self.dt
    }

    /// Returns the time of the last sample.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.time(self.steps)
    }

    /// Returns the index of the first sample at or after time `t`.
    ///
    /// A time within rounding of a sample time maps to that sample. Times at
    /// or before zero map to index 0. The index is not clamped to the grid.
    #[must_use]
    pub fn first_index_at_or_after(&self, t: f64) -> usize {
        if t.is_nan() || t <= 0.0 {
            return 0;
        }
        let ratio = t / self.dt;
        near_integer(ratio).unwrap_or_else(|| ratio.ceil()) as usize
    }

    /// Returns an iterator over every sample time.
    pub fn times(&self) -> impl Iterator<Item = f64> + use<> {
        let grid = *self;
        (0..=grid.steps).map(move |index| grid.time(index))
    }
}

/// Returns the integer nearest to `ratio` if it lies within rounding of it.
fn near_integer(ratio: f64) -> Option<f64> {
    let nearest = ratio.round();
    ((ratio - nearest).abs() <= INTEGER_RATIO_TOLERANCE * nearest.max(1.0)).then_some(nearest)
}

fn validate_step(dt: f64) -> Result<(), TimeGridError> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(TimeGridError::InvalidStep { dt })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn sample_counts_match_arange() {
        let cases = [
            (0.100, 0.00002, 5001),
            (1000.0, 0.5, 2001),
            (400.0, 0.01, 40001),
            (400.0, 0.1, 4001),
        ];

        for (duration, dt, expected) in cases {
            let grid = TimeGrid::new(duration, dt).unwrap();
            assert_eq!(grid.samples(), expected, "duration={duration}, dt={dt}");
        }
    }

    #[test]
    fn partial_final_step_is_dropped() {
        let grid = TimeGrid::new(1.05, 0.5).unwrap();

        assert_eq!(grid.steps(), 2);
        assert_relative_eq!(grid.end(), 1.0);
    }

    #[test]
    fn zero_duration_has_single_sample() {
        let grid = TimeGrid::new(0.0, 0.1).unwrap();

        assert_eq!(grid.samples(), 1);
        assert_eq!(grid.times().collect::<Vec<_>>(), vec![0.0]);
    }

    #[test]
    fn times_are_uniform_and_increasing() {
        let grid = TimeGrid::new(400.0, 0.1).unwrap();
        let times: Vec<f64> = grid.times().collect();

        assert_eq!(times.len(), grid.samples());
        assert_eq!(times[0], 0.0);
        for pair in times.windows(2) {
            assert!(pair[1] > pair[0]);
            assert_relative_eq!(pair[1] - pair[0], 0.1, max_relative = 1e-9);
        }
        assert_relative_eq!(*times.last().unwrap(), 400.0);
    }

    #[test]
    fn rejects_bad_step() {
        for dt in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                TimeGrid::new(1.0, dt),
                Err(TimeGridError::InvalidStep { .. })
            ));
        }
        assert!(TimeGrid::with_steps(0.0, 10).is_err());
    }

    #[test]
    fn rejects_bad_duration() {
        for duration in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                TimeGrid::new(duration, 0.1),
                Err(TimeGridError::InvalidDuration { .. })
            ));
        }
    }

    #[test]
    fn first_index_at_or_after_rounds_up_between_samples() {
        let coarse = TimeGrid::new(400.0, 0.1).unwrap();
        let fine = TimeGrid::new(400.0, 0.01).unwrap();

        assert_eq!(coarse.first_index_at_or_after(40.0), 400);
        assert_eq!(coarse.first_index_at_or_after(300.0), 3000);
        assert_eq!(fine.first_index_at_or_after(40.0), 4000);
        assert_eq!(fine.first_index_at_or_after(300.0), 30000);
        assert_eq!(coarse.first_index_at_or_after(40.05), 401);
        assert_eq!(coarse.first_index_at_or_after(-3.0), 0);
        assert_eq!(coarse.first_index_at_or_after(500.0), 5000);
    }

    #[test]
    fn with_steps_sets_count_directly() {
        let grid = TimeGrid::with_steps(0.5, 2000).unwrap();

        assert_eq!(grid, TimeGrid::new(1000.0, 0.5).unwrap());
    }
}
