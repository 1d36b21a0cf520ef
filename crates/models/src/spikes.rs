use neurosim_core::TimeGrid;
use serde::Serialize;

/// Sample indices of the spike apexes in a trajectory.
///
/// Reset models mark a spike by overwriting the sample before the reset with
/// a fixed marker value. A spike train lists those marked samples, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SpikeTrain {
    indices: Vec<usize>,
}

impl SpikeTrain {
    /// Returns the number of spikes.
    #[must_use]
    pub fn count(&self) -> usize {
        self.indices.len()
    }

    /// Returns the apex sample indices.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Returns the apex times on `grid`.
    pub fn times<'a>(&'a self, grid: &'a TimeGrid) -> impl Iterator<Item = f64> + 'a {
        self.indices.iter().map(|&index| grid.time(index))
    }

    /// Returns `true` if there are no spikes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl From<Vec<usize>> for SpikeTrain {
    fn from(indices: Vec<usize>) -> Self {
        Self { indices }
    }
}

impl FromIterator<usize> for SpikeTrain {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}
