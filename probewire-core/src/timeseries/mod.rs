//! Time-indexed channel series and point-in-time lookup.
//!
//! Modules include:
//! - `search`: binary search for the last sample at or before an instant
//! - `rebase`: shift recorded series onto a new time origin for replay
/// Shift helpers for replaying recorded series relative to "now".
pub mod rebase;
/// Binary search over sorted timestamps.
pub mod search;

use probewire_types::{ChartData, ProbewireError};
use serde::Serialize;

use self::search::last_at_or_before;

/// Ordered `(timestamp, value)` history of one telemetry channel.
///
/// Timestamps are epoch milliseconds and never decrease; equal timestamps are
/// kept in insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Series {
    label: String,
    timestamps: Vec<i64>,
    values: Vec<f64>,
}

impl Series {
    /// Build a series from `(timestamp, value)` samples.
    ///
    /// # Errors
    /// Returns `ProbewireError::Data` if the timestamps are not sorted ascending.
    pub fn new(
        label: impl Into<String>,
        samples: impl IntoIterator<Item = (i64, f64)>,
    ) -> Result<Self, ProbewireError> {
        let (timestamps, values): (Vec<i64>, Vec<f64>) = samples.into_iter().unzip();
        Self::from_parts(label.into(), timestamps, values)
    }

    /// Build a series from a remote chart payload.
    ///
    /// # Errors
    /// Returns `ProbewireError::Data` if `x` and `y` differ in length or `x`
    /// is not sorted ascending.
    pub fn from_chart(chart: &ChartData) -> Result<Self, ProbewireError> {
        if chart.x.len() != chart.y.len() {
            return Err(ProbewireError::Data(format!(
                "chart '{}' has {} timestamps but {} values",
                chart.label,
                chart.x.len(),
                chart.y.len()
            )));
        }
        Self::from_parts(chart.label.clone(), chart.x.clone(), chart.y.clone())
    }

    fn from_parts(
        label: String,
        timestamps: Vec<i64>,
        values: Vec<f64>,
    ) -> Result<Self, ProbewireError> {
        if let Some(pos) = timestamps.windows(2).position(|w| w[1] < w[0]) {
            return Err(ProbewireError::Data(format!(
                "series '{label}' is not sorted: timestamp {} follows {} at index {}",
                timestamps[pos + 1],
                timestamps[pos],
                pos + 1
            )));
        }
        Ok(Self {
            label,
            timestamps,
            values,
        })
    }

    /// Channel label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Sorted sample timestamps.
    #[must_use]
    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    /// Sample values aligned with [`timestamps`](Self::timestamps).
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// True if the series holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Earliest timestamp, if any.
    #[must_use]
    pub fn first_timestamp(&self) -> Option<i64> {
        self.timestamps.first().copied()
    }

    /// Iterate samples in order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Value active at `instant`. See [`sample_at`].
    #[must_use]
    pub fn sample_at(&self, instant: i64) -> Option<f64> {
        sample_at(self, instant)
    }
}

/// Value of the last sample whose timestamp is `<= instant`.
///
/// Returns `None` when `instant` precedes the first sample (or the series is
/// empty). Among equal timestamps the most recently appended sample wins.
/// Runs in `O(log n)`.
///
/// ```
/// use probewire_core::timeseries::{Series, sample_at};
///
/// let s = Series::new("Pit", [(0, 10.0), (5, 20.0), (10, 30.0)]).unwrap();
/// assert_eq!(sample_at(&s, 7), Some(20.0));
/// assert_eq!(sample_at(&s, 10), Some(30.0));
/// assert_eq!(sample_at(&s, -1), None);
/// ```
#[must_use]
pub fn sample_at(series: &Series, instant: i64) -> Option<f64> {
    last_at_or_before(&series.timestamps, &instant).map(|idx| series.values[idx])
}
