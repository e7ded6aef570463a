//! Data-provider abstraction for the series a session tracks.

use std::sync::Arc;

use async_trait::async_trait;
use probewire_types::{ProbewireError, SessionId};

use crate::connector::TelemetryProvider;
use crate::timeseries::Series;

/// Supplies the channel series a session should poll.
///
/// How the series are populated (remote chart, recorded file, synthetic) is
/// up to the implementation. `api` is the session's own rate-limited handle;
/// sources that fetch remotely must go through it.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Load the channels to track for `session_id`.
    async fn load(
        &self,
        session_id: &SessionId,
        api: &dyn TelemetryProvider,
    ) -> Result<Vec<Series>, ProbewireError>;
}

/// Source that hands every session the same fixed set of series.
#[derive(Debug, Clone, Default)]
pub struct StaticSeriesSource {
    series: Arc<[Series]>,
}

impl StaticSeriesSource {
    /// Serve `series` to every session.
    pub fn new(series: impl Into<Arc<[Series]>>) -> Self {
        Self {
            series: series.into(),
        }
    }
}

#[async_trait]
impl SeriesSource for StaticSeriesSource {
    async fn load(
        &self,
        _session_id: &SessionId,
        _api: &dyn TelemetryProvider,
    ) -> Result<Vec<Series>, ProbewireError> {
        Ok(self.series.to_vec())
    }
}

/// Source that fetches the chart history of one recorded remote session.
///
/// Disabled channels are skipped.
#[derive(Debug, Clone, Copy)]
pub struct ChartSeriesSource {
    remote_session_id: u64,
}

impl ChartSeriesSource {
    /// Track the channels of remote session `remote_session_id`.
    #[must_use]
    pub const fn new(remote_session_id: u64) -> Self {
        Self { remote_session_id }
    }
}

#[async_trait]
impl SeriesSource for ChartSeriesSource {
    async fn load(
        &self,
        session_id: &SessionId,
        api: &dyn TelemetryProvider,
    ) -> Result<Vec<Series>, ProbewireError> {
        let charts = api.session_chart(self.remote_session_id).await?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            session_id = %session_id,
            remote_session = self.remote_session_id,
            channels = charts.len(),
            "loaded session chart"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = session_id;
        charts
            .iter()
            .filter(|c| c.enabled)
            .map(Series::from_chart)
            .collect()
    }
}
