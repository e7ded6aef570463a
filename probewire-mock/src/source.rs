use std::path::Path;

use async_trait::async_trait;
use probewire_core::{
    ChartData, ProbewireError, Series, SeriesSource, SessionId, TelemetryProvider, rebase_all,
};

/// Replays a recorded session as if it started now.
///
/// Each `load` converts the recorded charts into series and shifts them so
/// that the earliest sample lands on the current wall-clock millisecond.
#[derive(Debug, Clone)]
pub struct FixtureSeriesSource {
    charts: Vec<ChartData>,
    timestamps_in_seconds: bool,
}

impl FixtureSeriesSource {
    /// Parse a JSON array of chart payloads.
    ///
    /// # Errors
    /// Returns `ProbewireError::Data` if the JSON does not describe charts.
    pub fn from_json(json: &str) -> Result<Self, ProbewireError> {
        let charts: Vec<ChartData> = serde_json::from_str(json)
            .map_err(|e| ProbewireError::Data(format!("invalid chart fixture: {e}")))?;
        Ok(Self {
            charts,
            timestamps_in_seconds: false,
        })
    }

    /// Read and parse a chart fixture file.
    ///
    /// # Errors
    /// Returns `ProbewireError::Data` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProbewireError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ProbewireError::Data(format!("reading {}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// The bundled recorded session.
    ///
    /// # Errors
    /// Returns `ProbewireError::Data` if the bundled fixture fails to parse.
    pub fn recorded() -> Result<Self, ProbewireError> {
        Self::from_json(crate::RECORDED_SESSION_JSON)
    }

    /// Treat chart timestamps as epoch seconds rather than milliseconds.
    #[must_use]
    pub fn timestamps_in_seconds(mut self, yes: bool) -> Self {
        self.timestamps_in_seconds = yes;
        self
    }

    fn series(&self) -> Result<Vec<Series>, ProbewireError> {
        self.charts
            .iter()
            .map(|chart| {
                if self.timestamps_in_seconds {
                    let scaled = ChartData {
                        x: chart.x.iter().map(|s| s.saturating_mul(1000)).collect(),
                        ..chart.clone()
                    };
                    Series::from_chart(&scaled)
                } else {
                    Series::from_chart(chart)
                }
            })
            .collect()
    }
}

#[async_trait]
impl SeriesSource for FixtureSeriesSource {
    async fn load(
        &self,
        _session_id: &SessionId,
        _api: &dyn TelemetryProvider,
    ) -> Result<Vec<Series>, ProbewireError> {
        let mut series = self.series()?;
        rebase_all(&mut series, chrono::Utc::now().timestamp_millis());
        Ok(series)
    }
}
