use probewire_core::ChartData;

/// Id of the recorded session served by the mock provider.
pub const RECORDED_SESSION_ID: u64 = 9_366_593;

/// Recorded chart of a short cook, timestamps in epoch milliseconds.
pub const RECORDED_SESSION_JSON: &str = r##"[
  {
    "label": "Pit",
    "channel_id": 1,
    "device": "a3c9e2f0-smoker",
    "degreetype": 2,
    "color": "#e53935",
    "enabled": true,
    "x": [1700000000000, 1700000005000, 1700000010000, 1700000015000, 1700000020000],
    "y": [212.0, 218.5, 223.1, 225.4, 226.0]
  },
  {
    "label": "Brisket",
    "channel_id": 2,
    "device": "a3c9e2f0-smoker",
    "degreetype": 2,
    "color": "#1e88e5",
    "enabled": true,
    "x": [1700000005000, 1700000015000, 1700000025000],
    "y": [41.2, 44.8, 49.9]
  }
]"##;

pub fn by_session(id: u64) -> Option<Vec<ChartData>> {
    if id != RECORDED_SESSION_ID {
        return None;
    }
    serde_json::from_str(RECORDED_SESSION_JSON).ok()
}
