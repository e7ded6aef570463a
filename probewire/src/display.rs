//! Plain-text rendering of snapshots for a watch-face text wall.

use probewire_core::Snapshot;

/// Shown in place of readings when a snapshot tracks no channel.
pub const NO_DATA: &str = "No temperature data available.";

/// Render one `label: value°F` line per reading, value rounded to one
/// decimal, `--` when the channel had no sample yet.
#[must_use]
pub fn render_text_wall(snapshot: &Snapshot) -> String {
    if snapshot.readings.is_empty() {
        return NO_DATA.to_string();
    }
    snapshot
        .readings
        .iter()
        .map(|reading| match reading.value {
            Some(v) => format!("{}: {v:.1}°F", reading.label),
            None => format!("{}: --", reading.label),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use probewire_core::{Reading, SessionId};

    fn snapshot(readings: Vec<Reading>) -> Snapshot {
        Snapshot {
            session_id: SessionId::from("s1"),
            taken_at: Utc::now(),
            readings,
        }
    }

    #[test]
    fn empty_snapshot_renders_placeholder() {
        assert_eq!(render_text_wall(&snapshot(vec![])), NO_DATA);
    }

    #[test]
    fn readings_render_one_line_each() {
        let s = snapshot(vec![
            Reading::new("Pit", Some(225.04)),
            Reading::new("Brisket", None),
            Reading::new("Probe 3", Some(161.96)),
        ]);
        assert_eq!(
            render_text_wall(&s),
            "Pit: 225.0°F\nBrisket: --\nProbe 3: 162.0°F"
        );
    }
}
