//! First-tick jitter.

use std::time::Duration;

use rand::Rng;

/// Delay before the first tick: `interval` plus a random share of up to
/// `jitter_percent` of it.
pub fn first_tick_delay(interval: Duration, jitter_percent: u8) -> Duration {
    if jitter_percent == 0 {
        return interval;
    }
    let base_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
    let jitter_range = std::cmp::max(1, base_ms.saturating_mul(u64::from(jitter_percent)) / 100);
    let mut rng = rand::rng();
    interval.saturating_add(Duration::from_millis(rng.random_range(0..jitter_range)))
}
