//! Request pacing.

use std::time::Duration;

use rand::RngExt;
use tracing::trace;

/// Pause durations in milliseconds, picked uniformly per request.
const PAUSE_STEPS_MS: [u64; 6] = [1000, 1500, 2000, 2500, 3000, 3500];

/// Sleep for a randomized interval between consecutive outbound requests to
/// reduce anti-bot detection risk.
pub async fn pause() {
    let ms = PAUSE_STEPS_MS[rand::rng().random_range(0..PAUSE_STEPS_MS.len())];
    trace!(ms, "pacing pause");
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_match_the_expected_grid() {
        // 1.0s to 3.5s in 0.5s increments.
        assert_eq!(PAUSE_STEPS_MS.len(), 6);
        for pair in PAUSE_STEPS_MS.windows(2) {
            assert_eq!(pair[1] - pair[0], 500);
        }
        assert_eq!(PAUSE_STEPS_MS[0], 1000);
        assert_eq!(PAUSE_STEPS_MS[5], 3500);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_sleeps_within_bounds() {
        let started = tokio::time::Instant::now();
        pause().await;
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(1000));
        assert!(elapsed <= Duration::from_millis(3500));
    }
}
