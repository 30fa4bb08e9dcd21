//! Synthetic block-number → wall-clock mapping.
//!
//! The indexer reports votes by block number only. To place them on a
//! time axis we extrapolate linearly from one anchor block whose mining
//! time is known, using the network's average block cadence. Real block
//! times drift around that average, so the result is an approximation —
//! fine for hourly bucketing, not for anything finer.

use chrono::{DateTime, Duration, Utc};

use crate::types::BlockTimeSample;

/// One estimated timestamp per block in `[start_block, end_block)`.
///
/// `utc_time(b) = anchor_time + seconds_per_block × (b − start_block)`,
/// evaluated at millisecond resolution so consecutive samples are spaced
/// by exactly the same step. The caller supplies `seconds_per_block`
/// from the network policy table.
pub fn interpolate(
    start_block: u64,
    end_block: u64,
    anchor_time: DateTime<Utc>,
    seconds_per_block: f64,
) -> Vec<BlockTimeSample> {
    let step_ms = (seconds_per_block * 1000.0).round() as i64;

    (start_block..end_block)
        .map(|block_number| BlockTimeSample {
            block_number,
            utc_time: anchor_time
                + Duration::milliseconds(step_ms * (block_number - start_block) as i64),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 4, 25, 12, 13, 35).unwrap()
    }

    #[test]
    fn end_is_exclusive_and_anchor_exact() {
        let samples = interpolate(100, 103, anchor(), 2.0);
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].block_number, 100);
        assert_eq!(samples[0].utc_time, anchor());
        assert_eq!(samples[1].utc_time, anchor() + Duration::seconds(2));
        assert_eq!(samples[2].utc_time, anchor() + Duration::seconds(4));
    }

    #[test]
    fn consecutive_samples_share_one_step() {
        let samples = interpolate(17_123_133, 17_123_633, anchor(), 12.133);
        let step = Duration::milliseconds(12_133);
        for pair in samples.windows(2) {
            assert_eq!(pair[1].utc_time - pair[0].utc_time, step);
            assert_eq!(pair[1].block_number, pair[0].block_number + 1);
        }
    }

    #[test]
    fn times_strictly_increase_with_block_number() {
        let samples = interpolate(10, 60, anchor(), 2.0);
        for pair in samples.windows(2) {
            assert!(pair[1].utc_time > pair[0].utc_time);
        }
    }

    #[test]
    fn empty_range_yields_no_samples() {
        assert!(interpolate(100, 100, anchor(), 2.0).is_empty());
    }
}
