//! Hourly aggregation of fee history segments.

use crate::history::types::{FeeHistorySegment, SECONDS_PER_HOUR};
use crate::store::HourBucketStore;

/// Assumed block time when a segment's endpoint timestamps give no usable span.
pub const FALLBACK_BLOCK_TIME_SECONDS: i64 = 2;

/// Accumulated state of one run: the buckets plus the two timestamp
/// anchors that define coverage and the reporting window.
#[derive(Debug, Default)]
pub struct HourlyAggregator {
    buckets: HourBucketStore,
    latest_anchor: Option<i64>,
    oldest_seen: Option<i64>,
}

impl HourlyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold every sampled block of `segment` into the hour buckets and
    /// return the coverage in hours after this segment.
    ///
    /// The first call fixes the latest anchor to `ts_newest`; later calls
    /// only move the oldest anchor, and only backward.
    pub fn ingest_segment(
        &mut self,
        segment: &FeeHistorySegment,
        ts_oldest: i64,
        ts_newest: i64,
    ) -> f64 {
        self.latest_anchor.get_or_insert(ts_newest);
        self.oldest_seen = Some(match self.oldest_seen {
            Some(seen) => seen.min(ts_oldest),
            None => ts_oldest,
        });

        let samples = segment.len();
        for index in 0..samples {
            let timestamp = interpolate_timestamp(index, samples, ts_oldest, ts_newest);
            self.buckets
                .record(timestamp, segment.base_fee(index), segment.tip(index));
        }

        self.coverage_hours()
    }

    /// Hours between the latest anchor and the oldest timestamp seen.
    pub fn coverage_hours(&self) -> f64 {
        match (self.latest_anchor, self.oldest_seen) {
            (Some(latest), Some(oldest)) => (latest - oldest) as f64 / SECONDS_PER_HOUR as f64,
            _ => 0.0,
        }
    }

    /// Timestamp of the first segment's newest block.
    pub fn latest_anchor(&self) -> Option<i64> {
        self.latest_anchor
    }

    pub fn oldest_seen(&self) -> Option<i64> {
        self.oldest_seen
    }

    pub fn buckets(&self) -> &HourBucketStore {
        &self.buckets
    }
}

/// Estimate the timestamp of sample `index` out of `samples` by spreading
/// the samples evenly between `ts_oldest` and `ts_newest`.
///
/// A non-positive span falls back to `FALLBACK_BLOCK_TIME_SECONDS` per block.
pub fn interpolate_timestamp(index: usize, samples: usize, ts_oldest: i64, ts_newest: i64) -> i64 {
    if samples <= 1 {
        return ts_oldest;
    }

    let steps = (samples - 1) as i64;
    let mut span = ts_newest - ts_oldest;
    if span <= 0 {
        span = FALLBACK_BLOCK_TIME_SECONDS * steps;
    }

    ts_oldest + (index as i64 * span) / steps
}

#[cfg(test)]
mod tests {
    use super::*;

    const GWEI: u128 = 1_000_000_000;

    fn segment(oldest_block: u64, base_gwei: &[u128], tips_gwei: &[u128]) -> FeeHistorySegment {
        FeeHistorySegment::try_new(
            oldest_block,
            base_gwei.iter().map(|b| b * GWEI).collect(),
            tips_gwei.iter().map(|t| Some(vec![t * GWEI])).collect(),
        )
        .unwrap()
    }

    // ---- interpolate_timestamp ----

    #[test]
    fn single_sample_takes_oldest_timestamp() {
        assert_eq!(interpolate_timestamp(0, 1, 1_000, 5_000), 1_000);
    }

    #[test]
    fn endpoints_map_to_segment_timestamps() {
        assert_eq!(interpolate_timestamp(0, 1024, 1_000, 3_046), 1_000);
        assert_eq!(interpolate_timestamp(1023, 1024, 1_000, 3_046), 3_046);
    }

    #[test]
    fn intermediate_samples_are_floored() {
        // span 10 over 3 steps: 0, 3.33, 6.67, 10
        let stamps: Vec<i64> = (0..4).map(|i| interpolate_timestamp(i, 4, 100, 110)).collect();
        assert_eq!(stamps, vec![100, 103, 106, 110]);
    }

    #[test]
    fn non_positive_span_uses_fallback_block_time() {
        assert_eq!(interpolate_timestamp(3, 4, 500, 500), 506);
        assert_eq!(interpolate_timestamp(3, 4, 500, 400), 506);
    }

    // ---- ingest_segment ----

    #[test]
    fn two_blocks_in_one_hour_average_together() {
        let mut aggregator = HourlyAggregator::new();
        aggregator.ingest_segment(&segment(100, &[30, 32, 34], &[2, 3]), 1_000, 1_010);

        let bucket = aggregator.buckets().get(0).unwrap();
        assert_eq!(bucket.count, 2);
        assert_eq!(bucket.avg_base_fee(), 31.0);
        assert_eq!(bucket.avg_tip(), 2.5);
        assert_eq!(bucket.avg_gas_price(), 33.5);
    }

    #[test]
    fn latest_anchor_is_fixed_by_first_segment() {
        let mut aggregator = HourlyAggregator::new();
        aggregator.ingest_segment(&segment(10, &[1, 1, 1], &[0, 0]), 9_000, 10_000);
        aggregator.ingest_segment(&segment(8, &[1, 1, 1], &[0, 0]), 8_000, 20_000);

        assert_eq!(aggregator.latest_anchor(), Some(10_000));
    }

    #[test]
    fn oldest_anchor_keeps_the_minimum() {
        let mut aggregator = HourlyAggregator::new();
        aggregator.ingest_segment(&segment(10, &[1, 1, 1], &[0, 0]), 9_000, 10_000);
        aggregator.ingest_segment(&segment(8, &[1, 1, 1], &[0, 0]), 5_400, 8_999);
        aggregator.ingest_segment(&segment(6, &[1, 1, 1], &[0, 0]), 7_000, 7_100);

        assert_eq!(aggregator.oldest_seen(), Some(5_400));
        assert_eq!(aggregator.coverage_hours(), (10_000 - 5_400) as f64 / 3_600.0);
    }

    #[test]
    fn ingest_returns_running_coverage() {
        let mut aggregator = HourlyAggregator::new();
        let first = aggregator.ingest_segment(&segment(10, &[1, 1, 1], &[0, 0]), 3_600, 7_200);
        let second = aggregator.ingest_segment(&segment(8, &[1, 1, 1], &[0, 0]), 0, 3_599);

        assert_eq!(first, 1.0);
        assert_eq!(second, 2.0);
    }

    #[test]
    fn segment_spanning_an_hour_boundary_splits_samples() {
        let mut aggregator = HourlyAggregator::new();
        // 4 samples over 3_590..3_620: 3_590, 3_600, 3_610, 3_620
        aggregator.ingest_segment(&segment(1, &[1, 1, 1, 1, 1], &[0, 0, 0, 0]), 3_590, 3_620);

        assert_eq!(aggregator.buckets().get(0).unwrap().count, 1);
        assert_eq!(aggregator.buckets().get(3_600).unwrap().count, 3);
    }

    #[test]
    fn fresh_aggregator_has_no_coverage() {
        let aggregator = HourlyAggregator::new();
        assert_eq!(aggregator.coverage_hours(), 0.0);
        assert!(aggregator.latest_anchor().is_none());
        assert!(aggregator.buckets().is_empty());
    }
}
