//! In-memory hourly bucket store.
//!
//! `HourBucketStore` maps hour-aligned Unix timestamps to running fee
//! sums. Buckets are created on the first sample that falls into their
//! hour and live until the store is dropped. Keys are ordered, so
//! iteration is always oldest hour first.

use std::collections::BTreeMap;

use crate::history::types::{hour_bucket, HourBucket};

#[derive(Debug, Default)]
pub struct HourBucketStore {
    buckets: BTreeMap<i64, HourBucket>,
}

impl HourBucketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sampled block observed at `timestamp`.
    pub fn record(&mut self, timestamp: i64, base_fee_wei: u128, tip_wei: u128) {
        self.buckets
            .entry(hour_bucket(timestamp))
            .or_default()
            .record(base_fee_wei, tip_wei);
    }

    /// Bucket for the hour starting at `hour_epoch`, if any sample landed there.
    pub fn get(&self, hour_epoch: i64) -> Option<&HourBucket> {
        self.buckets.get(&hour_epoch)
    }

    /// Buckets in ascending hour order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &HourBucket)> {
        self.buckets.iter().map(|(hour, bucket)| (*hour, bucket))
    }

    /// Number of distinct hours held.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// `true` when no sample has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of samples across all buckets.
    pub fn sample_count(&self) -> u64 {
        self.buckets.values().map(|bucket| bucket.count).sum()
    }
}
