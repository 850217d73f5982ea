//! Core data types for fee history aggregation

use crate::history::error::ProviderError;

pub const SECONDS_PER_HOUR: i64 = 3600;

const WEI_PER_GWEI: f64 = 1e9;

/// One decoded `eth_feeHistory` result.
///
/// `base_fee_per_gas` carries one more entry than `reward` (the node also
/// reports the base fee of the block after the newest one); only the first
/// `reward.len()` base fees are sampled.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeHistorySegment {
    pub oldest_block: u64,
    pub base_fee_per_gas: Vec<u128>,
    pub reward: Vec<Option<Vec<u128>>>,
}

impl FeeHistorySegment {
    /// Build a segment, rejecting one that lacks a base fee for any
    /// rewarded block.
    pub fn try_new(
        oldest_block: u64,
        base_fee_per_gas: Vec<u128>,
        reward: Vec<Option<Vec<u128>>>,
    ) -> Result<Self, ProviderError> {
        if base_fee_per_gas.len() < reward.len() {
            return Err(ProviderError::format(format!(
                "{} base fees for {} rewarded blocks",
                base_fee_per_gas.len(),
                reward.len()
            )));
        }

        Ok(Self {
            oldest_block,
            base_fee_per_gas,
            reward,
        })
    }

    /// Number of sampled blocks.
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reward.is_empty()
    }

    pub fn newest_block(&self) -> u64 {
        self.oldest_block + (self.len().saturating_sub(1) as u64)
    }

    pub fn base_fee(&self, index: usize) -> u128 {
        self.base_fee_per_gas[index]
    }

    /// First requested percentile, or zero when the node reported no
    /// reward for the block.
    pub fn tip(&self, index: usize) -> u128 {
        self.reward[index]
            .as_ref()
            .and_then(|percentiles| percentiles.first().copied())
            .unwrap_or(0)
    }
}

/// Result of one chunk request.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Segment(FeeHistorySegment),
    /// The node returned no result.
    NotFound,
    /// The node returned a result with no rewarded blocks.
    Empty,
}

/// Running sums for one hour, in gwei.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourBucket {
    pub count: u64,
    pub base_fee_sum: f64,
    pub tip_sum: f64,
    pub gas_price_sum: f64,
}

impl HourBucket {
    pub fn record(&mut self, base_fee_wei: u128, tip_wei: u128) {
        self.count += 1;
        self.base_fee_sum += wei_to_gwei(base_fee_wei);
        self.tip_sum += wei_to_gwei(tip_wei);
        self.gas_price_sum += wei_to_gwei(base_fee_wei.saturating_add(tip_wei));
    }

    pub fn avg_base_fee(&self) -> f64 {
        self.average(self.base_fee_sum)
    }

    pub fn avg_tip(&self) -> f64 {
        self.average(self.tip_sum)
    }

    pub fn avg_gas_price(&self) -> f64 {
        self.average(self.gas_price_sum)
    }

    fn average(&self, sum: f64) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            sum / self.count as f64
        }
    }
}

pub fn wei_to_gwei(wei: u128) -> f64 {
    wei as f64 / WEI_PER_GWEI
}

/// Floor a Unix timestamp to the start of its hour.
pub fn hour_bucket(timestamp: i64) -> i64 {
    timestamp.div_euclid(SECONDS_PER_HOUR) * SECONDS_PER_HOUR
}
