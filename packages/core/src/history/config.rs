//! Configuration for the backward paging loop

use std::time::Duration;

/// Percentile of in-block priority fees requested from `eth_feeHistory`.
pub const REWARD_PERCENTILE: u8 = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct PagingConfig {
    /// Blocks requested per `eth_feeHistory` call.
    pub blocks_per_chunk: u64,
    /// Paging stops once this many hours lie between the first chunk's
    /// newest block and the oldest block seen.
    pub target_hours: u64,
    pub reward_percentile: u8,
    /// Pause between successive chunk requests.
    pub chunk_delay: Duration,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            blocks_per_chunk: 1024,
            target_hours: 24,
            reward_percentile: REWARD_PERCENTILE,
            chunk_delay: Duration::from_millis(100),
        }
    }
}
