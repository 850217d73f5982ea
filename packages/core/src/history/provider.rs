//! Fee History Provider Interface
//!
//! Abstraction over the chain reader so the pager can be driven by a live
//! node or by canned responses.

use async_trait::async_trait;

use crate::history::{error::ProviderError, types::FetchOutcome};

#[async_trait]
pub trait FeeHistoryProvider {
    /// Height of the chain head.
    async fn latest_block_number(&self) -> ProviderResult<u64>;

    /// Unix timestamp of `block`, or `None` when the node has no such block
    /// or the block carries no timestamp.
    async fn block_timestamp(&self, block: u64) -> ProviderResult<Option<i64>>;

    /// Fee history for `block_count` blocks ending at `newest_block`,
    /// sampling the given reward percentile.
    async fn fee_history_chunk(
        &self,
        block_count: u64,
        newest_block: u64,
        reward_percentile: u8,
    ) -> ProviderResult<FetchOutcome>;

    /// Get the name of this provider for logging/debugging
    fn provider_name(&self) -> &str;
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;
