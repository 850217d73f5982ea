//! JSON-RPC Fee History Provider Adapter
//!
//! Adapts the RpcClient to implement the FeeHistoryProvider trait

use async_trait::async_trait;

use crate::history::{
    error::ProviderError,
    provider::{FeeHistoryProvider, ProviderResult},
    types::{FeeHistorySegment, FetchOutcome},
};
use crate::services::rpc::{parse_quantity, parse_quantity_u64, RpcClient, RpcFeeHistory};

/// Adapter that implements FeeHistoryProvider for RpcClient
pub struct RpcFeeHistoryProvider {
    client: RpcClient,
}

impl RpcFeeHistoryProvider {
    pub fn new(client: RpcClient) -> Self {
        Self { client }
    }

    /// Decode a raw fee history result. A result without rewarded blocks
    /// is reported as `Empty`.
    fn convert_fee_history(raw: RpcFeeHistory) -> ProviderResult<FetchOutcome> {
        if raw.reward.is_empty() {
            return Ok(FetchOutcome::Empty);
        }

        let oldest_block = parse_quantity_u64(&raw.oldest_block)?;

        let base_fee_per_gas = raw
            .base_fee_per_gas
            .iter()
            .map(|hex| parse_quantity(hex))
            .collect::<Result<Vec<_>, _>>()?;

        let reward = raw
            .reward
            .iter()
            .map(|entry| {
                entry
                    .as_ref()
                    .map(|percentiles| {
                        percentiles
                            .iter()
                            .map(|hex| parse_quantity(hex))
                            .collect::<Result<Vec<_>, _>>()
                    })
                    .transpose()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let segment = FeeHistorySegment::try_new(oldest_block, base_fee_per_gas, reward)?;
        Ok(FetchOutcome::Segment(segment))
    }
}

#[async_trait]
impl FeeHistoryProvider for RpcFeeHistoryProvider {
    async fn latest_block_number(&self) -> ProviderResult<u64> {
        Ok(self.client.block_number().await?)
    }

    async fn block_timestamp(&self, block: u64) -> ProviderResult<Option<i64>> {
        let timestamp = self.client.block_timestamp(block).await?;

        timestamp
            .map(|ts| {
                i64::try_from(ts).map_err(|_| {
                    ProviderError::format(format!("timestamp {} of block {} out of range", ts, block))
                })
            })
            .transpose()
    }

    async fn fee_history_chunk(
        &self,
        block_count: u64,
        newest_block: u64,
        reward_percentile: u8,
    ) -> ProviderResult<FetchOutcome> {
        let raw = self
            .client
            .fee_history(block_count, newest_block, &[reward_percentile])
            .await?;

        match raw {
            Some(raw) => Self::convert_fee_history(raw),
            None => Ok(FetchOutcome::NotFound),
        }
    }

    fn provider_name(&self) -> &str {
        self.client.url()
    }
}
