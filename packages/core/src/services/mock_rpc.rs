//! Scripted fee history provider for tests.
//!
//! Chunk requests are answered from a queue of canned outcomes, in order;
//! once the queue is drained every further request gets `NotFound`.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::history::{
    error::ProviderError,
    provider::{FeeHistoryProvider, ProviderResult},
    types::FetchOutcome,
};

#[derive(Default)]
pub struct MockRpcProvider {
    head: Option<u64>,
    chunks: Mutex<VecDeque<ProviderResult<FetchOutcome>>>,
    timestamps: HashMap<u64, i64>,
    timestamp_error: Option<ProviderError>,
    requested: Mutex<Vec<u64>>,
}

impl MockRpcProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_head(mut self, head: u64) -> Self {
        self.head = Some(head);
        self
    }

    pub fn with_chunk(self, outcome: FetchOutcome) -> Self {
        self.push_chunk(Ok(outcome))
    }

    pub fn with_chunk_error(self, err: ProviderError) -> Self {
        self.push_chunk(Err(err))
    }

    pub fn with_timestamp(mut self, block: u64, timestamp: i64) -> Self {
        self.timestamps.insert(block, timestamp);
        self
    }

    pub fn with_timestamp_error(mut self, err: ProviderError) -> Self {
        self.timestamp_error = Some(err);
        self
    }

    /// `newest_block` of every chunk request so far.
    pub fn requested_newest(&self) -> Vec<u64> {
        self.requested.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn push_chunk(self, outcome: ProviderResult<FetchOutcome>) -> Self {
        if let Ok(mut chunks) = self.chunks.lock() {
            chunks.push_back(outcome);
        }
        self
    }
}

#[async_trait]
impl FeeHistoryProvider for MockRpcProvider {
    async fn latest_block_number(&self) -> ProviderResult<u64> {
        self.head
            .ok_or_else(|| ProviderError::rpc("eth_blockNumber returned no result"))
    }

    async fn block_timestamp(&self, block: u64) -> ProviderResult<Option<i64>> {
        if let Some(err) = &self.timestamp_error {
            return Err(err.clone());
        }
        Ok(self.timestamps.get(&block).copied())
    }

    async fn fee_history_chunk(
        &self,
        _block_count: u64,
        newest_block: u64,
        _reward_percentile: u8,
    ) -> ProviderResult<FetchOutcome> {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(newest_block);
        }

        self.chunks
            .lock()
            .ok()
            .and_then(|mut chunks| chunks.pop_front())
            .unwrap_or(Ok(FetchOutcome::NotFound))
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
