//! Backward paging loop.
//!
//! Starting at the chain head, requests fixed-size fee history chunks
//! going back in time and hands each one to the aggregator until the
//! target coverage is reached or the node stops giving usable data.

use std::fmt;

use tokio::time;

use crate::history::{
    aggregator::HourlyAggregator,
    config::PagingConfig,
    provider::{FeeHistoryProvider, ProviderResult},
    types::FetchOutcome,
};
use crate::services::rpc::to_quantity;

/// Why paging ended.
#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    CoverageReached,
    NotFound,
    EmptySegment,
    FetchFailed(String),
    TimestampMissing,
    /// The last segment started at block 0.
    ReachedGenesis,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::CoverageReached => write!(f, "target coverage reached"),
            StopReason::NotFound => write!(f, "feeHistory returned None"),
            StopReason::EmptySegment => write!(f, "Empty rewards"),
            StopReason::FetchFailed(msg) => write!(f, "feeHistory failed: {}", msg),
            StopReason::TimestampMissing => write!(f, "timestamp missing"),
            StopReason::ReachedGenesis => write!(f, "reached genesis block"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PagingOutcome {
    pub chunks_fetched: usize,
    pub coverage_hours: f64,
    pub stop_reason: StopReason,
}

/// Run the backward paging loop from `head_block`.
///
/// Only a transport or decoding failure on a block timestamp lookup is
/// returned as an error. Every other problem ends paging with a
/// `StopReason` and leaves the aggregator holding whatever was gathered.
pub async fn page_backward(
    provider: &(dyn FeeHistoryProvider + Send + Sync),
    config: &PagingConfig,
    head_block: u64,
    aggregator: &mut HourlyAggregator,
) -> ProviderResult<PagingOutcome> {
    let target_hours = config.target_hours as f64;
    let mut current_newest = head_block;
    let mut chunks_fetched = 0;

    let stop_reason = loop {
        let chunk_index = chunks_fetched + 1;

        let fetched = provider
            .fee_history_chunk(config.blocks_per_chunk, current_newest, config.reward_percentile)
            .await;

        let segment = match fetched {
            Ok(FetchOutcome::Segment(segment)) if !segment.is_empty() => segment,
            Ok(FetchOutcome::Segment(_)) | Ok(FetchOutcome::Empty) => {
                tracing::warn!("Empty rewards; stop");
                break StopReason::EmptySegment;
            }
            Ok(FetchOutcome::NotFound) => {
                tracing::warn!("feeHistory returned None; stop");
                break StopReason::NotFound;
            }
            Err(err) => {
                tracing::warn!("feeHistory request failed ({}); stop", err);
                break StopReason::FetchFailed(err.to_string());
            }
        };

        let seg_oldest = segment.oldest_block;
        let seg_newest = segment.newest_block();

        let ts_oldest = provider.block_timestamp(seg_oldest).await?;
        let ts_newest = provider.block_timestamp(seg_newest).await?;
        let (Some(ts_oldest), Some(ts_newest)) = (ts_oldest, ts_newest) else {
            tracing::warn!("timestamp missing; stop");
            break StopReason::TimestampMissing;
        };

        let covered_hours = aggregator.ingest_segment(&segment, ts_oldest, ts_newest);
        chunks_fetched = chunk_index;

        tracing::info!(
            "chunk {} oldest {} newest {} covered_hours {:.2}",
            chunk_index,
            to_quantity(seg_oldest),
            to_quantity(seg_newest),
            covered_hours
        );

        if covered_hours >= target_hours {
            break StopReason::CoverageReached;
        }

        current_newest = match seg_oldest.checked_sub(1) {
            Some(previous) => previous,
            None => {
                tracing::warn!("reached genesis block; stop");
                break StopReason::ReachedGenesis;
            }
        };

        if !config.chunk_delay.is_zero() {
            time::sleep(config.chunk_delay).await;
        }
    };

    Ok(PagingOutcome {
        chunks_fetched,
        coverage_hours: aggregator.coverage_hours(),
        stop_reason,
    })
}
