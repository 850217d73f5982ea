//! Fee History Module
//!
//! Pages backward through `eth_feeHistory` from the chain head, spreads
//! each chunk's blocks across the chunk's wall-clock span and folds them
//! into hourly buckets.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod pager;
pub mod provider;
pub mod rpc_adapter;
pub mod types;


pub use aggregator::HourlyAggregator;
pub use config::PagingConfig;
pub use error::ProviderError;
pub use pager::{page_backward, PagingOutcome, StopReason};
pub use provider::{FeeHistoryProvider, ProviderResult};
pub use rpc_adapter::RpcFeeHistoryProvider;
pub use types::*;
