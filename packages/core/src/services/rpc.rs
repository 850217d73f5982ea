//! Minimal JSON-RPC 2.0 client for an EVM node.
//!
//! Only the three read calls the fee report needs are wrapped. Hex
//! quantities are decoded here so nothing above this layer sees `0x…`
//! strings.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug)]
pub struct RpcClient {
    url: String,
    http: Client,
    next_id: AtomicU64,
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Debug, Deserialize)]
struct JsonRpcReply<R> {
    result: Option<R>,
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

/// The subset of an `eth_getBlockByNumber` result we read.
#[derive(Debug, Deserialize)]
pub struct RpcBlock {
    pub timestamp: Option<String>,
}

/// Raw `eth_feeHistory` result, still hex-encoded.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcFeeHistory {
    #[serde(rename = "oldestBlock")]
    pub oldest_block: String,

    #[serde(rename = "baseFeePerGas", default)]
    pub base_fee_per_gas: Vec<String>,

    #[serde(default)]
    pub reward: Vec<Option<Vec<String>>>,
}

impl RpcClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Network(err.to_string()))?;

        Ok(Self {
            url: url.into(),
            http,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one JSON-RPC call.
    ///
    /// `Ok(None)` means the node answered but had no `result` for us,
    /// either a null result or a JSON-RPC error object.
    pub async fn call<P, R>(&self, method: &str, params: P) -> Result<Option<R>, AppError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|err| AppError::Network(format!("{} failed: {}", method, err)))?;

        if !response.status().is_success() {
            return Err(AppError::Network(format!(
                "{} returned HTTP {}",
                method,
                response.status()
            )));
        }

        let reply = response
            .json::<JsonRpcReply<R>>()
            .await
            .map_err(|err| AppError::Parse(format!("{} reply: {}", method, err)))?;

        if let Some(error) = reply.error {
            tracing::warn!(
                "{} returned JSON-RPC error {}: {}",
                method,
                error.code,
                error.message
            );
        }

        Ok(reply.result)
    }

    /// `eth_blockNumber`. A missing result is an error: there is no
    /// sensible starting point without it.
    pub async fn block_number(&self) -> Result<u64, AppError> {
        let hex: Option<String> = self.call("eth_blockNumber", Vec::<u8>::new()).await?;
        let hex = hex.ok_or_else(|| AppError::Rpc("eth_blockNumber returned no result".into()))?;
        parse_quantity_u64(&hex)
    }

    /// `eth_getBlockByNumber(block, false)` reduced to the block timestamp.
    pub async fn block_timestamp(&self, block: u64) -> Result<Option<u64>, AppError> {
        let block: Option<RpcBlock> = self
            .call("eth_getBlockByNumber", (to_quantity(block), false))
            .await?;

        match block.and_then(|b| b.timestamp) {
            Some(hex) => parse_quantity_u64(&hex).map(Some),
            None => Ok(None),
        }
    }

    /// `eth_feeHistory(block_count, newest_block, percentiles)`.
    pub async fn fee_history(
        &self,
        block_count: u64,
        newest_block: u64,
        percentiles: &[u8],
    ) -> Result<Option<RpcFeeHistory>, AppError> {
        self.call(
            "eth_feeHistory",
            (to_quantity(block_count), to_quantity(newest_block), percentiles),
        )
        .await
    }
}

/// Encode an integer as a JSON-RPC quantity (`0x` prefix, no leading zeros).
pub fn to_quantity(value: u64) -> String {
    format!("{:#x}", value)
}

/// Decode a JSON-RPC hex quantity.
pub fn parse_quantity(hex: &str) -> Result<u128, AppError> {
    let digits = hex
        .strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .ok_or_else(|| AppError::Parse(format!("quantity without 0x prefix: {:?}", hex)))?;

    u128::from_str_radix(digits, 16)
        .map_err(|err| AppError::Parse(format!("invalid quantity {:?}: {}", hex, err)))
}

pub fn parse_quantity_u64(hex: &str) -> Result<u64, AppError> {
    let value = parse_quantity(hex)?;
    u64::try_from(value).map_err(|_| AppError::Parse(format!("quantity {} overflows u64", hex)))
}
