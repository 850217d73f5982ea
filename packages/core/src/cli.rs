use std::path::PathBuf;

use clap::Parser;

/// Hourly fee report CLI arguments.
///
/// Every flag is optional; anything left unset falls back to the
/// environment and then to the built-in defaults.
#[derive(Debug, Default, Parser)]
#[command(
    name = "hourly-fee-report",
    version,
    about = "Hourly base fee and priority fee averages over the trailing 24 hours"
)]
pub struct Cli {
    /// JSON-RPC endpoint of the chain node
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Path of the CSV file to write
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Blocks requested per eth_feeHistory call
    #[arg(long)]
    pub blocks_per_chunk: Option<u64>,

    /// Stop paging once this many hours are covered
    #[arg(long)]
    pub target_hours: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Pause between successive fee history requests, in milliseconds
    #[arg(long)]
    pub chunk_delay_ms: Option<u64>,
}
