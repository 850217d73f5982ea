use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::history::PagingConfig;

pub const DEFAULT_RPC_URL: &str = "https://polygon-rpc.com";
pub const DEFAULT_OUTPUT_CSV: &str = "polygon_hourly_fee_24h.csv";
pub const DEFAULT_BLOCKS_PER_CHUNK: u64 = 1024;
pub const DEFAULT_TARGET_HOURS: u64 = 24;
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_CHUNK_DELAY_MILLIS: u64 = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub output_path: PathBuf,
    pub blocks_per_chunk: u64,
    pub target_hours: u64,
    pub request_timeout_seconds: u64,
    pub chunk_delay_millis: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_CSV),
            blocks_per_chunk: DEFAULT_BLOCKS_PER_CHUNK,
            target_hours: DEFAULT_TARGET_HOURS,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            chunk_delay_millis: DEFAULT_CHUNK_DELAY_MILLIS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset keys keep their
    /// defaults; set keys must parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("RPC_URL") {
            config.rpc_url = url;
        }
        if let Some(path) = lookup("OUTPUT_CSV") {
            config.output_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup("BLOCKS_PER_CHUNK") {
            config.blocks_per_chunk = parse_number("BLOCKS_PER_CHUNK", &raw)?;
        }
        if let Some(raw) = lookup("TARGET_HOURS") {
            config.target_hours = parse_number("TARGET_HOURS", &raw)?;
        }
        if let Some(raw) = lookup("REQUEST_TIMEOUT_SECONDS") {
            config.request_timeout_seconds = parse_number("REQUEST_TIMEOUT_SECONDS", &raw)?;
        }
        if let Some(raw) = lookup("CHUNK_DELAY_MILLIS") {
            config.chunk_delay_millis = parse_number("CHUNK_DELAY_MILLIS", &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Command-line flags take precedence over the environment.
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Result<Self, String> {
        if let Some(url) = &cli.rpc_url {
            self.rpc_url = url.clone();
        }
        if let Some(path) = &cli.output {
            self.output_path = path.clone();
        }
        if let Some(blocks) = cli.blocks_per_chunk {
            self.blocks_per_chunk = blocks;
        }
        if let Some(hours) = cli.target_hours {
            self.target_hours = hours;
        }
        if let Some(timeout) = cli.timeout {
            self.request_timeout_seconds = timeout;
        }
        if let Some(delay) = cli.chunk_delay_ms {
            self.chunk_delay_millis = delay;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn paging(&self) -> PagingConfig {
        PagingConfig {
            blocks_per_chunk: self.blocks_per_chunk,
            target_hours: self.target_hours,
            chunk_delay: Duration::from_millis(self.chunk_delay_millis),
            ..PagingConfig::default()
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.rpc_url.trim().is_empty() {
            return Err("RPC_URL must not be empty".to_string());
        }
        if self.blocks_per_chunk == 0 {
            return Err("BLOCKS_PER_CHUNK must be greater than zero".to_string());
        }
        if self.target_hours == 0 {
            return Err("TARGET_HOURS must be greater than zero".to_string());
        }
        Ok(())
    }
}

fn parse_number(key: &str, raw: &str) -> Result<u64, String> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| format!("{} must be a valid number", key))
}
