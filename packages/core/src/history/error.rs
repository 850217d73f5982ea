//! Error types for fee history retrieval

use thiserror::Error;

use crate::error::AppError;

/// Errors from fee history providers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Data format error: {message}")]
    FormatError { message: String },

    #[error("RPC error: {message}")]
    RpcError { message: String },
}

impl ProviderError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError { message: message.into() }
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::FormatError { message: message.into() }
    }

    pub fn rpc(message: impl Into<String>) -> Self {
        Self::RpcError { message: message.into() }
    }
}

impl From<AppError> for ProviderError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Network(message) => Self::network(message),
            AppError::Parse(message) => Self::format(message),
            AppError::Rpc(message) => Self::rpc(message),
            AppError::Provider(inner) => inner,
            other => Self::network(other.to_string()),
        }
    }
}
