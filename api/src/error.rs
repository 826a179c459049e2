//! The error taxonomy shared by every outbound call the dashboard makes.

use thiserror::Error;

/// Failure of a chain, indexer, or decoding step.
///
/// Errors carry rendered messages rather than source errors so they can be
/// cloned into reactive UI state and compared in tests.
#[derive(Error, Debug, Clone, PartialEq, Eq, strum::EnumIs)]
pub enum DashboardError {
    /// The HTTP transport failed, or the endpoint returned a non-success status.
    #[error("network error: {0}")]
    Network(String),
    /// The node answered, but the contract read itself failed or reverted.
    #[error("contract read failed: {0}")]
    ContractRead(String),
    /// The indexing service reported an error or has no matching record.
    #[error("indexer error: {0}")]
    Indexer(String),
    /// A response could not be decoded into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for DashboardError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<alloy_sol_types::Error> for DashboardError {
    fn from(e: alloy_sol_types::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
