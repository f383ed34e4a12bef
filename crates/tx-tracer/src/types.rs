use std::path::PathBuf;

use alloy::primitives::ruint::ParseError;
use clients::EthError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NOT_FOUND_MESSAGE: &str = "Transaction not found or traces unavailable";

base::stack_error! {
    #[derive(Debug)]
    name: TraceError,
    stack_name: TraceErrorStack,
    error: {
        MissingBlockNumber,
        BlockNotFound { number: String },
        MissingTimestamp { number: String },
        InvalidTimestamp { value: String, reason: Option<ParseError> },
    },
    wrap: {
        Eth(EthError),
        Io(std::io::Error),
        Json(serde_json::Error),
    },
    stack: {
        OnWriteOutput(path: PathBuf),
    }
}

/// A transaction's traces together with the timestamp of its block.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedResult {
    /// Exactly as the caller passed it.
    pub transaction_hash: String,
    /// Hex, as reported in the first trace entry.
    pub block_number: String,
    /// Seconds since the unix epoch.
    pub timestamp: u64,
    pub traces: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotFound {
    pub error: String,
}

impl Default for NotFound {
    fn default() -> Self {
        Self {
            error: NOT_FOUND_MESSAGE.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FetchOutcome {
    Found(CombinedResult),
    NotFound(NotFound),
}

impl FetchOutcome {
    pub fn found(&self) -> Option<&CombinedResult> {
        match self {
            Self::Found(result) => Some(result),
            Self::NotFound(_) => None,
        }
    }

    pub fn into_found(self) -> Option<CombinedResult> {
        match self {
            Self::Found(result) => Some(result),
            Self::NotFound(_) => None,
        }
    }
}
