//! Transfer requests, outcomes and audit records.

use crate::account::AccountId;
use crate::error::{EngineError, Result};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Unique, monotonically assigned identifier of a transfer attempt.
///
/// Rendered as a plain decimal string at the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(u64);

impl TransactionId {
    pub(crate) fn new(value: u64) -> Self {
        TransactionId(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = EngineError;

    /// Anything that is not a valid id cannot name a recorded transaction.
    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u64>()
            .map(TransactionId)
            .map_err(|_| EngineError::TransactionNotFound(s.to_string()))
    }
}

/// A request to move `amount` from one account to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    pub amount: Money,
}

impl TransferRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: Money) -> Self {
        TransferRequest {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

/// Final status of a transfer attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    Success,
    Failed,
}

impl TransferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Success => "SUCCESS",
            TransferStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a caller gets back from a transfer that reached the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferOutcome {
    pub transaction_id: TransactionId,
    pub status: TransferStatus,
    pub message: String,
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        self.status == TransferStatus::Success
    }

    /// Converts a FAILED outcome into [`EngineError::InsufficientFunds`]
    /// for callers that prefer `?` over inspecting the status.
    pub fn into_result(self, from: &AccountId) -> Result<TransactionId> {
        match self.status {
            TransferStatus::Success => Ok(self.transaction_id),
            TransferStatus::Failed => Err(EngineError::InsufficientFunds {
                account: from.to_string(),
                transaction_id: self.transaction_id,
            }),
        }
    }
}

/// Immutable audit entry for one transfer attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    pub transaction_id: TransactionId,
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Money,
    pub timestamp: DateTime<Utc>,
    pub status: TransferStatus,
    pub message: String,
}
