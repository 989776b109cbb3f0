//! Error types for the ledger engine.

use crate::transaction::TransactionId;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur during engine operation.
///
/// Precondition failures (`DuplicateAccount`, `AccountNotFound`,
/// `SameAccountTransfer`, `NonPositiveAmount`, ...) are raised before any
/// balance is touched or any audit record is written. `InsufficientFunds`,
/// `BalanceOverflow` and `LockTimeout` describe attempts that *were*
/// recorded, so they carry the id of their FAILED record.
#[derive(Error, Debug)]
pub enum EngineError {
    /// An account with this id already exists
    #[error("Account id {0} already exists")]
    DuplicateAccount(String),

    /// No account with this id
    #[error("Account id {0} not found")]
    AccountNotFound(String),

    /// Source and destination are the same account
    #[error("Cannot transfer from account {0} to itself")]
    SameAccountTransfer(String),

    /// Transfer amount is zero or negative
    #[error("Transfer amount must be greater than zero, got {0}")]
    NonPositiveAmount(String),

    /// Source balance could not cover the amount; the attempt was recorded
    #[error("Insufficient funds in account {account} (transaction {transaction_id})")]
    InsufficientFunds {
        account: String,
        transaction_id: TransactionId,
    },

    /// Crediting the destination would exceed the largest representable
    /// balance; the attempt was recorded
    #[error("Balance limit exceeded in account {account} (transaction {transaction_id})")]
    BalanceOverflow {
        account: String,
        transaction_id: TransactionId,
    },

    /// No audit record with this id
    #[error("Transaction id {0} not found")]
    TransactionNotFound(String),

    /// Account id is empty or blank
    #[error("Account id must not be empty")]
    InvalidAccountId,

    /// Initial balance below zero
    #[error("Initial balance must not be negative, got {0}")]
    NegativeBalance(String),

    /// An account lock was not acquired within the configured timeout
    #[error("Timed out acquiring lock on account {account} (transaction {transaction_id})")]
    LockTimeout {
        account: String,
        transaction_id: TransactionId,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid command record
    #[error("Invalid command at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Missing input file argument
    #[error("Missing input file argument. Usage: ledger-engine [--audit] <commands.csv>")]
    MissingArgument,
}
