//! # Ledger Engine
//!
//! An in-memory ledger of monetary accounts that moves funds between them
//! safely under concurrent access.
//!
//! ## Design Principles
//!
//! - **Exact arithmetic**: amounts are `rust_decimal` values with four decimal places
//! - **One lock per account**: a transfer holds exactly the two locks it needs
//! - **Deadlock freedom**: locks are always acquired in ascending account-id order
//! - **Complete audit**: every transfer that reaches the engine leaves one record
//!
//! ## Example
//!
//! ```
//! use ledger_engine::{LedgerEngine, Money, TransferRequest, TransferStatus};
//!
//! let engine = LedgerEngine::new();
//! engine.create_account("Id-123", Money::from(1000)).unwrap();
//! engine.create_account("Id-124", Money::from(1000)).unwrap();
//!
//! let outcome = engine
//!     .transfer(&TransferRequest::new("Id-124", "Id-123", Money::from(1000)))
//!     .unwrap();
//! assert_eq!(outcome.status, TransferStatus::Success);
//! assert_eq!(engine.get_account("Id-123").unwrap().balance, Money::from(2000));
//! ```

pub mod account;
pub mod audit;
pub mod batch;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod money;
pub mod notify;
pub mod store;
pub mod transaction;

pub use account::{Account, AccountId, AccountSnapshot};
pub use audit::TransactionLog;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use engine::LedgerEngine;
pub use error::{EngineError, Result};
pub use money::{Money, ParseMoneyError};
pub use notify::{LogNotifier, Notifier, NotifyError, RecordingNotifier};
pub use store::AccountStore;
pub use transaction::{
    TransactionId, TransactionRecord, TransferOutcome, TransferRequest, TransferStatus,
};
