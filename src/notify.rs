//! Transfer notifications.
//!
//! The engine hands a [`Notifier`] one message per interested account after
//! the transfer is settled and recorded. Delivery is best effort: an error
//! here is logged and never affects the transfer.

use crate::account::AccountId;
use log::info;
use parking_lot::Mutex;
use thiserror::Error;

/// A notification could not be delivered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("notification to {account} failed: {reason}")]
pub struct NotifyError {
    pub account: String,
    pub reason: String,
}

/// Sink for per-account transfer messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, account: &AccountId, message: &str) -> Result<(), NotifyError>;
}

/// Writes notifications to the log at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, account: &AccountId, message: &str) -> Result<(), NotifyError> {
        info!("Notify {}: {}", account, message);
        Ok(())
    }
}

/// Keeps every notification in memory, in delivery order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(AccountId, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far.
    pub fn sent(&self) -> Vec<(AccountId, String)> {
        self.sent.lock().clone()
    }

    /// Messages delivered to one account.
    pub fn messages_for(&self, account: &str) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter(|(id, _)| id.as_str() == account)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, account: &AccountId, message: &str) -> Result<(), NotifyError> {
        self.sent.lock().push((account.clone(), message.to_string()));
        Ok(())
    }
}
