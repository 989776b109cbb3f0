//! Account model.
//!
//! Each [`Account`] owns the lock that guards its balance. The lock is never
//! handed out of the crate: callers only ever see balance snapshots, and the
//! transfer engine is the only code that mutates a balance.

use crate::error::{EngineError, Result};
use crate::money::Money;
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::time::Duration;

/// Opaque, immutable account identifier.
///
/// Ordering is lexicographic on the underlying string; the transfer engine
/// relies on it as the global lock order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Builds an id, rejecting empty or whitespace-only input.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(EngineError::InvalidAccountId);
        }
        Ok(AccountId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for AccountId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A monetary account.
///
/// # Invariants
///
/// - `balance >= 0` whenever the lock is not held
/// - the balance is only written while this account's own lock is held
#[derive(Debug)]
pub struct Account {
    id: AccountId,
    balance: Mutex<Money>,
}

impl Account {
    pub(crate) fn new(id: AccountId, initial_balance: Money) -> Self {
        Account {
            id,
            balance: Mutex::new(initial_balance),
        }
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    /// Reads the current balance.
    ///
    /// Takes the lock briefly, so the value is never an intermediate state
    /// of a transfer in progress.
    pub fn balance(&self) -> Money {
        *self.balance.lock()
    }

    /// Point-in-time copy of this account.
    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            id: self.id.clone(),
            balance: self.balance(),
        }
    }

    /// Acquires this account's balance lock, blocking until available.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Money> {
        self.balance.lock()
    }

    /// Acquires this account's balance lock, giving up after `timeout`.
    pub(crate) fn try_lock_for(&self, timeout: Duration) -> Option<MutexGuard<'_, Money>> {
        self.balance.try_lock_for(timeout)
    }
}

/// Read-only view of an account at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSnapshot {
    pub id: AccountId,
    pub balance: Money,
}
