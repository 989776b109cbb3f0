//! Concurrent account store.

use crate::account::{Account, AccountId, AccountSnapshot};
use crate::error::{EngineError, Result};
use crate::money::Money;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Maps account ids to shared [`Account`] handles.
///
/// The map has its own sharded locking; looking an account up or inserting a
/// new one never touches any account's balance lock.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: DashMap<AccountId, Arc<Account>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new account if `id` is not already present.
    ///
    /// Concurrent creates of the same id race on the map entry; exactly one
    /// of them succeeds.
    pub fn create(&self, id: AccountId, initial_balance: Money) -> Result<Arc<Account>> {
        match self.accounts.entry(id) {
            Entry::Occupied(entry) => Err(EngineError::DuplicateAccount(entry.key().to_string())),
            Entry::Vacant(entry) => {
                let account = Arc::new(Account::new(entry.key().clone(), initial_balance));
                entry.insert(Arc::clone(&account));
                Ok(account)
            }
        }
    }

    /// Returns a shared handle to the account.
    pub fn get(&self, id: &str) -> Result<Arc<Account>> {
        self.accounts
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| EngineError::AccountNotFound(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Snapshots of every account, sorted by id.
    ///
    /// Each balance is read under its own lock, but the set as a whole is not
    /// an atomic cut across concurrent transfers.
    pub fn snapshots(&self) -> Vec<AccountSnapshot> {
        let handles: Vec<Arc<Account>> = self
            .accounts
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        let mut snapshots: Vec<_> = handles.iter().map(|a| a.snapshot()).collect();
        snapshots.sort_by(|a, b| a.id.cmp(&b.id));
        snapshots
    }

    /// Sum of all balances, or `None` if it leaves the range of [`Money`].
    pub fn total_balance(&self) -> Option<Money> {
        self.snapshots()
            .into_iter()
            .try_fold(Money::ZERO, |total, s| total.checked_add(s.balance))
    }

    /// Removes every account. Test/reset utility only.
    pub fn clear(&self) {
        self.accounts.clear();
    }
}
