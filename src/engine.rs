//! Core transfer engine.
//!
//! Coordinates the account store and the transaction log. Transfers between
//! disjoint account pairs run fully in parallel; transfers sharing an account
//! serialize on that account's lock.
//!
//! # Lock ordering
//!
//! A transfer holds both account locks while it mutates balances. Both locks
//! are always taken in ascending [`AccountId`] order regardless of transfer
//! direction, and released in reverse. No two transfers can therefore wait on
//! each other in a cycle.

use crate::account::{Account, AccountId, AccountSnapshot};
use crate::audit::TransactionLog;
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::money::Money;
use crate::notify::{LogNotifier, Notifier};
use crate::store::AccountStore;
use crate::transaction::{
    TransactionId, TransactionRecord, TransferOutcome, TransferRequest, TransferStatus,
};
use log::{debug, info, warn};
use parking_lot::MutexGuard;
use std::sync::Arc;

const SUCCESS_MESSAGE: &str = "Transfer completed successfully";
const TIMEOUT_MESSAGE: &str = "Timed out acquiring account lock";

/// How the locked part of a transfer ended.
#[derive(Debug)]
enum Settlement {
    Completed,
    InsufficientFunds,
    CreditOverflow,
    TimedOut(AccountId),
}

/// The ledger: accounts, transfers and their audit trail.
///
/// All operations take `&self`; share the engine between threads with a
/// reference or an `Arc`.
pub struct LedgerEngine {
    accounts: AccountStore,
    transactions: TransactionLog,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    config: EngineConfig,
}

impl LedgerEngine {
    /// Creates an empty engine with the system clock, log notifications and
    /// default configuration.
    pub fn new() -> Self {
        LedgerEngine {
            accounts: AccountStore::new(),
            transactions: TransactionLog::new(),
            clock: Arc::new(SystemClock),
            notifier: Arc::new(LogNotifier),
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Opens a new account.
    ///
    /// Fails with `InvalidAccountId` for a blank id, `NegativeBalance` for an
    /// opening balance below zero and `DuplicateAccount` if the id is taken.
    pub fn create_account(&self, id: &str, initial_balance: Money) -> Result<()> {
        let id = AccountId::new(id)?;
        if initial_balance.is_negative() {
            return Err(EngineError::NegativeBalance(initial_balance.to_string()));
        }
        self.accounts.create(id.clone(), initial_balance)?;
        debug!("Created account {} with balance {}", id, initial_balance);
        Ok(())
    }

    /// Current state of one account.
    pub fn get_account(&self, id: &str) -> Result<AccountSnapshot> {
        Ok(self.accounts.get(id)?.snapshot())
    }

    /// Every account, sorted by id.
    pub fn accounts(&self) -> Vec<AccountSnapshot> {
        self.accounts.snapshots()
    }

    /// Sum of all balances in the ledger, or `None` if it exceeds the
    /// range of [`Money`].
    pub fn total_balance(&self) -> Option<Money> {
        self.accounts.total_balance()
    }

    /// Looks up the audit record of a transfer attempt.
    pub fn get_transaction(&self, id: TransactionId) -> Result<TransactionRecord> {
        self.transactions.get(id)
    }

    /// Every audit record, ordered by transaction id.
    pub fn transactions(&self) -> Vec<TransactionRecord> {
        self.transactions.records()
    }

    /// Drops all accounts. Recorded transactions are kept.
    pub fn reset(&self) {
        self.accounts.clear();
    }

    /// Moves `request.amount` from `request.from` to `request.to`.
    ///
    /// Precondition failures (`NonPositiveAmount`, `SameAccountTransfer`,
    /// `AccountNotFound`) return `Err` without touching any balance or
    /// writing an audit record. Every other attempt is recorded exactly once:
    /// a source that cannot cover the amount yields `Ok` with a FAILED
    /// outcome, a credit beyond [`Money::max_value`] yields `BalanceOverflow`
    /// and an expired lock timeout yields `LockTimeout`. Neither balance
    /// changes in any of the failure cases.
    pub fn transfer(&self, request: &TransferRequest) -> Result<TransferOutcome> {
        let amount = request.amount;
        if !amount.is_positive() {
            return Err(EngineError::NonPositiveAmount(amount.to_string()));
        }
        if request.from == request.to {
            return Err(EngineError::SameAccountTransfer(request.from.clone()));
        }

        let from = self.accounts.get(&request.from)?;
        let to = self.accounts.get(&request.to)?;

        // Optimistic read without locks; settle() re-checks under both locks.
        let settlement = if from.balance() < amount {
            Settlement::InsufficientFunds
        } else {
            self.settle(&from, &to, amount)
        };

        let (status, message) = match &settlement {
            Settlement::Completed => (TransferStatus::Success, SUCCESS_MESSAGE.to_string()),
            Settlement::InsufficientFunds => (
                TransferStatus::Failed,
                format!("Insufficient funds in account {}", from.id()),
            ),
            Settlement::CreditOverflow => (
                TransferStatus::Failed,
                format!("Balance limit exceeded in account {}", to.id()),
            ),
            Settlement::TimedOut(_) => (TransferStatus::Failed, TIMEOUT_MESSAGE.to_string()),
        };

        let timestamp = self.clock.now();
        let transaction_id = self.transactions.record(|transaction_id| TransactionRecord {
            transaction_id,
            from: from.id().clone(),
            to: to.id().clone(),
            amount,
            timestamp,
            status,
            message: message.clone(),
        });

        match status {
            TransferStatus::Success => debug!(
                "Transaction {}: transferred {} from {} to {}",
                transaction_id,
                amount,
                from.id(),
                to.id()
            ),
            TransferStatus::Failed => info!(
                "Transaction {}: transfer of {} from {} to {} failed: {}",
                transaction_id,
                amount,
                from.id(),
                to.id(),
                message
            ),
        }

        self.notify_outcome(transaction_id, status, &from, &to, amount);

        match settlement {
            Settlement::TimedOut(account) => {
                return Err(EngineError::LockTimeout {
                    account: account.to_string(),
                    transaction_id,
                })
            }
            Settlement::CreditOverflow => {
                return Err(EngineError::BalanceOverflow {
                    account: to.id().to_string(),
                    transaction_id,
                })
            }
            Settlement::Completed | Settlement::InsufficientFunds => {}
        }

        Ok(TransferOutcome {
            transaction_id,
            status,
            message,
        })
    }

    /// Takes both locks in id order, re-checks the balance and moves funds.
    fn settle(&self, from: &Account, to: &Account, amount: Money) -> Settlement {
        let (first, second) = if from.id() < to.id() {
            (from, to)
        } else {
            (to, from)
        };

        let Some(mut first_guard) = self.acquire(first) else {
            return Settlement::TimedOut(first.id().clone());
        };
        // On timeout here, first_guard is dropped on return.
        let Some(mut second_guard) = self.acquire(second) else {
            return Settlement::TimedOut(second.id().clone());
        };

        let (source, destination) = if first.id() == from.id() {
            (&mut *first_guard, &mut *second_guard)
        } else {
            (&mut *second_guard, &mut *first_guard)
        };

        if *source < amount {
            return Settlement::InsufficientFunds;
        }
        // Both new balances are computed before either account is written.
        let (Some(debited), Some(credited)) =
            (source.checked_sub(amount), destination.checked_add(amount))
        else {
            return Settlement::CreditOverflow;
        };
        *source = debited;
        *destination = credited;

        drop(second_guard);
        drop(first_guard);
        Settlement::Completed
    }

    fn acquire<'a>(&self, account: &'a Account) -> Option<MutexGuard<'a, Money>> {
        match self.config.lock_timeout {
            Some(timeout) => account.try_lock_for(timeout),
            None => Some(account.lock()),
        }
    }

    /// Tells the sender (and on success the receiver) how the transfer went.
    fn notify_outcome(
        &self,
        transaction_id: TransactionId,
        status: TransferStatus,
        from: &Account,
        to: &Account,
        amount: Money,
    ) {
        let mut messages = Vec::with_capacity(2);
        match status {
            TransferStatus::Success => {
                messages.push((
                    from.id(),
                    format!(
                        "Transfer of {} to account {} completed, transaction id {}",
                        amount,
                        to.id(),
                        transaction_id
                    ),
                ));
                messages.push((
                    to.id(),
                    format!(
                        "Account {} credited with {} from account {}",
                        to.id(),
                        amount,
                        from.id()
                    ),
                ));
            }
            TransferStatus::Failed => messages.push((
                from.id(),
                format!(
                    "Transfer of {} to account {} failed, transaction id {}",
                    amount,
                    to.id(),
                    transaction_id
                ),
            )),
        }

        for (account, message) in messages {
            if let Err(e) = self.notifier.notify(account, &message) {
                warn!("Transaction {}: {}", transaction_id, e);
            }
        }
    }
}

impl Default for LedgerEngine {
    fn default() -> Self {
        Self::new()
    }
}
