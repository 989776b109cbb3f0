//! Append-only transaction log.

use crate::error::{EngineError, Result};
use crate::transaction::{TransactionId, TransactionRecord};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Id-keyed record of every transfer attempt.
///
/// Ids come from an atomic counter, so two concurrent appends can never be
/// handed the same id. The log has its own synchronisation and is never
/// touched while an account lock is held.
#[derive(Debug)]
pub struct TransactionLog {
    next_id: AtomicU64,
    records: DashMap<TransactionId, TransactionRecord>,
}

impl TransactionLog {
    pub fn new() -> Self {
        TransactionLog {
            next_id: AtomicU64::new(1),
            records: DashMap::new(),
        }
    }

    /// Reserves a fresh id, builds the record for it and stores it.
    ///
    /// Returns the id the record was stored under.
    pub fn record<F>(&self, build: F) -> TransactionId
    where
        F: FnOnce(TransactionId) -> TransactionRecord,
    {
        let id = TransactionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut record = build(id);
        record.transaction_id = id;
        self.records.insert(id, record);
        id
    }

    /// Looks up a record by id.
    pub fn get(&self, id: TransactionId) -> Result<TransactionRecord> {
        self.records
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| EngineError::TransactionNotFound(id.to_string()))
    }

    /// All records, ordered by transaction id.
    pub fn records(&self) -> Vec<TransactionRecord> {
        let mut records: Vec<_> = self.records.iter().map(|e| e.value().clone()).collect();
        records.sort_by_key(|r| r.transaction_id);
        records
    }
}

impl Default for TransactionLog {
    fn default() -> Self {
        Self::new()
    }
}
