//! Engine configuration.

use crate::error::{EngineError, Result};
use std::env;
use std::time::Duration;

/// Environment variable holding the lock timeout in milliseconds.
pub const LOCK_TIMEOUT_ENV: &str = "LEDGER_LOCK_TIMEOUT_MS";

/// Tunables for [`LedgerEngine`](crate::LedgerEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    /// Upper bound on waiting for each account lock. `None` waits forever.
    pub lock_timeout: Option<Duration>,
}

impl EngineConfig {
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = Some(timeout);
        self
    }

    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lock_timeout = match lookup(LOCK_TIMEOUT_ENV) {
            None => None,
            Some(raw) => {
                let millis = raw.trim().parse::<u64>().map_err(|_| {
                    EngineError::InvalidConfig(format!(
                        "{} must be a whole number of milliseconds, got {:?}",
                        LOCK_TIMEOUT_ENV, raw
                    ))
                })?;
                Some(Duration::from_millis(millis))
            }
        };

        Ok(EngineConfig { lock_timeout })
    }
}
