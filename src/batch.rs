//! CSV command processing and report output.
//!
//! Commands are streamed one row at a time. Rows that fail to parse or are
//! rejected by the engine are logged at warn level and skipped.

use crate::engine::LedgerEngine;
use crate::error::{EngineError, Result};
use crate::money::Money;
use crate::transaction::TransferRequest;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use serde::Deserialize;
use std::io::{Read, Write};
use std::str::FromStr;

/// Raw command row as read from CSV: `op,from,to,amount`.
#[derive(Debug, Deserialize)]
pub struct CommandRecord {
    /// `create` or `transfer`
    pub op: String,

    /// Account created, or source of a transfer
    pub from: String,

    /// Destination of a transfer; empty for `create`
    pub to: Option<String>,

    /// Opening balance or transfer amount
    pub amount: String,
}

/// A parsed command ready for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create { id: String, balance: Money },
    Transfer(TransferRequest),
}

impl CommandRecord {
    /// Parses the raw row into a typed command.
    pub fn parse(&self, row: usize) -> Result<Command> {
        let invalid = |message: String| EngineError::InvalidRecord { row, message };
        let amount = Money::from_str(&self.amount).map_err(|e| invalid(e.to_string()))?;

        match self.op.trim().to_lowercase().as_str() {
            "create" => Ok(Command::Create {
                id: self.from.clone(),
                balance: amount,
            }),
            "transfer" => {
                let to = self
                    .to
                    .as_deref()
                    .filter(|to| !to.trim().is_empty())
                    .ok_or_else(|| invalid("transfer without destination".to_string()))?;
                Ok(Command::Transfer(TransferRequest::new(
                    self.from.clone(),
                    to,
                    amount,
                )))
            }
            other => Err(invalid(format!("unknown operation {:?}", other))),
        }
    }
}

/// Applies every command in `reader` to `engine`, in order.
pub fn process_csv<R: Read>(engine: &LedgerEngine, reader: R) -> Result<()> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    for (row_idx, result) in csv_reader.deserialize::<CommandRecord>().enumerate() {
        let row_num = row_idx + 2; // 1-indexed, accounting for header row

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Row {}: CSV parse error: {}", row_num, e);
                continue;
            }
        };

        match record.parse(row_num).and_then(|command| apply(engine, command)) {
            Ok(()) => {}
            Err(e) => warn!("Row {}: {}", row_num, e),
        }
    }

    Ok(())
}

fn apply(engine: &LedgerEngine, command: Command) -> Result<()> {
    match command {
        Command::Create { id, balance } => engine.create_account(&id, balance),
        Command::Transfer(request) => {
            let outcome = engine.transfer(&request)?;
            debug!(
                "Transfer {} -> {}: transaction {} {}",
                request.from, request.to, outcome.transaction_id, outcome.status
            );
            Ok(())
        }
    }
}

/// Writes final balances as CSV, sorted by account id.
pub fn write_accounts<W: Write>(engine: &LedgerEngine, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["account", "balance"])?;
    for account in engine.accounts() {
        csv_writer.write_record([account.id.to_string(), account.balance.to_string()])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes the audit log as CSV, ordered by transaction id.
pub fn write_transactions<W: Write>(engine: &LedgerEngine, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["transaction", "from", "to", "amount", "status", "timestamp"])?;
    for record in engine.transactions() {
        csv_writer.write_record([
            record.transaction_id.to_string(),
            record.from.to_string(),
            record.to.to_string(),
            record.amount.to_string(),
            record.status.to_string(),
            record.timestamp.to_rfc3339(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{TimeZone, Utc};
    use std::io::Cursor;
    use std::sync::Arc;

    fn run(csv: &str) -> LedgerEngine {
        let instant = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let engine = LedgerEngine::new().with_clock(Arc::new(FixedClock(instant)));
        process_csv(&engine, Cursor::new(csv)).unwrap();
        engine
    }

    fn accounts_csv(engine: &LedgerEngine) -> String {
        let mut output = Vec::new();
        write_accounts(engine, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_create_and_transfer() {
        let create = CommandRecord {
            op: "Create".to_string(),
            from: "Id-1".to_string(),
            to: None,
            amount: "10.5".to_string(),
        };
        assert_eq!(
            create.parse(2).unwrap(),
            Command::Create {
                id: "Id-1".to_string(),
                balance: Money::from_str("10.5").unwrap(),
            }
        );

        let transfer = CommandRecord {
            op: "transfer".to_string(),
            from: "Id-1".to_string(),
            to: Some("Id-2".to_string()),
            amount: "3".to_string(),
        };
        assert_eq!(
            transfer.parse(3).unwrap(),
            Command::Transfer(TransferRequest::new("Id-1", "Id-2", Money::from(3)))
        );
    }

    #[test]
    fn test_parse_rejects_bad_rows() {
        let no_destination = CommandRecord {
            op: "transfer".to_string(),
            from: "Id-1".to_string(),
            to: Some("  ".to_string()),
            amount: "3".to_string(),
        };
        assert!(matches!(
            no_destination.parse(4),
            Err(EngineError::InvalidRecord { row: 4, .. })
        ));

        let unknown = CommandRecord {
            op: "withdraw".to_string(),
            from: "Id-1".to_string(),
            to: None,
            amount: "3".to_string(),
        };
        assert!(unknown.parse(5).is_err());

        let bad_amount = CommandRecord {
            op: "create".to_string(),
            from: "Id-1".to_string(),
            to: None,
            amount: "lots".to_string(),
        };
        assert!(bad_amount.parse(6).is_err());
    }

    #[test]
    fn test_process_and_write_accounts() {
        let csv = "op,from,to,amount
create,Id-124,,1000
create,Id-123,,1000
transfer,Id-124,Id-123,1000
transfer,Id-123,Id-124,10000";

        let engine = run(csv);
        let output = accounts_csv(&engine);

        assert_eq!(
            output,
            "account,balance\nId-123,2000.0000\nId-124,0.0000\n"
        );
        assert_eq!(engine.transactions().len(), 2);
    }

    #[test]
    fn test_rejected_rows_are_skipped() {
        let csv = "op,from,to,amount
create,a,,10
create,a,,99
create,b,,-1
transfer,a,a,1
transfer,a,missing,1
transfer,a,b,0
bogus,a,b,1
create,b,,5
transfer,a,b,2.5";

        let engine = run(csv);
        assert_eq!(accounts_csv(&engine), "account,balance\na,7.5000\nb,7.5000\n");
        assert_eq!(engine.transactions().len(), 1);
    }

    #[test]
    fn test_out_of_range_amounts_are_rejected() {
        let csv = "op,from,to,amount
create,huge,,79228162514264337593543950335
create,max,,7922816251426433759354395.0335
create,a,,10
transfer,a,max,10";

        let engine = run(csv);
        assert_eq!(
            accounts_csv(&engine),
            "account,balance\na,10.0000\nmax,7922816251426433759354395.0335\n"
        );
        assert_eq!(engine.transactions().len(), 1);
    }

    #[test]
    fn test_whitespace_handling() {
        let csv = "op, from, to, amount
create, a, , 10
create, b, , 0
transfer, a, b, 4";

        let engine = run(csv);
        assert_eq!(accounts_csv(&engine), "account,balance\na,6.0000\nb,4.0000\n");
    }

    #[test]
    fn test_write_transactions() {
        let csv = "op,from,to,amount
create,a,,10
create,b,,0
transfer,a,b,4
transfer,b,a,9";

        let engine = run(csv);
        let mut output = Vec::new();
        write_transactions(&engine, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "transaction,from,to,amount,status,timestamp\n\
             1,a,b,4.0000,SUCCESS,2024-01-02T03:04:05+00:00\n\
             2,b,a,9.0000,FAILED,2024-01-02T03:04:05+00:00\n"
        );
    }
}
