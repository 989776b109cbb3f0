//! Ledger Engine CLI
//!
//! Reads account and transfer commands from CSV and prints the resulting
//! balances.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > balances.csv
//! cargo run -- --audit commands.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `LEDGER_LOCK_TIMEOUT_MS`: Give up on an account lock after this many milliseconds

use ledger_engine::{batch, EngineConfig, EngineError, LedgerEngine, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let audit = args.iter().any(|a| a == "--audit");
    let input_path = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .ok_or(EngineError::MissingArgument)?;

    let file = File::open(input_path)?;
    let reader = BufReader::new(file);

    let engine = LedgerEngine::new().with_config(EngineConfig::from_env()?);
    batch::process_csv(&engine, reader)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    batch::write_accounts(&engine, &mut handle)?;
    if audit {
        writeln!(handle)?;
        batch::write_transactions(&engine, &mut handle)?;
    }

    Ok(())
}
