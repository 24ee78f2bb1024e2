//! All-or-nothing boundary for dependent multi-step writes.
//!
//! # Responsibility
//! - Group a sequence of dependent writes into one SQLite transaction.
//!
//! # Invariants
//! - All effects commit together, or none do.
//! - The triggering failure propagates to the caller unchanged.

use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Runs `f` inside an immediate transaction.
///
/// Commits when `f` returns `Ok`; the transaction rolls back on drop when `f`
/// returns `Err`, and that error is returned as-is.
pub fn with_immediate_tx<T, E, F>(conn: &mut Connection, f: F) -> Result<T, E>
where
    E: From<rusqlite::Error>,
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
{
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let value = f(&tx)?;
    tx.commit()?;
    Ok(value)
}
