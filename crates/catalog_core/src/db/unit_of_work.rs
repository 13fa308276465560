//! Explicit write scoping on top of SQLite transactions.
//!
//! # Responsibility
//! - [`UnitOfWork`] stages writes in one transaction; `commit` is the
//!   synchronization point after which other connections observe them.
//! - [`with_savepoint`] makes a multi-statement write atomic without
//!   requiring `&mut Connection`, so it nests inside a unit of work.
//!
//! # Invariants
//! - Dropping a unit of work without `commit` discards its writes.
//! - A failed savepoint body leaves no partial rows behind.

use super::DbResult;
use log::{debug, info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::time::Instant;

/// One staged batch of catalog writes.
///
/// Repositories are built over [`UnitOfWork::connection`]; reads through the
/// same connection see staged writes immediately, other connections only
/// after [`UnitOfWork::commit`].
pub struct UnitOfWork<'conn> {
    tx: Transaction<'conn>,
    started_at: Instant,
}

impl<'conn> UnitOfWork<'conn> {
    /// Begins an immediate transaction on `conn`.
    pub fn begin(conn: &'conn mut Connection) -> DbResult<Self> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        debug!("event=uow_begin module=db status=ok");
        Ok(Self {
            tx,
            started_at: Instant::now(),
        })
    }

    /// Connection to build repositories on while the unit is open.
    pub fn connection(&self) -> &Connection {
        &self.tx
    }

    /// Flushes staged writes to the store.
    pub fn commit(self) -> DbResult<()> {
        let started_at = self.started_at;
        self.tx.commit()?;
        info!(
            "event=uow_commit module=db status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Discards staged writes.
    pub fn rollback(self) -> DbResult<()> {
        let started_at = self.started_at;
        self.tx.rollback()?;
        info!(
            "event=uow_rollback module=db status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

/// Runs `body` inside a named SQLite savepoint.
///
/// The savepoint is released when `body` succeeds and rolled back when it
/// fails; the body's error is returned unchanged. Outside a transaction the
/// savepoint behaves like `BEGIN`/`COMMIT`.
pub fn with_savepoint<T, E>(
    conn: &Connection,
    name: &'static str,
    body: impl FnOnce(&Connection) -> Result<T, E>,
) -> Result<T, E>
where
    E: From<rusqlite::Error>,
{
    conn.execute_batch(&format!("SAVEPOINT {name};"))?;

    match body(conn) {
        Ok(value) => {
            conn.execute_batch(&format!("RELEASE SAVEPOINT {name};"))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = conn.execute_batch(&format!(
                "ROLLBACK TO SAVEPOINT {name}; RELEASE SAVEPOINT {name};"
            )) {
                warn!(
                    "event=savepoint_rollback module=db status=error savepoint={} error={}",
                    name, rollback_err
                );
            }
            Err(err)
        }
    }
}
