use std::sync::Arc;

use rusqlite::{Transaction, TransactionBehavior};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::{Database, DbError};

/// Flat transactional boundary over the shared connection.
///
/// Every repository call made with the `&Transaction` handed to the operation
/// commits together or not at all. Nested units of work are not supported:
/// the connection is held for the whole operation.
#[derive(Clone)]
pub struct UnitOfWork {
    db: Arc<Database>,
}

impl UnitOfWork {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Run `op` inside one `BEGIN IMMEDIATE` transaction.
    ///
    /// `Ok` commits; a failed commit is returned through `E: From<DbError>`.
    /// `Err` rolls back and returns the operation's error unchanged.
    pub fn run<F, T, E>(&self, cancel: &CancellationToken, op: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<DbError>,
    {
        let mut session = self.db.session(cancel)?;
        let tx = session
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(DbError::from)?;

        match op(&tx) {
            Ok(value) => {
                tx.commit().map_err(DbError::from)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!("Transaction rollback failed: {}", rollback_err);
                }
                Err(err)
            }
        }
    }
}
