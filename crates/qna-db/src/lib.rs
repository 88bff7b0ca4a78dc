pub mod answers;
pub mod error;
pub mod migrations;
pub mod models;
pub mod questions;
pub mod uow;
pub mod users;

use std::ops::{Deref, DerefMut};
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub use answers::{AnswerRepository, SqliteAnswers};
pub use error::DbError;
pub use questions::{QuestionRepository, SqliteQuestions};
pub use uow::UnitOfWork;
pub use users::{SqliteUsers, UserRepository};

/// SQLite VM instructions between cancellation checks.
const CANCEL_CHECK_INTERVAL: i32 = 1_000;

/// Single shared connection. Every storage call, transactional or not,
/// serializes on the mutex.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent readers from other processes
        conn.pragma_update(None, "journal_mode", "WAL")?;
        let db = Self::init(conn)?;

        info!("Database opened at {}", path.display());
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self, DbError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, DbError> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::run(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` against the shared connection outside any transaction.
    pub fn with_conn<F, T, E>(&self, cancel: &CancellationToken, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<DbError>,
    {
        let session = self.session(cancel)?;
        f(&session)
    }

    /// Lock the connection and arm it so that cancelling `cancel` interrupts
    /// whatever statement is running on it.
    pub(crate) fn session(&self, cancel: &CancellationToken) -> Result<Session<'_>, DbError> {
        if cancel.is_cancelled() {
            return Err(DbError::Cancelled);
        }

        let conn = self.conn.lock().map_err(|_| DbError::Poisoned)?;

        let token = AssertUnwindSafe(cancel.clone());
        conn.progress_handler(
            CANCEL_CHECK_INTERVAL,
            Some(move || {
                let token = &token;
                token.is_cancelled()
            }),
        );

        Ok(Session { conn })
    }
}

/// A locked connection with the cancellation hook installed. The hook is
/// removed again when the session ends.
pub(crate) struct Session<'a> {
    conn: MutexGuard<'a, Connection>,
}

impl Deref for Session<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl DerefMut for Session<'_> {
    fn deref_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        self.conn.progress_handler(0, None::<fn() -> bool>);
    }
}
