use rusqlite::Connection;
use tracing::info;

use crate::DbError;

pub const LATEST_VERSION: i64 = 1;

/// Bring the schema up to `LATEST_VERSION`. Already-applied versions are skipped.
///
/// Entity reads go through the `live_*` views only; the views carry the
/// `deleted_at IS NULL` predicate so tombstoned rows cannot leak into reads.
/// Answers reference questions without `ON DELETE CASCADE`: removal of a
/// question's answers is done by the application, in the same transaction.
pub fn run(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            BEGIN;

            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                username    TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                created_at  TEXT NOT NULL
            );

            CREATE TABLE questions (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                text        TEXT NOT NULL,
                user_id     TEXT NOT NULL REFERENCES users(id),
                created_at  TEXT NOT NULL,
                deleted_at  TEXT
            );

            CREATE INDEX idx_questions_user ON questions(user_id);
            CREATE INDEX idx_questions_deleted ON questions(deleted_at);

            CREATE TABLE answers (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                question_id  INTEGER NOT NULL REFERENCES questions(id),
                user_id      TEXT NOT NULL REFERENCES users(id),
                text         TEXT NOT NULL,
                created_at   TEXT NOT NULL,
                deleted_at   TEXT
            );

            CREATE INDEX idx_answers_question ON answers(question_id, created_at);
            CREATE INDEX idx_answers_deleted ON answers(deleted_at);

            CREATE VIEW live_questions AS
                SELECT id, text, user_id, created_at FROM questions
                WHERE deleted_at IS NULL;

            CREATE VIEW live_answers AS
                SELECT id, question_id, user_id, text, created_at FROM answers
                WHERE deleted_at IS NULL;

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
