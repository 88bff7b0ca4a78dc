use chrono::Utc;
use rusqlite::{Connection, params};

use qna_types::models::{NewQuestion, Question};

use crate::DbError;
use crate::models::{QUESTION_COLUMNS, QuestionRow};

/// Persistence gateway for questions. Reads only ever see live rows.
///
/// Write methods take whatever handle they are given; pass the
/// [`rusqlite::Transaction`] from [`crate::UnitOfWork::run`] to make them
/// part of that transaction.
pub trait QuestionRepository: Send + Sync {
    fn create(&self, conn: &Connection, question: &NewQuestion) -> Result<Question, DbError>;

    fn get_by_id(&self, conn: &Connection, id: i64) -> Result<Question, DbError>;

    /// Newest first.
    fn list(&self, conn: &Connection) -> Result<Vec<Question>, DbError>;

    /// Tombstone a live question. [`DbError::NotFound`] if it is not live.
    fn delete(&self, conn: &Connection, id: i64) -> Result<(), DbError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteQuestions;

impl QuestionRepository for SqliteQuestions {
    fn create(&self, conn: &Connection, question: &NewQuestion) -> Result<Question, DbError> {
        conn.execute(
            "INSERT INTO questions (text, user_id, created_at) VALUES (?1, ?2, ?3)",
            params![question.text, question.user_id, question.created_at],
        )?;

        Ok(Question {
            id: conn.last_insert_rowid(),
            text: question.text.clone(),
            user_id: question.user_id.clone(),
            created_at: question.created_at,
        })
    }

    fn get_by_id(&self, conn: &Connection, id: i64) -> Result<Question, DbError> {
        let sql = format!("SELECT {QUESTION_COLUMNS} FROM live_questions WHERE id = ?1");
        let row = conn.query_row(&sql, [id], QuestionRow::from_row)?;
        Ok(row.into())
    }

    fn list(&self, conn: &Connection) -> Result<Vec<Question>, DbError> {
        let sql = format!(
            "SELECT {QUESTION_COLUMNS} FROM live_questions ORDER BY created_at DESC, id DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], QuestionRow::from_row)?
            .map(|r| r.map(Question::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn delete(&self, conn: &Connection, id: i64) -> Result<(), DbError> {
        let changed = conn.execute(
            "UPDATE questions SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
            params![Utc::now(), id],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}
