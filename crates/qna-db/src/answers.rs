use chrono::Utc;
use rusqlite::{Connection, params};

use qna_types::models::{Answer, NewAnswer};

use crate::DbError;
use crate::models::{ANSWER_COLUMNS, AnswerRow};

/// Persistence gateway for answers. Reads only ever see live rows.
pub trait AnswerRepository: Send + Sync {
    fn create(&self, conn: &Connection, answer: &NewAnswer) -> Result<Answer, DbError>;

    fn get_by_id(&self, conn: &Connection, id: i64) -> Result<Answer, DbError>;

    /// Oldest first.
    fn list_by_question_id(&self, conn: &Connection, question_id: i64)
    -> Result<Vec<Answer>, DbError>;

    /// Tombstone a live answer. [`DbError::NotFound`] if it is not live.
    fn delete(&self, conn: &Connection, id: i64) -> Result<(), DbError>;

    /// Tombstone every live answer of a question, returning how many were
    /// removed. Zero is not an error.
    fn delete_by_question_id(&self, conn: &Connection, question_id: i64) -> Result<usize, DbError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteAnswers;

impl AnswerRepository for SqliteAnswers {
    fn create(&self, conn: &Connection, answer: &NewAnswer) -> Result<Answer, DbError> {
        conn.execute(
            "INSERT INTO answers (question_id, user_id, text, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![answer.question_id, answer.user_id, answer.text, answer.created_at],
        )?;

        Ok(Answer {
            id: conn.last_insert_rowid(),
            question_id: answer.question_id,
            user_id: answer.user_id.clone(),
            text: answer.text.clone(),
            created_at: answer.created_at,
        })
    }

    fn get_by_id(&self, conn: &Connection, id: i64) -> Result<Answer, DbError> {
        let sql = format!("SELECT {ANSWER_COLUMNS} FROM live_answers WHERE id = ?1");
        let row = conn.query_row(&sql, [id], AnswerRow::from_row)?;
        Ok(row.into())
    }

    fn list_by_question_id(
        &self,
        conn: &Connection,
        question_id: i64,
    ) -> Result<Vec<Answer>, DbError> {
        let sql = format!(
            "SELECT {ANSWER_COLUMNS} FROM live_answers
             WHERE question_id = ?1
             ORDER BY created_at ASC, id ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([question_id], AnswerRow::from_row)?
            .map(|r| r.map(Answer::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn delete(&self, conn: &Connection, id: i64) -> Result<(), DbError> {
        let changed = conn.execute(
            "UPDATE answers SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
            params![Utc::now(), id],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    fn delete_by_question_id(&self, conn: &Connection, question_id: i64) -> Result<usize, DbError> {
        let changed = conn.execute(
            "UPDATE answers SET deleted_at = ?1 WHERE question_id = ?2 AND deleted_at IS NULL",
            params![Utc::now(), question_id],
        )?;
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations;
    use chrono::Duration;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrations::run(&conn).unwrap();
        conn.execute_batch(
            "
            INSERT INTO users (id, username, password, created_at)
                VALUES ('u1', 'alice', 'pw', '2025-01-01 00:00:00+00:00');
            INSERT INTO questions (id, text, user_id, created_at)
                VALUES (1, 'first', 'u1', '2025-01-01 00:00:00+00:00');
            INSERT INTO questions (id, text, user_id, created_at)
                VALUES (2, 'second', 'u1', '2025-01-01 00:00:00+00:00');
            ",
        )
        .unwrap();
        conn
    }

    fn new_answer(question_id: i64, text: &str) -> NewAnswer {
        NewAnswer {
            question_id,
            user_id: "u1".to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn list_is_oldest_first_and_scoped_to_question() {
        let conn = conn();
        let mut early = new_answer(1, "early");
        early.created_at = Utc::now() - Duration::minutes(10);

        SqliteAnswers.create(&conn, &new_answer(1, "late")).unwrap();
        SqliteAnswers.create(&conn, &early).unwrap();
        SqliteAnswers.create(&conn, &new_answer(2, "elsewhere")).unwrap();

        let texts: Vec<String> = SqliteAnswers
            .list_by_question_id(&conn, 1)
            .unwrap()
            .into_iter()
            .map(|a| a.text)
            .collect();
        assert_eq!(texts, vec!["early", "late"]);
    }

    #[test]
    fn delete_by_question_only_touches_that_question() {
        let conn = conn();
        SqliteAnswers.create(&conn, &new_answer(1, "a")).unwrap();
        SqliteAnswers.create(&conn, &new_answer(1, "b")).unwrap();
        let other = SqliteAnswers.create(&conn, &new_answer(2, "c")).unwrap();

        assert_eq!(SqliteAnswers.delete_by_question_id(&conn, 1).unwrap(), 2);
        assert_eq!(SqliteAnswers.delete_by_question_id(&conn, 1).unwrap(), 0);

        assert!(SqliteAnswers.list_by_question_id(&conn, 1).unwrap().is_empty());
        assert_eq!(SqliteAnswers.get_by_id(&conn, other.id).unwrap(), other);
    }

    #[test]
    fn deleted_answer_is_not_found() {
        let conn = conn();
        let a = SqliteAnswers.create(&conn, &new_answer(1, "bye")).unwrap();

        SqliteAnswers.delete(&conn, a.id).unwrap();

        assert!(matches!(SqliteAnswers.get_by_id(&conn, a.id), Err(DbError::NotFound)));
        assert!(matches!(SqliteAnswers.delete(&conn, a.id), Err(DbError::NotFound)));
    }

    #[test]
    fn answer_requires_existing_question_row() {
        let conn = conn();
        conn.pragma_update(None, "foreign_keys", "ON").unwrap();
        let err = SqliteAnswers.create(&conn, &new_answer(404, "orphan")).unwrap_err();
        assert!(matches!(err, DbError::Sqlite(_)));
    }
}
