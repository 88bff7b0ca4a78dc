//! Database row types. These map 1:1 onto the `users` table and the
//! `live_questions` / `live_answers` views, and convert into the entity model.

use chrono::{DateTime, Utc};
use rusqlite::Row;

use qna_types::models::{Answer, Question, User};

pub(crate) const USER_COLUMNS: &str = "id, username, password, created_at";
pub(crate) const QUESTION_COLUMNS: &str = "id, text, user_id, created_at";
pub(crate) const ANSWER_COLUMNS: &str = "id, question_id, user_id, text, created_at";

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            password: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            password: row.password,
            created_at: row.created_at,
        }
    }
}

pub struct QuestionRow {
    pub id: i64,
    pub text: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl QuestionRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            text: row.get(1)?,
            user_id: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            user_id: row.user_id,
            created_at: row.created_at,
        }
    }
}

pub struct AnswerRow {
    pub id: i64,
    pub question_id: i64,
    pub user_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl AnswerRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            question_id: row.get(1)?,
            user_id: row.get(2)?,
            text: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

impl From<AnswerRow> for Answer {
    fn from(row: AnswerRow) -> Self {
        Self {
            id: row.id,
            question_id: row.question_id,
            user_id: row.user_id,
            text: row.text,
            created_at: row.created_at,
        }
    }
}
