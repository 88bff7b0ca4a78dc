use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account. Users are provisioned out of band and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Stored verbatim, or as an Argon2 PHC string when provisioning hashes it.
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub username: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub text: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// An answer is bound to its question for life; `question_id` is never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub id: i64,
    pub question_id: i64,
    pub user_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Answer {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub question_id: i64,
    pub user_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A question together with its live answers, oldest answer first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionWithAnswers {
    pub question: Question,
    pub answers: Vec<Answer>,
}
