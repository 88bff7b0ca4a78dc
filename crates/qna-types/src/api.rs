use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Answer, Question, QuestionWithAnswers};

/// Wire timestamps are RFC 3339 with second precision, always UTC (`Z`).
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// -- Errors --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: None,
        }
    }

    pub fn validation(fields: BTreeMap<String, String>) -> Self {
        Self {
            message: "validation_failed".to_string(),
            fields: Some(fields),
        }
    }
}

// -- Questions --

/// A missing `text` deserializes to an empty string so that validation, not
/// the JSON decoder, reports it.
#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateQuestionResponse {
    pub id: i64,
    pub text: String,
}

impl From<Question> for CreateQuestionResponse {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            text: q.text,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionListItem {
    pub id: i64,
    pub text: String,
    pub user_id: String,
    pub created_at: String,
}

impl From<Question> for QuestionListItem {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            created_at: format_timestamp(&q.created_at),
            text: q.text,
            user_id: q.user_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub id: i64,
    pub text: String,
    pub created_at: String,
    pub user_id: String,
    pub answers: Vec<AnswerResponse>,
}

impl From<QuestionWithAnswers> for QuestionResponse {
    fn from(qa: QuestionWithAnswers) -> Self {
        let QuestionWithAnswers { question, answers } = qa;
        Self {
            id: question.id,
            text: question.text,
            created_at: format_timestamp(&question.created_at),
            user_id: question.user_id,
            answers: answers.into_iter().map(AnswerResponse::from).collect(),
        }
    }
}

// -- Answers --

#[derive(Debug, Deserialize)]
pub struct CreateAnswerRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAnswerResponse {
    pub id: i64,
    pub text: String,
    pub user_id: String,
    pub question_id: i64,
}

impl From<Answer> for CreateAnswerResponse {
    fn from(a: Answer) -> Self {
        Self {
            id: a.id,
            text: a.text,
            user_id: a.user_id,
            question_id: a.question_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub id: i64,
    pub text: String,
    pub user_id: String,
    pub created_at: String,
}

impl From<Answer> for AnswerResponse {
    fn from(a: Answer) -> Self {
        Self {
            id: a.id,
            created_at: format_timestamp(&a.created_at),
            text: a.text,
            user_id: a.user_id,
        }
    }
}
