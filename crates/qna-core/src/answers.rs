use std::sync::Arc;

use chrono::Utc;
use qna_db::{AnswerRepository, Database, DbError, QuestionRepository, UnitOfWork};
use qna_types::models::{Answer, NewAnswer};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::Error;

fn answer_lookup_error(err: DbError) -> Error {
    match err {
        DbError::NotFound => Error::AnswerNotFound,
        other => Error::internal("get answer", other),
    }
}

/// Post an answer to a live question. Anyone authenticated may answer.
pub struct CreateAnswer {
    uow: UnitOfWork,
    questions: Arc<dyn QuestionRepository>,
    answers: Arc<dyn AnswerRepository>,
}

impl CreateAnswer {
    pub fn new(
        db: Arc<Database>,
        questions: Arc<dyn QuestionRepository>,
        answers: Arc<dyn AnswerRepository>,
    ) -> Self {
        Self {
            uow: UnitOfWork::new(db),
            questions,
            answers,
        }
    }

    /// Fails with [`Error::ParentQuestionNotFound`], not
    /// [`Error::AnswerNotFound`], when the question is missing. The parent
    /// check and the insert share one transaction.
    pub fn execute(
        &self,
        cancel: &CancellationToken,
        question_id: i64,
        user_id: &str,
        text: &str,
    ) -> Result<Answer, Error> {
        self.uow.run(cancel, |tx| {
            self.questions
                .get_by_id(tx, question_id)
                .map_err(|e| match e {
                    DbError::NotFound => Error::ParentQuestionNotFound,
                    other => Error::internal("check question exists", other),
                })?;

            let new_answer = NewAnswer {
                question_id,
                user_id: user_id.to_string(),
                text: text.to_string(),
                created_at: Utc::now(),
            };
            let answer = self
                .answers
                .create(tx, &new_answer)
                .map_err(|e| Error::internal("create answer", e))?;

            debug!(answer_id = answer.id, question_id, user_id, "Answer created");
            Ok(answer)
        })
    }
}

pub struct GetAnswer {
    db: Arc<Database>,
    answers: Arc<dyn AnswerRepository>,
}

impl GetAnswer {
    pub fn new(db: Arc<Database>, answers: Arc<dyn AnswerRepository>) -> Self {
        Self { db, answers }
    }

    pub fn execute(&self, cancel: &CancellationToken, answer_id: i64) -> Result<Answer, Error> {
        self.db
            .with_conn(cancel, |conn| self.answers.get_by_id(conn, answer_id))
            .map_err(answer_lookup_error)
    }
}

/// Delete a single answer. Existence first, then ownership.
pub struct DeleteAnswer {
    db: Arc<Database>,
    answers: Arc<dyn AnswerRepository>,
}

impl DeleteAnswer {
    pub fn new(db: Arc<Database>, answers: Arc<dyn AnswerRepository>) -> Self {
        Self { db, answers }
    }

    pub fn execute(
        &self,
        cancel: &CancellationToken,
        answer_id: i64,
        user_id: &str,
    ) -> Result<(), Error> {
        let answer = self
            .db
            .with_conn(cancel, |conn| self.answers.get_by_id(conn, answer_id))
            .map_err(answer_lookup_error)?;

        if !answer.is_owned_by(user_id) {
            return Err(Error::Forbidden);
        }

        self.db
            .with_conn(cancel, |conn| self.answers.delete(conn, answer_id))
            .map_err(|e| match e {
                DbError::NotFound => Error::AnswerNotFound,
                other => Error::internal("delete answer", other),
            })?;

        debug!(answer_id, user_id, "Answer deleted");
        Ok(())
    }
}
