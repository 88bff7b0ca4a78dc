use std::sync::Arc;

use chrono::Utc;
use qna_db::{AnswerRepository, Database, DbError, QuestionRepository, UnitOfWork};
use qna_types::models::{NewQuestion, Question, QuestionWithAnswers};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::Error;

fn question_lookup_error(err: DbError) -> Error {
    match err {
        DbError::NotFound => Error::QuestionNotFound,
        other => Error::internal("get question", other),
    }
}

pub struct CreateQuestion {
    db: Arc<Database>,
    questions: Arc<dyn QuestionRepository>,
}

impl CreateQuestion {
    pub fn new(db: Arc<Database>, questions: Arc<dyn QuestionRepository>) -> Self {
        Self { db, questions }
    }

    pub fn execute(
        &self,
        cancel: &CancellationToken,
        user_id: &str,
        text: &str,
    ) -> Result<Question, Error> {
        let new_question = NewQuestion {
            text: text.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        };

        let question = self
            .db
            .with_conn(cancel, |conn| self.questions.create(conn, &new_question))
            .map_err(|e| Error::internal("create question", e))?;

        debug!(question_id = question.id, user_id, "Question created");
        Ok(question)
    }
}

/// All live questions, newest first. No ownership filtering.
pub struct ListQuestions {
    db: Arc<Database>,
    questions: Arc<dyn QuestionRepository>,
}

impl ListQuestions {
    pub fn new(db: Arc<Database>, questions: Arc<dyn QuestionRepository>) -> Self {
        Self { db, questions }
    }

    pub fn execute(&self, cancel: &CancellationToken) -> Result<Vec<Question>, Error> {
        self.db
            .with_conn(cancel, |conn| self.questions.list(conn))
            .map_err(|e| Error::internal("list questions", e))
    }
}

pub struct GetQuestionWithAnswers {
    db: Arc<Database>,
    questions: Arc<dyn QuestionRepository>,
    answers: Arc<dyn AnswerRepository>,
}

impl GetQuestionWithAnswers {
    pub fn new(
        db: Arc<Database>,
        questions: Arc<dyn QuestionRepository>,
        answers: Arc<dyn AnswerRepository>,
    ) -> Self {
        Self {
            db,
            questions,
            answers,
        }
    }

    /// The answer lookup is skipped entirely when the question is missing.
    pub fn execute(
        &self,
        cancel: &CancellationToken,
        question_id: i64,
    ) -> Result<QuestionWithAnswers, Error> {
        self.db.with_conn(cancel, |conn| {
            let question = self
                .questions
                .get_by_id(conn, question_id)
                .map_err(question_lookup_error)?;

            let answers = self
                .answers
                .list_by_question_id(conn, question_id)
                .map_err(|e| Error::internal("list answers", e))?;

            debug!(question_id, answers = answers.len(), "Loaded question with answers");
            Ok(QuestionWithAnswers { question, answers })
        })
    }
}

/// Delete a question and, atomically, every answer attached to it.
pub struct DeleteQuestion {
    db: Arc<Database>,
    uow: UnitOfWork,
    questions: Arc<dyn QuestionRepository>,
    answers: Arc<dyn AnswerRepository>,
}

impl DeleteQuestion {
    pub fn new(
        db: Arc<Database>,
        questions: Arc<dyn QuestionRepository>,
        answers: Arc<dyn AnswerRepository>,
    ) -> Self {
        Self {
            uow: UnitOfWork::new(db.clone()),
            db,
            questions,
            answers,
        }
    }

    /// Existence is checked before ownership: a missing question is
    /// [`Error::QuestionNotFound`] whoever asks. Deleting is one-shot, a
    /// repeat after success is `QuestionNotFound` as well.
    pub fn execute(
        &self,
        cancel: &CancellationToken,
        question_id: i64,
        user_id: &str,
    ) -> Result<(), Error> {
        let question = self
            .db
            .with_conn(cancel, |conn| self.questions.get_by_id(conn, question_id))
            .map_err(question_lookup_error)?;

        if !question.is_owned_by(user_id) {
            return Err(Error::Forbidden);
        }

        self.uow.run(cancel, |tx| {
            // A concurrent delete that won the race leaves nothing live to
            // tombstone; that surfaces here as not-found and rolls back.
            self.questions
                .delete(tx, question_id)
                .map_err(|e| match e {
                    DbError::NotFound => Error::QuestionNotFound,
                    other => Error::internal("delete question", other),
                })?;

            let removed = self
                .answers
                .delete_by_question_id(tx, question_id)
                .map_err(|e| Error::internal("delete answers", e))?;

            debug!(question_id, user_id, answers = removed, "Question deleted with all answers");
            Ok(())
        })
    }
}
