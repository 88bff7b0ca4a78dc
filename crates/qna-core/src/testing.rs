//! Shared fixtures for usecase tests: an in-memory database with two users.

use std::sync::Arc;

use qna_db::{
    AnswerRepository, Database, DbError, QuestionRepository, SqliteAnswers, SqliteQuestions,
    SqliteUsers, UserRepository,
};
use qna_types::models::{Answer, NewAnswer, NewQuestion, Question, User};
use rusqlite::Connection;
use tokio_util::sync::CancellationToken;

use crate::{
    AuthorizeUser, CreateAnswer, CreateQuestion, DeleteAnswer, DeleteQuestion, GetAnswer,
    GetQuestionWithAnswers, ListQuestions, ProvisionUsers, SeedUser,
};

pub(crate) struct Fixture {
    pub db: Arc<Database>,
    pub cancel: CancellationToken,
    pub users: Arc<dyn UserRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub answers: Arc<dyn AnswerRepository>,
    pub alice: User,
    pub bob: User,
}

impl Fixture {
    pub fn new() -> Self {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let cancel = CancellationToken::new();
        let users: Arc<dyn UserRepository> = Arc::new(SqliteUsers);

        ProvisionUsers::new(db.clone(), users.clone(), false)
            .execute(
                &cancel,
                &[
                    SeedUser {
                        username: "alice".to_string(),
                        password: "alice123".to_string(),
                    },
                    SeedUser {
                        username: "bob".to_string(),
                        password: "bob123".to_string(),
                    },
                ],
            )
            .unwrap();

        let lookup = |name: &str| {
            db.with_conn(&cancel, |conn| users.get_by_username(conn, name))
                .unwrap()
        };
        let alice = lookup("alice");
        let bob = lookup("bob");

        Self {
            db,
            cancel,
            users,
            questions: Arc::new(SqliteQuestions),
            answers: Arc::new(SqliteAnswers),
            alice,
            bob,
        }
    }

    pub fn authorize(&self) -> AuthorizeUser {
        AuthorizeUser::new(self.db.clone(), self.users.clone())
    }

    pub fn list_questions(&self) -> ListQuestions {
        ListQuestions::new(self.db.clone(), self.questions.clone())
    }

    pub fn get_question(&self) -> GetQuestionWithAnswers {
        GetQuestionWithAnswers::new(self.db.clone(), self.questions.clone(), self.answers.clone())
    }

    pub fn delete_question(&self) -> DeleteQuestion {
        DeleteQuestion::new(self.db.clone(), self.questions.clone(), self.answers.clone())
    }

    pub fn create_answer_uc(&self) -> CreateAnswer {
        CreateAnswer::new(self.db.clone(), self.questions.clone(), self.answers.clone())
    }

    pub fn get_answer(&self) -> GetAnswer {
        GetAnswer::new(self.db.clone(), self.answers.clone())
    }

    pub fn delete_answer(&self) -> DeleteAnswer {
        DeleteAnswer::new(self.db.clone(), self.answers.clone())
    }

    pub fn create_question(&self, user_id: &str, text: &str) -> Question {
        CreateQuestion::new(self.db.clone(), self.questions.clone())
            .execute(&self.cancel, user_id, text)
            .unwrap()
    }

    pub fn create_answer(&self, question_id: i64, user_id: &str, text: &str) -> Answer {
        self.create_answer_uc()
            .execute(&self.cancel, question_id, user_id, text)
            .unwrap()
    }

    /// Rows in the base table, tombstoned or not.
    pub fn count_answer_rows(&self) -> i64 {
        self.db
            .with_conn(&self.cancel, |conn| {
                Ok::<_, DbError>(conn.query_row("SELECT COUNT(*) FROM answers", [], |r| r.get(0))?)
            })
            .unwrap()
    }
}

/// Answer repository that performs the cascade and then fails, so the
/// caller's transaction has real writes to roll back.
pub(crate) struct FailingCascade {
    inner: Arc<dyn AnswerRepository>,
}

impl FailingCascade {
    pub fn new(inner: Arc<dyn AnswerRepository>) -> Self {
        Self { inner }
    }
}

impl AnswerRepository for FailingCascade {
    fn create(&self, conn: &Connection, answer: &NewAnswer) -> Result<Answer, DbError> {
        self.inner.create(conn, answer)
    }

    fn get_by_id(&self, conn: &Connection, id: i64) -> Result<Answer, DbError> {
        self.inner.get_by_id(conn, id)
    }

    fn list_by_question_id(
        &self,
        conn: &Connection,
        question_id: i64,
    ) -> Result<Vec<Answer>, DbError> {
        self.inner.list_by_question_id(conn, question_id)
    }

    fn delete(&self, conn: &Connection, id: i64) -> Result<(), DbError> {
        self.inner.delete(conn, id)
    }

    fn delete_by_question_id(&self, conn: &Connection, question_id: i64) -> Result<usize, DbError> {
        self.inner.delete_by_question_id(conn, question_id)?;
        Err(DbError::Sqlite(rusqlite::Error::ExecuteReturnedResults))
    }
}

/// Question repository whose lookup returns the row and then tombstones it,
/// as if a concurrent delete committed right after the caller's read.
pub(crate) struct DeletedAfterLookup {
    inner: Arc<dyn QuestionRepository>,
}

impl DeletedAfterLookup {
    pub fn new(inner: Arc<dyn QuestionRepository>) -> Self {
        Self { inner }
    }
}

impl QuestionRepository for DeletedAfterLookup {
    fn create(&self, conn: &Connection, question: &NewQuestion) -> Result<Question, DbError> {
        self.inner.create(conn, question)
    }

    fn get_by_id(&self, conn: &Connection, id: i64) -> Result<Question, DbError> {
        let question = self.inner.get_by_id(conn, id)?;
        self.inner.delete(conn, id)?;
        Ok(question)
    }

    fn list(&self, conn: &Connection) -> Result<Vec<Question>, DbError> {
        self.inner.list(conn)
    }

    fn delete(&self, conn: &Connection, id: i64) -> Result<(), DbError> {
        self.inner.delete(conn, id)
    }
}
