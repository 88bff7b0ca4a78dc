use std::sync::Arc;

use qna_core::{
    AuthorizeUser, CreateAnswer, CreateQuestion, DeleteAnswer, DeleteQuestion, GetAnswer,
    GetQuestionWithAnswers, ListQuestions,
};
use qna_db::{
    AnswerRepository, Database, QuestionRepository, SqliteAnswers, SqliteQuestions, SqliteUsers,
    UserRepository,
};

pub type AppState = Arc<AppStateInner>;

/// Usecases wired once at startup and shared by every request.
pub struct AppStateInner {
    pub authorize: AuthorizeUser,
    pub create_question: CreateQuestion,
    pub list_questions: ListQuestions,
    pub get_question: GetQuestionWithAnswers,
    pub delete_question: DeleteQuestion,
    pub create_answer: CreateAnswer,
    pub get_answer: GetAnswer,
    pub delete_answer: DeleteAnswer,
}

impl AppStateInner {
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_repositories(
            db,
            Arc::new(SqliteUsers),
            Arc::new(SqliteQuestions),
            Arc::new(SqliteAnswers),
        )
    }

    pub fn with_repositories(
        db: Arc<Database>,
        users: Arc<dyn UserRepository>,
        questions: Arc<dyn QuestionRepository>,
        answers: Arc<dyn AnswerRepository>,
    ) -> Self {
        Self {
            authorize: AuthorizeUser::new(db.clone(), users),
            create_question: CreateQuestion::new(db.clone(), questions.clone()),
            list_questions: ListQuestions::new(db.clone(), questions.clone()),
            get_question: GetQuestionWithAnswers::new(db.clone(), questions.clone(), answers.clone()),
            delete_question: DeleteQuestion::new(db.clone(), questions.clone(), answers.clone()),
            create_answer: CreateAnswer::new(db.clone(), questions, answers.clone()),
            get_answer: GetAnswer::new(db.clone(), answers.clone()),
            delete_answer: DeleteAnswer::new(db, answers),
        }
    }
}
