//! Usecases for the question/answer service.
//!
//! Every usecase is synchronous and takes the caller's cancellation token;
//! the transport runs them on the blocking pool.

pub mod answers;
pub mod auth;
pub mod credentials;
pub mod error;
pub mod questions;

#[cfg(test)]
pub(crate) mod testing;

pub use answers::{CreateAnswer, DeleteAnswer, GetAnswer};
pub use auth::{AuthorizeUser, ProvisionUsers, SeedUser};
pub use error::Error;
pub use questions::{CreateQuestion, DeleteQuestion, GetQuestionWithAnswers, ListQuestions};
