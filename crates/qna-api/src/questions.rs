use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use qna_types::api::{
    CreateQuestionRequest, CreateQuestionResponse, QuestionListItem, QuestionResponse,
};

use crate::auth::Identity;
use crate::blocking::run_blocking;
use crate::error::{ApiError, parse_id, parse_json, require_text};
use crate::state::AppState;

/// POST /questions
pub async fn create_question(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let req: CreateQuestionRequest = parse_json(&body)?;
    require_text(&req.text)?;

    let question = run_blocking(move |cancel| {
        state
            .create_question
            .execute(cancel, &identity.user_id, &req.text)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(CreateQuestionResponse::from(question))))
}

/// GET /questions
pub async fn list_questions(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let questions = run_blocking(move |cancel| state.list_questions.execute(cancel)).await?;

    let items: Vec<QuestionListItem> = questions.into_iter().map(QuestionListItem::from).collect();
    Ok(Json(items))
}

/// GET /questions/{id}: the question with its answers nested, oldest first.
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let question_id = parse_id(&id, "invalid_question_id")?;

    let loaded = run_blocking(move |cancel| state.get_question.execute(cancel, question_id)).await?;

    Ok(Json(QuestionResponse::from(loaded)))
}

/// DELETE /questions/{id}, owner only; removes the question's answers too.
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(identity): Extension<Identity>,
) -> Result<StatusCode, ApiError> {
    let question_id = parse_id(&id, "invalid_question_id")?;

    run_blocking(move |cancel| {
        state
            .delete_question
            .execute(cancel, question_id, &identity.user_id)
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
