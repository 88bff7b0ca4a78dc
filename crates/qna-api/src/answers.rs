use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use qna_types::api::{AnswerResponse, CreateAnswerRequest, CreateAnswerResponse};

use crate::auth::Identity;
use crate::blocking::run_blocking;
use crate::error::{ApiError, parse_id, parse_json, require_text};
use crate::state::AppState;

/// POST /questions/{id}/answers. 404 `question_not_found` if the question is gone.
pub async fn create_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(identity): Extension<Identity>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let req: CreateAnswerRequest = parse_json(&body)?;
    require_text(&req.text)?;
    let question_id = parse_id(&id, "invalid_question_id")?;

    let answer = run_blocking(move |cancel| {
        state
            .create_answer
            .execute(cancel, question_id, &identity.user_id, &req.text)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(CreateAnswerResponse::from(answer))))
}

/// GET /answers/{id}
pub async fn get_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let answer_id = parse_id(&id, "invalid_answer_id")?;

    let answer = run_blocking(move |cancel| state.get_answer.execute(cancel, answer_id)).await?;

    Ok(Json(AnswerResponse::from(answer)))
}

/// DELETE /answers/{id}
pub async fn delete_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(identity): Extension<Identity>,
) -> Result<StatusCode, ApiError> {
    let answer_id = parse_id(&id, "invalid_answer_id")?;

    run_blocking(move |cancel| {
        state
            .delete_answer
            .execute(cancel, answer_id, &identity.user_id)
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
