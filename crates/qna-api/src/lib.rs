pub mod answers;
pub mod auth;
pub mod blocking;
pub mod error;
pub mod questions;
pub mod state;

use axum::{Json, Router, middleware, response::IntoResponse, routing::get, routing::post};

pub use auth::Identity;
pub use error::ApiError;
pub use state::{AppState, AppStateInner};

/// Every route except `/health` sits behind HTTP Basic.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new().route("/health", get(health));

    let protected_routes = Router::new()
        .route(
            "/questions",
            post(questions::create_question).get(questions::list_questions),
        )
        .route(
            "/questions/{id}",
            get(questions::get_question).delete(questions::delete_question),
        )
        .route("/questions/{id}/answers", post(answers::create_answer))
        .route(
            "/answers/{id}",
            get(answers::get_answer).delete(answers::delete_answer),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
