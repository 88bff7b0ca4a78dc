use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Basic};
use tracing::{Instrument, info_span};

use crate::blocking::run_blocking;
use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller, attached to the request by [`require_auth`].
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
}

/// Validate HTTP Basic credentials and attach the caller's [`Identity`].
///
/// A missing or undecodable header and bad credentials all produce the same 401.
/// The rest of the request runs inside a span carrying the caller's username.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credentials = req
        .headers()
        .typed_get::<Authorization<Basic>>()
        .ok_or(ApiError::Unauthorized)?;

    let username = credentials.username().to_string();
    let password = credentials.password().to_string();

    let user = run_blocking(move |cancel| state.authorize.execute(cancel, &username, &password))
        .await?;

    let span = info_span!("caller", user_id = %user.id, username = %user.username);
    req.extensions_mut().insert(Identity { user_id: user.id });
    Ok(next.run(req).instrument(span).await)
}
