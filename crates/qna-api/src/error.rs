use std::collections::BTreeMap;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use qna_types::api::ErrorBody;

/// Transport-level failure. Maps to a status code and a `{"message": ...}`
/// body; internal details are logged, never sent to the client.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(&'static str),
    Unauthorized,
    Forbidden,
    NotFound(&'static str),
    Validation(BTreeMap<String, String>),
    Internal,
}

impl ApiError {
    pub fn invalid_field(field: &str, rule: &str) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), rule.to_string());
        Self::Validation(fields)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<qna_core::Error> for ApiError {
    fn from(err: qna_core::Error) -> Self {
        use qna_core::Error;

        match err {
            Error::QuestionNotFound | Error::ParentQuestionNotFound => {
                Self::NotFound("question_not_found")
            }
            Error::AnswerNotFound => Self::NotFound("answer_not_found"),
            Error::Forbidden => Self::Forbidden,
            Error::InvalidCredentials => Self::Unauthorized,
            err @ (Error::Internal { .. } | Error::Hashing(_)) => {
                error!("Unhandled error: {}", err);
                Self::Internal
            }
        }
    }
}


impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::BadRequest(code) | Self::NotFound(code) => ErrorBody::new(code),
            Self::Unauthorized => ErrorBody::new("unauthorized"),
            Self::Forbidden => ErrorBody::new("access_denied"),
            Self::Validation(fields) => ErrorBody::validation(fields),
            Self::Internal => ErrorBody::new("internal_error"),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"qna\""),
            );
        }
        response
    }
}

/// Decode a JSON request body whatever its `Content-Type`.
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!("Rejected request body: {}", e);
        ApiError::invalid_field("body", "invalid_json")
    })
}

/// `text` must be present and non-empty.
pub fn require_text(text: &str) -> Result<(), ApiError> {
    if text.is_empty() {
        return Err(ApiError::invalid_field("text", "required"));
    }
    Ok(())
}

/// Path ids are integers; anything else is a 400 with `code`.
pub fn parse_id(raw: &str, code: &'static str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::BadRequest(code))
}
