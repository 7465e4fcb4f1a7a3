use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::CommentError;

#[derive(Debug)]
pub enum ApiError {
    Unauthenticated,
    Forbidden(String),
    Validation(String),
    NotFound(String),
    Internal(anyhow::Error),
}

impl From<CommentError> for ApiError {
    fn from(e: CommentError) -> Self {
        let message = e.to_string();
        match e {
            CommentError::Validation(_) => ApiError::Validation(message),
            CommentError::NotFound => ApiError::NotFound(message),
            CommentError::Forbidden => ApiError::Forbidden(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection);
        ApiError::Validation(rejection.body_text())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Missing or invalid Authorization header".to_string(),
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
