use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Dataset error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Artifact format error: {0}")]
    ArtifactFormat(#[from] serde_json::Error),

    #[error("Artifact does not match catalog: {0}")]
    ArtifactMismatch(String),

    #[error("Empty vocabulary: every tag string is empty or made of stop words")]
    EmptyVocabulary,

    #[error("Empty catalog: {0}")]
    EmptyCatalog(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Csv(_)
            | AppError::Io(_)
            | AppError::ArtifactFormat(_)
            | AppError::ArtifactMismatch(_)
            | AppError::EmptyVocabulary
            | AppError::EmptyCatalog(_)
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
