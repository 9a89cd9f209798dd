use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::utils::validation::FieldError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to fetch jobs: {0}")]
    Fetch(String),

    #[error("Failed to delete job: {0}")]
    Delete(String),

    #[error("Failed to post job: {0}")]
    Submit(String),

    #[error("A job submission is already in progress")]
    SubmissionInProgress,

    #[error("Request was cancelled")]
    Cancelled,

    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Jobs API responded with {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Error::Validation(fields) => {
                let body = Json(json!({
                    "error": "Validation failed",
                    "fields": fields,
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::Fetch(_) => (StatusCode::BAD_GATEWAY, "Error fetching jobs!".to_string()),
            Error::Delete(_) => (StatusCode::BAD_GATEWAY, "Failed to delete job.".to_string()),
            Error::Submit(_) => (
                StatusCode::BAD_GATEWAY,
                "Error posting job. Please try again.".to_string(),
            ),
            Error::SubmissionInProgress => (
                StatusCode::CONFLICT,
                "A job submission is already in progress".to_string(),
            ),
            Error::Cancelled => (
                StatusCode::REQUEST_TIMEOUT,
                "Request was cancelled".to_string(),
            ),
            Error::Upstream { status, .. } => (
                StatusCode::BAD_GATEWAY,
                format!("Jobs API responded with {}", status),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Reqwest(err) => (
                StatusCode::BAD_GATEWAY,
                format!("External service error: {}", err),
            ),
            Error::Multipart(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
