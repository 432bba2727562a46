// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::quiz::QuizError;

/// Where the client should go to start over after a failed quiz step.
pub const CATEGORY_SELECTION: &str = "/api/categories";

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    AuthError(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., duplicate username, quiz already running)
    Conflict(String),

    // 503 Service Unavailable (question provider down or empty); retryable
    ServiceUnavailable(String),

    // 404 with a pointer back to category selection
    NoActiveQuiz(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
/// Quiz-flow failures also carry a `redirect` to category selection.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, redirect) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    None,
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            AppError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, msg, Some(CATEGORY_SELECTION))
            }
            AppError::NoActiveQuiz(msg) => (StatusCode::NOT_FOUND, msg, Some(CATEGORY_SELECTION)),
        };

        let body = match redirect {
            Some(location) => Json(json!({
                "error": error_message,
                "redirect": location,
            })),
            None => Json(json!({
                "error": error_message,
            })),
        };

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::InternalServerError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Maps quiz-flow errors to user-facing responses.
impl From<QuizError> for AppError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::ProviderUnavailable(_) => AppError::ServiceUnavailable(
                "Failed to initialize quiz session. Try again later.".to_string(),
            ),
            QuizError::EmptyResult => AppError::ServiceUnavailable(
                "Failed to fetch quiz questions. Please try again later.".to_string(),
            ),
            QuizError::MissingAnswer(_) => {
                AppError::BadRequest("Please select an answer before submitting.".to_string())
            }
            QuizError::SessionNotFound => AppError::NoActiveQuiz(
                "No active quiz. Select a category to start one.".to_string(),
            ),
            QuizError::SessionActive => AppError::Conflict(
                "A quiz is already in progress. Finish or abandon it first.".to_string(),
            ),
            QuizError::QuizIncomplete => {
                AppError::Conflict("Answer every question before viewing results.".to_string())
            }
            QuizError::QuizComplete => {
                AppError::Conflict("All questions are answered. View your results.".to_string())
            }
            QuizError::Database(e) => AppError::from(e),
        }
    }
}
