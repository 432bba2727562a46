// src/handlers/scores.rs

use std::sync::Arc;

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{error::AppError, quiz::QuizEngine, utils::jwt::Claims};

/// Lists the current user's scores, newest first.
pub async fn list_scores(
    State(engine): State<Arc<QuizEngine>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let scores = engine.recorder().history(user_id).await.map_err(|e| {
        tracing::error!("Failed to fetch score history: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(scores))
}
