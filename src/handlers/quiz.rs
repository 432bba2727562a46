// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    error::AppError,
    models::{
        category::{CATEGORIES, SelectCategoryRequest, find_category},
        question::SubmitAnswerRequest,
    },
    quiz::{QuizEngine, QuizError},
    utils::jwt::Claims,
};

/// Lists the categories a quiz can be started from.
pub async fn list_categories() -> impl IntoResponse {
    Json(&CATEGORIES)
}

/// "Category selected": fetches a batch of questions and starts a quiz.
///
/// Returns 201 and the first question.
pub async fn select_category(
    State(engine): State<Arc<QuizEngine>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SelectCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let key = claims.session_key()?;

    let category = req.category.ok_or_else(|| {
        AppError::BadRequest("Please select a category before proceeding.".to_string())
    })?;
    let category = find_category(category)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown category {}", category)))?;

    let view = engine.select_category(&key, category.id).await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// Re-renders the question on screen, or reports that results are ready.
pub async fn current_question(
    State(engine): State<Arc<QuizEngine>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let key = claims.session_key()?;
    let view = engine.current(&key).await?;
    Ok(Json(view))
}

/// "Answer submitted": judges the answer and returns what to show next.
///
/// Without a selected option (or without a body at all) the current question
/// comes back unchanged with 422 and a prompt.
pub async fn submit_answer(
    State(engine): State<Arc<QuizEngine>>,
    Extension(claims): Extension<Claims>,
    req: Option<Json<SubmitAnswerRequest>>,
) -> Result<Response, AppError> {
    let key = claims.session_key()?;
    let answer = req.and_then(|Json(req)| req.answer);

    match engine.submit_answer(&key, answer.as_deref()).await {
        Ok(view) => Ok(Json(view).into_response()),
        Err(QuizError::MissingAnswer(view)) => {
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "error": "Please select an answer before submitting.",
                    "view": view,
                })),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// "View results": records the finished quiz and clears it.
pub async fn view_results(
    State(engine): State<Arc<QuizEngine>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let key = claims.session_key()?;
    let result = engine.finalize(&key).await?;
    Ok(Json(result))
}

/// Abandons the active quiz without recording a score.
pub async fn abandon_quiz(
    State(engine): State<Arc<QuizEngine>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let key = claims.session_key()?;
    engine.abandon(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}
