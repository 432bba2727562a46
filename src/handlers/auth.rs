// src/handlers/auth.rs

use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde_json::json;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{CreateUserRequest, LoginRequest, User},
    quiz::QuizEngine,
    utils::{
        hash::{hash_password, verify_password},
        jwt::{Claims, sign_jwt},
    },
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created and the user object (excluding password).
pub async fn register(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password, created_at)
        VALUES (?, ?, ?)
        RETURNING id, username, password, created_at
        "#,
    )
    .bind(&payload.username)
    .bind(hashed_password)
    .bind(Utc::now())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        let is_unique = e
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation());
        if is_unique {
            AppError::Conflict(format!("Username '{}' already exists", payload.username))
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    tracing::info!(user_id = user.id, "Registered user {}", user.username);

    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticates a user and returns a JWT token.
///
/// The password must match the stored Argon2 hash. Each login gets a fresh
/// session id, so quiz progress is never shared between logins.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password, created_at
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(&payload.username)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let invalid = || AppError::AuthError("Invalid username or password.".to_string());

    let user = user.ok_or_else(invalid)?;

    if !verify_password(&payload.password, &user.password) {
        return Err(invalid());
    }

    let session_id = Uuid::new_v4().to_string();
    let token = sign_jwt(user.id, &session_id, &config.jwt_secret, config.jwt_expiration)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "username": user.username,
    })))
}

/// Ends the login session and drops any quiz state it held.
pub async fn logout(
    State(engine): State<Arc<QuizEngine>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let key = claims.session_key()?;
    engine.store().discard(&key).await;

    tracing::info!(user_id = key.user_id, "User logged out");

    Ok(Json(json!({ "message": "Successfully logged out!" })))
}
