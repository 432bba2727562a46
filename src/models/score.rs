// src/models/score.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type ScoreId = i64;

/// Represents the 'scores' table in the database.
/// One row per completed quiz; rows are never updated.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Score {
    pub id: ScoreId,
    pub user_id: i64,
    /// Number of correctly answered questions.
    pub score: i64,
    pub total_questions: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO returned when a quiz is finalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResult {
    pub score_id: ScoreId,
    pub correct_count: i64,
    pub total_questions: i64,
}
