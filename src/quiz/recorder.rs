// src/quiz/recorder.rs

use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::score::{Score, ScoreId};

/// Persists finished quizzes and reads them back.
#[derive(Clone)]
pub struct ScoreRecorder {
    pool: SqlitePool,
}

impl ScoreRecorder {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts one immutable score row.
    pub async fn record(
        &self,
        user_id: i64,
        correct_count: i64,
        total_questions: i64,
    ) -> Result<ScoreId, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO scores (user_id, score, total_questions, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(correct_count)
        .bind(total_questions)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// All scores of a user, newest first.
    pub async fn history(&self, user_id: i64) -> Result<Vec<Score>, sqlx::Error> {
        sqlx::query_as::<_, Score>(
            r#"
            SELECT id, user_id, score, total_questions, created_at
            FROM scores
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
