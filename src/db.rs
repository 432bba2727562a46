// src/db.rs

use std::{str::FromStr, time::Duration};

use chrono::Utc;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::{error::AppError, utils::hash::hash_password};

/// Opens the SQLite pool, creating the database file when missing.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await
}

/// Like [`connect`], retrying up to `attempts` times two seconds apart.
pub async fn connect_with_retry(database_url: &str, attempts: u32) -> Result<SqlitePool, sqlx::Error> {
    let mut retry_count = 0;
    loop {
        match connect(database_url).await {
            Ok(pool) => return Ok(pool),
            Err(e) if retry_count < attempts => {
                retry_count += 1;
                tracing::warn!(
                    "Database not ready, retrying in 2s... (Attempt {}): {}",
                    retry_count,
                    e
                );
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Creates the given accounts when their username is free.
/// Passwords are hashed the same way registration hashes them.
///
/// Returns how many accounts were inserted.
pub async fn seed_users(pool: &SqlitePool, users: &[(String, String)]) -> Result<usize, AppError> {
    let mut created = 0;

    for (username, password) in users {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;

        if exists.is_some() {
            continue;
        }

        let hashed_password = hash_password(password)?;
        sqlx::query("INSERT INTO users (username, password, created_at) VALUES (?, ?, ?)")
            .bind(username)
            .bind(hashed_password)
            .bind(Utc::now())
            .execute(pool)
            .await?;

        tracing::info!("Seeded user: {}", username);
        created += 1;
    }

    Ok(created)
}
