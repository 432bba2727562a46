// src/config.rs

use std::env;
use std::str::FromStr;

use dotenvy::dotenv;

/// Number of questions requested from the provider per quiz.
pub const DEFAULT_QUESTIONS_PER_QUIZ: u32 = 10;

/// Upper bound accepted by Open Trivia DB for a single batch.
pub const MAX_QUESTIONS_PER_QUIZ: u32 = 50;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds. Also used as the idle TTL of quiz sessions.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub listen_addr: String,
    pub provider_base_url: String,
    pub provider_timeout_secs: u64,
    pub questions_per_quiz: u32,
    /// Accounts created at startup when missing, as (username, password).
    pub seed_users: Vec<(String, String)>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://quiz_app.db".to_string());

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let listen_addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let provider_base_url = env::var("PROVIDER_BASE_URL")
            .unwrap_or_else(|_| "https://opentdb.com".to_string());

        let questions_per_quiz = parse_var("QUESTIONS_PER_QUIZ", DEFAULT_QUESTIONS_PER_QUIZ)
            .clamp(1, MAX_QUESTIONS_PER_QUIZ);

        let seed_users = env::var("SEED_USERS")
            .map(|raw| parse_seed_users(&raw))
            .unwrap_or_default();

        Self {
            database_url,
            jwt_secret,
            jwt_expiration: parse_var("JWT_EXPIRATION", 86_400),
            rust_log,
            listen_addr,
            provider_base_url,
            provider_timeout_secs: parse_var("PROVIDER_TIMEOUT_SECS", 8),
            questions_per_quiz,
            seed_users,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parses `name:password,name:password`. Malformed entries are skipped.
pub fn parse_seed_users(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|entry| {
            let (name, password) = entry.trim().split_once(':')?;
            if name.is_empty() || password.is_empty() {
                return None;
            }
            Some((name.to_string(), password.to_string()))
        })
        .collect()
}
