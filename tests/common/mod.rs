// tests/common/mod.rs

#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use trivia::{
    config::Config,
    db,
    models::{category::CategoryId, question::Question},
    provider::{ProviderError, ProviderToken, QuestionProvider},
    quiz::{QuizEngine, QuizSessionStore, ScoreRecorder},
    routes,
    state::AppState,
};

/// Provider that hands out queued batches in order.
#[derive(Default)]
pub struct StubProvider {
    batches: Mutex<VecDeque<Result<Vec<Question>, ProviderError>>>,
}

impl StubProvider {
    pub fn with(batches: Vec<Result<Vec<Question>, ProviderError>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
        }
    }
}

#[async_trait]
impl QuestionProvider for StubProvider {
    async fn acquire_token(&self) -> Result<ProviderToken, ProviderError> {
        Ok(ProviderToken("stub-token".to_string()))
    }

    async fn fetch_questions(
        &self,
        _token: &ProviderToken,
        _category: CategoryId,
        _count: u32,
    ) -> Result<Vec<Question>, ProviderError> {
        self.batches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ProviderError::EmptyResult))
    }
}

/// `n` questions whose correct answer is always "right".
pub fn questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| Question {
            text: format!("Question {}", i + 1),
            options: vec!["wrong".to_string(), "right".to_string(), "nope".to_string()],
            correct_answer: "right".to_string(),
        })
        .collect()
}

pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
    pub client: reqwest::Client,
}

/// Spawns the app on a random port backed by an in-memory database.
pub async fn spawn_app(provider: StubProvider) -> TestApp {
    // A single connection that never recycles keeps the in-memory DB alive.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    db::run_migrations(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        listen_addr: "127.0.0.1:0".to_string(),
        provider_base_url: "http://127.0.0.1:9".to_string(),
        provider_timeout_secs: 1,
        questions_per_quiz: 10,
        seed_users: Vec::new(),
    };

    let engine = QuizEngine::new(
        Arc::new(provider),
        ScoreRecorder::new(pool.clone()),
        QuizSessionStore::new(Duration::from_secs(config.jwt_expiration)),
        config.questions_per_quiz,
    );

    let state = AppState {
        pool: pool.clone(),
        config,
        engine: Arc::new(engine),
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        pool,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/register"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Register request failed")
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Login request failed")
    }

    /// Registers and logs in, returning the bearer token.
    pub async fn signed_in(&self, username: &str) -> String {
        self.register(username, "password123").await;
        self.login_token(username).await
    }

    pub async fn login_token(&self, username: &str) -> String {
        let body: serde_json::Value = self
            .login(username, "password123")
            .await
            .json()
            .await
            .expect("Failed to parse login json");
        body["token"].as_str().expect("Token not found").to_string()
    }

    pub async fn select_category(&self, token: &str, category: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/quiz"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "category": category }))
            .send()
            .await
            .unwrap()
    }

    pub async fn answer(&self, token: &str, answer: Option<&str>) -> reqwest::Response {
        self.client
            .post(self.url("/api/quiz/answer"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "answer": answer }))
            .send()
            .await
            .unwrap()
    }

    pub async fn current(&self, token: &str) -> reqwest::Response {
        self.client
            .get(self.url("/api/quiz"))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
    }

    pub async fn results(&self, token: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/quiz/results"))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
    }

    pub async fn scores(&self, token: &str) -> Vec<serde_json::Value> {
        self.client
            .get(self.url("/api/scores"))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }
}
