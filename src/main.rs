// src/main.rs

use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use trivia::config::Config;
use trivia::db;
use trivia::provider::OpenTdbClient;
use trivia::quiz::{QuizEngine, QuizSessionStore, ScoreRecorder};
use trivia::routes;
use trivia::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Initialize Database Pool with Retry
    let pool = db::connect_with_retry(&config.database_url, 5)
        .await
        .expect("Failed to connect to database after 5 retries");
    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    if let Err(e) = db::seed_users(&pool, &config.seed_users).await {
        tracing::error!("Failed to seed users: {:?}", e);
    }

    let provider = OpenTdbClient::new(
        &config.provider_base_url,
        Duration::from_secs(config.provider_timeout_secs),
    )
    .expect("Failed to build question provider client");

    let engine = QuizEngine::new(
        Arc::new(provider),
        ScoreRecorder::new(pool.clone()),
        QuizSessionStore::new(Duration::from_secs(config.jwt_expiration)),
        config.questions_per_quiz,
    );

    let state = AppState {
        pool,
        config: config.clone(),
        engine: Arc::new(engine),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!("Listening on {}", config.listen_addr);

    // Start the server
    axum::serve(listener, app).await.expect("Server error");
}
