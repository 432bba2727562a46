// src/state.rs

use std::sync::Arc;

use crate::config::Config;
use crate::quiz::QuizEngine;
use axum::extract::FromRef;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub engine: Arc<QuizEngine>,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<QuizEngine> {
    fn from_ref(state: &AppState) -> Self {
        state.engine.clone()
    }
}
