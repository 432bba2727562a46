// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, quiz, scores},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, categories, quiz, scores).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool, config, quiz engine).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let require_auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .merge(
            Router::new()
                .route("/logout", post(auth::logout))
                .layer(require_auth.clone()),
        );

    let quiz_routes = Router::new()
        .route(
            "/",
            get(quiz::current_question)
                .post(quiz::select_category)
                .delete(quiz::abandon_quiz),
        )
        .route("/answer", post(quiz::submit_answer))
        .route("/results", post(quiz::view_results))
        .layer(require_auth.clone());

    let score_routes = Router::new()
        .route("/", get(scores::list_scores))
        .layer(require_auth);

    Router::new()
        .route("/api/categories", get(quiz::list_categories))
        .nest("/api/auth", auth_routes)
        .nest("/api/quiz", quiz_routes)
        .nest("/api/scores", score_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
