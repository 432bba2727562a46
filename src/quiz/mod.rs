// src/quiz/mod.rs

//! Quiz flow: per-login session state, the state machine driving it, and
//! score persistence.

pub mod engine;
pub mod recorder;
pub mod session;
pub mod store;

use std::fmt;

use crate::{models::question::QuizView, provider::ProviderError};

pub use engine::QuizEngine;
pub use recorder::ScoreRecorder;
pub use session::QuizSession;
pub use store::{QuizSessionStore, SessionKey};

/// Observable state of one login session's quiz flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Uninitialized,
    AwaitingToken,
    AwaitingQuestions,
    /// Holds the 0-based index of the question on screen.
    InProgress(usize),
    Complete,
}

#[derive(Debug)]
pub enum QuizError {
    /// The question provider failed or could not be reached.
    ProviderUnavailable(String),

    /// The provider returned no usable questions.
    EmptyResult,

    /// An answer was submitted without a selected option. Carries the
    /// unchanged view, taken under the same lock.
    MissingAnswer(QuizView),

    /// No quiz is active for this login session.
    SessionNotFound,

    /// A quiz is already active; it must be finished or abandoned first.
    SessionActive,

    /// Results were requested before every question was answered.
    QuizIncomplete,

    /// Every question has already been answered.
    QuizComplete,

    Database(sqlx::Error),
}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizError::ProviderUnavailable(msg) => write!(f, "provider unavailable: {}", msg),
            QuizError::EmptyResult => write!(f, "provider returned no questions"),
            QuizError::MissingAnswer(_) => write!(f, "no answer selected"),
            QuizError::SessionNotFound => write!(f, "no active quiz session"),
            QuizError::SessionActive => write!(f, "a quiz is already in progress"),
            QuizError::QuizIncomplete => write!(f, "quiz has unanswered questions"),
            QuizError::QuizComplete => write!(f, "all questions already answered"),
            QuizError::Database(err) => write!(f, "database error: {}", err),
        }
    }
}

impl std::error::Error for QuizError {}

impl From<ProviderError> for QuizError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unavailable(msg) => QuizError::ProviderUnavailable(msg),
            ProviderError::EmptyResult | ProviderError::TokenRejected => QuizError::EmptyResult,
        }
    }
}

impl From<sqlx::Error> for QuizError {
    fn from(err: sqlx::Error) -> Self {
        QuizError::Database(err)
    }
}
