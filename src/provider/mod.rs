// src/provider/mod.rs

//! Access to the external trivia-question API.
//!
//! The quiz engine only talks to [`QuestionProvider`]; [`opentdb::OpenTdbClient`]
//! is the production implementation.

pub mod opentdb;

use std::fmt;

use async_trait::async_trait;
use rand::{Rng, seq::SliceRandom};

use crate::models::{category::CategoryId, question::Question};

pub use opentdb::OpenTdbClient;

/// Opaque provider session token. Prevents repeated questions within one login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderToken(pub String);

impl ProviderToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Non-success status, transport failure, timeout or undecodable body.
    Unavailable(String),

    /// The provider answered successfully but returned no questions.
    EmptyResult,

    /// The token is unknown to the provider or has run out of questions.
    TokenRejected,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Unavailable(msg) => write!(f, "question provider unavailable: {}", msg),
            ProviderError::EmptyResult => write!(f, "question provider returned no questions"),
            ProviderError::TokenRejected => write!(f, "question provider rejected the session token"),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Unavailable(err.to_string())
    }
}

#[async_trait]
pub trait QuestionProvider: Send + Sync {
    async fn acquire_token(&self) -> Result<ProviderToken, ProviderError>;

    /// Fetches up to `count` questions. Never returns an empty batch.
    async fn fetch_questions(
        &self,
        token: &ProviderToken,
        category: CategoryId,
        count: u32,
    ) -> Result<Vec<Question>, ProviderError>;
}

/// A question as delivered by the provider, before its options are merged.
#[derive(Debug, Clone)]
pub struct RawQuestion {
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

impl RawQuestion {
    /// Merges the correct answer into the incorrect ones and shuffles them.
    pub fn into_question<R: Rng + ?Sized>(self, rng: &mut R) -> Question {
        let mut options = self.incorrect_answers;
        options.push(self.correct_answer.clone());
        options.shuffle(rng);

        Question {
            text: self.question,
            options,
            correct_answer: self.correct_answer,
        }
    }
}
