// src/quiz/engine.rs

use std::sync::Arc;

use super::{QuizError, QuizPhase, QuizSessionStore, ScoreRecorder, SessionKey};
use crate::{
    models::{
        category::CategoryId,
        question::{QuestionView, QuizView},
        score::QuizResult,
    },
    provider::{ProviderError, QuestionProvider},
};

/// Drives a login session's quiz from category selection to a recorded score.
///
/// Every operation holds the session's lock from the first read to the last
/// write, so repeated or concurrent submissions are applied one at a time.
pub struct QuizEngine {
    provider: Arc<dyn QuestionProvider>,
    recorder: ScoreRecorder,
    store: QuizSessionStore,
    questions_per_quiz: u32,
}

fn log_transition(key: &SessionKey, from: QuizPhase, to: QuizPhase) {
    tracing::debug!(user_id = key.user_id, ?from, ?to, "Quiz transition");
}

impl QuizEngine {
    pub fn new(
        provider: Arc<dyn QuestionProvider>,
        recorder: ScoreRecorder,
        store: QuizSessionStore,
        questions_per_quiz: u32,
    ) -> Self {
        Self {
            provider,
            recorder,
            store,
            questions_per_quiz,
        }
    }

    pub fn recorder(&self) -> &ScoreRecorder {
        &self.recorder
    }

    pub fn store(&self) -> &QuizSessionStore {
        &self.store
    }

    pub async fn phase(&self, key: &SessionKey) -> QuizPhase {
        self.store.lock(key).await.phase()
    }

    /// Starts a quiz for `category` and returns its first question.
    ///
    /// On any provider failure the session is left without a quiz.
    pub async fn select_category(
        &self,
        key: &SessionKey,
        category: CategoryId,
    ) -> Result<QuestionView, QuizError> {
        let mut slot = self.store.lock(key).await;

        if slot.phase() != QuizPhase::Uninitialized {
            return Err(QuizError::SessionActive);
        }

        let mut phase = QuizPhase::Uninitialized;
        let token = match slot.cached_token().cloned() {
            Some(token) => token,
            None => {
                log_transition(key, phase, QuizPhase::AwaitingToken);
                phase = QuizPhase::AwaitingToken;
                let token = self.provider.acquire_token().await.map_err(|e| {
                    tracing::warn!(user_id = key.user_id, "Failed to acquire provider token: {}", e);
                    QuizError::from(e)
                })?;
                slot.cache_token(token.clone());
                token
            }
        };

        log_transition(key, phase, QuizPhase::AwaitingQuestions);
        let questions = self
            .provider
            .fetch_questions(&token, category, self.questions_per_quiz)
            .await
            .map_err(|e| {
                tracing::warn!(user_id = key.user_id, category, "Failed to fetch questions: {}", e);
                if e == ProviderError::TokenRejected {
                    slot.forget_token();
                }
                QuizError::from(e)
            })?;

        let quiz = slot.initialize(category, questions)?;
        log_transition(key, QuizPhase::AwaitingQuestions, quiz.phase());
        tracing::info!(
            user_id = key.user_id,
            category,
            total_questions = quiz.total_questions(),
            "Quiz started"
        );

        match quiz.view() {
            QuizView::Question(view) => Ok(view),
            QuizView::Complete { .. } => Err(QuizError::EmptyResult),
        }
    }

    /// Re-renders the active quiz without changing it.
    pub async fn current(&self, key: &SessionKey) -> Result<QuizView, QuizError> {
        let slot = self.store.lock(key).await;
        Ok(slot.get()?.view())
    }

    /// Judges `answer` against the question on screen and moves on.
    ///
    /// A missing answer leaves the quiz untouched and hands back the view
    /// still on screen. Once every question is answered further submissions
    /// only report completion.
    pub async fn submit_answer(
        &self,
        key: &SessionKey,
        answer: Option<&str>,
    ) -> Result<QuizView, QuizError> {
        let mut slot = self.store.lock(key).await;
        let quiz = slot.get()?;

        let Some(question) = quiz.current_question() else {
            return Ok(quiz.view());
        };

        let answer = match answer {
            Some(a) if !a.is_empty() => a,
            _ => return Err(QuizError::MissingAnswer(quiz.view())),
        };

        let was_correct = question.is_correct(answer);
        let from = quiz.phase();
        let quiz = slot.advance(was_correct)?;
        log_transition(key, from, quiz.phase());

        Ok(quiz.view())
    }

    /// Records the score of a completed quiz and clears it.
    ///
    /// The quiz is only cleared after the score row is written; both happen
    /// under the session lock, so a second call finds no session.
    pub async fn finalize(&self, key: &SessionKey) -> Result<QuizResult, QuizError> {
        let mut slot = self.store.lock(key).await;
        let quiz = slot.get()?;

        if !quiz.is_complete() {
            return Err(QuizError::QuizIncomplete);
        }

        let correct_count = quiz.correct_count() as i64;
        let total_questions = quiz.total_questions() as i64;

        let score_id = self
            .recorder
            .record(key.user_id, correct_count, total_questions)
            .await?;

        slot.clear();
        log_transition(key, QuizPhase::Complete, QuizPhase::Uninitialized);
        tracing::info!(
            user_id = key.user_id,
            score_id,
            correct_count,
            total_questions,
            "Quiz finalized"
        );

        Ok(QuizResult {
            score_id,
            correct_count,
            total_questions,
        })
    }

    /// Drops the active quiz without recording a score.
    pub async fn abandon(&self, key: &SessionKey) -> Result<(), QuizError> {
        let mut slot = self.store.lock(key).await;
        let from = slot.get()?.phase();
        slot.clear();
        log_transition(key, from, QuizPhase::Uninitialized);
        Ok(())
    }
}
