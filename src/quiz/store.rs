// src/quiz/store.rs

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{QuizError, QuizPhase, QuizSession};
use crate::{
    models::{category::CategoryId, question::Question},
    provider::ProviderToken,
};

/// Identifies one login session of one user.
/// A fresh `session_id` is minted at every login.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub user_id: i64,
    pub session_id: String,
}

/// Everything kept for a login session between requests.
#[derive(Debug)]
pub struct SessionSlot {
    /// Provider token, reused by every quiz started in this login session.
    token: Option<ProviderToken>,
    quiz: Option<QuizSession>,
    last_seen: Instant,
}

impl SessionSlot {
    fn new() -> Self {
        Self {
            token: None,
            quiz: None,
            last_seen: Instant::now(),
        }
    }

    pub fn cached_token(&self) -> Option<&ProviderToken> {
        self.token.as_ref()
    }

    pub fn cache_token(&mut self, token: ProviderToken) {
        self.token = Some(token);
    }

    pub fn forget_token(&mut self) {
        self.token = None;
    }

    pub fn phase(&self) -> QuizPhase {
        self.quiz
            .as_ref()
            .map(QuizSession::phase)
            .unwrap_or(QuizPhase::Uninitialized)
    }

    /// Starts a quiz. Only valid when no quiz is held.
    pub fn initialize(
        &mut self,
        category: CategoryId,
        questions: Vec<Question>,
    ) -> Result<&QuizSession, QuizError> {
        if self.quiz.is_some() {
            return Err(QuizError::SessionActive);
        }
        if questions.is_empty() {
            return Err(QuizError::EmptyResult);
        }
        Ok(&*self.quiz.insert(QuizSession::new(category, questions)))
    }

    pub fn get(&self) -> Result<&QuizSession, QuizError> {
        self.quiz.as_ref().ok_or(QuizError::SessionNotFound)
    }

    /// Moves to the next question, counting the answer when `was_correct`.
    pub fn advance(&mut self, was_correct: bool) -> Result<&QuizSession, QuizError> {
        let quiz = self.quiz.as_mut().ok_or(QuizError::SessionNotFound)?;
        quiz.advance(was_correct)?;
        Ok(&*quiz)
    }

    pub fn clear(&mut self) -> Option<QuizSession> {
        self.quiz.take()
    }

    fn is_idle(&self, ttl: Duration) -> bool {
        self.last_seen.elapsed() >= ttl
    }
}

/// Exclusive access to one login session's slot. Held for a whole transition.
pub type SessionGuard = OwnedMutexGuard<SessionSlot>;

/// Maps login sessions to their quiz state.
///
/// Each key has its own mutex, so transitions for the same login session are
/// serialized while different sessions proceed independently.
///
/// Logged-out keys are remembered for `ttl`, the lifetime of the JWT that
/// carries them, and refused by the auth middleware until then.
#[derive(Clone)]
pub struct QuizSessionStore {
    slots: Arc<Mutex<HashMap<SessionKey, Arc<Mutex<SessionSlot>>>>>,
    revoked: Arc<Mutex<HashMap<SessionKey, Instant>>>,
    ttl: Duration,
}

impl QuizSessionStore {
    /// Slots untouched for `ttl` are dropped.
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            revoked: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Locks the slot for `key`, creating it on first use.
    pub async fn lock(&self, key: &SessionKey) -> SessionGuard {
        let slot = {
            let mut slots = self.slots.lock().await;
            Self::sweep(&mut slots, self.ttl);
            slots
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(SessionSlot::new())))
                .clone()
        };

        let mut guard = slot.lock_owned().await;
        guard.last_seen = Instant::now();
        guard
    }

    /// Drops all state held for `key` and revokes it (logout).
    pub async fn discard(&self, key: &SessionKey) {
        self.revoked.lock().await.insert(key.clone(), Instant::now());
        self.slots.lock().await.remove(key);
    }

    /// Whether `key` was logged out within the last `ttl`.
    pub async fn is_revoked(&self, key: &SessionKey) -> bool {
        let mut revoked = self.revoked.lock().await;
        revoked.retain(|_, at| at.elapsed() < self.ttl);
        revoked.contains_key(key)
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    #[cfg(test)]
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn sweep(slots: &mut HashMap<SessionKey, Arc<Mutex<SessionSlot>>>, ttl: Duration) {
        let before = slots.len();
        slots.retain(|_, slot| {
            // Slots referenced elsewhere belong to an in-flight request.
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            match slot.try_lock() {
                Ok(s) => !s.is_idle(ttl),
                Err(_) => true,
            }
        });
        let swept = before - slots.len();
        if swept > 0 {
            tracing::debug!(swept, "Dropped idle quiz sessions");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(user_id: i64, session_id: &str) -> SessionKey {
        SessionKey {
            user_id,
            session_id: session_id.to_string(),
        }
    }

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question {
                text: format!("Q{}", i),
                options: vec!["a".to_string(), "b".to_string()],
                correct_answer: "a".to_string(),
            })
            .collect()
    }

    fn token() -> ProviderToken {
        ProviderToken("t".to_string())
    }

    #[tokio::test]
    async fn initialize_requires_an_empty_slot() {
        let store = QuizSessionStore::new(Duration::from_secs(60));
        let mut slot = store.lock(&key(1, "s")).await;

        assert!(matches!(slot.get(), Err(QuizError::SessionNotFound)));
        slot.initialize(9, questions(2)).unwrap();
        assert!(matches!(
            slot.initialize(9, questions(2)),
            Err(QuizError::SessionActive)
        ));

        slot.clear();
        let quiz = slot.initialize(10, questions(3)).unwrap();
        assert_eq!(quiz.category(), 10);
        assert_eq!(quiz.current_index(), 0);
        assert_eq!(quiz.correct_count(), 0);
    }

    #[tokio::test]
    async fn empty_batches_never_create_a_session() {
        let store = QuizSessionStore::new(Duration::from_secs(60));
        let mut slot = store.lock(&key(1, "s")).await;

        assert!(matches!(
            slot.initialize(9, Vec::new()),
            Err(QuizError::EmptyResult)
        ));
        assert_eq!(slot.phase(), QuizPhase::Uninitialized);
    }

    #[tokio::test]
    async fn state_survives_between_locks_and_is_isolated_per_key() {
        let store = QuizSessionStore::new(Duration::from_secs(60));

        {
            let mut slot = store.lock(&key(1, "first")).await;
            slot.initialize(9, questions(2)).unwrap();
            slot.advance(true).unwrap();
        }

        assert_eq!(store.lock(&key(1, "first")).await.phase(), QuizPhase::InProgress(1));
        // Same user, other login.
        assert_eq!(store.lock(&key(1, "second")).await.phase(), QuizPhase::Uninitialized);
        // Other user, same session id.
        assert_eq!(store.lock(&key(2, "first")).await.phase(), QuizPhase::Uninitialized);
    }

    #[tokio::test]
    async fn concurrent_advances_are_not_lost() {
        let store = QuizSessionStore::new(Duration::from_secs(60));
        let k = key(7, "s");
        store.lock(&k).await.initialize(9, questions(50)).unwrap();

        let mut handles = Vec::new();
        for i in 0..50 {
            let store = store.clone();
            let k = k.clone();
            handles.push(tokio::spawn(async move {
                let mut slot = store.lock(&k).await;
                tokio::task::yield_now().await;
                slot.advance(i % 2 == 0).unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let slot = store.lock(&k).await;
        let quiz = slot.get().unwrap();
        assert_eq!(quiz.current_index(), 50);
        assert_eq!(quiz.correct_count(), 25);
        assert_eq!(slot.phase(), QuizPhase::Complete);
    }

    #[tokio::test]
    async fn idle_slots_are_swept_and_discard_removes_state() {
        let store = QuizSessionStore::new(Duration::ZERO);
        store.lock(&key(1, "a")).await.cache_token(token());
        // Locking another key sweeps the idle one.
        drop(store.lock(&key(2, "b")).await);
        assert_eq!(store.len().await, 1);

        let store = QuizSessionStore::new(Duration::from_secs(60));
        store.lock(&key(1, "a")).await.cache_token(token());
        store.discard(&key(1, "a")).await;
        assert!(store.is_empty().await);
        assert!(store.lock(&key(1, "a")).await.cached_token().is_none());
    }

    #[tokio::test]
    async fn discarded_keys_stay_revoked_until_ttl() {
        let store = QuizSessionStore::new(Duration::from_secs(60));
        store.discard(&key(1, "a")).await;
        assert!(store.is_revoked(&key(1, "a")).await);
        // A later login gets a fresh session id.
        assert!(!store.is_revoked(&key(1, "b")).await);

        let store = QuizSessionStore::new(Duration::ZERO);
        store.discard(&key(1, "a")).await;
        assert!(!store.is_revoked(&key(1, "a")).await);
    }
}
