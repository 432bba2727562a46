// src/quiz/session.rs

use super::{QuizError, QuizPhase};
use crate::models::{
    category::CategoryId,
    question::{Question, QuestionView, QuizView},
};

/// Progress through one fetched batch of questions.
///
/// Fields are private so that `correct_count <= current_index <= total_questions`
/// holds at every observable point.
#[derive(Debug, Clone)]
pub struct QuizSession {
    category: CategoryId,
    questions: Vec<Question>,
    current_index: usize,
    correct_count: usize,
}

impl QuizSession {
    pub(crate) fn new(category: CategoryId, questions: Vec<Question>) -> Self {
        Self {
            category,
            questions,
            current_index: 0,
            correct_count: 0,
        }
    }

    pub fn category(&self) -> CategoryId {
        self.category
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    pub fn phase(&self) -> QuizPhase {
        if self.is_complete() {
            QuizPhase::Complete
        } else {
            QuizPhase::InProgress(self.current_index)
        }
    }

    /// `None` once every question has been answered.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn view(&self) -> QuizView {
        match self.current_question() {
            Some(q) => QuizView::Question(QuestionView {
                question: q.text.clone(),
                options: q.options.clone(),
                current_question: self.current_index + 1,
                total_questions: self.total_questions(),
            }),
            None => QuizView::Complete {
                total_questions: self.total_questions(),
            },
        }
    }

    pub(crate) fn advance(&mut self, was_correct: bool) -> Result<(), QuizError> {
        if self.is_complete() {
            return Err(QuizError::QuizComplete);
        }
        self.current_index += 1;
        if was_correct {
            self.correct_count += 1;
        }
        Ok(())
    }
}
