// src/models/question.rs

use serde::{Deserialize, Serialize};

/// A multiple-choice question held by an active quiz.
///
/// `options` already contains `correct_answer` at a random position.
/// Text is in final displayable form, so answers are judged by exact equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl Question {
    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }
}

/// DTO handed to the client for the question currently on screen
/// (excludes the correct answer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub question: String,
    pub options: Vec<String>,
    /// 1-based position of this question.
    pub current_question: usize,
    pub total_questions: usize,
}

/// What the client should show for the active quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuizView {
    Question(QuestionView),
    /// All questions answered; the client should request results.
    Complete { total_questions: usize },
}

/// DTO for the "answer submitted" event. `answer` is absent when nothing was selected.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub answer: Option<String>,
}
