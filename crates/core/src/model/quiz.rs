use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{AnswerId, QuestionId, QuizId};
use crate::model::wire::{lenient_timestamp, null_as_default};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has no questions")]
    NoQuestions,

    #[error("time limit must be > 0 minutes")]
    InvalidTimeLimit,

    #[error("question {question} has fewer than two answers")]
    TooFewAnswers { question: QuestionId },
}

//
// ─── ANSWER ────────────────────────────────────────────────────────────────────
//

/// One selectable option of a question.
///
/// `is_correct` is only present on authoring payloads; the taking session never
/// reads it because grading happens on the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: AnswerId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

impl Answer {
    #[must_use]
    pub fn new(id: AnswerId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            is_correct: None,
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub answers: Vec<Answer>,
}

impl Question {
    #[must_use]
    pub fn new(id: QuestionId, text: impl Into<String>, points: f64, answers: Vec<Answer>) -> Self {
        Self {
            id,
            text: text.into(),
            points,
            answers,
        }
    }

    #[must_use]
    pub fn answer(&self, id: AnswerId) -> Option<&Answer> {
        self.answers.iter().find(|answer| answer.id == id)
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// A quiz as delivered by the backend, ready to be taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: QuizId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Time limit in minutes.
    #[serde(
        rename = "timeLimit",
        alias = "timeLimitMinutes",
        default,
        deserialize_with = "null_as_default"
    )]
    pub time_limit_minutes: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub questions: Vec<Question>,
    /// When the quiz was published, if the backend reports it.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_of_creation: Option<DateTime<Utc>>,
}

impl Quiz {
    #[must_use]
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        time_limit_minutes: u32,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            time_limit_minutes,
            questions,
            date_of_creation: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_date_of_creation(mut self, created_at: DateTime<Utc>) -> Self {
        self.date_of_creation = Some(created_at);
        self
    }

    #[must_use]
    pub fn time_limit_seconds(&self) -> u32 {
        self.time_limit_minutes.saturating_mul(60)
    }

    /// Sum of the points of every question.
    #[must_use]
    pub fn max_score(&self) -> f64 {
        self.questions.iter().map(|question| question.points).sum()
    }

    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    /// Checks the authoring invariants.
    ///
    /// The taking session does not require this to pass; it only refuses a
    /// quiz without questions.
    ///
    /// # Errors
    ///
    /// Returns the first violated `QuizError`.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        if self.time_limit_minutes == 0 {
            return Err(QuizError::InvalidTimeLimit);
        }
        if let Some(question) = self.questions.iter().find(|q| q.answers.len() < 2) {
            return Err(QuizError::TooFewAnswers {
                question: question.id,
            });
        }
        Ok(())
    }
}
