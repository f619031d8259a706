use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{AnswerId, QuizId};
use crate::model::wire::{lenient_timestamp, null_as_default};

/// One question of a completed attempt as graded by the backend.
///
/// Answers are reported by display text. The id lists are optional and only
/// present when the backend provides them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnsweredQuestion {
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub points: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub is_correct: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub user_answers: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub correct_answers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_answer_ids: Option<Vec<AnswerId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer_ids: Option<Vec<AnswerId>>,
}

/// Graded record of one completed attempt.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletedQuizPerformance {
    #[serde(deserialize_with = "null_as_default")]
    pub quiz_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub completion_time: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub questions: Vec<AnsweredQuestion>,
}

/// Dashboard entry for a quiz the student has already completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedQuizSummary {
    pub quiz_id: QuizId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quiz_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub max_score: f64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub completion_time: Option<DateTime<Utc>>,
}

impl CompletedQuizSummary {
    /// Score as a share of the maximum, in percent; 0 when there is no maximum.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        if self.max_score > 0.0 {
            (self.score / self.max_score * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}
