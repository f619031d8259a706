use quiz_core::model::QuizId;
use quiz_core::{PerformanceReport, QuestionReview, ScoreBand};
use services::{ApiError, AppServices};

use crate::state::{ViewError, ViewState};
use crate::vm::time_fmt::{format_optional_datetime, format_percent, format_points};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewedAnswerVm {
    pub text: String,
    pub correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionReviewVm {
    pub heading: String,
    pub text: String,
    pub points_label: String,
    pub answers: Vec<ReviewedAnswerVm>,
    /// Correct answers, present only for questions graded as wrong.
    pub correct_answers: Option<Vec<String>>,
}

impl QuestionReviewVm {
    pub const NO_ANSWER: &'static str = "No answer given";

    #[must_use]
    pub fn has_answers(&self) -> bool {
        !self.answers.is_empty()
    }
}

impl From<&QuestionReview> for QuestionReviewVm {
    fn from(review: &QuestionReview) -> Self {
        Self {
            heading: format!("Question {}", review.number),
            text: review.text.clone(),
            points_label: format!("{} points", format_points(review.points)),
            answers: review
                .user_answers
                .iter()
                .map(|answer| ReviewedAnswerVm {
                    text: answer.text.clone(),
                    correct: answer.correct,
                })
                .collect(),
            correct_answers: review
                .show_correct_answers
                .then(|| review.correct_answers.clone()),
        }
    }
}

/// Presentation state of the performance modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PerformanceVm {
    pub title: String,
    pub score_line: String,
    pub percentage_label: String,
    pub band: ScoreBand,
    pub band_label: &'static str,
    pub completed_at_str: String,
    pub questions: Vec<QuestionReviewVm>,
}

impl From<&PerformanceReport> for PerformanceVm {
    fn from(report: &PerformanceReport) -> Self {
        Self {
            title: format!("Performance details - {}", report.quiz_title()),
            score_line: format!(
                "{} points / {}",
                format_points(report.score()),
                format_points(report.max_score())
            ),
            percentage_label: format_percent(report.percentage()),
            band: report.band(),
            band_label: report.band().label(),
            completed_at_str: format_optional_datetime(report.completion_time()),
            questions: report
                .questions()
                .iter()
                .map(QuestionReviewVm::from)
                .collect(),
        }
    }
}

/// Fetch the review for `quiz_id`; a missing attempt maps to `NotFound`.
pub async fn load_performance(
    services: &AppServices,
    quiz_id: QuizId,
) -> ViewState<PerformanceVm> {
    let result = services
        .performance()
        .load_report(quiz_id)
        .await
        .map(|report| PerformanceVm::from(&report))
        .map_err(|err| match err {
            ApiError::HttpStatus(status) if status.as_u16() == 404 => ViewError::NotFound,
            err => {
                tracing::warn!(%quiz_id, error = %err, "failed to load performance");
                ViewError::Unknown
            }
        });
    ViewState::from_result(result)
}
