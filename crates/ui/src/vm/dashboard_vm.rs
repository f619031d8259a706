use quiz_core::model::{CompletedQuizSummary, Quiz, QuizId};
use services::AppServices;

use crate::state::{ViewError, ViewState};
use crate::vm::time_fmt::{format_optional_datetime, format_points};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvailableQuizCardVm {
    pub id: QuizId,
    pub title: String,
    pub description: String,
    pub time_limit_label: String,
    pub question_count: usize,
    pub max_score_label: String,
    /// Publication date, `-` when unknown.
    pub created_at_str: String,
}

impl From<&Quiz> for AvailableQuizCardVm {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            time_limit_label: format!("{} min", quiz.time_limit_minutes),
            question_count: quiz.questions.len(),
            max_score_label: format!("{} points", format_points(quiz.max_score())),
            created_at_str: format_optional_datetime(quiz.date_of_creation),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompletedQuizCardVm {
    pub quiz_id: QuizId,
    pub title: String,
    pub score_line: String,
    pub progress_percent: f64,
    pub completed_at_str: String,
}

impl From<&CompletedQuizSummary> for CompletedQuizCardVm {
    fn from(item: &CompletedQuizSummary) -> Self {
        Self {
            quiz_id: item.quiz_id,
            title: item.quiz_title.clone(),
            score_line: format!(
                "{}/{}",
                format_points(item.score),
                format_points(item.max_score)
            ),
            progress_percent: item.progress_percent(),
            completed_at_str: format_optional_datetime(item.completion_time),
        }
    }
}

#[must_use]
pub fn map_available_quiz_cards(quizzes: &[Quiz]) -> Vec<AvailableQuizCardVm> {
    quizzes.iter().map(AvailableQuizCardVm::from).collect()
}

#[must_use]
pub fn map_completed_quiz_cards(items: &[CompletedQuizSummary]) -> Vec<CompletedQuizCardVm> {
    items.iter().map(CompletedQuizCardVm::from).collect()
}

/// Both dashboard listings; each fails independently.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardVm {
    pub available: ViewState<Vec<AvailableQuizCardVm>>,
    pub completed: ViewState<Vec<CompletedQuizCardVm>>,
}

pub async fn load_dashboard(services: &AppServices) -> DashboardVm {
    let available = services
        .available_quizzes()
        .await
        .map(|quizzes| map_available_quiz_cards(&quizzes))
        .map_err(|err| {
            tracing::warn!(error = %err, "failed to load quizzes");
            ViewError::Unknown
        });
    let completed = services
        .performance()
        .completed_quizzes()
        .await
        .map(|items| map_completed_quiz_cards(&items))
        .map_err(|err| {
            tracing::warn!(error = %err, "failed to load completed quizzes");
            ViewError::Unknown
        });

    DashboardVm {
        available: ViewState::from_result(available),
        completed: ViewState::from_result(completed),
    }
}
