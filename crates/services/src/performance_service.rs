use std::sync::Arc;

use quiz_core::PerformanceReport;
use quiz_core::model::{CompletedQuizSummary, QuizId};

use crate::error::ApiError;
use crate::quiz_api::QuizApi;

/// Loads graded attempts and turns them into review reports.
#[derive(Clone)]
pub struct PerformanceService {
    api: Arc<dyn QuizApi>,
}

impl PerformanceService {
    #[must_use]
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        Self { api }
    }

    /// Completed quizzes for the dashboard listing.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request cannot be made or decoded.
    pub async fn completed_quizzes(&self) -> Result<Vec<CompletedQuizSummary>, ApiError> {
        self.api.list_completed().await
    }

    /// Review report for the student's attempt at `quiz_id`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the performance payload cannot be fetched.
    pub async fn load_report(&self, quiz_id: QuizId) -> Result<PerformanceReport, ApiError> {
        let payload = self.api.fetch_performance(quiz_id).await?;
        tracing::debug!(%quiz_id, questions = payload.questions.len(), "performance loaded");
        Ok(PerformanceReport::from_payload(&payload))
    }
}
