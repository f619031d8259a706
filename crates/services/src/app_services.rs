use std::sync::Arc;

use quiz_core::SessionError;
use quiz_core::model::Quiz;

use crate::config::ApiConfig;
use crate::error::{ApiError, AppServicesError};
use crate::performance_service::PerformanceService;
use crate::quiz_api::{HttpQuizApi, QuizApi};
use crate::sessions::{SessionOptions, TimedQuizSession};
use crate::submitter::{ApiSubmitter, Submitter};

/// Assembles the services the student-facing screens use.
#[derive(Clone)]
pub struct AppServices {
    api: Arc<dyn QuizApi>,
    submitter: Arc<dyn Submitter>,
    performance: Arc<PerformanceService>,
    session_options: SessionOptions,
}

impl AppServices {
    /// Build services backed by the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self, AppServicesError> {
        if config.credential.is_none() {
            tracing::warn!("no QUIZ_API_TOKEN configured, requests are unauthenticated");
        }
        let api: Arc<dyn QuizApi> = Arc::new(HttpQuizApi::new(config)?);
        Ok(Self::with_api(api))
    }

    /// Build services over any `QuizApi`.
    #[must_use]
    pub fn with_api(api: Arc<dyn QuizApi>) -> Self {
        let submitter: Arc<dyn Submitter> = Arc::new(ApiSubmitter::new(Arc::clone(&api)));
        let performance = Arc::new(PerformanceService::new(Arc::clone(&api)));
        Self {
            api,
            submitter,
            performance,
            session_options: SessionOptions::default(),
        }
    }

    #[must_use]
    pub fn with_session_options(mut self, options: SessionOptions) -> Self {
        self.session_options = options;
        self
    }

    #[must_use]
    pub fn performance(&self) -> Arc<PerformanceService> {
        Arc::clone(&self.performance)
    }

    /// Quizzes the student can start.
    ///
    /// Quizzes that break authoring rules are still listed; taking them only
    /// needs questions and a time limit.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request cannot be made or decoded.
    pub async fn available_quizzes(&self) -> Result<Vec<Quiz>, ApiError> {
        let quizzes = self.api.list_quizzes().await?;
        for quiz in &quizzes {
            if let Err(err) = quiz.validate() {
                tracing::warn!(quiz_id = %quiz.id, error = %err, "quiz failed authoring checks");
            }
        }
        Ok(quizzes)
    }

    /// Start a timed attempt that submits through the configured API.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the quiz cannot be taken.
    pub fn start_quiz(&self, quiz: Quiz) -> Result<TimedQuizSession, SessionError> {
        TimedQuizSession::start_with(quiz, Arc::clone(&self.submitter), self.session_options)
    }
}
