use std::sync::Arc;

use async_trait::async_trait;

use quiz_core::SubmitOutcome;
use quiz_core::model::{AnswerSelections, QuizId};

use crate::error::ApiError;
use crate::quiz_api::QuizApi;

/// Delivers a finished attempt. Called at most once per session.
///
/// Implementations report every failure through the returned outcome.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, quiz_id: QuizId, answers: AnswerSelections) -> SubmitOutcome;
}

/// Submits through a `QuizApi`, which already carries the credential.
#[derive(Clone)]
pub struct ApiSubmitter {
    api: Arc<dyn QuizApi>,
}

impl ApiSubmitter {
    #[must_use]
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Submitter for ApiSubmitter {
    async fn submit(&self, quiz_id: QuizId, answers: AnswerSelections) -> SubmitOutcome {
        match self.api.submit(quiz_id, &answers).await {
            Ok(()) => SubmitOutcome::Accepted,
            Err(ApiError::HttpStatus(status)) => {
                tracing::warn!(%quiz_id, %status, "quiz submission rejected");
                SubmitOutcome::Rejected {
                    status: status.as_u16(),
                }
            }
            Err(err) => {
                tracing::error!(%quiz_id, error = %err, "quiz submission failed");
                SubmitOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}
