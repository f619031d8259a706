use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use quiz_core::model::{
    AnswerSelections, CompletedQuizPerformance, CompletedQuizSummary, Quiz, QuizId,
};

use crate::config::ApiConfig;
use crate::credential::Credential;
use crate::error::ApiError;

/// Student-facing endpoints of the quiz backend.
#[async_trait]
pub trait QuizApi: Send + Sync {
    /// Quizzes available to take. Non-success responses yield an empty list;
    /// transport and decode errors are returned.
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, ApiError>;

    /// Quizzes already completed by the student. Non-success responses yield an
    /// empty list; transport and decode errors are returned.
    async fn list_completed(&self) -> Result<Vec<CompletedQuizSummary>, ApiError>;

    async fn fetch_performance(
        &self,
        quiz_id: QuizId,
    ) -> Result<CompletedQuizPerformance, ApiError>;

    async fn submit(&self, quiz_id: QuizId, answers: &AnswerSelections) -> Result<(), ApiError>;
}

/// `QuizApi` over HTTP with an optional bearer credential.
#[derive(Clone)]
pub struct HttpQuizApi {
    client: Client,
    base_url: Url,
    credential: Option<Credential>,
}

impl HttpQuizApi {
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            credential: config.credential.clone(),
        })
    }

    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credential {
            Some(credential) => request.bearer_auth(credential.token()),
            None => request,
        }
    }

    async fn get_list<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, ApiError> {
        let response = self.authorized(self.client.get(url.clone())).send().await?;
        if !response.status().is_success() {
            tracing::warn!(%url, status = %response.status(), "listing request failed");
            return Ok(Vec::new());
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, ApiError> {
        let url = self.endpoint(&["quizzes"])?;
        self.get_list(url).await
    }

    async fn list_completed(&self) -> Result<Vec<CompletedQuizSummary>, ApiError> {
        let url = self.endpoint(&["quizzes", "completed"])?;
        self.get_list(url).await
    }

    async fn fetch_performance(
        &self,
        quiz_id: QuizId,
    ) -> Result<CompletedQuizPerformance, ApiError> {
        let id = quiz_id.to_string();
        let url = self.endpoint(&["quizzes", &id, "performance"])?;
        let response = self.authorized(self.client.get(url)).send().await?;

        if !response.status().is_success() {
            tracing::error!(%quiz_id, status = %response.status(), "performance request failed");
            return Err(ApiError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    async fn submit(&self, quiz_id: QuizId, answers: &AnswerSelections) -> Result<(), ApiError> {
        let id = quiz_id.to_string();
        let url = self.endpoint(&["quizzes", &id, "submit"])?;
        let response = self
            .authorized(self.client.post(url))
            .json(answers)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        Ok(())
    }
}
