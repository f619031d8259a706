use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{
    Answer, AnswerId, AnswerSelections, CompletedQuizPerformance, CompletedQuizSummary, Question,
    QuestionId, Quiz, QuizId,
};
use quiz_core::Clock;
use quiz_core::time::fixed_now;
use services::{ApiError, AppServices, QuizApi, SessionOptions};
use ui::vm::{load_dashboard, load_performance, start_quiz};
use ui::{ViewError, ViewState};

struct DashboardApi;

#[async_trait]
impl QuizApi for DashboardApi {
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, ApiError> {
        Ok(vec![Quiz::new(
            QuizId::new(1),
            "Chemistry",
            15,
            vec![Question::new(
                QuestionId::new(1),
                "Symbol for gold?",
                2.0,
                vec![
                    Answer::new(AnswerId::new(1), "Au"),
                    Answer::new(AnswerId::new(2), "Ag"),
                ],
            )],
        )])
    }

    async fn list_completed(&self) -> Result<Vec<CompletedQuizSummary>, ApiError> {
        Err(ApiError::InvalidBaseUrl("not a url".into()))
    }

    async fn fetch_performance(
        &self,
        _quiz_id: QuizId,
    ) -> Result<CompletedQuizPerformance, ApiError> {
        Err(ApiError::HttpStatus(reqwest::StatusCode::NOT_FOUND))
    }

    async fn submit(&self, _quiz_id: QuizId, _answers: &AnswerSelections) -> Result<(), ApiError> {
        Ok(())
    }
}

#[tokio::test]
async fn dashboard_listings_fail_independently() {
    let services = AppServices::with_api(Arc::new(DashboardApi));

    let dashboard = load_dashboard(&services).await;

    let available = dashboard.available.ready().unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].title, "Chemistry");
    assert_eq!(dashboard.completed, ViewState::Error(ViewError::Unknown));
}

#[tokio::test]
async fn missing_attempt_maps_to_not_found() {
    let services = AppServices::with_api(Arc::new(DashboardApi));

    let state = load_performance(&services, QuizId::new(1)).await;

    assert_eq!(state, ViewState::Error(ViewError::NotFound));
}

#[tokio::test(start_paused = true)]
async fn started_quiz_uses_configured_session_options() {
    let services =
        AppServices::with_api(Arc::new(DashboardApi)).with_session_options(SessionOptions {
            tick: std::time::Duration::from_millis(10),
            clock: Clock::fixed(fixed_now()),
        });
    let quiz = services.available_quizzes().await.unwrap().remove(0);

    let vm = start_quiz(&services, quiz).unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(105)).await;

    assert_eq!(vm.session().view(|s| s.started_at()), fixed_now());
    assert_eq!(vm.countdown_text(), "14:50");
}

#[tokio::test]
async fn empty_quiz_is_refused() {
    let services = AppServices::with_api(Arc::new(DashboardApi));

    let result = start_quiz(&services, Quiz::new(QuizId::new(4), "Blank", 5, Vec::new()));

    assert_eq!(result.err(), Some(ViewError::EmptyQuiz));
}
