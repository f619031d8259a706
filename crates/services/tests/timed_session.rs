use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::{Answer, AnswerId, AnswerSelections, Question, QuestionId, Quiz, QuizId};
use quiz_core::{SubmissionState, SubmitOutcome};
use services::{Submitter, TimedQuizSession};
use tokio::sync::Notify;

fn quiz(minutes: u32, questions: u64) -> Quiz {
    let questions = (1..=questions)
        .map(|id| {
            Question::new(
                QuestionId::new(id),
                format!("Question {id}"),
                1.0,
                vec![
                    Answer::new(AnswerId::new(id * 10), "yes"),
                    Answer::new(AnswerId::new(id * 10 + 1), "no"),
                ],
            )
        })
        .collect();
    Quiz::new(QuizId::new(3), "Timed", minutes, questions)
}

#[derive(Default)]
struct RecordingSubmitter {
    calls: Mutex<Vec<(QuizId, AnswerSelections)>>,
    outcome: Mutex<Option<SubmitOutcome>>,
}

impl RecordingSubmitter {
    fn failing(outcome: SubmitOutcome) -> Self {
        Self {
            outcome: Mutex::new(Some(outcome)),
            ..Self::default()
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Submitter for RecordingSubmitter {
    async fn submit(&self, quiz_id: QuizId, answers: AnswerSelections) -> SubmitOutcome {
        self.calls.lock().unwrap().push((quiz_id, answers));
        tokio::task::yield_now().await;
        self.outcome
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(SubmitOutcome::Accepted)
    }
}

/// Holds the submit call open until released.
#[derive(Default)]
struct GatedSubmitter {
    started: Notify,
    release: Notify,
    calls: AtomicUsize,
}

#[async_trait]
impl Submitter for GatedSubmitter {
    async fn submit(&self, _quiz_id: QuizId, _answers: AnswerSelections) -> SubmitOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        self.release.notified().await;
        SubmitOutcome::Accepted
    }
}

#[tokio::test(start_paused = true)]
async fn timer_expiry_submits_partial_answers() {
    let submitter = Arc::new(RecordingSubmitter::default());
    let session = TimedQuizSession::start(quiz(1, 3), submitter.clone()).unwrap();
    session.toggle_answer(QuestionId::new(2), AnswerId::new(21));

    tokio::time::sleep(Duration::from_millis(30_500)).await;
    assert_eq!(session.remaining_seconds(), 30);
    assert_eq!(session.state(), SubmissionState::Active);

    let outcome = session.wait_completed().await;

    assert_eq!(outcome, Some(SubmitOutcome::Accepted));
    assert_eq!(session.state(), SubmissionState::Completed);
    assert_eq!(session.remaining_seconds(), 0);
    assert!(session.view(|s| s.auto_submitted()));

    let calls = submitter.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (quiz_id, answers) = &calls[0];
    assert_eq!(*quiz_id, QuizId::new(3));
    assert_eq!(answers.len(), 3);
    assert_eq!(answers.answered_count(), 1);
    assert!(answers.is_selected(QuestionId::new(2), AnswerId::new(21)));
}

#[tokio::test(start_paused = true)]
async fn concurrent_confirms_submit_once() {
    let submitter = Arc::new(RecordingSubmitter::default());
    let session = TimedQuizSession::start(quiz(5, 1), submitter.clone()).unwrap();
    assert!(session.request_submit());

    let (first, second) = tokio::join!(session.confirm_submit(), session.confirm_submit());

    assert_eq!(submitter.call_count(), 1);
    assert_eq!(
        [first.is_some(), second.is_some()]
            .iter()
            .filter(|done| **done)
            .count(),
        1
    );
    assert_eq!(session.state(), SubmissionState::Completed);
    assert!(session.confirm_submit().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn manual_submit_stops_the_timer() {
    let submitter = Arc::new(RecordingSubmitter::default());
    let session = TimedQuizSession::start(quiz(1, 2), submitter.clone()).unwrap();

    tokio::time::sleep(Duration::from_millis(5_500)).await;
    assert!(session.next_question());
    assert!(session.request_submit());
    assert_eq!(
        session.confirm_submit().await,
        Some(SubmitOutcome::Accepted)
    );

    tokio::time::sleep(Duration::from_secs(120)).await;

    assert_eq!(submitter.call_count(), 1);
    assert_eq!(session.remaining_seconds(), 55);
    assert!(!session.view(|s| s.auto_submitted()));
}

#[tokio::test(start_paused = true)]
async fn countdown_pauses_while_confirming() {
    let submitter = Arc::new(RecordingSubmitter::default());
    let session = TimedQuizSession::start(quiz(1, 1), submitter.clone()).unwrap();

    tokio::time::sleep(Duration::from_millis(10_500)).await;
    assert_eq!(session.remaining_seconds(), 50);

    assert!(session.request_submit());
    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(session.remaining_seconds(), 50);

    assert!(session.cancel_submit());
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(session.remaining_seconds(), 45);
    assert_eq!(session.countdown().to_string(), "00:45");
    assert_eq!(submitter.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn failed_submission_still_completes() {
    let failure = SubmitOutcome::Failed {
        reason: "connection refused".into(),
    };
    let submitter = Arc::new(RecordingSubmitter::failing(failure.clone()));
    let session = TimedQuizSession::start(quiz(1, 1), submitter.clone()).unwrap();
    session.request_submit();

    let outcome = session.confirm_submit().await;

    assert_eq!(outcome, Some(failure.clone()));
    assert_eq!(session.state(), SubmissionState::Completed);
    assert_eq!(session.outcome(), Some(failure));
    assert!(!session.toggle_answer(QuestionId::new(1), AnswerId::new(10)));
    assert!(!session.request_submit());
}

#[tokio::test(start_paused = true)]
async fn dispose_suppresses_late_submit_result() {
    let submitter = Arc::new(GatedSubmitter::default());
    let session = Arc::new(TimedQuizSession::start(quiz(1, 1), submitter.clone()).unwrap());
    session.request_submit();

    let pending = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.confirm_submit().await })
    };
    submitter.started.notified().await;

    session.dispose();
    submitter.release.notify_one();
    let result = pending.await.unwrap();

    assert!(result.is_none());
    assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
    assert_eq!(session.state(), SubmissionState::Submitting);
    assert!(session.outcome().is_none());
    assert!(session.wait_completed().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn dropped_confirm_future_still_completes() {
    let submitter = Arc::new(GatedSubmitter::default());
    let session = TimedQuizSession::start(quiz(5, 1), submitter.clone()).unwrap();
    session.request_submit();

    let abandoned =
        tokio::time::timeout(Duration::from_millis(100), session.confirm_submit()).await;
    assert!(abandoned.is_err());
    assert_eq!(session.state(), SubmissionState::Submitting);

    submitter.release.notify_one();
    let outcome = session.wait_completed().await;

    assert_eq!(outcome, Some(SubmitOutcome::Accepted));
    assert_eq!(session.state(), SubmissionState::Completed);
    assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn dispose_after_completion_keeps_outcome() {
    let submitter = Arc::new(RecordingSubmitter::default());
    let session = TimedQuizSession::start(quiz(5, 1), submitter.clone()).unwrap();
    session.request_submit();
    assert_eq!(
        session.confirm_submit().await,
        Some(SubmitOutcome::Accepted)
    );

    session.dispose();

    assert_eq!(session.wait_completed().await, Some(SubmitOutcome::Accepted));
    assert_eq!(session.state(), SubmissionState::Completed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn dispose_racing_submit_freezes_session_state() {
    for _ in 0..50 {
        let submitter = Arc::new(RecordingSubmitter::default());
        let session = Arc::new(TimedQuizSession::start(quiz(5, 1), submitter.clone()).unwrap());
        session.request_submit();

        let confirming = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.confirm_submit().await })
        };
        let disposing = {
            let session = Arc::clone(&session);
            tokio::spawn(async move {
                tokio::task::yield_now().await;
                session.dispose();
                session.state()
            })
        };
        let confirmed = confirming.await.unwrap();
        let state_at_dispose = disposing.await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(session.state(), state_at_dispose);
        let completed = state_at_dispose == SubmissionState::Completed;
        assert_eq!(session.wait_completed().await.is_some(), completed);
        assert_eq!(confirmed.is_some(), completed);
    }
}

#[tokio::test(start_paused = true)]
async fn dispose_stops_the_countdown() {
    let submitter = Arc::new(RecordingSubmitter::default());
    let session = TimedQuizSession::start(quiz(1, 1), submitter.clone()).unwrap();

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    session.dispose();
    tokio::time::sleep(Duration::from_secs(120)).await;

    assert_eq!(submitter.call_count(), 0);
    assert_eq!(session.remaining_seconds(), 58);
    assert_eq!(session.state(), SubmissionState::Active);
    assert!(!session.next_question());
}

#[tokio::test(start_paused = true)]
async fn dropping_a_session_disposes_it() {
    let submitter = Arc::new(RecordingSubmitter::default());
    let session = TimedQuizSession::start(quiz(1, 1), submitter.clone()).unwrap();
    drop(session);

    tokio::time::sleep(Duration::from_secs(90)).await;

    assert_eq!(submitter.call_count(), 0);
}

#[tokio::test]
async fn empty_quiz_cannot_start() {
    let submitter = Arc::new(RecordingSubmitter::default());

    let result = TimedQuizSession::start(quiz(1, 0), submitter);

    assert!(result.is_err());
}
