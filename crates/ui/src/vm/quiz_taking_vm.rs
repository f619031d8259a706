use quiz_core::model::{AnswerId, Quiz};
use quiz_core::{SessionError, SubmissionState, SubmitOutcome, TimerUrgency};
use services::{AppServices, TimedQuizSession};

use crate::state::ViewError;
use crate::vm::time_fmt::format_points;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Toggle(AnswerId),
    Next,
    Previous,
    /// Jump to a 0-based question index.
    GoTo(usize),
    /// Ask to finish; opens the confirmation prompt.
    Finish,
    CancelConfirm,
    Confirm,
    /// Leave the quiz without submitting.
    Close,
}

/// Message shown once an attempt ends with a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionNotice {
    Submitted,
    Failed,
}

impl SubmissionNotice {
    #[must_use]
    pub fn from_outcome(outcome: &SubmitOutcome) -> Self {
        if outcome.is_success() {
            SubmissionNotice::Submitted
        } else {
            SubmissionNotice::Failed
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            SubmissionNotice::Submitted => "Quiz submitted successfully!",
            SubmissionNotice::Failed => "Failed to submit quiz",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizTakingOutcome {
    Continue,
    /// The quiz view should close, with a notice when a submission happened.
    Closed(Option<SubmissionNotice>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOptionVm {
    pub id: AnswerId,
    pub text: String,
    pub checked: bool,
}

/// Presentation state of the quiz-taking modal.
pub struct QuizTakingVm {
    session: TimedQuizSession,
}

impl QuizTakingVm {
    #[must_use]
    pub fn new(session: TimedQuizSession) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn session(&self) -> &TimedQuizSession {
        &self.session
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.session.view(|s| s.quiz().title.clone())
    }

    #[must_use]
    pub fn description(&self) -> String {
        self.session.view(|s| s.quiz().description.clone())
    }

    #[must_use]
    pub fn countdown_text(&self) -> String {
        self.session.countdown().to_string()
    }

    #[must_use]
    pub fn timer_urgency(&self) -> TimerUrgency {
        self.session.countdown().urgency()
    }

    /// "Question 2 of 5"
    #[must_use]
    pub fn question_label(&self) -> String {
        let progress = self.session.view(|s| s.progress());
        format!("Question {} of {}", progress.position, progress.total)
    }

    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        self.session.view(|s| s.progress().percent())
    }

    #[must_use]
    pub fn question_text(&self) -> String {
        self.session
            .view(|s| s.current_question().map(|q| q.text.clone()))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn points_label(&self) -> String {
        let points = self
            .session
            .view(|s| s.current_question().map_or(0.0, |q| q.points));
        format!("{} points", format_points(points))
    }

    #[must_use]
    pub fn answer_options(&self) -> Vec<AnswerOptionVm> {
        self.session.view(|s| {
            let Some(question) = s.current_question() else {
                return Vec::new();
            };
            question
                .answers
                .iter()
                .map(|answer| AnswerOptionVm {
                    id: answer.id,
                    text: answer.text.clone(),
                    checked: s.is_selected(question.id, answer.id),
                })
                .collect()
        })
    }

    /// 1-based page for the pager.
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.session.current_index() + 1
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.session.view(|s| s.question_count())
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.session.view(|s| !s.is_first_question())
    }

    /// The last question shows "Finish" instead of "Next".
    #[must_use]
    pub fn shows_finish(&self) -> bool {
        self.session.view(|s| s.is_last_question())
    }

    #[must_use]
    pub fn confirm_open(&self) -> bool {
        self.session.state() == SubmissionState::ConfirmingSubmit
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.session.state() == SubmissionState::Submitting
    }

    /// Notice for an attempt that already completed, e.g. after auto-submit.
    #[must_use]
    pub fn completion_notice(&self) -> Option<SubmissionNotice> {
        self.session
            .outcome()
            .map(|outcome| SubmissionNotice::from_outcome(&outcome))
    }

    pub async fn dispatch(&self, intent: QuizIntent) -> QuizTakingOutcome {
        match intent {
            QuizIntent::Toggle(answer_id) => {
                let question_id = self.session.view(|s| s.current_question().map(|q| q.id));
                if let Some(question_id) = question_id {
                    self.session.toggle_answer(question_id, answer_id);
                }
            }
            QuizIntent::Next => {
                self.session.next_question();
            }
            QuizIntent::Previous => {
                self.session.previous_question();
            }
            QuizIntent::GoTo(index) => {
                self.session.go_to_question(index);
            }
            QuizIntent::Finish => {
                self.session.request_submit();
            }
            QuizIntent::CancelConfirm => {
                self.session.cancel_submit();
            }
            QuizIntent::Confirm => {
                if let Some(outcome) = self.session.confirm_submit().await {
                    return QuizTakingOutcome::Closed(Some(SubmissionNotice::from_outcome(
                        &outcome,
                    )));
                }
            }
            QuizIntent::Close => {
                self.session.dispose();
                return QuizTakingOutcome::Closed(None);
            }
        }

        match self.completion_notice() {
            Some(notice) => QuizTakingOutcome::Closed(Some(notice)),
            None => QuizTakingOutcome::Continue,
        }
    }
}

/// # Errors
///
/// Returns `ViewError::EmptyQuiz` when the quiz has no questions.
/// Returns `ViewError::Unknown` for other failures.
pub fn start_quiz(services: &AppServices, quiz: Quiz) -> Result<QuizTakingVm, ViewError> {
    match services.start_quiz(quiz) {
        Ok(session) => Ok(QuizTakingVm::new(session)),
        Err(SessionError::Empty(quiz_id)) => {
            tracing::warn!(%quiz_id, "cannot start quiz without questions");
            Err(ViewError::EmptyQuiz)
        }
        Err(err) => {
            tracing::warn!(error = %err, "cannot start quiz");
            Err(ViewError::Unknown)
        }
    }
}
