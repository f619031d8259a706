//! Client-side state machine for one timed quiz attempt.
//!
//! `QuizSession` is synchronous and free of I/O. Elapsed time is fed in through
//! [`QuizSession::tick`], and the submit round trip is split into the
//! transition that hands out the answers to send and [`QuizSession::finish`],
//! which records the result.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{AnswerId, AnswerSelections, Question, QuestionId, Quiz, QuizId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("quiz {0} has no questions")]
    Empty(QuizId),

    #[error("quiz {0} has no time limit")]
    NoTimeLimit(QuizId),
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle of an attempt.
///
/// Only `ConfirmingSubmit -> Active` moves backwards; `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Active,
    ConfirmingSubmit,
    Submitting,
    Completed,
}

/// Result reported by the submit callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend stored the attempt.
    Accepted,
    /// The backend answered with a non-success status.
    Rejected { status: u16 },
    /// The request never produced a response.
    Failed { reason: String },
}

impl SubmitOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted)
    }
}

/// What a single timer tick did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session is not `Active`; the tick was discarded.
    Ignored,
    /// One second elapsed and time remains.
    Running { remaining_seconds: u32 },
    /// Time ran out. The session is now `Submitting` and these answers must be sent.
    Expired(AnswerSelections),
}

//
// ─── COUNTDOWN ─────────────────────────────────────────────────────────────────
//

/// How close the countdown is to running out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerUrgency {
    Normal,
    /// Less than ten minutes left.
    Warning,
    /// Less than five minutes left.
    Critical,
}

/// Remaining time, displayed as zero-padded `MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining_seconds: u32,
}

impl Countdown {
    #[must_use]
    pub fn new(remaining_seconds: u32) -> Self {
        Self { remaining_seconds }
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn minutes(&self) -> u32 {
        self.remaining_seconds / 60
    }

    #[must_use]
    pub fn seconds(&self) -> u32 {
        self.remaining_seconds % 60
    }

    #[must_use]
    pub fn urgency(&self) -> TimerUrgency {
        match self.remaining_seconds {
            0..300 => TimerUrgency::Critical,
            300..600 => TimerUrgency::Warning,
            _ => TimerUrgency::Normal,
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes(), self.seconds())
    }
}

/// Position of the question pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    /// 1-based position of the current question.
    pub position: usize,
    pub total: usize,
}

impl QuizProgress {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.position as f64 / self.total as f64 * 100.0
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One student's in-progress attempt at a quiz.
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: Quiz,
    current: usize,
    selections: AnswerSelections,
    remaining_seconds: u32,
    state: SubmissionState,
    auto_submitted: bool,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    outcome: Option<SubmitOutcome>,
}

impl QuizSession {
    /// Start an attempt on the first question with the full time limit.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` for a quiz without questions and
    /// `SessionError::NoTimeLimit` when the limit is zero minutes.
    pub fn new(quiz: Quiz, started_at: DateTime<Utc>) -> Result<Self, SessionError> {
        if quiz.questions.is_empty() {
            return Err(SessionError::Empty(quiz.id));
        }
        let remaining_seconds = quiz.time_limit_seconds();
        if remaining_seconds == 0 {
            return Err(SessionError::NoTimeLimit(quiz.id));
        }

        Ok(Self {
            selections: AnswerSelections::for_quiz(&quiz),
            quiz,
            current: 0,
            remaining_seconds,
            state: SubmissionState::Active,
            auto_submitted: false,
            started_at,
            completed_at: None,
            outcome: None,
        })
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz.id
    }

    #[must_use]
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == SubmissionState::Active
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.quiz.questions.len()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.questions.get(self.current)
    }

    #[must_use]
    pub fn is_first_question(&self) -> bool {
        self.current == 0
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current + 1 >= self.question_count()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            position: self.current + 1,
            total: self.question_count(),
        }
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn countdown(&self) -> Countdown {
        Countdown::new(self.remaining_seconds)
    }

    #[must_use]
    pub fn selections(&self) -> &AnswerSelections {
        &self.selections
    }

    #[must_use]
    pub fn is_selected(&self, question_id: QuestionId, answer_id: AnswerId) -> bool {
        self.selections.is_selected(question_id, answer_id)
    }

    /// True when the attempt was submitted because time ran out.
    #[must_use]
    pub fn auto_submitted(&self) -> bool {
        self.auto_submitted
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&SubmitOutcome> {
        self.outcome.as_ref()
    }

    /// Add or remove `answer_id` from the selection set of `question_id`.
    ///
    /// Ignored unless `Active`, and for ids that are not part of the quiz.
    pub fn toggle_answer(&mut self, question_id: QuestionId, answer_id: AnswerId) -> bool {
        if !self.is_active() {
            return false;
        }
        let known = self
            .quiz
            .question(question_id)
            .is_some_and(|question| question.answer(answer_id).is_some());
        if !known {
            return false;
        }
        self.selections.toggle(question_id, answer_id)
    }

    /// Move the pointer to `index`. Out-of-range requests are rejected.
    pub fn go_to_question(&mut self, index: usize) -> bool {
        if !self.is_active() || index >= self.question_count() {
            return false;
        }
        self.current = index;
        true
    }

    pub fn next_question(&mut self) -> bool {
        if self.is_last_question() {
            return false;
        }
        self.go_to_question(self.current + 1)
    }

    pub fn previous_question(&mut self) -> bool {
        if self.is_first_question() {
            return false;
        }
        self.go_to_question(self.current - 1)
    }

    /// Ask for confirmation before submitting. Only valid on the last question.
    pub fn request_submit(&mut self) -> bool {
        if !self.is_active() || !self.is_last_question() {
            return false;
        }
        self.state = SubmissionState::ConfirmingSubmit;
        true
    }

    pub fn cancel_submit(&mut self) -> bool {
        if self.state != SubmissionState::ConfirmingSubmit {
            return false;
        }
        self.state = SubmissionState::Active;
        true
    }

    /// Confirm a pending submit request.
    ///
    /// Returns the answers to send. Every later call returns `None`, so at most
    /// one submission is ever started.
    pub fn confirm_submit(&mut self) -> Option<AnswerSelections> {
        if self.state != SubmissionState::ConfirmingSubmit {
            return None;
        }
        self.state = SubmissionState::Submitting;
        Some(self.selections.clone())
    }

    /// Account for one elapsed second. Time only runs while `Active`.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_active() {
            return TickOutcome::Ignored;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return TickOutcome::Running {
                remaining_seconds: self.remaining_seconds,
            };
        }

        self.state = SubmissionState::Submitting;
        self.auto_submitted = true;
        TickOutcome::Expired(self.selections.clone())
    }

    /// Record the result of the submit call. Success or failure, the attempt is over.
    pub fn finish(&mut self, outcome: SubmitOutcome, completed_at: DateTime<Utc>) -> bool {
        if self.state != SubmissionState::Submitting {
            return false;
        }
        self.state = SubmissionState::Completed;
        self.outcome = Some(outcome);
        self.completed_at = Some(completed_at);
        true
    }
}
