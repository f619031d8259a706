use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

use quiz_core::model::{AnswerId, AnswerSelections, QuestionId, Quiz, QuizId};
use quiz_core::{
    Clock, Countdown, QuizSession, SessionError, SubmissionState, SubmitOutcome, TickOutcome,
};

use crate::submitter::Submitter;

/// Timer and clock settings for a `TimedQuizSession`.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Real time that elapses per countdown second.
    pub tick: Duration,
    pub clock: Clock,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            clock: Clock::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Completion {
    Pending,
    Done(SubmitOutcome),
    Disposed,
}

struct Shared {
    session: Mutex<QuizSession>,
    submitter: Arc<dyn Submitter>,
    clock: Clock,
    /// Only flipped while the session lock is held.
    disposed: AtomicBool,
    completion: watch::Sender<Completion>,
    submission: Mutex<Option<JoinHandle<()>>>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, QuizSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    fn apply_tick(&self) -> TickOutcome {
        let mut session = self.lock();
        if self.is_disposed() {
            return TickOutcome::Ignored;
        }
        session.tick()
    }

    /// Run the submit call on its own task so that dropping the caller's
    /// future cannot strand the session in `Submitting`.
    fn spawn_submission(self: &Arc<Self>, answers: AnswerSelections) {
        let submitting = Arc::clone(self);
        let task = tokio::spawn(async move {
            submitting.submit_and_finish(answers).await;
        });
        *self
            .submission
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(task);
    }

    /// Sends `answers` and records the outcome unless the session was disposed
    /// in the meantime.
    async fn submit_and_finish(&self, answers: AnswerSelections) {
        if self.is_disposed() {
            return;
        }
        let quiz_id = self.lock().quiz_id();
        let outcome = self.submitter.submit(quiz_id, answers).await;

        {
            let mut session = self.lock();
            if self.is_disposed() {
                tracing::debug!(%quiz_id, ?outcome, "session disposed, dropping submit result");
                return;
            }
            session.finish(outcome.clone(), self.clock.now());
            self.completion.send_if_modified(|completion| {
                if *completion == Completion::Pending {
                    *completion = Completion::Done(outcome.clone());
                    true
                } else {
                    false
                }
            });
        }

        if outcome.is_success() {
            tracing::info!(%quiz_id, "quiz submitted");
        } else {
            tracing::warn!(%quiz_id, ?outcome, "quiz submission did not succeed");
        }
    }
}

async fn run_timer(shared: Weak<Shared>, period: Duration) {
    let period = period.max(Duration::from_millis(1));
    let mut interval = interval_at(Instant::now() + period, period);
    loop {
        interval.tick().await;
        let Some(shared) = shared.upgrade() else {
            break;
        };

        match shared.apply_tick() {
            TickOutcome::Running { remaining_seconds } => {
                tracing::trace!(remaining_seconds, "countdown tick");
            }
            // Paused while the student confirms; gone once submission started.
            TickOutcome::Ignored => {
                let confirming = shared.lock().state() == SubmissionState::ConfirmingSubmit;
                if shared.is_disposed() || !confirming {
                    break;
                }
            }
            TickOutcome::Expired(answers) => {
                tracing::info!(quiz_id = %shared.lock().quiz_id(), "time is up, submitting quiz");
                shared.spawn_submission(answers);
                break;
            }
        }
    }
}

/// A `QuizSession` driven by a countdown timer and a submit callback.
///
/// The session owns one timer task for its lifetime. Ticks are applied under the
/// session lock, so a tick that lands after the session left `Active` is
/// discarded. At most one submit call is ever made. Dropping the session
/// disposes it.
pub struct TimedQuizSession {
    shared: Arc<Shared>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl TimedQuizSession {
    /// Start a session with a one-second tick on the system clock.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the quiz has no questions or no time limit.
    pub fn start(quiz: Quiz, submitter: Arc<dyn Submitter>) -> Result<Self, SessionError> {
        Self::start_with(quiz, submitter, SessionOptions::default())
    }

    /// # Errors
    ///
    /// Returns `SessionError` when the quiz has no questions or no time limit.
    pub fn start_with(
        quiz: Quiz,
        submitter: Arc<dyn Submitter>,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        let session = QuizSession::new(quiz, options.clock.now())?;
        tracing::info!(
            quiz_id = %session.quiz_id(),
            questions = session.question_count(),
            seconds = session.remaining_seconds(),
            "quiz session started"
        );

        let (completion, _) = watch::channel(Completion::Pending);
        let shared = Arc::new(Shared {
            session: Mutex::new(session),
            submitter,
            clock: options.clock,
            disposed: AtomicBool::new(false),
            completion,
            submission: Mutex::new(None),
        });
        let timer = tokio::spawn(run_timer(Arc::downgrade(&shared), options.tick));

        Ok(Self {
            shared,
            timer: Mutex::new(Some(timer)),
        })
    }

    /// Read the session state under its lock.
    pub fn view<R>(&self, read: impl FnOnce(&QuizSession) -> R) -> R {
        read(&self.shared.lock())
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.view(QuizSession::quiz_id)
    }

    #[must_use]
    pub fn state(&self) -> SubmissionState {
        self.view(QuizSession::state)
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.view(QuizSession::current_index)
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.view(QuizSession::remaining_seconds)
    }

    #[must_use]
    pub fn countdown(&self) -> Countdown {
        self.view(QuizSession::countdown)
    }

    #[must_use]
    pub fn selections(&self) -> AnswerSelections {
        self.view(|session| session.selections().clone())
    }

    #[must_use]
    pub fn outcome(&self) -> Option<SubmitOutcome> {
        self.view(|session| session.outcome().cloned())
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.shared.is_disposed()
    }

    fn mutate(&self, action: &'static str, apply: impl FnOnce(&mut QuizSession) -> bool) -> bool {
        let applied = {
            let mut session = self.shared.lock();
            !self.is_disposed() && apply(&mut *session)
        };
        if !applied {
            tracing::debug!(action, "ignored in current session state");
        }
        applied
    }

    pub fn toggle_answer(&self, question_id: QuestionId, answer_id: AnswerId) -> bool {
        self.mutate("toggle_answer", |session| {
            session.toggle_answer(question_id, answer_id)
        })
    }

    pub fn go_to_question(&self, index: usize) -> bool {
        self.mutate("go_to_question", |session| session.go_to_question(index))
    }

    pub fn next_question(&self) -> bool {
        self.mutate("next_question", QuizSession::next_question)
    }

    pub fn previous_question(&self) -> bool {
        self.mutate("previous_question", QuizSession::previous_question)
    }

    pub fn request_submit(&self) -> bool {
        self.mutate("request_submit", QuizSession::request_submit)
    }

    pub fn cancel_submit(&self) -> bool {
        self.mutate("cancel_submit", QuizSession::cancel_submit)
    }

    /// Confirm a pending submit request and wait for the submit call.
    ///
    /// Returns the outcome to the call that started the submission. Calls made
    /// while not confirming, while a submission is in flight, or after disposal
    /// return `None`. The submission keeps running if this future is dropped.
    pub async fn confirm_submit(&self) -> Option<SubmitOutcome> {
        let answers = {
            let mut session = self.shared.lock();
            if self.is_disposed() {
                return None;
            }
            session.confirm_submit()
        };
        let Some(answers) = answers else {
            tracing::debug!("confirm_submit ignored, no pending confirmation");
            return None;
        };
        self.stop_timer();
        self.shared.spawn_submission(answers);
        self.wait_completed().await
    }

    /// Wait until the attempt is completed.
    ///
    /// Returns `None` if the session is disposed first.
    pub async fn wait_completed(&self) -> Option<SubmitOutcome> {
        let mut completion = self.shared.completion.subscribe();
        loop {
            match &*completion.borrow_and_update() {
                Completion::Done(outcome) => return Some(outcome.clone()),
                Completion::Disposed => return None,
                Completion::Pending => {}
            }
            if completion.changed().await.is_err() {
                return None;
            }
        }
    }

    /// Stop the timer and abandon any pending submission.
    ///
    /// A submit call that resolves afterwards leaves the session untouched.
    pub fn dispose(&self) {
        let quiz_id = {
            let session = self.shared.lock();
            if self.shared.disposed.swap(true, Ordering::AcqRel) {
                return;
            }
            self.shared.completion.send_if_modified(|completion| {
                if *completion == Completion::Pending {
                    *completion = Completion::Disposed;
                    true
                } else {
                    false
                }
            });
            session.quiz_id()
        };
        self.stop_timer();
        if let Some(task) = self
            .shared
            .submission
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
        tracing::debug!(%quiz_id, "quiz session disposed");
    }

    fn stop_timer(&self) {
        if let Some(timer) = self
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            timer.abort();
        }
    }
}

impl Drop for TimedQuizSession {
    fn drop(&mut self) {
        self.dispose();
    }
}
