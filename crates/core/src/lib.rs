#![forbid(unsafe_code)]

pub mod model;
pub mod performance;
pub mod session;
pub mod time;

pub use performance::{PerformanceReport, QuestionReview, ReviewedAnswer, ScoreBand};
pub use session::{
    Countdown, QuizProgress, QuizSession, SessionError, SubmissionState, SubmitOutcome,
    TickOutcome, TimerUrgency,
};
pub use time::Clock;
