mod dashboard_vm;
mod performance_vm;
mod quiz_taking_vm;
mod time_fmt;

pub use dashboard_vm::{
    AvailableQuizCardVm, CompletedQuizCardVm, DashboardVm, load_dashboard,
    map_available_quiz_cards, map_completed_quiz_cards,
};
pub use performance_vm::{PerformanceVm, QuestionReviewVm, ReviewedAnswerVm, load_performance};
pub use quiz_taking_vm::{
    AnswerOptionVm, QuizIntent, QuizTakingOutcome, QuizTakingVm, SubmissionNotice, start_quiz,
};
pub use time_fmt::{format_datetime, format_optional_datetime, format_percent, format_points};
