mod ids;
mod performance;
mod quiz;
mod selection;
mod wire;

pub use ids::{AnswerId, ParseIdError, QuestionId, QuizId};
pub use performance::{AnsweredQuestion, CompletedQuizPerformance, CompletedQuizSummary};
pub use quiz::{Answer, Question, Quiz, QuizError};
pub use selection::{AnswerSelections, SelectionEntry};
