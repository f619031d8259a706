//! Read-only review of a graded attempt.

use chrono::{DateTime, Utc};

use crate::model::{AnsweredQuestion, CompletedQuizPerformance};

/// Qualitative label for a score percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ScoreBand {
    /// Lower bounds are inclusive; the highest matching band wins.
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            ScoreBand::Excellent
        } else if percentage >= 60.0 {
            ScoreBand::Good
        } else {
            ScoreBand::NeedsImprovement
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::NeedsImprovement => "Needs improvement",
        }
    }
}

/// One answer the student gave, marked against the correct answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewedAnswer {
    pub text: String,
    pub correct: bool,
}

/// Review of a single question.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionReview {
    /// 1-based position in the attempt.
    pub number: usize,
    pub text: String,
    pub points: f64,
    /// Authoritative per-question grade from the backend.
    pub is_correct: bool,
    pub user_answers: Vec<ReviewedAnswer>,
    pub correct_answers: Vec<String>,
    /// Whether the correct answers should be revealed.
    pub show_correct_answers: bool,
}

impl QuestionReview {
    fn from_answered(number: usize, question: &AnsweredQuestion) -> Self {
        let user_answers = question
            .user_answers
            .iter()
            .enumerate()
            .map(|(index, text)| ReviewedAnswer {
                text: text.clone(),
                correct: answer_is_correct(question, index, text),
            })
            .collect();

        Self {
            number,
            text: question.text.clone(),
            points: question.points,
            is_correct: question.is_correct,
            user_answers,
            correct_answers: question.correct_answers.clone(),
            show_correct_answers: !question.is_correct,
        }
    }

    #[must_use]
    pub fn has_user_answers(&self) -> bool {
        !self.user_answers.is_empty()
    }
}

// Prefer ids when the payload carries them for both sides and they line up with
// the text lists; fall back to text equality otherwise.
fn answer_is_correct(question: &AnsweredQuestion, index: usize, text: &str) -> bool {
    if let (Some(user_ids), Some(correct_ids)) =
        (&question.user_answer_ids, &question.correct_answer_ids)
    {
        if user_ids.len() == question.user_answers.len() {
            return user_ids
                .get(index)
                .is_some_and(|id| correct_ids.contains(id));
        }
    }
    question.correct_answers.iter().any(|correct| correct == text)
}

/// Derived score figures and per-question review for one completed attempt.
///
/// Pure function of its payload; rebuild it whenever the payload changes.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceReport {
    quiz_title: String,
    score: f64,
    max_score: f64,
    percentage: f64,
    band: ScoreBand,
    completion_time: Option<DateTime<Utc>>,
    questions: Vec<QuestionReview>,
}

impl PerformanceReport {
    #[must_use]
    pub fn from_payload(payload: &CompletedQuizPerformance) -> Self {
        let max_score: f64 = payload.questions.iter().map(|q| q.points).sum();
        let percentage = if max_score > 0.0 {
            payload.score / max_score * 100.0
        } else {
            0.0
        };
        let questions = payload
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| QuestionReview::from_answered(index + 1, question))
            .collect();

        Self {
            quiz_title: payload.quiz_title.clone(),
            score: payload.score,
            max_score,
            percentage,
            band: ScoreBand::from_percentage(percentage),
            completion_time: payload.completion_time,
            questions,
        }
    }

    /// An absent payload yields an empty, zero-score report.
    #[must_use]
    pub fn from_optional(payload: Option<&CompletedQuizPerformance>) -> Self {
        match payload {
            Some(payload) => Self::from_payload(payload),
            None => Self::from_payload(&CompletedQuizPerformance::default()),
        }
    }

    #[must_use]
    pub fn quiz_title(&self) -> &str {
        &self.quiz_title
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    #[must_use]
    pub fn band(&self) -> ScoreBand {
        self.band
    }

    #[must_use]
    pub fn completion_time(&self) -> Option<DateTime<Utc>> {
        self.completion_time
    }

    #[must_use]
    pub fn questions(&self) -> &[QuestionReview] {
        &self.questions
    }

    #[must_use]
    pub fn correct_question_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_correct).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerId;

    fn question(points: f64, is_correct: bool) -> AnsweredQuestion {
        AnsweredQuestion {
            text: "Q".into(),
            points,
            is_correct,
            ..AnsweredQuestion::default()
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn percentage_and_band_from_score() {
        let payload = CompletedQuizPerformance {
            quiz_title: "Capitals".into(),
            score: 7.0,
            questions: vec![question(5.0, true), question(5.0, false)],
            ..CompletedQuizPerformance::default()
        };

        let report = PerformanceReport::from_payload(&payload);

        assert_close(report.max_score(), 10.0);
        assert_close(report.percentage(), 70.0);
        assert_eq!(report.band(), ScoreBand::Good);
        assert_eq!(report.band().label(), "Good");
        assert_eq!(report.correct_question_count(), 1);
    }

    #[test]
    fn zero_max_score_yields_zero_percent() {
        let payload = CompletedQuizPerformance {
            score: 4.0,
            ..CompletedQuizPerformance::default()
        };

        let report = PerformanceReport::from_payload(&payload);

        assert_close(report.max_score(), 0.0);
        assert_close(report.percentage(), 0.0);
        assert_eq!(report.band(), ScoreBand::NeedsImprovement);
        assert!(report.is_empty());
    }

    #[test]
    fn missing_payload_degrades_to_empty_report() {
        let report = PerformanceReport::from_optional(None);

        assert!(report.quiz_title().is_empty());
        assert!(report.questions().is_empty());
        assert_close(report.percentage(), 0.0);
    }

    #[test]
    fn band_thresholds_are_inclusive() {
        assert_eq!(ScoreBand::from_percentage(80.0), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_percentage(79.99), ScoreBand::Good);
        assert_eq!(ScoreBand::from_percentage(60.0), ScoreBand::Good);
        assert_eq!(
            ScoreBand::from_percentage(59.9),
            ScoreBand::NeedsImprovement
        );
        assert_eq!(ScoreBand::from_percentage(100.0).label(), "Excellent");
    }

    #[test]
    fn user_answers_are_classified_by_text() {
        for flag in [true, false] {
            let payload = CompletedQuizPerformance {
                questions: vec![AnsweredQuestion {
                    user_answers: vec!["Paris".into(), "Berlin".into()],
                    correct_answers: vec!["Paris".into(), "London".into()],
                    ..question(2.0, flag)
                }],
                ..CompletedQuizPerformance::default()
            };

            let report = PerformanceReport::from_payload(&payload);
            let answers = &report.questions()[0].user_answers;

            assert_eq!(answers[0].text, "Paris");
            assert!(answers[0].correct);
            assert_eq!(answers[1].text, "Berlin");
            assert!(!answers[1].correct);
        }
    }

    #[test]
    fn correct_answers_follow_server_flag() {
        // Every chosen answer matches, yet the backend marked the question wrong
        // because "London" was missed.
        let payload = CompletedQuizPerformance {
            questions: vec![
                AnsweredQuestion {
                    user_answers: vec!["Paris".into()],
                    correct_answers: vec!["Paris".into(), "London".into()],
                    ..question(2.0, false)
                },
                AnsweredQuestion {
                    user_answers: vec!["Rome".into()],
                    correct_answers: vec!["Rome".into()],
                    ..question(2.0, true)
                },
            ],
            ..CompletedQuizPerformance::default()
        };

        let report = PerformanceReport::from_payload(&payload);

        assert!(report.questions()[0].show_correct_answers);
        assert!(!report.questions()[1].show_correct_answers);
        assert_eq!(report.questions()[1].number, 2);
    }

    #[test]
    fn ids_disambiguate_duplicate_texts() {
        let payload = CompletedQuizPerformance {
            questions: vec![AnsweredQuestion {
                user_answers: vec!["Yes".into()],
                correct_answers: vec!["Yes".into()],
                user_answer_ids: Some(vec![AnswerId::new(2)]),
                correct_answer_ids: Some(vec![AnswerId::new(1)]),
                ..question(1.0, false)
            }],
            ..CompletedQuizPerformance::default()
        };

        let report = PerformanceReport::from_payload(&payload);

        assert!(!report.questions()[0].user_answers[0].correct);
    }

    #[test]
    fn question_without_answers_is_reported() {
        let payload = CompletedQuizPerformance {
            questions: vec![question(3.0, false)],
            ..CompletedQuizPerformance::default()
        };

        let report = PerformanceReport::from_payload(&payload);

        assert!(!report.questions()[0].has_user_answers());
    }
}
