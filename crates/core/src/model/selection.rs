use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::model::ids::{AnswerId, QuestionId};
use crate::model::quiz::Quiz;

/// Selected answers for one question, in the order they were picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEntry {
    question_id: QuestionId,
    selected: Vec<AnswerId>,
}

impl SelectionEntry {
    #[must_use]
    pub fn question_id(&self) -> QuestionId {
        self.question_id
    }

    #[must_use]
    pub fn selected(&self) -> &[AnswerId] {
        &self.selected
    }
}

/// Per-question answer selections for one attempt.
///
/// Holds exactly one entry per quiz question, in quiz order. Entries are never
/// added or removed after construction; only their selection sets change.
/// Serializes as `{ "<questionId>": [answerId, ...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnswerSelections {
    entries: Vec<SelectionEntry>,
}

impl AnswerSelections {
    /// One empty selection set per question of `quiz`.
    #[must_use]
    pub fn for_quiz(quiz: &Quiz) -> Self {
        let mut entries: Vec<SelectionEntry> = Vec::with_capacity(quiz.questions.len());
        for question in &quiz.questions {
            // A duplicated question id would break the one-entry invariant.
            if entries.iter().any(|entry| entry.question_id == question.id) {
                continue;
            }
            entries.push(SelectionEntry {
                question_id: question.id,
                selected: Vec::new(),
            });
        }
        Self { entries }
    }

    /// Flips membership of `answer_id` in the set for `question_id`.
    ///
    /// Returns `false` when the question is not part of this attempt.
    pub fn toggle(&mut self, question_id: QuestionId, answer_id: AnswerId) -> bool {
        let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.question_id == question_id)
        else {
            return false;
        };

        if let Some(pos) = entry.selected.iter().position(|id| *id == answer_id) {
            entry.selected.remove(pos);
        } else {
            entry.selected.push(answer_id);
        }
        true
    }

    #[must_use]
    pub fn selected(&self, question_id: QuestionId) -> Option<&[AnswerId]> {
        self.entries
            .iter()
            .find(|entry| entry.question_id == question_id)
            .map(SelectionEntry::selected)
    }

    #[must_use]
    pub fn is_selected(&self, question_id: QuestionId, answer_id: AnswerId) -> bool {
        self.selected(question_id)
            .is_some_and(|selected| selected.contains(&answer_id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of questions with at least one selected answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| !entry.selected.is_empty())
            .count()
    }
}

impl Serialize for AnswerSelections {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.question_id, &entry.selected)?;
        }
        map.end()
    }
}
