use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quiz::evaluator;
use crate::quiz::question::Question;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAnswer {
    pub question_id: String,
    pub selected_answers: Vec<Option<String>>,
    pub is_correct: bool,
    #[serde(default = "Utc::now")]
    pub answered_at: DateTime<Utc>,
}

impl UserAnswer {
    /// Score `selected` against `question`.
    pub fn evaluate(question: &Question, selected: Vec<Option<String>>) -> Self {
        let is_correct = evaluator::check_answers(&selected, &question.correct_answer);
        Self {
            question_id: question.question_id.clone(),
            selected_answers: selected,
            is_correct,
            answered_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    current_question_index: usize,
    answers: HashMap<String, UserAnswer>,
    total_coins: u32,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn restore(
        current_question_index: usize,
        answers: impl IntoIterator<Item = UserAnswer>,
        started_at: Option<DateTime<Utc>>,
        finished_at: Option<DateTime<Utc>>,
    ) -> Self {
        let mut state = Self {
            current_question_index,
            answers: answers
                .into_iter()
                .map(|a| (a.question_id.clone(), a))
                .collect(),
            total_coins: 0,
            started_at,
            finished_at,
        };
        state.recount_coins();
        state
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn answers(&self) -> &HashMap<String, UserAnswer> {
        &self.answers
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&UserAnswer> {
        self.answers.get(question_id)
    }

    pub fn total_coins(&self) -> u32 {
        self.total_coins
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty() && self.current_question_index == 0
    }

    pub fn mark_started(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Utc::now());
        }
    }

    /// Record `answer` (replacing any earlier one for the same question) and
    /// move to `next_index` in one step. The index never moves backwards.
    pub fn record(&mut self, answer: UserAnswer, next_index: usize) {
        self.answers.insert(answer.question_id.clone(), answer);
        self.current_question_index = self.current_question_index.max(next_index);
        self.recount_coins();
    }

    pub fn mark_finished(&mut self) {
        if self.finished_at.is_none() {
            self.finished_at = Some(Utc::now());
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn recount_coins(&mut self) {
        self.total_coins = self.answers.values().filter(|a| a.is_correct).count() as u32;
    }
}
