use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::state::{SessionState, UserAnswer};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub schema_version: u32,
    pub current_question_index: usize,
    pub answers: Vec<UserAnswer>,
    /// Written for readers of the file; recomputed from `answers` on load.
    #[serde(default)]
    pub total_coins: u32,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Default for SessionData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            current_question_index: 0,
            answers: Vec::new(),
            total_coins: 0,
            started_at: None,
            finished_at: None,
        }
    }
}

impl SessionData {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn into_state(self) -> SessionState {
        SessionState::restore(
            self.current_question_index,
            self.answers,
            self.started_at,
            self.finished_at,
        )
    }
}

impl From<&SessionState> for SessionData {
    fn from(state: &SessionState) -> Self {
        let mut answers: Vec<UserAnswer> = state.answers().values().cloned().collect();
        // Stable file contents across writes.
        answers.sort_by(|a, b| {
            a.answered_at
                .cmp(&b.answered_at)
                .then(a.question_id.cmp(&b.question_id))
        });
        Self {
            schema_version: SCHEMA_VERSION,
            current_question_index: state.current_question_index(),
            answers,
            total_coins: state.total_coins(),
            started_at: state.started_at(),
            finished_at: state.finished_at(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileData {
    pub schema_version: u32,
    #[serde(default)]
    pub user_name: String,
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            user_name: String::new(),
        }
    }
}

impl ProfileData {
    pub fn new(user_name: &str) -> Self {
        Self {
            user_name: user_name.to_string(),
            ..Self::default()
        }
    }

    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_data_ignores_stored_coin_count() {
        let json = r#"{
            "schema_version": 1,
            "current_question_index": 2,
            "answers": [
                {"question_id": "a", "selected_answers": ["x"], "is_correct": true},
                {"question_id": "b", "selected_answers": [null], "is_correct": false}
            ],
            "total_coins": 99
        }"#;
        let data: SessionData = serde_json::from_str(json).unwrap();
        let state = data.into_state();
        assert_eq!(state.total_coins(), 1);
        assert_eq!(state.current_question_index(), 2);
        assert_eq!(state.answer_for("b").unwrap().selected_answers, vec![None]);
    }

    #[test]
    fn test_stale_schema_needs_reset() {
        let data = SessionData {
            schema_version: 0,
            ..SessionData::default()
        };
        assert!(data.needs_reset());
        assert!(!ProfileData::default().needs_reset());
    }
}
