use anyhow::Result;

use crate::session::state::{SessionState, UserAnswer};
use crate::store::schema::{ProfileData, SessionData};

/// Durable storage port. Read once when a [`SessionStore`] opens, written
/// after every change. Implementations are a best-effort cache: the session
/// store never relies on a write having succeeded.
pub trait Persistence {
    fn load_session(&self) -> Option<SessionData>;
    fn save_session(&self, data: &SessionData) -> Result<()>;
    fn clear_session(&self) -> Result<()>;
    fn load_profile(&self) -> Option<ProfileData>;
    fn save_profile(&self, data: &ProfileData) -> Result<()>;
}

impl<P: Persistence + ?Sized> Persistence for Box<P> {
    fn load_session(&self) -> Option<SessionData> {
        (**self).load_session()
    }

    fn save_session(&self, data: &SessionData) -> Result<()> {
        (**self).save_session(data)
    }

    fn clear_session(&self) -> Result<()> {
        (**self).clear_session()
    }

    fn load_profile(&self) -> Option<ProfileData> {
        (**self).load_profile()
    }

    fn save_profile(&self, data: &ProfileData) -> Result<()> {
        (**self).save_profile(data)
    }
}

/// Owns the session state and mirrors every change into the persistence
/// port. The in-memory state is authoritative once loaded.
pub struct SessionStore<P: Persistence> {
    state: SessionState,
    user_name: String,
    port: P,
}

impl<P: Persistence> SessionStore<P> {
    pub fn open(port: P) -> Self {
        let state = port
            .load_session()
            .map(SessionData::into_state)
            .unwrap_or_default();
        let user_name = port
            .load_profile()
            .map(|p| p.user_name)
            .unwrap_or_default();
        tracing::debug!(
            index = state.current_question_index(),
            answers = state.answers().len(),
            "session loaded"
        );
        Self {
            state,
            user_name,
            port,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Rejects blank names; stores the trimmed name otherwise.
    pub fn set_user_name(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.user_name = name.to_string();
        if let Err(e) = self.port.save_profile(&ProfileData::new(name)) {
            tracing::warn!(error = %e, "failed to persist profile");
        }
        true
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&UserAnswer> {
        self.state.answer_for(question_id)
    }

    pub fn mark_started(&mut self) {
        if self.state.started_at().is_none() {
            self.state.mark_started();
            self.persist();
        }
    }

    /// Record an answer and move to `next_index` as a single change.
    pub fn record_and_advance(&mut self, answer: UserAnswer, next_index: usize) {
        tracing::info!(
            question = %answer.question_id,
            correct = answer.is_correct,
            next_index,
            "answer recorded"
        );
        self.state.record(answer, next_index);
        self.persist();
    }

    /// Same as [`record_and_advance`](Self::record_and_advance), also
    /// stamping the run as finished.
    pub fn record_and_finish(&mut self, answer: UserAnswer, end_index: usize) {
        self.state.record(answer, end_index);
        self.state.mark_finished();
        tracing::info!(
            answers = self.state.answers().len(),
            coins = self.state.total_coins(),
            "session finished"
        );
        self.persist();
    }

    pub fn reset(&mut self) {
        self.state.clear();
        if let Err(e) = self.port.clear_session() {
            tracing::warn!(error = %e, "failed to clear persisted session");
        }
    }

    fn persist(&self) {
        if let Err(e) = self.port.save_session(&SessionData::from(&self.state)) {
            tracing::warn!(error = %e, "failed to persist session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use chrono::Utc;

    fn answer(id: &str, correct: bool) -> UserAnswer {
        UserAnswer {
            question_id: id.to_string(),
            selected_answers: vec![Some("w".to_string())],
            is_correct: correct,
            answered_at: Utc::now(),
        }
    }

    #[test]
    fn test_open_on_empty_port_is_fresh() {
        let store = SessionStore::open(MemoryStore::new());
        assert!(store.state().is_empty());
        assert_eq!(store.user_name(), "");
    }

    #[test]
    fn test_every_change_is_written() {
        let port = MemoryStore::new();
        let mut store = SessionStore::open(port.clone());
        store.record_and_advance(answer("q1", true), 1);
        let saved = port.session().unwrap();
        assert_eq!(saved.current_question_index, 1);
        assert_eq!(saved.answers.len(), 1);
        assert_eq!(saved.total_coins, 1);
    }

    #[test]
    fn test_state_survives_reopen() {
        let port = MemoryStore::new();
        {
            let mut store = SessionStore::open(port.clone());
            store.set_user_name("  Ada  ");
            store.record_and_advance(answer("q1", true), 1);
            store.record_and_advance(answer("q2", false), 2);
        }
        let store = SessionStore::open(port);
        assert_eq!(store.state().current_question_index(), 2);
        assert_eq!(store.state().total_coins(), 1);
        assert_eq!(store.user_name(), "Ada");
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let port = MemoryStore::new();
        port.set_fail_writes(true);
        let mut store = SessionStore::open(port.clone());
        store.record_and_advance(answer("q1", true), 1);
        assert_eq!(store.state().current_question_index(), 1);
        assert_eq!(store.state().total_coins(), 1);
        assert!(port.session().is_none());
        assert_eq!(port.writes(), 0);
    }

    #[test]
    fn test_blank_name_rejected() {
        let port = MemoryStore::new();
        let mut store = SessionStore::open(port.clone());
        assert!(!store.set_user_name("   "));
        assert!(port.load_profile().is_none());
        assert!(store.set_user_name("Grace"));
        assert_eq!(port.load_profile().unwrap().user_name, "Grace");
    }

    #[test]
    fn test_reset_clears_port_but_not_name() {
        let port = MemoryStore::new();
        let mut store = SessionStore::open(port.clone());
        store.set_user_name("Ada");
        store.record_and_finish(answer("q1", true), 1);
        assert!(store.state().finished_at().is_some());
        store.reset();
        assert!(store.state().is_empty());
        assert_eq!(store.state().total_coins(), 0);
        assert!(port.session().is_none());
        assert_eq!(store.user_name(), "Ada");
    }
}
