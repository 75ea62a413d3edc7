use std::time::Instant;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::quiz::question::{Question, QuestionSet};
use crate::quiz::results::ResultsSummary;
use crate::quiz::timer::Countdown;
use crate::session::state::UserAnswer;
use crate::session::store::{Persistence, SessionStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowStatus {
    InProgress,
    Completed,
    Quit,
}

impl FlowStatus {
    pub fn is_finished(self) -> bool {
        !matches!(self, FlowStatus::InProgress)
    }
}

/// Outcome of leaving a question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Next(usize),
    Finished(FlowStatus),
}

/// Drives one pass through the question set: fills blanks, records answers
/// through the session store, and keeps the countdown armed on the current
/// question.
pub struct QuizFlow<P: Persistence> {
    questions: QuestionSet,
    store: SessionStore<P>,
    countdown: Countdown,
    current: usize,
    selected: Vec<Option<String>>,
    option_order: Vec<usize>,
    rng: Option<SmallRng>,
    status: FlowStatus,
}

impl<P: Persistence> QuizFlow<P> {
    pub fn new(questions: QuestionSet, store: SessionStore<P>, timer_secs: u32) -> Self {
        let current = store.state().current_question_index();
        let status = if current >= questions.len() {
            if store.state().answers().len() < questions.len() {
                FlowStatus::Quit
            } else {
                FlowStatus::Completed
            }
        } else {
            FlowStatus::InProgress
        };
        let mut flow = Self {
            questions,
            store,
            countdown: Countdown::new(timer_secs),
            current,
            selected: Vec::new(),
            option_order: Vec::new(),
            rng: None,
            status,
        };
        flow.load_selection();
        flow
    }

    /// Present options in a random order per question.
    pub fn with_shuffle(mut self, rng: SmallRng) -> Self {
        self.rng = Some(rng);
        self.load_selection();
        self
    }

    /// Arm the countdown on the current question. Call once the user has
    /// entered the question screen.
    pub fn start(&mut self, now: Instant) {
        if self.status.is_finished() {
            return;
        }
        self.store.mark_started();
        self.enter_question(self.current, now);
    }

    pub fn status(&self) -> FlowStatus {
        self.status
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn store(&self) -> &SessionStore<P> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SessionStore<P> {
        &mut self.store
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.status.is_finished() {
            return None;
        }
        self.questions.get(self.current)
    }

    pub fn is_last_question(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    pub fn selected(&self) -> &[Option<String>] {
        &self.selected
    }

    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining()
    }

    pub fn all_filled(&self) -> bool {
        self.selected.iter().all(Option::is_some)
    }

    /// Current options in display order.
    pub fn display_options(&self) -> Vec<&str> {
        let Some(question) = self.current_question() else {
            return Vec::new();
        };
        self.option_order
            .iter()
            .filter_map(|&i| question.options.get(i).map(String::as_str))
            .collect()
    }

    /// True when every occurrence of `word` among the options is already
    /// placed in a blank.
    pub fn is_option_used(&self, word: &str) -> bool {
        let Some(question) = self.current_question() else {
            return false;
        };
        let available = question.options.iter().filter(|o| *o == word).count();
        let placed = self
            .selected
            .iter()
            .filter(|s| s.as_deref() == Some(word))
            .count();
        available > 0 && placed >= available
    }

    /// Place `word` into the first unfilled blank. No-op when every blank is
    /// filled or `word` is not an option of the current question.
    pub fn select_word(&mut self, word: &str) -> bool {
        let Some(question) = self.current_question() else {
            return false;
        };
        if !question.has_option(word) {
            return false;
        }
        match self.selected.iter_mut().find(|s| s.is_none()) {
            Some(slot) => {
                *slot = Some(word.to_string());
                true
            }
            None => false,
        }
    }

    pub fn remove_word(&mut self, blank_index: usize) -> bool {
        if self.status.is_finished() {
            return false;
        }
        match self.selected.get_mut(blank_index) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    /// Record the current answer and advance. Unavailable until every blank
    /// is filled.
    pub fn submit(&mut self, now: Instant) -> Option<Step> {
        if self.status.is_finished() || !self.all_filled() {
            return None;
        }
        Some(self.advance(now))
    }

    /// Expiry callback target. Records whatever is selected, filled or not.
    /// An expiry for a question that is no longer current is ignored.
    pub fn on_time_expired(&mut self, question: usize, now: Instant) -> Option<Step> {
        if self.status.is_finished() || question != self.current {
            tracing::debug!(question, current = self.current, "ignoring stale expiry");
            return None;
        }
        tracing::info!(question, "time expired");
        Some(self.advance(now))
    }

    /// Feed wall-clock time into the countdown; returns the step taken if the
    /// current question timed out.
    pub fn poll_timer(&mut self, now: Instant) -> Option<Step> {
        let mut expired = None;
        self.countdown.poll(now, |question| expired = Some(question));
        expired.and_then(|question| self.on_time_expired(question, now))
    }

    /// Record the current answer as-is and end the run. Later questions are
    /// never presented or scored.
    pub fn quit(&mut self) -> bool {
        if self.status.is_finished() {
            return false;
        }
        self.countdown.cancel();
        if let Some(answer) = self.build_answer() {
            self.store.record_and_finish(answer, self.questions.len());
        }
        self.current = self.questions.len();
        self.status = FlowStatus::Quit;
        tracing::info!(answered = self.store.state().answers().len(), "quiz quit early");
        true
    }

    /// Clear the session and begin again from the first question.
    pub fn restart(&mut self, now: Instant) {
        self.countdown.cancel();
        self.store.reset();
        self.current = 0;
        self.status = FlowStatus::InProgress;
        tracing::info!("quiz restarted");
        self.start(now);
    }

    /// Jump back to an earlier question, e.g. when restoring a saved run.
    /// Blanks pre-fill from its recorded answer.
    pub fn revisit(&mut self, index: usize, now: Instant) -> bool {
        if self.status.is_finished() || index >= self.questions.len() {
            return false;
        }
        self.countdown.cancel();
        self.enter_question(index, now);
        true
    }

    pub fn summary(&self) -> ResultsSummary {
        ResultsSummary::compute(&self.questions, self.store.state())
    }

    fn build_answer(&self) -> Option<UserAnswer> {
        let question = self.questions.get(self.current)?;
        Some(UserAnswer::evaluate(question, self.selected.clone()))
    }

    fn advance(&mut self, now: Instant) -> Step {
        self.countdown.cancel();
        let Some(answer) = self.build_answer() else {
            self.status = FlowStatus::Completed;
            return Step::Finished(self.status);
        };
        // After a revisit, resume at the furthest question already reached.
        let next = (self.current + 1).max(self.store.state().current_question_index());
        if next >= self.questions.len() {
            self.store.record_and_finish(answer, next);
            self.current = next;
            self.status = FlowStatus::Completed;
            Step::Finished(self.status)
        } else {
            self.store.record_and_advance(answer, next);
            self.enter_question(next, now);
            Step::Next(next)
        }
    }

    fn enter_question(&mut self, index: usize, now: Instant) {
        self.current = index;
        self.load_selection();
        self.countdown.arm(index, now);
    }

    /// Reset blanks for the current question, pre-filling from a recorded
    /// answer when one exists.
    fn load_selection(&mut self) {
        let Some(question) = self.questions.get(self.current) else {
            self.selected.clear();
            self.option_order.clear();
            return;
        };
        let blanks = question.blank_count();
        self.selected = match self.store.answer_for(&question.question_id) {
            Some(answer) => {
                let mut prior = answer.selected_answers.clone();
                prior.resize(blanks, None);
                prior
            }
            None => vec![None; blanks],
        };
        self.option_order = (0..question.options.len()).collect();
        if let Some(rng) = self.rng.as_mut() {
            self.option_order.shuffle(rng);
        }
    }
}
