use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::Config;
use crate::email::{self, EmailError, EmailSender, LogEmailSender};
use crate::notify::{Notifier, ToastQueue};
use crate::quiz::flow::{QuizFlow, Step};
use crate::quiz::question::QuestionSet;
use crate::quiz::results::ResultsSummary;
use crate::session::store::{Persistence, SessionStore};
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

pub const EMPTY_NAME_MESSAGE: &str = "Please enter your name to continue";
pub const TIME_UP_TITLE: &str = "Time is up!";
pub const TIME_UP_DETAIL: &str = "Moving to the next question.";
pub const QUIT_EARLY_MESSAGE: &str = "Quiz ended early";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Welcome,
    Quiz,
    QuitConfirm,
    Results,
    EmailEntry,
}

pub struct App {
    pub screen: AppScreen,
    pub flow: QuizFlow<Box<dyn Persistence>>,
    pub toasts: ToastQueue,
    pub name_input: LineInput,
    pub email_input: LineInput,
    pub theme: Theme,
    pub config: Config,
    /// Blank targeted by Left/Right and Delete.
    pub blank_cursor: usize,
    pub review_scroll: u16,
    pub should_quit: bool,
    /// True when the store held an unfinished run at startup.
    pub resuming: bool,
    email_sender: Box<dyn EmailSender>,
    summary: Option<ResultsSummary>,
}

impl App {
    pub fn new(
        config: Config,
        theme: Theme,
        questions: QuestionSet,
        store: SessionStore<Box<dyn Persistence>>,
    ) -> Self {
        let name_input = LineInput::new(store.user_name()).with_max_chars(40);
        let resuming = !store.state().is_empty();

        let mut flow = QuizFlow::new(questions, store, config.timer_seconds);
        if config.shuffle_options {
            flow = flow.with_shuffle(SmallRng::from_entropy());
        }

        let mut app = Self {
            screen: AppScreen::Welcome,
            flow,
            toasts: ToastQueue::new(config.toast_duration()),
            name_input,
            email_input: LineInput::new("").with_max_chars(80),
            theme,
            config,
            blank_cursor: 0,
            review_scroll: 0,
            should_quit: false,
            resuming,
            email_sender: Box::new(LogEmailSender::default()),
            summary: None,
        };
        if app.flow.status().is_finished() {
            app.show_results();
        }
        app
    }

    pub fn with_email_sender(mut self, sender: Box<dyn EmailSender>) -> Self {
        self.email_sender = sender;
        self
    }

    pub fn summary(&self) -> Option<&ResultsSummary> {
        self.summary.as_ref()
    }

    /// Validate the typed name and enter the quiz.
    pub fn submit_name(&mut self, now: Instant) -> bool {
        let name = self.name_input.value().to_string();
        if !self.flow.store_mut().set_user_name(&name) {
            self.toasts.error(EMPTY_NAME_MESSAGE, None);
            return false;
        }
        tracing::info!(questions = self.flow.questions().len(), "quiz started");
        self.flow.start(now);
        self.blank_cursor = 0;
        self.screen = AppScreen::Quiz;
        true
    }

    /// Place the option shown under number `number` (1-based).
    pub fn select_option(&mut self, number: usize) -> bool {
        let word = match number
            .checked_sub(1)
            .and_then(|i| self.flow.display_options().get(i).map(|w| w.to_string()))
        {
            Some(word) => word,
            None => return false,
        };
        self.flow.select_word(&word)
    }

    pub fn move_blank_cursor(&mut self, delta: isize) {
        let blanks = self.flow.selected().len();
        if blanks == 0 {
            self.blank_cursor = 0;
            return;
        }
        let next = self.blank_cursor as isize + delta;
        self.blank_cursor = next.clamp(0, blanks as isize - 1) as usize;
    }

    pub fn clear_blank_at_cursor(&mut self) -> bool {
        self.flow.remove_word(self.blank_cursor)
    }

    pub fn clear_last_blank(&mut self) -> bool {
        match self.flow.selected().iter().rposition(Option::is_some) {
            Some(index) => self.flow.remove_word(index),
            None => false,
        }
    }

    /// Unavailable until every blank is filled.
    pub fn submit(&mut self, now: Instant) -> bool {
        match self.flow.submit(now) {
            Some(step) => {
                self.after_step(step);
                true
            }
            None => false,
        }
    }

    /// Advance wall-clock state: expire toasts and the countdown.
    pub fn tick(&mut self, now: Instant) {
        self.toasts.prune(now);
        if let Some(step) = self.flow.poll_timer(now) {
            self.toasts.error(TIME_UP_TITLE, Some(TIME_UP_DETAIL));
            // The quit prompt was for the question that just expired.
            if matches!(step, Step::Next(_)) && self.screen == AppScreen::QuitConfirm {
                self.screen = AppScreen::Quiz;
            }
            self.after_step(step);
        }
    }

    pub fn request_quit(&mut self) {
        if self.screen == AppScreen::Quiz {
            self.screen = AppScreen::QuitConfirm;
        }
    }

    pub fn cancel_quit(&mut self) {
        if self.screen == AppScreen::QuitConfirm {
            self.screen = AppScreen::Quiz;
        }
    }

    /// Only acts from the quit prompt.
    pub fn confirm_quit(&mut self) {
        if self.screen != AppScreen::QuitConfirm {
            return;
        }
        if self.flow.quit() {
            self.toasts.info(QUIT_EARLY_MESSAGE);
        }
        self.show_results();
    }

    pub fn restart(&mut self, now: Instant) {
        self.flow.restart(now);
        self.summary = None;
        self.resuming = false;
        self.blank_cursor = 0;
        self.review_scroll = 0;
        self.screen = AppScreen::Quiz;
    }

    pub fn open_email(&mut self) {
        if self.summary.is_some() {
            self.email_input.clear();
            self.screen = AppScreen::EmailEntry;
        }
    }

    pub fn cancel_email(&mut self) {
        self.screen = AppScreen::Results;
    }

    pub fn submit_email(&mut self) -> bool {
        let Some(summary) = &self.summary else {
            return false;
        };
        let body = summary.to_plain_text(self.flow.store().user_name());
        match email::email_results(self.email_sender.as_mut(), self.email_input.value(), &body) {
            Ok(address) => {
                self.toasts.success(&format!("Results sent to {address}"));
                self.screen = AppScreen::Results;
                true
            }
            Err(EmailError::InvalidAddress(_)) => {
                self.toasts.error("Please enter a valid email address", None);
                false
            }
            Err(err @ EmailError::Delivery(_)) => {
                tracing::warn!(error = %err, "email stub failed");
                self.toasts
                    .error("Could not send results", Some("Please try again later."));
                false
            }
        }
    }

    pub fn scroll_review(&mut self, delta: i32) {
        let max = self
            .summary
            .as_ref()
            .map(|s| (s.reviews.len() * 2) as i32)
            .unwrap_or(0);
        self.review_scroll = (self.review_scroll as i32 + delta).clamp(0, max) as u16;
    }

    fn after_step(&mut self, step: Step) {
        match step {
            Step::Next(_) => self.blank_cursor = 0,
            Step::Finished(_) => self.show_results(),
        }
    }

    fn show_results(&mut self) {
        self.summary = Some(self.flow.summary());
        self.review_scroll = 0;
        self.screen = AppScreen::Results;
    }
}
