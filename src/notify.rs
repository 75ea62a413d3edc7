use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub detail: Option<String>,
    pub expires_at: Instant,
}

/// Fire-and-forget sink for non-fatal events.
pub trait Notifier {
    fn notify(&mut self, kind: ToastKind, title: &str, detail: Option<&str>);

    fn info(&mut self, title: &str) {
        self.notify(ToastKind::Info, title, None);
    }

    fn success(&mut self, title: &str) {
        self.notify(ToastKind::Success, title, None);
    }

    fn error(&mut self, title: &str, detail: Option<&str>) {
        self.notify(ToastKind::Error, title, detail);
    }
}

/// Bounded queue of on-screen toasts; each one disappears after `ttl`.
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    ttl: Duration,
    capacity: usize,
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            ttl,
            capacity: 3,
        }
    }

    pub fn push_at(&mut self, kind: ToastKind, title: &str, detail: Option<&str>, now: Instant) {
        if self.toasts.len() == self.capacity {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            kind,
            title: title.to_string(),
            detail: detail.map(str::to_string),
            expires_at: now + self.ttl,
        });
    }

    /// Drop expired toasts.
    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Notifier for ToastQueue {
    fn notify(&mut self, kind: ToastKind, title: &str, detail: Option<&str>) {
        tracing::debug!(?kind, title, "toast");
        self.push_at(kind, title, detail, Instant::now());
    }
}
