use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("invalid email address: {0:?}")]
    InvalidAddress(String),
    #[error("could not send results: {0}")]
    Delivery(String),
}

pub fn validate_email(address: &str) -> Result<&str, EmailError> {
    let address = address.trim();
    if EMAIL_RE.is_match(address) {
        Ok(address)
    } else {
        Err(EmailError::InvalidAddress(address.to_string()))
    }
}

pub trait EmailSender {
    fn send(&mut self, address: &str, body: &str) -> Result<(), EmailError>;
}

/// Stand-in sender: no mail leaves the machine, the request is only logged.
#[derive(Debug, Default)]
pub struct LogEmailSender {
    sent: Vec<String>,
}

impl LogEmailSender {
    pub fn sent(&self) -> &[String] {
        &self.sent
    }
}

impl EmailSender for LogEmailSender {
    fn send(&mut self, address: &str, body: &str) -> Result<(), EmailError> {
        tracing::info!(address, bytes = body.len(), "sending results (stub)");
        self.sent.push(address.to_string());
        Ok(())
    }
}

/// Validate then hand off to `sender`.
pub fn email_results(
    sender: &mut dyn EmailSender,
    address: &str,
    body: &str,
) -> Result<String, EmailError> {
    let address = validate_email(address)?;
    sender.send(address, body)?;
    Ok(address.to_string())
}
