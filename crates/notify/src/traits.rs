//! Notifier trait definition and shared error types.

use std::fmt;

/// Errors that can occur during notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SMTP delivery failed: {0}")]
    Smtp(String),

    #[error("Template rendering failed: {0}")]
    Template(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

/// A rendered notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Notification {
    /// The rendered subject line. Channels without subjects ignore it.
    pub subject: String,
    /// The rendered message body.
    pub body: String,
}

/// Delivery channel kinds. Each maps to one target field on an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Email,
    Sms,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for notification channel implementations.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification to a single recipient (address or phone number).
    async fn send(&self, recipient: &str, notification: &Notification) -> Result<(), NotifyError>;

    /// Which alert target this channel delivers to.
    fn channel(&self) -> Channel;

    /// Whether this channel is switched on at the process level.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Human-readable name for this channel (e.g., "email", "sms").
    fn channel_name(&self) -> &str {
        self.channel().as_str()
    }
}

/// Result of dispatching a notification to a single channel.
#[derive(Debug)]
pub struct DispatchResult {
    pub channel: Channel,
    pub alert_id: String,
    pub success: bool,
    pub error: Option<String>,
    pub duration_ms: u64,
}
