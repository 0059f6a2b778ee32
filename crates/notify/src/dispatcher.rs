//! Routes notifications to the channels that apply to an alert.
//!
//! A channel fires when it is enabled and the alert carries a target for
//! it. Missing targets and disabled channels are skipped silently.
//! Individual channel failures don't block other channels.

use farewatch_core::config::{EmailConfig, SmsConfig};
use farewatch_core::Alert;

use crate::email::EmailNotifier;
use crate::sms::SmsNotifier;
use crate::traits::{Channel, DispatchResult, Notification, Notifier, NotifyError};

/// Dispatches notifications to every applicable channel.
pub struct Dispatcher {
    channels: Vec<Box<dyn Notifier>>,
}

impl Dispatcher {
    pub fn new(channels: Vec<Box<dyn Notifier>>) -> Self {
        Self { channels }
    }

    /// Create a dispatcher with no channels; every dispatch is a no-op.
    pub fn empty() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// Build the channels enabled by configuration.
    ///
    /// A `None` section leaves that channel out entirely.
    pub fn from_config(
        email: Option<&EmailConfig>,
        sms: Option<&SmsConfig>,
    ) -> Result<Self, NotifyError> {
        let mut channels: Vec<Box<dyn Notifier>> = Vec::new();
        if let Some(cfg) = email {
            channels.push(Box::new(EmailNotifier::from_config(cfg)?));
        }
        if let Some(cfg) = sms {
            channels.push(Box::new(SmsNotifier::from_config(
                cfg.api_url.clone(),
                cfg.account_sid.clone(),
                cfg.auth_token.clone(),
                cfg.from.clone(),
            )?));
        }
        Ok(Self::new(channels))
    }

    /// Names of the enabled channels, for startup logs.
    pub fn enabled_channels(&self) -> Vec<Channel> {
        self.channels
            .iter()
            .filter(|c| c.is_enabled())
            .map(|c| c.channel())
            .collect()
    }

    /// Send `notification` through every enabled channel the alert has a target for.
    ///
    /// Returns results for each attempted delivery. Skipped channels produce no result.
    pub async fn dispatch(&self, alert: &Alert, notification: &Notification) -> Vec<DispatchResult> {
        let mut results = Vec::with_capacity(self.channels.len());

        for channel in &self.channels {
            if !channel.is_enabled() {
                continue;
            }
            let kind = channel.channel();
            let Some(recipient) = target_for(alert, kind) else {
                tracing::debug!(alert_id = %alert.id, channel = %kind, "no target, skipping channel");
                continue;
            };

            let start = std::time::Instant::now();
            let result = channel.send(recipient, notification).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            let (success, error) = match result {
                Ok(()) => {
                    tracing::info!(
                        alert_id = %alert.id,
                        channel = channel.channel_name(),
                        duration_ms,
                        "Notification delivered"
                    );
                    (true, None)
                }
                Err(e) => {
                    tracing::warn!(
                        alert_id = %alert.id,
                        channel = channel.channel_name(),
                        error = %e,
                        duration_ms,
                        "Notification delivery failed"
                    );
                    (false, Some(e.to_string()))
                }
            };

            results.push(DispatchResult {
                channel: kind,
                alert_id: alert.id.clone(),
                success,
                error,
                duration_ms,
            });
        }

        results
    }
}

fn target_for(alert: &Alert, channel: Channel) -> Option<&str> {
    match channel {
        Channel::Email => alert.email(),
        Channel::Sms => alert.phone(),
    }
}
