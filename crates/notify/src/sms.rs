//! SMS notifier over a Twilio-style messaging REST API.
//!
//! Posts a form-encoded `To`/`From`/`Body` message to the account's
//! `Messages` endpoint with HTTP basic auth. Only the notification body is
//! sent; SMS has no subject line.

use crate::traits::{Channel, Notification, Notifier, NotifyError};

const DEFAULT_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Sends notifications as text messages.
#[derive(Debug)]
pub struct SmsNotifier {
    endpoint: String,
    account_sid: String,
    auth_token: String,
    from: String,
    client: reqwest::Client,
}

impl SmsNotifier {
    /// Creates a new `SmsNotifier`.
    ///
    /// `api_url` overrides the full messages endpoint; when `None` it is
    /// derived from the account SID. Returns [`NotifyError::Config`] if any
    /// credential or the sender number is empty.
    pub fn from_config(
        api_url: Option<String>,
        account_sid: String,
        auth_token: String,
        from: String,
    ) -> Result<Self, NotifyError> {
        if account_sid.trim().is_empty() || auth_token.trim().is_empty() {
            return Err(NotifyError::Config(
                "SMS account SID and auth token must not be empty".to_string(),
            ));
        }
        if from.trim().is_empty() {
            return Err(NotifyError::Config(
                "SMS sender number must not be empty".to_string(),
            ));
        }

        let endpoint = api_url
            .unwrap_or_else(|| format!("{DEFAULT_API_BASE}/Accounts/{account_sid}/Messages.json"));

        Ok(Self {
            endpoint,
            account_sid,
            auth_token,
            from,
            client: reqwest::Client::new(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Notifier for SmsNotifier {
    async fn send(&self, recipient: &str, notification: &Notification) -> Result<(), NotifyError> {
        let form = [
            ("To", recipient),
            ("From", self.from.as_str()),
            ("Body", notification.body.as_str()),
        ];

        tracing::debug!(to = %recipient, "Sending SMS notification");

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30);
            return Err(NotifyError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(NotifyError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    fn channel(&self) -> Channel {
        Channel::Sms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_derived_from_account() {
        let notifier = SmsNotifier::from_config(
            None,
            "AC123".to_string(),
            "token".to_string(),
            "+15125550100".to_string(),
        )
        .unwrap();
        assert_eq!(
            notifier.endpoint(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
        assert_eq!(notifier.channel_name(), "sms");
    }

    #[test]
    fn endpoint_override() {
        let notifier = SmsNotifier::from_config(
            Some("http://localhost:9999/messages".to_string()),
            "AC123".to_string(),
            "token".to_string(),
            "+15125550100".to_string(),
        )
        .unwrap();
        assert_eq!(notifier.endpoint(), "http://localhost:9999/messages");
    }

    #[test]
    fn empty_credentials_rejected() {
        let result = SmsNotifier::from_config(
            None,
            String::new(),
            "token".to_string(),
            "+15125550100".to_string(),
        );
        match result.unwrap_err() {
            NotifyError::Config(msg) => assert!(msg.contains("account SID")),
            other => panic!("expected Config error, got: {other:?}"),
        }
    }

    #[test]
    fn empty_sender_rejected() {
        let result = SmsNotifier::from_config(
            None,
            "AC123".to_string(),
            "token".to_string(),
            "  ".to_string(),
        );
        assert!(matches!(result, Err(NotifyError::Config(_))));
    }
}
