//! Price-drop emails over SMTP.

use farewatch_core::config::EmailConfig;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::traits::{Channel, Notification, Notifier, NotifyError};

const DEFAULT_SMTP_PORT: u16 = 587;
const IMPLICIT_TLS_PORT: u16 = 465;

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// TLS from the first byte (port 465).
    Implicit,
    /// Plain connect, upgraded with STARTTLS.
    StartTls,
    /// No TLS at all. Only for local relays.
    Plain,
}

impl SmtpSecurity {
    /// Port 465 always means implicit TLS; elsewhere TLS defaults on.
    pub fn choose(port: u16, tls: Option<bool>) -> Self {
        match (port, tls.unwrap_or(true)) {
            (IMPLICIT_TLS_PORT, _) => Self::Implicit,
            (_, true) => Self::StartTls,
            (_, false) => Self::Plain,
        }
    }
}

#[derive(Debug)]
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    security: SmtpSecurity,
}

impl EmailNotifier {
    /// Build the SMTP transport described by `cfg`.
    ///
    /// Fails with [`NotifyError::Config`] when the sender address does not
    /// parse or the relay host is unusable for TLS.
    pub fn from_config(cfg: &EmailConfig) -> Result<Self, NotifyError> {
        let sender: Mailbox = cfg
            .from
            .parse()
            .map_err(|e: lettre::address::AddressError| {
                NotifyError::Config(format!("EMAIL_FROM {:?}: {e}", cfg.from))
            })?;

        let port = cfg.smtp_port.unwrap_or(DEFAULT_SMTP_PORT);
        let security = SmtpSecurity::choose(port, cfg.tls);
        let host = cfg.smtp_host.as_str();
        let relay_err = |e: lettre::transport::smtp::Error| NotifyError::Config(e.to_string());

        let builder = match security {
            SmtpSecurity::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(host).map_err(relay_err)?,
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host).map_err(relay_err)?
            }
            SmtpSecurity::Plain => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
        }
        .port(port);

        let builder = match (&cfg.username, &cfg.password) {
            (Some(user), Some(pass)) => builder.credentials(Credentials::new(user.clone(), pass.clone())),
            _ => builder,
        };

        Ok(Self {
            transport: builder.build(),
            sender,
            security,
        })
    }

    pub fn security(&self) -> SmtpSecurity {
        self.security
    }

    fn compose(&self, recipient: &str, notification: &Notification) -> Result<Message, NotifyError> {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e: lettre::address::AddressError| {
                NotifyError::InvalidRecipient(format!("{recipient}: {e}"))
            })?;
        Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(notification.subject.as_str())
            .body(notification.body.clone())
            .map_err(|e| NotifyError::Smtp(e.to_string()))
    }
}

#[async_trait::async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, recipient: &str, notification: &Notification) -> Result<(), NotifyError> {
        let message = self.compose(recipient, notification)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;
        tracing::debug!(to = %recipient, "price drop email accepted by relay");
        Ok(())
    }

    fn channel(&self) -> Channel {
        Channel::Email
    }
}
