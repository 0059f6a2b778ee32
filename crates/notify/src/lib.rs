//! Notification delivery for fare drop alerts.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable delivery channels
//! - Email (SMTP) and SMS (HTTP messaging API) notifier implementations
//! - Minijinja rendering of price-drop messages, keyed by alert type
//! - Dispatcher that picks the channels applicable to an alert

pub mod dispatcher;
pub mod email;
pub mod sms;
pub mod templating;
pub mod traits;

pub use dispatcher::Dispatcher;
pub use templating::{MessageRenderer, PriceDropContext};
pub use traits::{Channel, DispatchResult, Notification, Notifier, NotifyError};
