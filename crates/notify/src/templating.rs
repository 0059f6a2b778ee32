//! Minijinja rendering for price-drop messages.
//!
//! Each [`AlertType`] has its own body template; the subject is shared.
//! Templates are registered once when the renderer is built, so rendering
//! is deterministic and never reparses.

use farewatch_core::format::{format_date, format_price};
use farewatch_core::{Alert, AlertType};
use minijinja::Environment;

use crate::traits::{Notification, NotifyError};

const SUBJECT_TEMPLATE: &str = "✈ Price Drop Alert: {{ price }} → {{ latest_price }}.";

const SINGLE_BODY_TEMPLATE: &str = "Flight #{{ number }} {{ from }} to {{ to }} on {{ date }} \
was {{ price }}, is now {{ latest_price }}. \
\n\nOnce rebooked, tap link to lower alert threshold: {{ link }}";

const DAY_BODY_TEMPLATE: &str = "A cheaper flight on {{ date }} {{ from }} to {{ to }} was found! \
Was {{ price }}, is now {{ latest_price }}. \
\n\nOnce rebooked, tap link to lower alert threshold: {{ link }}";

/// Values exposed to the message templates.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PriceDropContext {
    pub alert_type: AlertType,
    pub number: String,
    pub from: String,
    pub to: String,
    /// Formatted travel date.
    pub date: String,
    /// Formatted threshold price.
    pub price: String,
    /// Formatted newly observed price.
    pub latest_price: String,
    /// Deep link that lowers the threshold to the new price.
    pub link: String,
}

impl PriceDropContext {
    pub fn new(alert: &Alert, latest_price: u32, base_url: &str) -> Self {
        Self {
            alert_type: alert.alert_type,
            number: alert.number.clone(),
            from: alert.from.clone(),
            to: alert.to.clone(),
            date: format_date(&alert.date),
            price: format_price(alert.price),
            latest_price: format_price(latest_price),
            link: change_price_link(base_url, &alert.id, latest_price),
        }
    }
}

/// `<base-url>/<id>/change-price?price=<price>`
pub fn change_price_link(base_url: &str, alert_id: &str, price: u32) -> String {
    format!(
        "{}/{}/change-price?price={}",
        base_url.trim_end_matches('/'),
        alert_id,
        price
    )
}

/// Renders price-drop notifications.
#[derive(Debug)]
pub struct MessageRenderer {
    env: Environment<'static>,
}

impl MessageRenderer {
    pub fn new() -> Result<Self, NotifyError> {
        let mut env = Environment::new();
        for (name, source) in [
            ("subject", SUBJECT_TEMPLATE),
            (template_name(AlertType::Single), SINGLE_BODY_TEMPLATE),
            (template_name(AlertType::Day), DAY_BODY_TEMPLATE),
        ] {
            env.add_template(name, source)
                .map_err(|e| NotifyError::Template(e.to_string()))?;
        }
        Ok(Self { env })
    }

    /// Render the subject and the body for the context's alert type.
    pub fn render(&self, ctx: &PriceDropContext) -> Result<Notification, NotifyError> {
        Ok(Notification {
            subject: self.render_named("subject", ctx)?,
            body: self.render_named(template_name(ctx.alert_type), ctx)?,
        })
    }

    fn render_named(&self, name: &str, ctx: &PriceDropContext) -> Result<String, NotifyError> {
        self.env
            .get_template(name)
            .and_then(|t| t.render(ctx))
            .map_err(|e| NotifyError::Template(e.to_string()))
    }
}

fn template_name(alert_type: AlertType) -> &'static str {
    match alert_type {
        AlertType::Single => "body_single",
        AlertType::Day => "body_day",
    }
}
