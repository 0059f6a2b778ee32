//! Per-alert processing.
//!
//! Steps run strictly in order: expiry check, cooldown lookup, gated price
//! fetch, persist, compare, and (maybe) notify. A cooldown marker only
//! suppresses the notification; the price is still fetched and persisted.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use farewatch_core::Alert;
use farewatch_notify::{Dispatcher, MessageRenderer, PriceDropContext};
use farewatch_store::AlertStore;
use tracing::{info, warn};

use crate::error::ProcessError;
use crate::fetch::PriceFetcher;
use crate::gate::ConcurrencyGate;

/// Collaborators shared by every alert task in a batch.
pub struct CheckContext {
    pub store: Arc<dyn AlertStore>,
    pub fetcher: Arc<dyn PriceFetcher>,
    pub dispatcher: Dispatcher,
    pub renderer: MessageRenderer,
    pub gate: ConcurrencyGate,
    /// Base URL for threshold-lowering deep links.
    pub base_url: String,
    /// TTL of the cooldown marker set after a notification.
    pub cooldown: Duration,
}

/// How an alert's processing ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Travel date passed; the record was deleted.
    Expired,
    /// The fare did not drop below the threshold.
    NotCheaper { latest_price: u32 },
    /// The fare dropped but a cooldown marker was present.
    Suppressed { latest_price: u32 },
    /// The fare dropped and notifications went out.
    Notified {
        latest_price: u32,
        delivered: usize,
        failed: usize,
    },
}

/// Run one alert through to completion.
///
/// `now` is the batch start time and decides expiry. Errors end this alert
/// only; anything already persisted stays persisted.
pub async fn process_alert(
    ctx: &CheckContext,
    mut alert: Alert,
    now: DateTime<Utc>,
) -> Result<Outcome, ProcessError> {
    let flight = alert.descriptor();

    if alert.is_expired(now) {
        info!(alert_id = %alert.id, %flight, "expired, deleting");
        ctx.store.delete(&alert.key()).await?;
        return Ok(Outcome::Expired);
    }

    let cooldown_key = alert.cooldown_key();
    let on_cooldown = ctx.store.exists(&cooldown_key).await?;

    let latest_price = {
        let permit = ctx.gate.acquire().await?;
        let fetched = ctx.fetcher.fetch_price(&flight).await;
        permit.release();
        fetched?
    };

    alert.latest_price = Some(latest_price);
    ctx.store.set(&alert.key(), &alert.to_json()?).await?;

    if !alert.price_drop().is_some_and(|d| d > 0) {
        info!(alert_id = %alert.id, %flight, latest_price, "not cheaper");
        return Ok(Outcome::NotCheaper { latest_price });
    }

    let difference = alert.formatted_price_difference().unwrap_or_default();
    let new_price = alert.formatted_latest_price().unwrap_or_default();
    if on_cooldown {
        info!(
            alert_id = %alert.id,
            %flight,
            "dropped {difference} to {new_price} (on cooldown)"
        );
        return Ok(Outcome::Suppressed { latest_price });
    }
    info!(alert_id = %alert.id, %flight, "dropped {difference} to {new_price}");

    let notification = ctx
        .renderer
        .render(&PriceDropContext::new(&alert, latest_price, &ctx.base_url))?;
    let results = ctx.dispatcher.dispatch(&alert, &notification).await;
    let delivered = results.iter().filter(|r| r.success).count();
    let failed = results.len() - delivered;

    // The notification is already out; a missing marker only risks a repeat next run.
    if let Err(e) = ctx
        .store
        .set_with_expiry(&cooldown_key, "", ctx.cooldown)
        .await
    {
        warn!(alert_id = %alert.id, error = %e, "failed to set cooldown marker");
    }

    Ok(Outcome::Notified {
        latest_price,
        delivered,
        failed,
    })
}
