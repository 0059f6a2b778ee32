//! Batch driver: load every alert, fan out one task per alert, wait for all.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use farewatch_core::keys::{is_record_key, ALERT_PATTERN};
use farewatch_core::Alert;
use farewatch_store::StoreError;
use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::error::ProcessError;
use crate::processor::{process_alert, CheckContext, Outcome};

/// Counts of how each alert in a batch ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub expired: usize,
    pub not_cheaper: usize,
    pub suppressed: usize,
    pub notified: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, result: &Result<Outcome, ProcessError>) {
        match result {
            Ok(Outcome::Expired) => self.expired += 1,
            Ok(Outcome::NotCheaper { .. }) => self.not_cheaper += 1,
            Ok(Outcome::Suppressed { .. }) => self.suppressed += 1,
            Ok(Outcome::Notified { .. }) => self.notified += 1,
            Err(_) => self.failed += 1,
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} alerts: {} expired, {} not cheaper, {} on cooldown, {} notified, {} failed",
            self.total, self.expired, self.not_cheaper, self.suppressed, self.notified, self.failed
        )
    }
}

/// Runs one batch over every persisted alert.
pub struct BatchScheduler {
    ctx: Arc<CheckContext>,
}

impl BatchScheduler {
    pub fn new(ctx: CheckContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    pub async fn run(&self) -> Result<BatchSummary, StoreError> {
        self.run_at(Utc::now()).await
    }

    /// Run a batch treating `now` as the current time for expiry.
    ///
    /// Only a failure to load the alert set is returned as an error. Every
    /// per-alert failure, including an undecodable record or a panicking
    /// task, is logged and counted in [`BatchSummary::failed`].
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<BatchSummary, StoreError> {
        let keys: Vec<String> = self
            .ctx
            .store
            .keys(ALERT_PATTERN)
            .await?
            .into_iter()
            .filter(|k| is_record_key(k))
            .collect();
        let values = if keys.is_empty() {
            Vec::new()
        } else {
            self.ctx.store.multi_get(&keys).await?
        };

        let mut summary = BatchSummary::default();
        let mut alerts = Vec::with_capacity(values.len());
        for (key, value) in keys.iter().zip(values) {
            let Some(data) = value else {
                // Deleted between listing and fetching.
                debug!(key = %key, "record vanished before load");
                continue;
            };
            summary.total += 1;
            match Alert::from_json(&data) {
                Ok(alert) => alerts.push(alert),
                Err(e) => {
                    warn!(key = %key, error = %e, "skipping malformed alert record");
                    summary.failed += 1;
                }
            }
        }

        info!("checking {} flights", summary.total);

        alerts.sort_by_key(|a| a.date);

        let handles: Vec<_> = alerts
            .into_iter()
            .map(|alert| {
                let ctx = Arc::clone(&self.ctx);
                let alert_id = alert.id.clone();
                let task = tokio::spawn(async move {
                    let flight = alert.descriptor();
                    let id = alert.id.clone();
                    let result = process_alert(&ctx, alert, now).await;
                    if let Err(e) = &result {
                        warn!(alert_id = %id, %flight, error = %e, "alert check failed");
                    }
                    result
                });
                (alert_id, task)
            })
            .collect();

        let (ids, tasks): (Vec<String>, Vec<_>) = handles.into_iter().unzip();
        for (alert_id, joined) in ids.into_iter().zip(join_all(tasks).await) {
            match joined {
                Ok(result) => summary.record(&result),
                Err(e) => {
                    error!(alert_id = %alert_id, error = %e, "alert task panicked");
                    summary.failed += 1;
                }
            }
        }

        info!(%summary, "batch complete");
        Ok(summary)
    }
}
