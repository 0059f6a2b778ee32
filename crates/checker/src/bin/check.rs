//! check — run one fare-alert batch and exit.
//!
//! Loads every alert from Redis, re-prices each one (at most `MAX_PAGES`
//! lookups at a time), notifies subscribers of drops, and exits once every
//! alert has been handled. Scheduling repeated runs is left to cron.

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use farewatch_checker::{BatchScheduler, CheckContext, ConcurrencyGate, HttpPriceFetcher};
use farewatch_core::config::{load_dotenv, Config};
use farewatch_core::parse_duration;
use farewatch_notify::{Dispatcher, MessageRenderer};
use farewatch_store::RedisStore;

// ── CLI ─────────────────────────────────────────────────────────────

/// Re-check all registered fare alerts once.
#[derive(Parser, Debug)]
#[command(name = "check", version, about)]
struct Cli {
    /// Config profile; keys are read as `<PROFILE>_<KEY>` before `<KEY>`.
    #[arg(long, env = "FAREWATCH_PROFILE")]
    profile: Option<String>,

    /// Maximum concurrent price lookups (overrides MAX_PAGES).
    #[arg(long)]
    max_pages: Option<usize>,

    /// Notification cooldown, e.g. "1h" or "30m" (overrides ALERT_COOLDOWN).
    #[arg(long, value_parser = parse_cooldown_arg)]
    cooldown: Option<std::time::Duration>,

    /// Base URL for deep links (overrides BASE_URL).
    #[arg(long)]
    base_url: Option<String>,
}

fn parse_cooldown_arg(s: &str) -> Result<std::time::Duration, String> {
    parse_duration(s).ok_or_else(|| format!("invalid duration: {s}"))
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Before parsing, so `.env` can supply FAREWATCH_PROFILE.
    load_dotenv();
    let cli = Cli::parse();

    let mut config = Config::for_profile(cli.profile.as_deref().unwrap_or_default());
    if let Some(max_pages) = cli.max_pages {
        config.checker.max_pages = max_pages.max(1);
    }
    if let Some(cooldown) = cli.cooldown {
        config.checker.cooldown = cooldown;
    }
    if let Some(base_url) = cli.base_url {
        config.checker.base_url = base_url.trim_end_matches('/').to_string();
    }
    config.log_summary();

    let dispatcher = Dispatcher::from_config(config.email.as_ref(), config.sms.as_ref())?;
    info!(channels = ?dispatcher.enabled_channels(), "notification channels ready");
    let fetcher = HttpPriceFetcher::new(
        config.fetch.url.clone(),
        config.fetch.timeout,
        config.fetch.proxy.as_deref(),
    )?;

    let store = match RedisStore::connect(&config.redis.url).await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "cannot reach alert store");
            return Err(e.into());
        }
    };

    let scheduler = BatchScheduler::new(CheckContext {
        store: Arc::new(store),
        fetcher: Arc::new(fetcher),
        dispatcher,
        renderer: MessageRenderer::new()?,
        gate: ConcurrencyGate::new(config.checker.max_pages),
        base_url: config.checker.base_url.clone(),
        cooldown: config.checker.cooldown,
    });

    match scheduler.run().await {
        Ok(summary) => {
            info!(%summary, "check finished");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "failed to load alerts");
            Err(e.into())
        }
    }
}
