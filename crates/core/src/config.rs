use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::duration::parse_duration;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u16_opt(profile: &str, key: &str) -> Option<u16> {
    profiled_env_opt(profile, key).and_then(|v| v.parse().ok())
}

fn profiled_env_bool_opt(profile: &str, key: &str) -> Option<bool> {
    profiled_env_opt(profile, key).map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
}

fn profiled_env_duration(profile: &str, key: &str, default: Duration) -> Duration {
    match profiled_env_opt(profile, key) {
        Some(raw) => parse_duration(&raw).unwrap_or_else(|| {
            tracing::warn!(key, value = %raw, "unparseable duration, using default");
            default
        }),
        None => default,
    }
}

pub const DEFAULT_MAX_PAGES: usize = 5;
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(3_600);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub redis: RedisConfig,
    pub checker: CheckerConfig,
    pub fetch: FetchConfig,
    /// `None` when the email channel is disabled.
    pub email: Option<EmailConfig>,
    /// `None` when the SMS channel is disabled.
    pub sms: Option<SmsConfig>,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    ///
    /// With a non-empty `profile` (e.g. `PROD`), every key is first looked up
    /// as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            redis: RedisConfig::from_env_profiled(p),
            checker: CheckerConfig::from_env_profiled(p),
            fetch: FetchConfig::from_env_profiled(p),
            email: EmailConfig::from_env_profiled(p),
            sms: SmsConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  redis:    url={}", redact_url(&self.redis.url));
        tracing::info!(
            "  checker:  max_pages={}, cooldown={}s, base_url={}",
            self.checker.max_pages,
            self.checker.cooldown.as_secs(),
            self.checker.base_url
        );
        tracing::info!(
            "  fetch:    url={}, timeout={}s, proxy={}",
            self.fetch.url,
            self.fetch.timeout.as_secs(),
            if self.fetch.proxy.is_some() { "set" } else { "(none)" }
        );
        match &self.email {
            Some(e) => tracing::info!("  email:    enabled, host={}, from={}", e.smtp_host, e.from),
            None => tracing::info!("  email:    disabled"),
        }
        match &self.sms {
            Some(s) => tracing::info!("  sms:      enabled, from={}", s.from),
            None => tracing::info!("  sms:      disabled"),
        }
    }
}

/// Strip credentials from a connection URL for logging.
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***@{}", &url[..scheme_end], &url[at + 1..])
        }
        _ => url.to_string(),
    }
}

// ── Redis ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,
}

impl RedisConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_or(p, "REDIS_URL", "redis://127.0.0.1:6379"),
        }
    }
}

// ── Checker ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Maximum concurrent price fetches (browser pages).
    pub max_pages: usize,
    /// Base URL of the deep links sent to subscribers.
    pub base_url: String,
    /// How long a sent notification suppresses the next one.
    pub cooldown: Duration,
}

impl CheckerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            max_pages: profiled_env_usize(p, "MAX_PAGES", DEFAULT_MAX_PAGES).max(1),
            base_url: profiled_env_or(p, "BASE_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),
            cooldown: profiled_env_duration(p, "ALERT_COOLDOWN", DEFAULT_COOLDOWN),
        }
    }
}

// ── Price fetch ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub url: String,
    pub timeout: Duration,
    pub proxy: Option<String>,
}

impl FetchConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_or(p, "PRICE_SERVICE_URL", "http://localhost:4000/price"),
            timeout: profiled_env_duration(p, "PRICE_FETCH_TIMEOUT", DEFAULT_FETCH_TIMEOUT),
            proxy: profiled_env_opt(p, "PROXY"),
        }
    }
}

// ── Email ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: Option<u16>,
    pub tls: Option<bool>,
    pub from: String,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl EmailConfig {
    /// Enabled only when both the SMTP host and sender are configured.
    fn from_env_profiled(p: &str) -> Option<Self> {
        let smtp_host = profiled_env_opt(p, "SMTP_HOST")?;
        let from = profiled_env_opt(p, "EMAIL_FROM")?;
        Some(Self {
            smtp_host,
            smtp_port: profiled_env_u16_opt(p, "SMTP_PORT"),
            tls: profiled_env_bool_opt(p, "SMTP_TLS"),
            from,
            username: profiled_env_opt(p, "SMTP_USERNAME"),
            password: profiled_env_opt(p, "SMTP_PASSWORD"),
        })
    }
}

// ── SMS ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    /// Override for the messaging API endpoint.
    pub api_url: Option<String>,
    pub account_sid: String,
    #[serde(skip_serializing)]
    pub auth_token: String,
    pub from: String,
}

impl SmsConfig {
    fn from_env_profiled(p: &str) -> Option<Self> {
        Some(Self {
            api_url: profiled_env_opt(p, "SMS_API_URL"),
            account_sid: profiled_env_opt(p, "SMS_ACCOUNT_SID")?,
            auth_token: profiled_env_opt(p, "SMS_AUTH_TOKEN")?,
            from: profiled_env_opt(p, "SMS_FROM")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own profile prefix so parallel tests never share keys.

    #[test]
    fn profiled_values_override() {
        env::set_var("CFGA_MAX_PAGES", "3");
        env::set_var("CFGA_BASE_URL", "https://fares.example.com/");
        env::set_var("CFGA_ALERT_COOLDOWN", "30m");
        let config = Config::for_profile("cfga");
        assert_eq!(config.profile_label(), "CFGA");
        assert_eq!(config.checker.max_pages, 3);
        assert_eq!(config.checker.base_url, "https://fares.example.com");
        assert_eq!(config.checker.cooldown, Duration::from_secs(1_800));
        env::remove_var("CFGA_MAX_PAGES");
        env::remove_var("CFGA_BASE_URL");
        env::remove_var("CFGA_ALERT_COOLDOWN");
    }

    #[test]
    fn max_pages_is_at_least_one() {
        env::set_var("CFGB_MAX_PAGES", "0");
        let config = Config::for_profile("CFGB");
        assert_eq!(config.checker.max_pages, 1);
        env::remove_var("CFGB_MAX_PAGES");
    }

    #[test]
    fn bad_cooldown_falls_back_to_default() {
        env::set_var("CFGC_ALERT_COOLDOWN", "soon");
        let config = Config::for_profile("CFGC");
        assert_eq!(config.checker.cooldown, DEFAULT_COOLDOWN);
        env::remove_var("CFGC_ALERT_COOLDOWN");
    }

    #[test]
    fn overflowing_cooldown_falls_back_to_default() {
        env::set_var("CFGF_ALERT_COOLDOWN", "213503982334602d");
        let config = Config::for_profile("CFGF");
        assert_eq!(config.checker.cooldown, DEFAULT_COOLDOWN);
        env::remove_var("CFGF_ALERT_COOLDOWN");
    }

    #[test]
    fn email_channel_requires_host_and_sender() {
        env::set_var("CFGD_SMTP_HOST", "smtp.example.com");
        env::set_var("CFGD_EMAIL_FROM", "alerts@example.com");
        env::set_var("CFGD_SMTP_PORT", "465");
        env::set_var("CFGD_SMTP_TLS", "true");
        let email = EmailConfig::from_env_profiled("CFGD").unwrap();
        assert_eq!(email.smtp_host, "smtp.example.com");
        assert_eq!(email.smtp_port, Some(465));
        assert_eq!(email.tls, Some(true));
        for key in ["CFGD_SMTP_HOST", "CFGD_EMAIL_FROM", "CFGD_SMTP_PORT", "CFGD_SMTP_TLS"] {
            env::remove_var(key);
        }
    }

    #[test]
    fn sms_channel_requires_all_credentials() {
        env::set_var("CFGE_SMS_ACCOUNT_SID", "AC123");
        env::set_var("CFGE_SMS_AUTH_TOKEN", "secret");
        env::set_var("CFGE_SMS_FROM", "+15125550100");
        let sms = SmsConfig::from_env_profiled("CFGE").unwrap();
        assert_eq!(sms.account_sid, "AC123");
        assert_eq!(sms.from, "+15125550100");
        for key in ["CFGE_SMS_ACCOUNT_SID", "CFGE_SMS_AUTH_TOKEN", "CFGE_SMS_FROM"] {
            env::remove_var(key);
        }
    }

    #[test]
    fn redacts_credentials_in_urls() {
        assert_eq!(redact_url("redis://user:pw@cache:6379"), "redis://***@cache:6379");
        assert_eq!(redact_url("redis://127.0.0.1:6379"), "redis://127.0.0.1:6379");
    }
}
