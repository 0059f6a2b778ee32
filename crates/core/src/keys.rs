//! Key namespace for alert records and cooldown markers.
//!
//! Records live under `alert.<id>`; the cooldown marker for the same alert
//! lives under `alert.<id>.cooldown`. Both match [`ALERT_PATTERN`], so callers
//! enumerating records must filter with [`is_record_key`].

/// Prefix shared by every alert-related key.
pub const ALERT_PREFIX: &str = "alert.";

/// Suffix appended to a record key to form its cooldown marker key.
pub const COOLDOWN_SUFFIX: &str = ".cooldown";

/// Glob pattern matching every alert-related key.
pub const ALERT_PATTERN: &str = "alert.*";

/// Primary key of the persisted record for `id`.
pub fn alert_key(id: &str) -> String {
    format!("{ALERT_PREFIX}{id}")
}

/// Key of the cooldown marker for `id`.
pub fn cooldown_key(id: &str) -> String {
    format!("{ALERT_PREFIX}{id}{COOLDOWN_SUFFIX}")
}

/// Whether `key` names an alert record rather than a cooldown marker.
pub fn is_record_key(key: &str) -> bool {
    key.starts_with(ALERT_PREFIX) && !key.ends_with(COOLDOWN_SUFFIX)
}
