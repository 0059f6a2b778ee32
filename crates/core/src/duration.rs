//! Duration strings for config values and CLI flags.

use std::time::Duration;

fn unit_seconds(unit: char) -> Option<u64> {
    match unit {
        'd' => Some(86_400),
        'h' => Some(3_600),
        'm' => Some(60),
        's' => Some(1),
        _ => None,
    }
}

/// Parse `"1h"`, `"30m"`, `"2h30m"`, `"90s"`, `"1d12h"`, or a bare number of seconds.
///
/// Returns `None` for empty or unparseable input, a trailing bare number
/// after a unit (`"30m15"`), or a total that does not fit in `u64` seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(secs) = s.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    let mut total: u64 = 0;
    let mut rest = s;
    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit())?;
        let count: u64 = rest[..digits].parse().ok()?;
        let mut tail = rest[digits..].chars();
        let per_unit = unit_seconds(tail.next()?)?;
        total = total.checked_add(count.checked_mul(per_unit)?)?;
        rest = tail.as_str();
    }
    Some(Duration::from_secs(total))
}
