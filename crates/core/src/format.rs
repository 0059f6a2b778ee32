//! Display helpers for prices and travel dates.

use chrono::{DateTime, Utc};

/// Render a whole-unit price, e.g. `$300`.
pub fn format_price(price: u32) -> String {
    format!("${price}")
}

/// Render a signed price difference as an absolute amount, e.g. `$50`.
pub fn format_difference(difference: i64) -> String {
    format!("${}", difference.unsigned_abs())
}

/// Render a travel date, e.g. `Mon, Jan 5`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%a, %b %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn prices_render_with_currency_sign() {
        assert_eq!(format_price(300), "$300");
        assert_eq!(format_price(0), "$0");
    }

    #[test]
    fn difference_is_absolute() {
        assert_eq!(format_difference(50), "$50");
        assert_eq!(format_difference(-10), "$10");
    }

    #[test]
    fn date_renders_weekday_month_day() {
        let date = Utc.with_ymd_and_hms(2026, 1, 5, 14, 30, 0).unwrap();
        assert_eq!(format_date(&date), "Mon, Jan 5");
    }
}
