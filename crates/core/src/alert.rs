//! The alert entity: one subscriber tracking one flight's fare.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::format::{format_date, format_difference, format_price};
use crate::keys;

/// Alert granularity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertType {
    /// A specific flight number on a specific date.
    #[default]
    Single,
    /// Any flight on the route for that date.
    Day,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Single => "SINGLE",
            AlertType::Day => "DAY",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted price alert.
///
/// Serialized as a camelCase JSON object under [`keys::alert_key`]. Prices are
/// whole currency units. `latest_price` is absent until the first successful
/// check and is overwritten by every check after that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub date: DateTime<Utc>,
    pub number: String,
    pub from: String,
    pub to: String,
    pub price: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_price: Option<u32>,
    #[serde(default)]
    pub alert_type: AlertType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Alert {
    pub fn from_json(data: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Primary store key for this alert.
    pub fn key(&self) -> String {
        keys::alert_key(&self.id)
    }

    /// Store key of this alert's cooldown marker.
    pub fn cooldown_key(&self) -> String {
        keys::cooldown_key(&self.id)
    }

    /// An alert whose travel date has passed can never fire again.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.date < now
    }

    /// `price - latest_price`; positive means the fare dropped below the threshold.
    ///
    /// Returns `None` before the first successful check.
    pub fn price_drop(&self) -> Option<i64> {
        self.latest_price
            .map(|latest| i64::from(self.price) - i64::from(latest))
    }

    pub fn descriptor(&self) -> FlightDescriptor {
        FlightDescriptor {
            number: self.number.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            date: self.date,
            alert_type: self.alert_type,
        }
    }

    /// Email target, if one is set.
    pub fn email(&self) -> Option<&str> {
        self.to_email.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// SMS target, if one is set.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn formatted_latest_price(&self) -> Option<String> {
        self.latest_price.map(format_price)
    }

    pub fn formatted_price_difference(&self) -> Option<String> {
        self.price_drop().map(format_difference)
    }
}

/// What the price-fetch backend needs to look up a fare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightDescriptor {
    pub number: String,
    pub from: String,
    pub to: String,
    pub date: DateTime<Utc>,
    pub alert_type: AlertType,
}

impl fmt::Display for FlightDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} #{} {} → {}",
            format_date(&self.date),
            self.number,
            self.from,
            self.to
        )
    }
}
