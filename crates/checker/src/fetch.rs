//! Fare lookup capability.
//!
//! The lookup itself (browser automation against the airline site) runs in a
//! separate price service; this crate only sees it as a slow, failure-prone
//! async call.

use std::time::Duration;

use async_trait::async_trait;
use farewatch_core::FlightDescriptor;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("price service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("no fare found for {0}")]
    NotFound(String),

    #[error("{0}")]
    Backend(String),
}

/// Looks up the current fare for a flight.
#[async_trait]
pub trait PriceFetcher: Send + Sync {
    async fn fetch_price(&self, flight: &FlightDescriptor) -> Result<u32, FetchError>;
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    price: Option<u32>,
}

/// [`PriceFetcher`] calling the price service over HTTP.
///
/// Issues `GET <url>?number=..&from=..&to=..&date=..&type=..` and expects
/// `{"price": <int>}`; a `null` price means no matching fare.
#[derive(Debug, Clone)]
pub struct HttpPriceFetcher {
    url: String,
    client: reqwest::Client,
}

impl HttpPriceFetcher {
    pub fn new(url: String, timeout: Duration, proxy: Option<&str>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().timeout(timeout);
        if let Some(proxy) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }
        Ok(Self {
            url,
            client: builder.build()?,
        })
    }
}

fn query_params(flight: &FlightDescriptor) -> Vec<(&'static str, String)> {
    vec![
        ("number", flight.number.clone()),
        ("from", flight.from.clone()),
        ("to", flight.to.clone()),
        ("date", flight.date.format("%Y-%m-%d").to_string()),
        ("type", flight.alert_type.as_str().to_string()),
    ]
}

#[async_trait]
impl PriceFetcher for HttpPriceFetcher {
    async fn fetch_price(&self, flight: &FlightDescriptor) -> Result<u32, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .query(&query_params(flight))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PriceResponse = response.json().await?;
        parsed
            .price
            .ok_or_else(|| FetchError::NotFound(flight.to_string()))
    }
}
