//! Remote exchange rate source
//!
//! The rate service answers with a daily JSON document; the USD rate in the
//! local currency sits at `Valute.USD.Value`.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use std::{str::FromStr, time::Duration};
use tracing::info;

use crate::error::{DeliveryError, DeliveryResult};

/// Default public endpoint for the daily rates document
pub const DEFAULT_RATE_SOURCE_URL: &str = "https://www.cbr-xml-daily.ru/daily_json.js";

const USD_RATE_POINTER: &str = "/Valute/USD/Value";

/// Something that can produce the current USD rate
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rate(&self) -> DeliveryResult<Decimal>;
}

/// Rate source backed by an HTTP GET to the rates endpoint
#[derive(Clone)]
pub struct HttpRateSource {
    client: reqwest::Client,
    url: String,
}

impl HttpRateSource {
    /// Create a new HTTP rate source
    ///
    /// Without a `timeout` the transport default applies.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> DeliveryResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch_rate(&self) -> DeliveryResult<Decimal> {
        info!("Fetching exchange rate from {}", self.url);

        let body: Value = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let rate = parse_usd_rate(&body)?;
        info!("Fetched USD exchange rate: {}", rate);
        Ok(rate)
    }
}

/// Extract the USD rate from a rates document
///
/// The number is read through its textual form so no binary float rounding
/// leaks into the decimal.
pub fn parse_usd_rate(body: &Value) -> DeliveryResult<Decimal> {
    let number = match body.pointer(USD_RATE_POINTER) {
        Some(Value::Number(number)) => number,
        Some(other) => {
            return Err(DeliveryError::RatePayload(format!(
                "Valute.USD.Value is not a number: {}",
                other
            )));
        }
        None => {
            return Err(DeliveryError::RatePayload(
                "missing Valute.USD.Value".to_string(),
            ));
        }
    };

    let text = number.to_string();
    let rate = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| DeliveryError::RatePayload(format!("unreadable rate {}: {}", text, e)))?;

    if rate <= Decimal::ZERO {
        return Err(DeliveryError::RatePayload(format!(
            "rate must be positive, got {}",
            rate
        )));
    }

    Ok(rate)
}
