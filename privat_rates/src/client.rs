use crate::{date::DateKey, error::FetchError, record::RawRateRecord};
use async_trait::async_trait;
use std::time::Duration;

/// PrivatBank archive of historical rates.
pub const DEFAULT_API_URL: &str = "https://api.privatbank.ua/p24api/exchange_rates";

/// Something that can produce the rate record of a single date.
///
/// A failed fetch is `None`, never an error: callers treat it as
/// "no data for this date".
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_one(&self, date: DateKey) -> Option<RawRateRecord>;
}

#[derive(Clone, Debug)]
pub struct RateClient {
    http: reqwest::Client,
    base_url: String,
}

impl RateClient {
    /// Every request is bounded by `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn request_url(&self, date: DateKey) -> String {
        format!("{}?json&date={date}", self.base_url)
    }

    pub async fn try_fetch(&self, date: DateKey) -> Result<RawRateRecord, FetchError> {
        let response = self.http.get(self.request_url(date)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = response.bytes().await?;
        Ok(RawRateRecord::from_slice(&body)?)
    }
}

#[async_trait]
impl RateSource for RateClient {
    async fn fetch_one(&self, date: DateKey) -> Option<RawRateRecord> {
        match self.try_fetch(date).await {
            Ok(record) => {
                tracing::debug!(
                    "Fetched {} rates for {date} (reported as {})",
                    record.exchange_rate.len(),
                    record.date
                );
                Some(record)
            }
            Err(e) => {
                tracing::warn!("Fetching rates for {date} failed: {e}");
                None
            }
        }
    }
}
