//! HTTP client for the Juhe `simpleWeather` endpoint.

use std::time::Duration;

use kebiao_core::config::WeatherConfig;

use crate::error::WeatherError;
use crate::report::{parse_response, WeatherReport};

/// Fetches the current weather for one configured city.
#[derive(Debug)]
pub struct WeatherClient {
    url: String,
    api_key: String,
    city: String,
    /// Shared HTTP client (connection pooling, request timeout).
    client: reqwest::Client,
}

impl WeatherClient {
    /// Build a client from config.
    ///
    /// Returns [`WeatherError::NotConfigured`] when no API key is set.
    pub fn from_config(config: &WeatherConfig, timeout: Duration) -> Result<Self, WeatherError> {
        let api_key = config.api_key.clone().ok_or(WeatherError::NotConfigured)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            url: config.url.clone(),
            api_key,
            city: config.city.clone(),
            client,
        })
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Query the API and decode the report.
    pub async fn fetch(&self) -> Result<WeatherReport, WeatherError> {
        tracing::debug!(url = %self.url, city = %self.city, "requesting weather");

        let response = self
            .client
            .get(&self.url)
            .query(&[("key", self.api_key.as_str()), ("city", self.city.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %self.url, %status, "weather API returned non-2xx status");
            return Err(WeatherError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let report = parse_response(&body, &self.city)?;

        tracing::info!(
            city = %report.city,
            temperature = %report.temperature,
            info = %report.info,
            "weather fetched"
        );
        Ok(report)
    }
}
