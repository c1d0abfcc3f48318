//! HTTP client for the PowerPlot dataset.

use crate::config::{ClientConfig, DataSource, WeatherLocation};
use crate::error::{PowerPlotError, Result};
use crate::power_data::{PowerData, RawPowerData};
use crate::weather::{self, WeatherPoint};
use chrono::{TimeZone, Utc};
use log::info;
use reqwest::{header::CONTENT_TYPE, Client};

/// Fetches the dataset (and optionally weather) once per call. No retries:
/// a failed fetch is reported to the caller, which decides what "data
/// unavailable" looks like.
pub struct PowerPlotClient {
    http: Client,
    config: ClientConfig,
}

impl PowerPlotClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn source(&self) -> &DataSource {
        &self.config.source
    }

    /// GET the dataset and decode it without normalizing.
    pub async fn fetch_raw(&self) -> Result<RawPowerData> {
        let url = self.config.source.url(Utc::now());
        info!("Fetching power data from {url}");
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(PowerPlotError::HttpStatus(response.status().as_u16()));
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;
        info!("Received {} bytes", body.len());
        RawPowerData::from_response_body(content_type.as_deref(), &body)
    }

    /// GET the dataset and normalize it into `tz`.
    pub async fn fetch_power_data<Tz: TimeZone>(&self, tz: &Tz) -> Result<PowerData> {
        let raw = self.fetch_raw().await?;
        PowerData::from_raw(raw, tz)
    }

    /// Hourly temperatures for the overlay. Independent of the dataset fetch.
    pub async fn fetch_weather<Tz: TimeZone>(
        &self,
        location: &WeatherLocation,
        tz: &Tz,
    ) -> Result<Vec<WeatherPoint>> {
        weather::fetch_weather(&self.http, location, tz).await
    }
}
