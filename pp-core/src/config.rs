//! Where the dashboard gets its data from.
//!
//! There is no config file; the data source is picked from CLI flags, with
//! one environment variable to point at a server on the local network.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Port the PowerPlot server listens on.
pub const SERVER_PORT: u16 = 8181;

/// Host used when nothing else is configured.
pub const DEFAULT_LOCAL_HOST: &str = "0.0.0.0";

/// Overrides the local server host.
pub const LOCAL_HOST_ENV: &str = "POWERPLOT_SERVER_LOCAL_IP_ADDRESS";

/// Published snapshot in object storage (served as `binary/octet-stream`).
pub const PUBLIC_DATA_URL: &str = "https://s3sync-public.s3.amazonaws.com/powerplot.json";

/// Open-Meteo hourly forecast endpoint.
pub const WEATHER_API_URL: &str = "https://api.open-meteo.com/v1/forecast";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A server on this machine or the local network.
    Local { host: String },
    /// The deployed snapshot in object storage.
    Public,
    /// Any other endpoint.
    Url(String),
}

impl DataSource {
    /// Local server, honouring [`LOCAL_HOST_ENV`] when set.
    pub fn from_env() -> Self {
        DataSource::local(std::env::var(LOCAL_HOST_ENV).ok())
    }

    pub fn local(host: Option<String>) -> Self {
        let host = host
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_LOCAL_HOST.to_string());
        DataSource::Local { host }
    }

    /// Request URL. The public snapshot gets a cache-busting query so an
    /// intermediate cache never serves a stale copy.
    pub fn url(&self, now: DateTime<Utc>) -> String {
        match self {
            DataSource::Local { host } => format!("http://{host}:{SERVER_PORT}/"),
            DataSource::Public => format!("{PUBLIC_DATA_URL}?v={}", now.timestamp_millis()),
            DataSource::Url(url) => url.clone(),
        }
    }
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::from_env()
    }
}

/// Settings for the dataset HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub source: DataSource,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            source: DataSource::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Fixed location used for the temperature overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone name passed through to the forecast API
    pub timezone: String,
    pub past_days: u32,
}

impl Default for WeatherLocation {
    fn default() -> Self {
        Self {
            latitude: 40.7128,
            longitude: -74.0060,
            timezone: "America/New_York".to_string(),
            past_days: 7,
        }
    }
}

impl WeatherLocation {
    /// Query string parameters for [`WEATHER_API_URL`].
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("hourly", "temperature_2m".to_string()),
            ("timeformat", "unixtime".to_string()),
            ("timezone", self.timezone.clone()),
            ("temperature_unit", "fahrenheit".to_string()),
            ("past_days", self.past_days.to_string()),
        ]
    }
}
