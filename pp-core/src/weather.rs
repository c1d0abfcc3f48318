//! Outdoor temperature from the Open-Meteo forecast API, used as an overlay
//! on the hourly chart.

use crate::data_point::DataPoint;
use crate::error::{PowerPlotError, Result};
use chrono::{DateTime, TimeZone};
use log::warn;
use serde::Deserialize;

#[cfg(feature = "api")]
use crate::config::{WeatherLocation, WEATHER_API_URL};
#[cfg(feature = "api")]
use log::info;
#[cfg(feature = "api")]
use reqwest::Client;

/// Hourly temperature in °F, shaped like any other series.
pub type WeatherPoint = DataPoint;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HourlyTemperatures {
    /// Unix seconds
    pub time: Vec<i64>,
    pub temperature_2m: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastResponse {
    pub hourly: HourlyTemperatures,
}

impl ForecastResponse {
    /// Zip timestamps with temperatures, one point per hour. Hours the API
    /// reports as `null` are dropped.
    pub fn to_weather_points<Tz: TimeZone>(&self, tz: &Tz) -> Result<Vec<WeatherPoint>> {
        let hourly = &self.hourly;
        if hourly.time.len() != hourly.temperature_2m.len() {
            return Err(PowerPlotError::InvalidFormat(format!(
                "{} timestamps but {} temperatures",
                hourly.time.len(),
                hourly.temperature_2m.len()
            )));
        }
        let mut points = Vec::with_capacity(hourly.time.len());
        let mut missing = 0;
        for (secs, temperature) in hourly.time.iter().zip(&hourly.temperature_2m) {
            let instant = DateTime::from_timestamp(*secs, 0).ok_or_else(|| {
                PowerPlotError::InvalidFormat(format!("timestamp out of range: {secs}"))
            })?;
            match temperature {
                Some(value) => points.push(DataPoint::new(
                    instant.with_timezone(tz).fixed_offset(),
                    *value,
                )),
                None => missing += 1,
            }
        }
        if missing > 0 {
            warn!("{missing} hours without a temperature");
        }
        Ok(points)
    }
}

/// Fetch hourly temperatures for `location`.
#[cfg(feature = "api")]
pub async fn fetch_weather<Tz: TimeZone>(
    client: &Client,
    location: &WeatherLocation,
    tz: &Tz,
) -> Result<Vec<WeatherPoint>> {
    info!(
        "Fetching weather for {}, {} ({})",
        location.latitude, location.longitude, location.timezone
    );
    let response = client
        .get(WEATHER_API_URL)
        .query(&location.query_params())
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(PowerPlotError::HttpStatus(response.status().as_u16()));
    }
    let forecast: ForecastResponse = response.json().await?;
    forecast.to_weather_points(tz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    // https://api.open-meteo.com/v1/forecast?latitude=40.71&longitude=-74.01&hourly=temperature_2m&timeformat=unixtime&temperature_unit=fahrenheit
    const FORECAST: &str = r#"{
        "latitude": 40.71,
        "longitude": -74.01,
        "timezone": "America/New_York",
        "hourly_units": { "time": "unixtime", "temperature_2m": "°F" },
        "hourly": {
            "time": [1710072000, 1710075600, 1710079200],
            "temperature_2m": [41.3, null, 44.8]
        }
    }"#;

    #[test]
    fn test_forecast_to_weather_points() {
        let forecast: ForecastResponse = serde_json::from_str(FORECAST).unwrap();
        let points = forecast.to_weather_points(&Utc).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].hour, 12);
        assert_eq!(points[0].value, 41.3);
        assert_eq!(points[1].hour, 14);
        assert_eq!(points[1].value, 44.8);
    }

    #[test]
    fn test_forecast_in_local_offset() {
        let eastern = FixedOffset::west_opt(4 * 3600).unwrap();
        let forecast: ForecastResponse = serde_json::from_str(FORECAST).unwrap();
        let points = forecast.to_weather_points(&eastern).unwrap();
        assert_eq!(points[0].hour, 8);
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let forecast = ForecastResponse {
            hourly: HourlyTemperatures {
                time: vec![1710072000, 1710075600],
                temperature_2m: vec![Some(40.0)],
            },
        };
        assert!(matches!(
            forecast.to_weather_points(&Utc),
            Err(PowerPlotError::InvalidFormat(_))
        ));
    }
}
