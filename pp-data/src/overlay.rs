//! Outdoor temperature laid over the hourly usage series.

use chrono::{DateTime, FixedOffset};
use pp_core::data_point::DataPoint;
use pp_core::weather::WeatherPoint;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayPoint {
    pub date: DateTime<FixedOffset>,
    /// kWh
    pub value: f64,
    /// °F at the same instant, if the forecast covers it
    pub weather_value: Option<f64>,
}

/// Pair every hourly reading with the temperature reported for the same
/// instant. Offsets may differ between the two series; only the instant
/// has to match.
pub fn overlay_weather(hourly: &[DataPoint], weather: &[WeatherPoint]) -> Vec<OverlayPoint> {
    let by_instant: HashMap<i64, f64> = weather
        .iter()
        .map(|w| (w.date.timestamp_millis(), w.value))
        .collect();
    hourly
        .iter()
        .map(|p| OverlayPoint {
            date: p.date,
            value: p.value,
            weather_value: by_instant.get(&p.date.timestamp_millis()).copied(),
        })
        .collect()
}
