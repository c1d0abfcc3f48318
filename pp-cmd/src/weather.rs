//! Standalone temperature listing.

use chrono::TimeZone;
use log::info;
use pp_core::client::PowerPlotClient;
use pp_core::config::WeatherLocation;
use pp_core::weather::WeatherPoint;
use pp_data::stats::{max_value, mean};
use pp_utils::format::display_date;
use std::fmt::Write;

pub async fn run_weather<Tz: TimeZone>(
    client: &PowerPlotClient,
    location: &WeatherLocation,
    tz: &Tz,
) -> anyhow::Result<()> {
    let points = client.fetch_weather(location, tz).await?;
    info!("{} hourly temperatures", points.len());
    println!("{}", render_weather(&points)?);
    Ok(())
}

/// One line per hour, then the mean and peak.
pub fn render_weather(points: &[WeatherPoint]) -> anyhow::Result<String> {
    let mut out = String::new();
    for point in points {
        writeln!(out, "{:<18} {:>6.1}°F", display_date(&point.date), point.value)?;
    }
    match (mean(points.iter().map(|p| p.value)), max_value(points)) {
        (Ok(mean), Some(max)) => write!(out, "mean {mean:.1}°F, high {max:.1}°F")?,
        _ => write!(out, "no temperatures reported")?,
    }
    Ok(out)
}
