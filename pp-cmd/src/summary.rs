//! Text rendering of the whole dashboard.

use anyhow::Context;
use chrono::TimeZone;
use log::{info, warn};
use pp_core::client::PowerPlotClient;
use pp_core::config::WeatherLocation;
use pp_core::power_data::{DailyBreakdown, PowerData, STALE_AFTER_SECS};
use pp_data::bill::{bill_shares, projected_bill_title};
use pp_data::brush::{hour_tooltip, select};
use pp_data::monthly::{axis_ceiling, group_by_month, recent_months, MONTHS_SHOWN};
use pp_data::stats::{day_breakdown, hourly_mean_trend, max_value, trailing, DAY_HOURS};
use pp_data::weekly::WeeklyBuckets;
use pp_state::{Action, AppState};
use pp_utils::format::{humanize_key, whole_dollars};
use std::fmt::Write;

/// Fetch the dataset (and weather, concurrently, when asked) and print the
/// dashboard.
pub async fn run_summary<Tz: TimeZone>(
    client: &PowerPlotClient,
    with_weather: bool,
    tz: &Tz,
) -> anyhow::Result<()> {
    let location = WeatherLocation::default();
    let (data, weather) = if with_weather {
        let (data, weather) = tokio::join!(
            client.fetch_power_data(tz),
            client.fetch_weather(&location, tz)
        );
        (data, Some(weather))
    } else {
        (client.fetch_power_data(tz).await, None)
    };

    let mut state = AppState::new();
    state = match data {
        Ok(data) => state.reduce(Action::FetchSucceeded(data)),
        Err(e) => state.reduce(Action::FetchFailed(e.to_string())),
    };
    match weather {
        Some(Ok(points)) => state = state.reduce(Action::WeatherLoaded(points)),
        Some(Err(e)) => warn!("continuing without weather: {e}"),
        None => {}
    }
    if state.is_loading() {
        anyhow::bail!(
            "no data from {:?}: {}",
            client.source(),
            state.error_msg().unwrap_or("unknown error")
        );
    }

    let report = render_summary(&state)?;
    info!("Summary rendered ({} lines)", report.lines().count());
    println!("{report}");
    Ok(())
}

fn kw(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

/// Render every dashboard panel from a loaded state.
pub fn render_summary(state: &AppState) -> anyhow::Result<String> {
    let data = state.data().context("dataset not loaded")?;
    let mut out = String::new();

    writeln!(
        out,
        "Last updated {} ({:.0}s ago)",
        data.last_updated, data.last_updated_seconds_ago
    )?;
    if data.is_stale() {
        warn!(
            "dataset is {:.0}s old, past the {STALE_AFTER_SECS:.0}s limit",
            data.last_updated_seconds_ago
        );
        writeln!(
            out,
            "Data is more than 24h old; the electricity provider likely has a live data outage."
        )?;
    }
    let inactive = data.inactive_services();
    if inactive.is_empty() {
        writeln!(out, "All services running")?;
    } else {
        writeln!(out, "Services down: {}", inactive.join(", "))?;
    }

    writeln!(out)?;
    match state.brush() {
        Ok(window) => writeln!(out, "{} [{:?}]", window.sentence(), window.usage_level())?,
        Err(e) => writeln!(out, "No usage in the selected window ({e})")?,
    }
    write_window_detail(&mut out, state, data)?;
    if state.weather().is_some() {
        let overlay = state.hourly_overlay();
        let matched: Vec<f64> = overlay.iter().filter_map(|o| o.weather_value).collect();
        writeln!(
            out,
            "Temperature known for {} of {} hours, latest {}°F",
            matched.len(),
            overlay.len(),
            kw(matched.last().copied())
        )?;
    }

    write_trend(&mut out, data)?;
    write_breakdown(&mut out, data)?;
    write_bill(&mut out, data)?;
    write_monthly(&mut out, state, data)?;
    write_weekly(&mut out, data)?;
    Ok(out)
}

/// Axis ends and busiest hour of the brushed window.
fn write_window_detail(out: &mut String, state: &AppState, data: &PowerData) -> anyhow::Result<()> {
    let (Some((start, end)), Some(zoom), Some(latest)) =
        (state.brush_range(), state.brush_zoom(), data.series.hourly.last())
    else {
        return Ok(());
    };
    let today = latest.local_date();
    let window = select(&data.series.hourly, start, end)?;
    if let (Some(first), Some(last)) = (window.first(), window.last()) {
        writeln!(
            out,
            "Axis: {} to {} ({zoom:?} view)",
            zoom.tick_label(first, today),
            zoom.tick_label(last, today)
        )?;
    }
    let peak = window
        .iter()
        .filter(|p| p.value > 0.0)
        .reduce(|best, p| if p.value > best.value { p } else { best });
    if let Some(peak) = peak {
        writeln!(
            out,
            "Peak hour: {} ({:.2} kW)",
            hour_tooltip(peak, today),
            peak.value
        )?;
    }
    Ok(())
}

fn write_trend(out: &mut String, data: &PowerData) -> anyhow::Result<()> {
    let trend = &data.hourly_trend;
    writeln!(out)?;
    writeln!(out, "{} [{:?}]", trend.insight(), trend.sentiment())?;
    writeln!(
        out,
        "Hourly mean: {:.2} kW over 24h vs {:.2} kW over 7d ({:+.1}%)",
        trend.past_24h, trend.past_7d, trend.pct_diff
    )?;
    match hourly_mean_trend(&data.series.hourly) {
        Ok(local) => writeln!(
            out,
            "From the hourly series: {:.2} kW vs {:.2} kW ({:+.1}%)",
            local.past_24h, local.past_7d, local.pct_diff
        )?,
        Err(e) => warn!("cannot recompute hourly trend: {e}"),
    }
    Ok(())
}

fn write_breakdown(out: &mut String, data: &PowerData) -> anyhow::Result<()> {
    let reported = &data.day_breakdown;
    let recomputed: DailyBreakdown = day_breakdown(trailing(&data.series.hourly, DAY_HOURS));
    writeln!(out)?;
    writeln!(
        out,
        "{:<10} {:>8} {:>8} {:>8} {:>8}",
        "", "24h", "48h", "7d", "series"
    )?;
    let columns = [
        reported.past_24h.bands(),
        reported.past_48h.bands(),
        reported.past_7d.bands(),
        recomputed.bands(),
    ];
    for row in 0..4 {
        let (name, _) = columns[0][row];
        writeln!(
            out,
            "{:<10} {:>8} {:>8} {:>8} {:>8}",
            humanize_key(name),
            kw(columns[0][row].1),
            kw(columns[1][row].1),
            kw(columns[2][row].1),
            kw(columns[3][row].1)
        )?;
    }
    Ok(())
}

fn write_bill(out: &mut String, data: &PowerData) -> anyhow::Result<()> {
    let billing = &data.billing;
    writeln!(out)?;
    let title = projected_bill_title(&data.series.monthly)
        .unwrap_or_else(|| "Projected bill is".to_string());
    writeln!(
        out,
        "{title} ${} ({:.0} kWh)",
        whole_dollars(billing.projected_bill_dollars),
        billing.projected_bill_kwh
    )?;
    match bill_shares(billing.projected_bill_dollars, &billing.bill_breakdown) {
        Ok(shares) => {
            for share in shares {
                writeln!(out, "  {} (${:.2})", share.display(), share.amount)?;
            }
        }
        Err(e) => warn!("cannot split projected bill: {e}"),
    }
    Ok(())
}

fn write_monthly(out: &mut String, state: &AppState, data: &PowerData) -> anyhow::Result<()> {
    let months = recent_months(&data.series.monthly, MONTHS_SHOWN);
    writeln!(out)?;
    let ceiling = max_value(months).map(axis_ceiling).unwrap_or_default();
    writeln!(out, "Monthly usage (kWh, axis to {ceiling:.0})")?;
    for point in months {
        writeln!(
            out,
            "  {} {} {:>6.0}",
            state.month_label(point.month),
            point.date.format("%Y"),
            point.value
        )?;
    }

    if let Some(month) = state.selected_month() {
        let grouped = group_by_month(&data.series.daily, true);
        if let Some(to_date) = grouped.get(month).and_then(|days| days.last()) {
            writeln!(
                out,
                "{month} so far: {:.0} kWh over {} days",
                to_date.value,
                grouped[month].len()
            )?;
        }
    }
    Ok(())
}

fn write_weekly(out: &mut String, data: &PowerData) -> anyhow::Result<()> {
    let weekly = match WeeklyBuckets::from_hourly(&data.series.hourly) {
        Ok(weekly) => weekly,
        Err(e) => {
            warn!("no weekly view: {e}");
            return Ok(());
        }
    };
    writeln!(out)?;
    writeln!(out, "Past week (mean of reported hours)")?;
    for (_, label, mean) in weekly.daily_means() {
        writeln!(out, "  {label:<10} {:>6} kWh", kw(mean))?;
    }
    Ok(())
}
