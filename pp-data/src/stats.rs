//! Means, percentage differences and part-of-day breakdowns.
//!
//! Nothing here returns `NaN`: an empty input or a zero baseline is a
//! [`PowerPlotError::DivisionByZero`], and a day-part with no readings is
//! `None`.

use pp_core::data_point::DataPoint;
use pp_core::error::{PowerPlotError, Result};
use pp_core::power_data::{DailyBreakdown, HourlyTrend};
use serde::Serialize;
use std::ops::Range;

pub const MORNING_HOURS: Range<u32> = 6..12;
pub const AFTERNOON_HOURS: Range<u32> = 12..17;
pub const EVENING_HOURS: Range<u32> = 17..21;

/// Hours in a day and in a week of hourly readings.
pub const DAY_HOURS: usize = 24;
pub const WEEK_HOURS: usize = 7 * DAY_HOURS;

/// Four fixed bands of the day; night wraps midnight (21:00 to 05:59).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPart {
    pub fn from_hour(hour: u32) -> Self {
        if MORNING_HOURS.contains(&hour) {
            DayPart::Morning
        } else if AFTERNOON_HOURS.contains(&hour) {
            DayPart::Afternoon
        } else if EVENING_HOURS.contains(&hour) {
            DayPart::Evening
        } else {
            DayPart::Night
        }
    }
}

/// Arithmetic mean.
pub fn mean<I>(values: I) -> Result<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return Err(PowerPlotError::DivisionByZero);
    }
    Ok(sum / count as f64)
}

/// Mean of the strictly positive values only. Zero and negative readings
/// stand for outages or hours not reported yet.
pub fn positive_mean<I>(values: I) -> Result<f64>
where
    I: IntoIterator<Item = f64>,
{
    mean(values.into_iter().filter(|v| *v > 0.0))
}

/// `(current - baseline) / baseline * 100`
pub fn percent_difference(current: f64, baseline: f64) -> Result<f64> {
    if baseline == 0.0 {
        return Err(PowerPlotError::DivisionByZero);
    }
    Ok((current - baseline) / baseline * 100.0)
}

/// Mean reading per day-part. Mean is used for every band so bands of
/// different length stay comparable.
pub fn day_breakdown(points: &[DataPoint]) -> DailyBreakdown {
    let band = |part: DayPart| {
        mean(
            points
                .iter()
                .filter(|p| DayPart::from_hour(p.hour) == part)
                .map(|p| p.value),
        )
        .ok()
    };
    DailyBreakdown {
        morning: band(DayPart::Morning),
        afternoon: band(DayPart::Afternoon),
        evening: band(DayPart::Evening),
        night: band(DayPart::Night),
    }
}

/// The last `n` points, or all of them when there are fewer.
pub fn trailing(points: &[DataPoint], n: usize) -> &[DataPoint] {
    &points[points.len().saturating_sub(n)..]
}

/// Mean hourly usage over the last 24 hours against the last 7 days.
pub fn hourly_mean_trend(hourly: &[DataPoint]) -> Result<HourlyTrend> {
    let past_7d = mean(trailing(hourly, WEEK_HOURS).iter().map(|p| p.value))?;
    let past_24h = mean(trailing(hourly, DAY_HOURS).iter().map(|p| p.value))?;
    Ok(HourlyTrend {
        past_24h,
        past_7d,
        pct_diff: percent_difference(past_24h, past_7d)?,
    })
}

/// Largest value, for chart domains.
pub fn max_value(points: &[DataPoint]) -> Option<f64> {
    points.iter().map(|p| p.value).reduce(f64::max)
}
