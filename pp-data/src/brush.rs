//! Summary of the window selected with the hourly chart's brush.

use crate::stats::{positive_mean, DAY_HOURS};
use chrono::{DateTime, FixedOffset, NaiveDate};
use pp_core::data_point::DataPoint;
use pp_core::error::{PowerPlotError, Result};
use pp_utils::calendar::{abbrev_month_name, month_name, weekday_name};
use pp_utils::format::{
    display_date, hour_range_label, num_hours_to_time_string, whole_dollars, with_ordinal_suffix,
};
use serde::Serialize;

/// Days shown under the brush when the page first loads.
pub const DEFAULT_BRUSH_DAYS: usize = 5;

/// Flat-rate estimate used for the "per month" figure: $/kWh and fixed charge.
pub const ESTIMATE_RATE_PER_KWH: f64 = 0.352;
pub const ESTIMATE_FIXED_CHARGE: f64 = 18.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BrushWindow {
    /// Mean of the positive readings in the window (kW)
    pub average: f64,
    /// Number of hourly points selected
    pub width: usize,
    pub first_index_date: DateTime<FixedOffset>,
    pub last_index_date: DateTime<FixedOffset>,
}

impl BrushWindow {
    /// Summarize a contiguous selection. Non-positive readings (outages)
    /// are left out of the average; a selection with none left is an error.
    pub fn from_selection(points: &[DataPoint]) -> Result<Self> {
        let (first, last) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(PowerPlotError::EmptySelection),
        };
        Ok(BrushWindow {
            average: positive_mean(points.iter().map(|p| p.value))?,
            width: points.len(),
            first_index_date: first.date,
            last_index_date: last.date,
        })
    }

    /// Rough monthly cost if usage stayed at this average.
    pub fn estimated_monthly_cost(&self) -> f64 {
        ESTIMATE_RATE_PER_KWH * self.average * 24.0 * 31.0 + ESTIMATE_FIXED_CHARGE
    }

    pub fn usage_level(&self) -> UsageLevel {
        UsageLevel::from_average(self.average)
    }

    /// One-line description shown above the hourly chart.
    pub fn sentence(&self) -> String {
        format!(
            "Between {}, and {} (approx. {} period), the mean energy consumption was {:.2} kW/hour or ~${}/month.",
            display_date(&self.first_index_date),
            display_date(&self.last_index_date),
            num_hours_to_time_string(self.width),
            self.average,
            whole_dollars(self.estimated_monthly_cost())
        )
    }
}

/// Inclusive index range `start..=end` of `points`.
pub fn select(points: &[DataPoint], start: usize, end: usize) -> Result<&[DataPoint]> {
    if start > end || end >= points.len() {
        return Err(PowerPlotError::InvalidSelection {
            start,
            end,
            len: points.len(),
        });
    }
    Ok(&points[start..=end])
}

/// Index range covered by the brush on first render: the last five days.
pub fn default_range(len: usize) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    Some((len.saturating_sub(DAY_HOURS * DEFAULT_BRUSH_DAYS), len - 1))
}

/// Tooltip for one hourly bar: "Sun, Mar 10th, 3:00-3:59PM".
/// `today` is the day "Today"/"Yesterday" are relative to.
pub fn hour_tooltip(point: &DataPoint, today: NaiveDate) -> String {
    format!(
        "{}, {} {}, {}",
        weekday_name(point.local_date(), today, true),
        abbrev_month_name(point.month).unwrap_or_default(),
        with_ordinal_suffix(point.day),
        hour_range_label(point.hour)
    )
}

/// How zoomed-in the brush is, which decides the x-axis tick format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BrushZoom {
    Day,
    Week,
    Month,
    Year,
}

impl BrushZoom {
    /// `Day` only applies when the window also sits within the last six days.
    pub fn classify(start: usize, end: usize, len: usize) -> Self {
        let width = end.saturating_sub(start);
        if width <= 6 * DAY_HOURS && start + 6 * DAY_HOURS > len {
            BrushZoom::Day
        } else if width <= 28 * DAY_HOURS {
            BrushZoom::Week
        } else if width <= 90 * DAY_HOURS {
            BrushZoom::Month
        } else {
            BrushZoom::Year
        }
    }

    /// X-axis tick for `point` at this zoom level.
    pub fn tick_label(&self, point: &DataPoint, today: NaiveDate) -> String {
        let day = weekday_name(point.local_date(), today, true);
        match self {
            BrushZoom::Day => {
                let twelve = match point.hour % 12 {
                    0 => 12,
                    h => h,
                };
                let ampm = if point.hour >= 12 { "PM" } else { "AM" };
                format!("{day} {twelve}{ampm}")
            }
            BrushZoom::Week | BrushZoom::Month => format!(
                "{} {} ({day})",
                abbrev_month_name(point.month).unwrap_or_default(),
                with_ordinal_suffix(point.day)
            ),
            BrushZoom::Year => month_name(point.month).unwrap_or_default().to_string(),
        }
    }
}

/// Colour band for an average hourly draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UsageLevel {
    Low,
    Moderate,
    High,
}

impl UsageLevel {
    pub fn from_average(average_kw: f64) -> Self {
        if average_kw < 0.3 {
            UsageLevel::Low
        } else if average_kw < 0.7 {
            UsageLevel::Moderate
        } else {
            UsageLevel::High
        }
    }
}
