//! Per-month views of the daily and monthly series.

use indexmap::IndexMap;
use pp_core::data_point::DataPoint;
use pp_utils::calendar::{abbrev_month_name, month_name_of, super_abbrev_month_name};

/// Months shown on the monthly bar chart.
pub const MONTHS_SHOWN: usize = 12;

/// Month name -> that month's points, months in first-seen order.
pub type MonthlyGroup = IndexMap<String, Vec<DataPoint>>;

/// Group a daily series by month name, keeping the order months first
/// appear in (not calendar order).
///
/// With `cumulative`, each day after the first of its month becomes
/// `round(previous_cumulative + raw)`. Rounding happens at every step, so
/// long months drift slightly from a single rounding of the raw sum; this
/// matches the figures the dashboard has always shown.
pub fn group_by_month(points: &[DataPoint], cumulative: bool) -> MonthlyGroup {
    let mut result = MonthlyGroup::new();
    for point in points {
        let month = month_name_of(&point.date);
        match result.get_mut(month) {
            None => {
                result.insert(month.to_string(), vec![point.clone()]);
            }
            Some(days) => {
                let next = match (cumulative, days.last()) {
                    (true, Some(previous)) => point.with_value((previous.value + point.value).round()),
                    _ => point.clone(),
                };
                days.push(next);
            }
        }
    }
    result
}

/// Month of the most recent point, which the daily chart highlights.
pub fn latest_month_name(points: &[DataPoint]) -> Option<&'static str> {
    points.last().map(|p| month_name_of(&p.date))
}

/// Trailing `n` monthly totals for the bar chart.
pub fn recent_months(monthly: &[DataPoint], n: usize) -> &[DataPoint] {
    &monthly[monthly.len().saturating_sub(n)..]
}

/// Top of the monthly chart's y-axis: 10% headroom, rounded up to 100 kWh.
pub fn axis_ceiling(max_value: f64) -> f64 {
    (max_value * 1.1 / 100.0).ceil() * 100.0
}

/// Bar label for a zero-based month: "Jan", or "J" when space is tight.
pub fn month_axis_label(month0: u32, compact: bool) -> &'static str {
    let label = if compact {
        super_abbrev_month_name(month0)
    } else {
        abbrev_month_name(month0)
    };
    label.unwrap_or_default()
}

/// Month highlighted on the daily chart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MonthSelection {
    /// Nothing clicked yet: follow the latest month.
    #[default]
    Latest,
    Chosen(String),
    /// The highlighted month was clicked again.
    Cleared,
}

impl MonthSelection {
    /// Clicking the highlighted month clears the highlight; clicking any
    /// other month selects it.
    pub fn toggle(&self, month: &str, latest: Option<&str>) -> Self {
        if self.resolve(latest) == Some(month) {
            MonthSelection::Cleared
        } else {
            MonthSelection::Chosen(month.to_string())
        }
    }

    pub fn resolve<'a>(&'a self, latest: Option<&'a str>) -> Option<&'a str> {
        match self {
            MonthSelection::Latest => latest,
            MonthSelection::Chosen(month) => Some(month.as_str()),
            MonthSelection::Cleared => None,
        }
    }
}
