//! Seven day-rows of hourly readings for the week bubble chart.

use crate::stats::{positive_mean, WEEK_HOURS};
use chrono::{Days, DurationRound, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use log::debug;
use pp_core::data_point::DataPoint;
use pp_core::error::{PowerPlotError, Result};
use pp_core::hour_range::HourRange;
use pp_utils::calendar::{hour_label, weekday_name};
use serde::Serialize;
use std::collections::BTreeMap;

/// A reading tagged for display in one row of the bubble chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedPoint {
    #[serde(flatten)]
    pub point: DataPoint,
    /// "12a" .. "11p"
    pub hour_label: &'static str,
    /// "Today", "Yesterday" or a weekday name
    pub day_label: &'static str,
    /// Hour of the latest day that has not been reported yet
    pub placeholder: bool,
}

/// Days-ago -> that day's points in chronological order. Day 0 is the day
/// of the latest reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyBuckets {
    pub reference_day: NaiveDate,
    pub buckets: BTreeMap<u32, Vec<TaggedPoint>>,
}

impl WeeklyBuckets {
    /// Bucket the trailing week of an ascending hourly series.
    ///
    /// Days are counted back from the end of the latest reading's day in
    /// local wall-clock time, and that day is padded with zero-valued
    /// placeholders up to 23:00 so every row spans a full day.
    pub fn from_hourly(hourly: &[DataPoint]) -> Result<Self> {
        let latest = hourly.last().ok_or(PowerPlotError::EmptySeries)?;
        let reference_day = latest.local_date();
        let reference_end = end_of_day(reference_day);
        let window_start = reference_end - TimeDelta::days(7);

        let start = hourly.len().saturating_sub(WEEK_HOURS);
        let recent = hourly[start..]
            .iter()
            .filter(|p| p.date.naive_local() > window_start)
            .map(|p| (p.clone(), false));

        let latest_hour = latest
            .date
            .duration_trunc(TimeDelta::hours(1))
            .map_err(|e| PowerPlotError::InvalidFormat(format!("{}: {e}", latest.date)))?;
        let last_hour = latest_hour + TimeDelta::hours(i64::from(23 - latest.hour.min(23)));
        let placeholders = HourRange(latest_hour + TimeDelta::hours(1), last_hour)
            .map(|date| (DataPoint::new(date, 0.0), true));

        let mut buckets: BTreeMap<u32, Vec<TaggedPoint>> = BTreeMap::new();
        for (point, placeholder) in recent.chain(placeholders) {
            let days_ago = (reference_end - point.date.naive_local()).num_days().max(0) as u32;
            let tagged = TaggedPoint {
                hour_label: hour_label(point.hour).unwrap_or_default(),
                day_label: weekday_name(point.local_date(), reference_day, false),
                placeholder,
                point,
            };
            buckets.entry(days_ago).or_default().push(tagged);
        }
        debug!(
            "bucketed week ending {reference_day} into {} days",
            buckets.len()
        );
        Ok(WeeklyBuckets {
            reference_day,
            buckets,
        })
    }

    pub fn get(&self, days_ago: u32) -> Option<&[TaggedPoint]> {
        self.buckets.get(&days_ago).map(Vec::as_slice)
    }

    /// Rows from today backwards.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[TaggedPoint])> {
        self.buckets.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Mean of the positive readings of one row; `None` for a row with
    /// nothing but outages and placeholders.
    pub fn mean_excluding_zero(&self, days_ago: u32) -> Option<f64> {
        let row = self.buckets.get(&days_ago)?;
        positive_mean(row.iter().map(|t| t.point.value)).ok()
    }

    /// `(days_ago, day_label, mean)` per row, for the text summary.
    pub fn daily_means(&self) -> Vec<(u32, &'static str, Option<f64>)> {
        self.iter()
            .map(|(days_ago, row)| {
                let label = row.first().map(|t| t.day_label).unwrap_or_default();
                (days_ago, label, self.mean_excluding_zero(days_ago))
            })
            .collect()
    }

    /// Largest reading across all rows, which sizes the bubbles.
    pub fn max_value(&self) -> Option<f64> {
        self.buckets
            .values()
            .flatten()
            .map(|t| t.point.value)
            .reduce(f64::max)
    }
}

fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    (day + Days::new(1)).and_time(NaiveTime::MIN) - TimeDelta::seconds(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::hourly_series;
    use chrono::{DateTime, Timelike};

    /// 2024-03-03T00:00Z through 2024-03-10T15:00Z, the last reading 0.8
    fn week_of_readings() -> Vec<DataPoint> {
        let mut values = vec![0.5; 7 * 24 + 15];
        values.push(0.8);
        hourly_series("2024-03-03T00:00:00Z", &values)
    }

    #[test]
    fn test_latest_day_is_padded_with_placeholders() {
        let weekly = WeeklyBuckets::from_hourly(&week_of_readings()).unwrap();
        assert_eq!(
            weekly.reference_day,
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        );
        let today = weekly.get(0).unwrap();
        assert_eq!(today.len(), 24);
        let placeholder_hours: Vec<u32> = today
            .iter()
            .filter(|t| t.placeholder)
            .map(|t| t.point.hour)
            .collect();
        assert_eq!(placeholder_hours, (16..=23).collect::<Vec<u32>>());
        assert!(today
            .iter()
            .filter(|t| t.placeholder)
            .all(|t| t.point.value == 0.0));
        assert_eq!(today[15].point.value, 0.8);
        assert_eq!(today[15].hour_label, "3p");
        assert_eq!(today[23].hour_label, "11p");
    }

    #[test]
    fn test_mean_ignores_placeholders() {
        let weekly = WeeklyBuckets::from_hourly(&week_of_readings()).unwrap();
        // 15 readings of 0.5 and one of 0.8
        let expected = (15.0 * 0.5 + 0.8) / 16.0;
        let mean = weekly.mean_excluding_zero(0).unwrap();
        assert!((mean - expected).abs() < 1e-9);
        assert_eq!(weekly.mean_excluding_zero(1), Some(0.5));
    }

    #[test]
    fn test_seven_full_rows() {
        let weekly = WeeklyBuckets::from_hourly(&week_of_readings()).unwrap();
        let rows: Vec<u32> = weekly.iter().map(|(days_ago, _)| days_ago).collect();
        assert_eq!(rows, vec![0, 1, 2, 3, 4, 5, 6]);
        assert!(weekly.iter().all(|(_, row)| row.len() == 24));
        // nothing from the 3rd survives the one week window
        let oldest = weekly.get(6).unwrap();
        assert_eq!(oldest[0].point.day, 4);
        assert_eq!(oldest[0].point.hour, 0);
    }

    #[test]
    fn test_day_labels() {
        let weekly = WeeklyBuckets::from_hourly(&week_of_readings()).unwrap();
        let labels: Vec<&str> = weekly
            .daily_means()
            .iter()
            .map(|(_, label, _)| *label)
            .collect();
        assert_eq!(
            labels,
            vec![
                "Today",
                "Yesterday",
                "Friday",
                "Thursday",
                "Wednesday",
                "Tuesday",
                "Monday"
            ]
        );
    }

    #[test]
    fn test_row_of_outages_has_no_mean() {
        let mut values = vec![0.0; 24];
        values.extend(vec![1.0; 24]);
        let weekly = WeeklyBuckets::from_hourly(&hourly_series("2024-03-09T00:00:00Z", &values))
            .unwrap();
        assert_eq!(weekly.mean_excluding_zero(1), None);
        assert_eq!(weekly.mean_excluding_zero(0), Some(1.0));
        assert_eq!(weekly.mean_excluding_zero(5), None);
        assert_eq!(weekly.max_value(), Some(1.0));
    }

    #[test]
    fn test_no_placeholders_after_last_hour() {
        let weekly =
            WeeklyBuckets::from_hourly(&hourly_series("2024-03-10T22:00:00Z", &[0.2, 0.3])).unwrap();
        let today = weekly.get(0).unwrap();
        assert_eq!(today.len(), 2);
        assert!(today.iter().all(|t| !t.placeholder));
    }

    #[test]
    fn test_placeholders_sit_on_the_hour() {
        let latest = DateTime::parse_from_rfc3339("2024-03-10T15:30:00Z").unwrap();
        let weekly = WeeklyBuckets::from_hourly(&[DataPoint::new(latest, 0.7)]).unwrap();
        let placeholders: Vec<&TaggedPoint> = weekly
            .get(0)
            .unwrap()
            .iter()
            .filter(|t| t.placeholder)
            .collect();
        assert_eq!(placeholders.len(), 8);
        assert_eq!(placeholders[0].point.hour, 16);
        assert!(placeholders
            .iter()
            .all(|t| t.point.date.minute() == 0 && t.point.date.second() == 0));
    }

    #[test]
    fn test_empty_series() {
        assert!(matches!(
            WeeklyBuckets::from_hourly(&[]),
            Err(PowerPlotError::EmptySeries)
        ));
    }
}
