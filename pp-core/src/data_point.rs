use crate::error::{PowerPlotError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use indexmap::IndexMap;
use pp_utils::calendar::{day_of_month, hour_of_day, month_index};
use serde::{Deserialize, Serialize};

/// Timestamp format written by the PowerPlot server: "2023-11-01 00:00:00-0400"
pub const SERVER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%z";

/// Same as the server format but with a colon in the offset: "-04:00"
pub const SERVER_TIMESTAMP_FORMAT_COLON: &str = "%Y-%m-%d %H:%M:%S%:z";

/// Date-only keys ("2024-01-01") are taken as UTC midnight.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Offset-less forms, read as wall-clock time in the target zone.
const NAIVE_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Ordered raw readings as received: timestamp string -> kWh.
pub type Readings = IndexMap<String, f64>;

/// A single reading with its calendar attributes, derived in the offset
/// the reading was normalized into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub date: DateTime<FixedOffset>,
    pub value: f64,
    /// Zero-based month (January = 0)
    pub month: u32,
    /// Day of the month, 1..=31
    pub day: u32,
    pub hour: u32,
}

impl DataPoint {
    pub fn new(date: DateTime<FixedOffset>, value: f64) -> Self {
        DataPoint {
            month: month_index(&date),
            day: day_of_month(&date),
            hour: hour_of_day(&date),
            date,
            value,
        }
    }

    /// Copy of this point carrying a different value.
    pub fn with_value(&self, value: f64) -> Self {
        DataPoint {
            value,
            ..self.clone()
        }
    }

    /// Calendar day of the point in its own offset.
    pub fn local_date(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

/// Parse a reading key into an instant expressed in `tz`.
///
/// Fails with [`PowerPlotError::TimestampParse`] rather than producing an
/// invalid date.
pub fn parse_timestamp<Tz: TimeZone>(key: &str, tz: &Tz) -> Result<DateTime<FixedOffset>> {
    let trimmed = key.trim();
    // the server glues a '-' in front of the offset, so positive offsets arrive as "-+0100"
    let cleaned = trimmed.replace("-+", "+");

    if let Ok(dt) = DateTime::parse_from_rfc3339(&cleaned) {
        return Ok(dt.with_timezone(tz).fixed_offset());
    }
    for format in [SERVER_TIMESTAMP_FORMAT, SERVER_TIMESTAMP_FORMAT_COLON] {
        if let Ok(dt) = DateTime::parse_from_str(&cleaned, format) {
            return Ok(dt.with_timezone(tz).fixed_offset());
        }
    }
    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&cleaned, format) {
            return tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.fixed_offset())
                .ok_or_else(|| PowerPlotError::TimestampParse(key.to_string()));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(&cleaned, DATE_FORMAT) {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc
                .from_utc_datetime(&midnight)
                .with_timezone(tz)
                .fixed_offset());
        }
    }
    Err(PowerPlotError::TimestampParse(key.to_string()))
}

/// Turn ordered raw readings into data points, one per entry, in the order
/// received. Nothing is re-sorted; downstream grouping relies on the
/// source being chronological.
pub fn normalize_readings<Tz: TimeZone>(readings: &Readings, tz: &Tz) -> Result<Vec<DataPoint>> {
    readings
        .iter()
        .map(|(key, value)| {
            let date = parse_timestamp(key, tz)?;
            Ok(DataPoint::new(date, *value))
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::{normalize_readings, parse_timestamp, DataPoint, Readings};
    use crate::error::PowerPlotError;
    use chrono::{FixedOffset, TimeZone, Utc};

    fn readings(entries: &[(&str, f64)]) -> Readings {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    #[test]
    fn test_normalize_preserves_order_and_values() {
        let raw = readings(&[("2024-01-01T00:00:00Z", 1.5), ("2024-01-01T01:00:00Z", 2.0)]);
        let points = normalize_readings(&raw, &Utc).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].hour, 0);
        assert_eq!(points[1].hour, 1);
        assert_eq!(points[0].value, 1.5);
        assert_eq!(points[1].value, 2.0);
        assert_eq!(points[0].month, 0);
        assert_eq!(points[0].day, 1);
    }

    #[test]
    fn test_normalize_in_local_offset() {
        let eastern = FixedOffset::west_opt(5 * 3600).unwrap();
        let raw = readings(&[("2024-01-01T00:00:00Z", 1.5), ("2024-01-01T01:00:00Z", 2.0)]);
        let points = normalize_readings(&raw, &eastern).unwrap();
        assert_eq!(points[0].hour, 19);
        assert_eq!(points[0].day, 31);
        assert_eq!(points[0].month, 11);
        assert_eq!(points[1].hour, 20);
    }

    #[test]
    fn test_normalize_does_not_sort() {
        let raw = readings(&[("2024-01-02T00:00:00Z", 2.0), ("2024-01-01T00:00:00Z", 1.0)]);
        let points = normalize_readings(&raw, &Utc).unwrap();
        assert_eq!(points[0].day, 2);
        assert_eq!(points[1].day, 1);
    }

    #[test]
    fn test_parse_server_format() {
        let dt = parse_timestamp("2023-11-01 00:00:00-0400", &Utc).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2023, 11, 1, 4, 0, 0).unwrap());

        let dt = parse_timestamp("2023-06-01 12:00:00-+0100", &Utc).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2023, 6, 1, 11, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_uses_target_zone() {
        let eastern = FixedOffset::west_opt(5 * 3600).unwrap();
        let dt = parse_timestamp("2024-01-01T08:00:00", &eastern).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap());
        assert_eq!(DataPoint::new(dt, 0.0).hour, 8);
    }

    #[test]
    fn test_parse_date_only_is_utc_midnight() {
        let dt = parse_timestamp("2024-01-01", &Utc).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_invalid_timestamp_fails_fast() {
        let raw = readings(&[("2024-01-01T00:00:00Z", 1.0), ("yesterday-ish", 2.0)]);
        match normalize_readings(&raw, &Utc) {
            Err(PowerPlotError::TimestampParse(key)) => assert_eq!(key, "yesterday-ish"),
            other => panic!("expected a timestamp error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_value_keeps_calendar_fields() {
        let dt = parse_timestamp("2024-03-10T15:00:00Z", &Utc).unwrap();
        let point = DataPoint::new(dt, 0.8);
        let rewritten = point.with_value(3.0);
        assert_eq!(rewritten.value, 3.0);
        assert_eq!(rewritten.hour, 15);
        assert_eq!(rewritten.date, point.date);
    }
}
