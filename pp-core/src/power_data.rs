//! The dataset payload: its wire schema and the validated, normalized snapshot.

use crate::data_point::{normalize_readings, DataPoint, Readings};
use crate::error::{PowerPlotError, Result};
use chrono::TimeZone;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Usage split into four parts of the day. `None` means no reading fell in
/// that band, which is not the same as zero usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyBreakdown {
    pub morning: Option<f64>,
    pub afternoon: Option<f64>,
    pub evening: Option<f64>,
    pub night: Option<f64>,
}

impl DailyBreakdown {
    /// Bands in display order with their names.
    pub fn bands(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("morning", self.morning),
            ("afternoon", self.afternoon),
            ("evening", self.evening),
            ("night", self.night),
        ]
    }
}

/// Data older than this most likely means the provider's live feed is
/// down; readings missed for that long are lost.
pub const STALE_AFTER_SECS: f64 = 24.0 * 3600.0;

/// Mean hourly usage over the last day against the last week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyTrend {
    pub past_24h: f64,
    pub past_7d: f64,
    pub pct_diff: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendDirection {
    Lower,
    Higher,
}

/// Whether a change in usage is good news.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sentiment {
    Positive,
    Negative,
}

impl HourlyTrend {
    /// No change counts as lower.
    pub fn direction(&self) -> TrendDirection {
        if self.pct_diff <= 0.0 {
            TrendDirection::Lower
        } else {
            TrendDirection::Higher
        }
    }

    pub fn sentiment(&self) -> Sentiment {
        match self.direction() {
            TrendDirection::Lower => Sentiment::Positive,
            TrendDirection::Higher => Sentiment::Negative,
        }
    }

    /// "In the past 24 hours, the mean hourly usage has been 0.62 kWh, which
    /// is 12.7% higher than the 7-day mean of 0.55 kWh."
    pub fn insight(&self) -> String {
        let direction = match self.direction() {
            TrendDirection::Lower => "lower",
            TrendDirection::Higher => "higher",
        };
        format!(
            "In the past 24 hours, the mean hourly usage has been {} kWh, which is {}% {direction} than the 7-day mean of {} kWh.",
            self.past_24h,
            self.pct_diff.abs(),
            self.past_7d
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawProjectedBill {
    pub projected_bill_kwh: f64,
    pub projected_bill_dollars: f64,
    pub bill_breakdown: IndexMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSeries {
    pub monthly: Readings,
    pub hourly: Readings,
    pub daily: Readings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawDayBreakdown {
    pub past_24h: DailyBreakdown,
    pub past_48h: DailyBreakdown,
    pub past_7d: DailyBreakdown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawStatistics {
    pub day_breakdown: RawDayBreakdown,
    pub hourly_mean_trend: HourlyTrend,
}

/// The JSON document served by the PowerPlot server, as-is.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawPowerData {
    pub last_updated: String,
    pub last_updated_seconds_ago: f64,
    pub systemd: IndexMap<String, bool>,
    pub projected_bill: RawProjectedBill,
    pub data: RawSeries,
    pub statistics_and_trends: RawStatistics,
}

impl RawPowerData {
    /// Decode a response body according to its content type.
    ///
    /// The local server answers with `application/json`; the object-storage
    /// snapshot comes back as `binary/octet-stream` holding the same JSON.
    pub fn from_response_body(content_type: Option<&str>, body: &str) -> Result<Self> {
        match content_type {
            Some(ct) if ct.contains("application/json") || ct.contains("binary/octet-stream") => {
                Ok(serde_json::from_str(body)?)
            }
            Some(ct) => Err(PowerPlotError::UnexpectedContentType(ct.to_string())),
            None => Err(PowerPlotError::UnexpectedContentType("<missing>".to_string())),
        }
    }
}

/// Normalized hourly, daily and monthly series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub monthly: Vec<DataPoint>,
    pub hourly: Vec<DataPoint>,
    pub daily: Vec<DataPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayBreakdowns {
    pub past_24h: DailyBreakdown,
    pub past_48h: DailyBreakdown,
    pub past_7d: DailyBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Billing {
    pub projected_bill_kwh: f64,
    pub projected_bill_dollars: f64,
    /// Charge category -> dollars, in the order the server listed them
    pub bill_breakdown: IndexMap<String, f64>,
}

/// One fetched dataset, validated and normalized. Replaced wholesale on
/// every fetch, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerData {
    pub last_updated: String,
    pub last_updated_seconds_ago: f64,
    pub systemd_health: IndexMap<String, bool>,
    pub series: Series,
    pub day_breakdown: DayBreakdowns,
    pub hourly_trend: HourlyTrend,
    pub billing: Billing,
}

impl PowerData {
    /// Normalize a raw payload with calendar fields derived in `tz`.
    pub fn from_raw<Tz: TimeZone>(raw: RawPowerData, tz: &Tz) -> Result<Self> {
        let series = Series {
            monthly: normalize_readings(&raw.data.monthly, tz)?,
            hourly: normalize_readings(&raw.data.hourly, tz)?,
            daily: normalize_readings(&raw.data.daily, tz)?,
        };
        debug!(
            "normalized {} hourly, {} daily, {} monthly points",
            series.hourly.len(),
            series.daily.len(),
            series.monthly.len()
        );
        let negative = series
            .hourly
            .iter()
            .filter(|point| point.value < 0.0)
            .count();
        if negative > 0 {
            warn!("{negative} hourly readings are negative");
        }
        let breakdown = raw.statistics_and_trends.day_breakdown;
        Ok(PowerData {
            last_updated: raw.last_updated,
            last_updated_seconds_ago: raw.last_updated_seconds_ago,
            systemd_health: raw.systemd,
            series,
            day_breakdown: DayBreakdowns {
                past_24h: breakdown.past_24h,
                past_48h: breakdown.past_48h,
                past_7d: breakdown.past_7d,
            },
            hourly_trend: raw.statistics_and_trends.hourly_mean_trend,
            billing: Billing {
                projected_bill_kwh: raw.projected_bill.projected_bill_kwh,
                projected_bill_dollars: raw.projected_bill.projected_bill_dollars,
                bill_breakdown: raw.projected_bill.bill_breakdown,
            },
        })
    }

    /// Parse and normalize a JSON document in one go.
    pub fn from_json_str<Tz: TimeZone>(json: &str, tz: &Tz) -> Result<Self> {
        let raw: RawPowerData = serde_json::from_str(json)?;
        PowerData::from_raw(raw, tz)
    }

    /// Last scrape is more than a day old.
    pub fn is_stale(&self) -> bool {
        self.last_updated_seconds_ago > STALE_AFTER_SECS
    }

    /// Names of systemd services the server reported as not running.
    pub fn inactive_services(&self) -> Vec<&str> {
        self.systemd_health
            .iter()
            .filter(|(_, active)| !**active)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const SAMPLE_PAYLOAD: &str = include_str!("../../fixtures/powerplot-sample.json");

    #[test]
    fn test_decode_json_content_type() {
        let raw =
            RawPowerData::from_response_body(Some("application/json"), SAMPLE_PAYLOAD).unwrap();
        assert_eq!(raw.last_updated_seconds_ago, 312.0);
        assert_eq!(raw.data.hourly.len(), 4);
        let keys: Vec<&String> = raw.projected_bill.bill_breakdown.keys().collect();
        assert_eq!(keys, vec!["basic_service", "delivery", "sales_tax"]);
    }

    #[test]
    fn test_decode_octet_stream_content_type() {
        let raw = RawPowerData::from_response_body(Some("binary/octet-stream"), SAMPLE_PAYLOAD)
            .unwrap();
        assert_eq!(raw.systemd.len(), 2);
    }

    #[test]
    fn test_decode_rejects_other_content_types() {
        let result = RawPowerData::from_response_body(Some("text/html"), "<html></html>");
        assert!(matches!(
            result,
            Err(PowerPlotError::UnexpectedContentType(ct)) if ct == "text/html"
        ));
        let result = RawPowerData::from_response_body(None, SAMPLE_PAYLOAD);
        assert!(matches!(
            result,
            Err(PowerPlotError::UnexpectedContentType(_))
        ));
    }

    #[test]
    fn test_malformed_payload_is_a_typed_error() {
        let result = RawPowerData::from_response_body(
            Some("application/json"),
            r#"{"last_updated": "now"}"#,
        );
        assert!(matches!(result, Err(PowerPlotError::Json(_))));
    }

    #[test]
    fn test_power_data_from_raw() {
        let data = PowerData::from_json_str(SAMPLE_PAYLOAD, &Utc).unwrap();
        assert_eq!(data.series.hourly.len(), 4);
        assert_eq!(data.series.hourly[3].hour, 15);
        assert_eq!(data.series.hourly[3].value, 0.8);
        assert_eq!(data.series.monthly[2].month, 2);
        assert_eq!(data.day_breakdown.past_7d.afternoon, None);
        assert_eq!(data.day_breakdown.past_24h.night, Some(0.3));
        assert_eq!(data.hourly_trend.pct_diff, 12.7);
        assert_eq!(data.billing.projected_bill_dollars, 100.0);
        assert_eq!(data.inactive_services(), vec!["pp-scraper"]);
    }

    #[test]
    fn test_bad_timestamp_rejects_whole_payload() {
        let broken = SAMPLE_PAYLOAD.replace("2024-03-10T14:00:00Z", "not-a-date");
        let result = PowerData::from_json_str(&broken, &Utc);
        assert!(matches!(result, Err(PowerPlotError::TimestampParse(_))));
    }

    #[test]
    fn test_staleness() {
        let mut data = PowerData::from_json_str(SAMPLE_PAYLOAD, &Utc).unwrap();
        assert!(!data.is_stale());
        data.last_updated_seconds_ago = STALE_AFTER_SECS;
        assert!(!data.is_stale());
        data.last_updated_seconds_ago = STALE_AFTER_SECS + 1.0;
        assert!(data.is_stale());
    }

    #[test]
    fn test_hourly_trend_insight() {
        let data = PowerData::from_json_str(SAMPLE_PAYLOAD, &Utc).unwrap();
        let trend = data.hourly_trend;
        assert_eq!(trend.direction(), TrendDirection::Higher);
        assert_eq!(trend.sentiment(), Sentiment::Negative);
        assert_eq!(
            trend.insight(),
            "In the past 24 hours, the mean hourly usage has been 0.62 kWh, which is 12.7% higher than the 7-day mean of 0.55 kWh."
        );

        let lower = HourlyTrend {
            past_24h: 0.4,
            past_7d: 0.5,
            pct_diff: -20.0,
        };
        assert_eq!(lower.direction(), TrendDirection::Lower);
        assert_eq!(lower.sentiment(), Sentiment::Positive);
        assert!(lower.insight().contains("which is 20% lower than"));

        let flat = HourlyTrend {
            past_24h: 0.5,
            past_7d: 0.5,
            pct_diff: 0.0,
        };
        assert_eq!(flat.sentiment(), Sentiment::Positive);
    }

    #[test]
    fn test_daily_breakdown_bands_order() {
        let breakdown = DailyBreakdown {
            morning: Some(1.0),
            afternoon: None,
            evening: Some(3.0),
            night: Some(4.0),
        };
        let names: Vec<&str> = breakdown.bands().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["morning", "afternoon", "evening", "night"]);
    }
}
