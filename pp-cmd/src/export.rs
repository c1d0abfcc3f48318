//! CSV export of the normalized series and the derived views.

use anyhow::Context;
use chrono::{NaiveDate, TimeZone};
use clap::ValueEnum;
use log::info;
use pp_core::client::PowerPlotClient;
use pp_core::data_point::DataPoint;
use pp_core::power_data::PowerData;
use pp_data::monthly::group_by_month;
use pp_data::weekly::WeeklyBuckets;
use pp_utils::dates::parse_date;
use pp_utils::format::hour_range_label;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeriesKind {
    Hourly,
    Daily,
    Monthly,
    /// Daily series as running totals within each month
    Cumulative,
    /// Trailing week bucketed by day, with placeholder hours
    Weekly,
}

#[derive(Debug, Serialize)]
struct CumulativeRow<'a> {
    month: &'a str,
    date: String,
    value: f64,
}

#[derive(Debug, Serialize)]
struct WeeklyRow {
    days_ago: u32,
    day: &'static str,
    hour: &'static str,
    /// "3:00-3:59PM"
    hours: String,
    date: String,
    value: f64,
    placeholder: bool,
}

pub async fn run_export<Tz: TimeZone>(
    client: &PowerPlotClient,
    series: SeriesKind,
    output: &str,
    since: Option<&str>,
    tz: &Tz,
) -> anyhow::Result<()> {
    let since = since
        .map(parse_date)
        .transpose()
        .context("--since must be YYYY-MM-DD")?;
    let data = client
        .fetch_power_data(tz)
        .await
        .with_context(|| format!("fetching dataset from {:?}", client.source()))?;

    let writer = csv::Writer::from_path(output)
        .with_context(|| format!("creating {output}"))?;
    let rows = write_series(writer, &data, series, since)?;
    info!("Export complete. {rows} {series:?} rows written to {output}");
    Ok(())
}

fn keep(point: &DataPoint, since: Option<NaiveDate>) -> bool {
    since.map_or(true, |day| point.local_date() >= day)
}

/// Write one series as CSV with a header row, returning the row count.
pub fn write_series<W: Write>(
    mut writer: csv::Writer<W>,
    data: &PowerData,
    series: SeriesKind,
    since: Option<NaiveDate>,
) -> anyhow::Result<usize> {
    let mut rows = 0;
    match series {
        SeriesKind::Hourly | SeriesKind::Daily | SeriesKind::Monthly => {
            let points = match series {
                SeriesKind::Hourly => &data.series.hourly,
                SeriesKind::Daily => &data.series.daily,
                _ => &data.series.monthly,
            };
            for point in points.iter().filter(|p| keep(p, since)) {
                writer.serialize(point)?;
                rows += 1;
            }
        }
        SeriesKind::Cumulative => {
            for (month, days) in &group_by_month(&data.series.daily, true) {
                for point in days.iter().filter(|p| keep(p, since)) {
                    writer.serialize(CumulativeRow {
                        month,
                        date: point.date.to_rfc3339(),
                        value: point.value,
                    })?;
                    rows += 1;
                }
            }
        }
        SeriesKind::Weekly => {
            let weekly = WeeklyBuckets::from_hourly(&data.series.hourly)?;
            for (days_ago, row) in weekly.iter() {
                for tagged in row.iter().filter(|t| keep(&t.point, since)) {
                    writer.serialize(WeeklyRow {
                        days_ago,
                        day: tagged.day_label,
                        hour: tagged.hour_label,
                        hours: hour_range_label(tagged.point.hour),
                        date: tagged.point.date.to_rfc3339(),
                        value: tagged.point.value,
                        placeholder: tagged.placeholder,
                    })?;
                    rows += 1;
                }
            }
        }
    }
    writer.flush()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const SAMPLE_PAYLOAD: &str = include_str!("../../fixtures/powerplot-sample.json");

    fn export(series: SeriesKind, since: Option<NaiveDate>) -> (usize, String) {
        let data = PowerData::from_json_str(SAMPLE_PAYLOAD, &Utc).unwrap();
        let mut buffer = Vec::new();
        let rows = write_series(csv::Writer::from_writer(&mut buffer), &data, series, since).unwrap();
        (rows, String::from_utf8(buffer).unwrap())
    }

    #[test]
    fn test_export_hourly() {
        let (rows, csv) = export(SeriesKind::Hourly, None);
        assert_eq!(rows, 4);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("date,value,month,day,hour"));
        assert_eq!(lines.next(), Some("2024-03-10T12:00:00+00:00,0.4,2,10,12"));
    }

    #[test]
    fn test_export_cumulative() {
        let (rows, csv) = export(SeriesKind::Cumulative, None);
        assert_eq!(rows, 4);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "month,date,value");
        assert_eq!(lines[1], "February,2024-02-28T00:00:00+00:00,14.2");
        assert_eq!(lines[2], "February,2024-02-29T00:00:00+00:00,27.0");
        assert_eq!(lines[4], "March,2024-03-02T00:00:00+00:00,21.0");
    }

    #[test]
    fn test_export_since() {
        let since = NaiveDate::from_ymd_opt(2024, 3, 1);
        let (rows, _) = export(SeriesKind::Daily, since);
        assert_eq!(rows, 2);
        let (rows, _) = export(SeriesKind::Monthly, since);
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_export_weekly_includes_placeholders() {
        let (rows, csv) = export(SeriesKind::Weekly, None);
        // 12:00 through 15:00 plus placeholders for 16:00 through 23:00
        assert_eq!(rows, 12);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "days_ago,day,hour,hours,date,value,placeholder");
        assert_eq!(lines[1], "0,Today,12p,12:00-12:59PM,2024-03-10T12:00:00+00:00,0.4,false");
        assert_eq!(
            lines[12],
            "0,Today,11p,11:00-11:59PM,2024-03-10T23:00:00+00:00,0.0,true"
        );
    }
}
