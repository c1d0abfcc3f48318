//! Shared utility functions for PowerPlot crates.

/// Calendar attributes and the fixed en-US name tables.
pub mod calendar {
    use chrono::{Datelike, Days, NaiveDate, Timelike};

    pub const MONTH_NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];

    /// Sunday first, matching `Weekday::num_days_from_sunday`.
    pub const DAYS_OF_WEEK: [&str; 7] = [
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ];

    /// 12-hour period labels indexed by hour of day.
    pub const HOURLY_PERIODS: [&str; 24] = [
        "12a", "1a", "2a", "3a", "4a", "5a", "6a", "7a", "8a", "9a", "10a", "11a", "12p", "1p",
        "2p", "3p", "4p", "5p", "6p", "7p", "8p", "9p", "10p", "11p",
    ];

    /// Zero-based month index (January = 0).
    pub fn month_index<T: Datelike>(t: &T) -> u32 {
        t.month0()
    }

    /// One-based day of the month.
    pub fn day_of_month<T: Datelike>(t: &T) -> u32 {
        t.day()
    }

    pub fn hour_of_day<T: Timelike>(t: &T) -> u32 {
        t.hour()
    }

    /// Full month name for a zero-based month index.
    pub fn month_name(month0: u32) -> Option<&'static str> {
        MONTH_NAMES.get(month0 as usize).copied()
    }

    /// Full month name of a date.
    pub fn month_name_of<T: Datelike>(t: &T) -> &'static str {
        MONTH_NAMES[t.month0() as usize]
    }

    /// Three letter month name ("Jan").
    pub fn abbrev_month_name(month0: u32) -> Option<&'static str> {
        month_name(month0).map(|name| &name[..3])
    }

    /// Single letter month name ("J"), used once a bar chart gets crowded.
    pub fn super_abbrev_month_name(month0: u32) -> Option<&'static str> {
        month_name(month0).map(|name| &name[..1])
    }

    pub fn hour_label(hour: u32) -> Option<&'static str> {
        HOURLY_PERIODS.get(hour as usize).copied()
    }

    /// Name of the day of the week, except "Today" and "Yesterday"
    /// relative to `today`.
    pub fn weekday_name(date: NaiveDate, today: NaiveDate, abbreviated: bool) -> &'static str {
        if date == today {
            return "Today";
        }
        if today.checked_sub_days(Days::new(1)) == Some(date) {
            return "Yesterday";
        }
        let name = DAYS_OF_WEEK[date.weekday().num_days_from_sunday() as usize];
        if abbreviated {
            &name[..3]
        } else {
            name
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::{NaiveDate, NaiveDateTime};

        #[test]
        fn test_calendar_attributes() {
            let t = NaiveDateTime::parse_from_str("2024-03-10 15:42:00", "%Y-%m-%d %H:%M:%S")
                .unwrap();
            assert_eq!(month_index(&t), 2);
            assert_eq!(day_of_month(&t), 10);
            assert_eq!(hour_of_day(&t), 15);
        }

        #[test]
        fn test_month_names() {
            assert_eq!(month_name(0), Some("January"));
            assert_eq!(month_name(11), Some("December"));
            assert_eq!(month_name(12), None);
            let t = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
            assert_eq!(month_name_of(&t), "February");
            assert_eq!(abbrev_month_name(8), Some("Sep"));
            assert_eq!(super_abbrev_month_name(4), Some("M"));
        }

        #[test]
        fn test_hour_labels() {
            assert_eq!(hour_label(0), Some("12a"));
            assert_eq!(hour_label(12), Some("12p"));
            assert_eq!(hour_label(23), Some("11p"));
            assert_eq!(hour_label(24), None);
        }

        #[test]
        fn test_weekday_name_relative_days() {
            let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(); // Sunday
            assert_eq!(weekday_name(today, today, false), "Today");
            let yesterday = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
            assert_eq!(weekday_name(yesterday, today, true), "Yesterday");
            let friday = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
            assert_eq!(weekday_name(friday, today, false), "Friday");
            assert_eq!(weekday_name(friday, today, true), "Fri");
            let sunday = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
            assert_eq!(weekday_name(sunday, today, false), "Sunday");
        }
    }
}

/// Date utility functions
pub mod dates {
    use chrono::NaiveDate;

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
    }

}

/// Text formatting for labels and summaries (en-US only).
pub mod format {
    use chrono::{Datelike, NaiveDateTime, Timelike};

    /// Capitalize the first letter of each word, lowercasing the rest.
    /// 'this test sentence' -> 'This Test Sentence'
    pub fn title_case(input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut at_word_start = true;
        for c in input.chars() {
            if c.is_whitespace() {
                at_word_start = true;
                out.push(c);
            } else if at_word_start {
                out.extend(c.to_uppercase());
                at_word_start = false;
            } else {
                out.extend(c.to_lowercase());
            }
        }
        out
    }

    /// "system_benefit" -> "System Benefit"
    pub fn humanize_key(key: &str) -> String {
        title_case(&key.replace('_', " "))
    }

    /// 2 -> 2nd, 21 -> 21st, 17 -> 17th
    pub fn with_ordinal_suffix(day: u32) -> String {
        if (11..=13).contains(&(day % 100)) {
            return format!("{day}th");
        }
        match day % 10 {
            1 => format!("{day}st"),
            2 => format!("{day}nd"),
            3 => format!("{day}rd"),
            _ => format!("{day}th"),
        }
    }

    /// 'Nov 29, 10:00 PM'
    pub fn display_date<T: Datelike + Timelike>(date: &T) -> String {
        let naive = NaiveDateTime::new(
            chrono::NaiveDate::from_ymd_opt(date.year(), date.month(), date.day())
                .unwrap_or_default(),
            chrono::NaiveTime::from_hms_opt(date.hour(), date.minute(), 0).unwrap_or_default(),
        );
        naive.format("%b %-d, %-I:%M %p").to_string()
    }

    /// Rough length of an hourly window: hours, then days, then weeks.
    /// Halves round up (4.5 days is "5d").
    pub fn num_hours_to_time_string(width: usize) -> String {
        if width <= 96 {
            format!("{width}h")
        } else if width <= 30 * 24 {
            format!("{}d", (width as f64 / 24.0).round())
        } else {
            format!("{}wk", (width as f64 / 24.0 / 7.0).round())
        }
    }

    /// Dollar amount without cents, halves rounded up: 148.5 -> "149"
    pub fn whole_dollars(amount: f64) -> String {
        format!("{}", amount.round())
    }

    /// '10:00-10:59PM' for the hour starting at 22:00.
    pub fn hour_range_label(hour: u32) -> String {
        let ampm = if hour >= 12 { "PM" } else { "AM" };
        let twelve = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{twelve}:00-{twelve}:59{ampm}")
    }

}
