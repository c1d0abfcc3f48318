//! Command implementations for the PowerPlot CLI.
//!
//! Each subcommand fetches the dataset once, runs it through the same
//! pipeline the dashboard uses, and prints or exports the result.

use chrono::{Local, Utc};
use clap::{Args, Subcommand};
use pp_core::client::PowerPlotClient;
use pp_core::config::{ClientConfig, DataSource, WeatherLocation, DEFAULT_TIMEOUT_SECS};
use std::time::Duration;

pub mod export;
pub mod summary;
pub mod weather;

pub use export::SeriesKind;

/// Where to fetch from and how to interpret timestamps.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Fetch the dataset from this URL instead of the local server
    #[arg(long, global = true, conflicts_with = "public")]
    pub url: Option<String>,

    /// Fetch the public snapshot instead of the local server
    #[arg(long, global = true)]
    pub public: bool,

    /// Give up on a request after this many seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Show times in UTC instead of the local time zone
    #[arg(long, global = true)]
    pub utc: bool,
}

impl GlobalArgs {
    pub fn client_config(&self) -> ClientConfig {
        let source = match (&self.url, self.public) {
            (Some(url), _) => DataSource::Url(url.clone()),
            (None, true) => DataSource::Public,
            (None, false) => DataSource::from_env(),
        };
        ClientConfig {
            source,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the dashboard as text
    Summary {
        /// Also fetch outdoor temperatures for the hourly window
        #[arg(long)]
        with_weather: bool,
    },

    /// Write one series to a CSV file
    Export {
        #[arg(short, long, value_enum)]
        series: SeriesKind,

        /// Output path for the CSV
        #[arg(short, long)]
        output: String,

        /// Only rows on or after this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,
    },

    /// Print hourly temperatures from the forecast API
    Weather {
        #[arg(long, allow_negative_numbers = true, default_value_t = WeatherLocation::default().latitude)]
        latitude: f64,

        #[arg(long, allow_negative_numbers = true, default_value_t = WeatherLocation::default().longitude)]
        longitude: f64,

        /// IANA time zone the API should report in
        #[arg(long, default_value_t = WeatherLocation::default().timezone)]
        timezone: String,

        #[arg(long, default_value_t = WeatherLocation::default().past_days)]
        past_days: u32,
    },
}

pub async fn run(global: GlobalArgs, command: Command) -> anyhow::Result<()> {
    let client = PowerPlotClient::new(global.client_config())?;
    match command {
        Command::Summary { with_weather } => {
            if global.utc {
                summary::run_summary(&client, with_weather, &Utc).await
            } else {
                summary::run_summary(&client, with_weather, &Local).await
            }
        }
        Command::Export {
            series,
            output,
            since,
        } => {
            if global.utc {
                export::run_export(&client, series, &output, since.as_deref(), &Utc).await
            } else {
                export::run_export(&client, series, &output, since.as_deref(), &Local).await
            }
        }
        Command::Weather {
            latitude,
            longitude,
            timezone,
            past_days,
        } => {
            let location = WeatherLocation {
                latitude,
                longitude,
                timezone,
                past_days,
            };
            if global.utc {
                weather::run_weather(&client, &location, &Utc).await
            } else {
                weather::run_weather(&client, &location, &Local).await
            }
        }
    }
}
