pub mod config;
pub mod data_point;
pub mod error;
pub mod hour_range;
pub mod power_data;
pub mod weather;

#[cfg(feature = "api")]
pub mod client;
