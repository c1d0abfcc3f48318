//! Aggregation and statistics over normalized PowerPlot readings.
//!
//! Everything here is a pure function of its input series, producing the
//! values each dashboard view is drawn from.

pub mod bill;
pub mod brush;
pub mod monthly;
pub mod overlay;
pub mod stats;
pub mod weekly;
