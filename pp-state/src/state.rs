//! Application state and its reducer.

use log::{debug, info, warn};
use pp_core::error::{PowerPlotError, Result};
use pp_core::power_data::PowerData;
use pp_core::weather::WeatherPoint;
use pp_data::brush::{default_range, select, BrushWindow, BrushZoom};
use pp_data::monthly::{latest_month_name, month_axis_label, MonthSelection};
use pp_data::overlay::{overlay_weather, OverlayPoint};
use std::sync::Arc;

/// Narrowest viewport the charts are laid out for (px).
pub const MIN_SUPPORTED_WIDTH: u32 = 768;

/// Assumed viewport width until the first resize is reported.
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1024;

/// Everything that can change the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FetchSucceeded(PowerData),
    /// Transport, status or content-type failure, already rendered to text
    FetchFailed(String),
    WeatherLoaded(Vec<WeatherPoint>),
    /// Inclusive indices into the hourly series
    BrushChanged { start: usize, end: usize },
    /// Click on a monthly bar; clicking the highlighted month clears it
    MonthSelected(String),
    MonthHovered(Option<String>),
    ViewportResized(u32),
}

/// Shared application state for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// Dataset, `None` until the first successful fetch
    data: Option<Arc<PowerData>>,
    weather: Option<Arc<Vec<WeatherPoint>>>,
    /// Last fetch failure
    error_msg: Option<String>,
    brush_range: Option<(usize, usize)>,
    month_selection: MonthSelection,
    hovered_month: Option<String>,
    viewport_width: u32,
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            data: None,
            weather: None,
            error_msg: None,
            brush_range: None,
            month_selection: MonthSelection::default(),
            hovered_month: None,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
        }
    }

    /// Apply one action, returning the next state.
    pub fn reduce(self, action: Action) -> AppState {
        match action {
            Action::FetchSucceeded(data) => {
                let brush_range = default_range(data.series.hourly.len());
                info!(
                    "dataset loaded: {} hourly readings, last updated {}",
                    data.series.hourly.len(),
                    data.last_updated
                );
                AppState {
                    data: Some(Arc::new(data)),
                    error_msg: None,
                    brush_range,
                    ..self
                }
            }
            Action::FetchFailed(message) => {
                // stays loading; the dashboard never shows partial data
                warn!("fetch failed: {message}");
                AppState {
                    error_msg: Some(message),
                    ..self
                }
            }
            Action::WeatherLoaded(points) => {
                debug!("{} weather points loaded", points.len());
                AppState {
                    weather: Some(Arc::new(points)),
                    ..self
                }
            }
            Action::BrushChanged { start, end } => {
                let len = self.hourly_len();
                if start > end || end >= len {
                    warn!("ignoring brush {start}..={end} over {len} readings");
                    return self;
                }
                AppState {
                    brush_range: Some((start, end)),
                    ..self
                }
            }
            Action::MonthSelected(month) => {
                let month_selection = self.month_selection.toggle(&month, self.latest_month());
                AppState {
                    month_selection,
                    ..self
                }
            }
            Action::MonthHovered(hovered_month) => AppState {
                hovered_month,
                ..self
            },
            Action::ViewportResized(viewport_width) => AppState {
                viewport_width,
                ..self
            },
        }
    }

    /// Waiting for a dataset. A failed fetch leaves this true.
    pub fn is_loading(&self) -> bool {
        self.data.is_none()
    }

    pub fn data(&self) -> Option<&PowerData> {
        self.data.as_deref()
    }

    pub fn weather(&self) -> Option<&[WeatherPoint]> {
        self.weather.as_deref().map(Vec::as_slice)
    }

    pub fn error_msg(&self) -> Option<&str> {
        self.error_msg.as_deref()
    }

    pub fn brush_range(&self) -> Option<(usize, usize)> {
        self.brush_range
    }

    /// Summary of the readings under the brush.
    pub fn brush(&self) -> Result<BrushWindow> {
        let (data, (start, end)) = match (self.data(), self.brush_range) {
            (Some(data), Some(range)) => (data, range),
            _ => return Err(PowerPlotError::EmptySelection),
        };
        BrushWindow::from_selection(select(&data.series.hourly, start, end)?)
    }

    pub fn brush_zoom(&self) -> Option<BrushZoom> {
        self.brush_range
            .map(|(start, end)| BrushZoom::classify(start, end, self.hourly_len()))
    }

    /// Highlighted month: the latest one until the user picks or clears it.
    pub fn selected_month(&self) -> Option<&str> {
        self.month_selection.resolve(self.latest_month())
    }

    pub fn hovered_month(&self) -> Option<&str> {
        self.hovered_month.as_deref()
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn is_supported_viewport(&self) -> bool {
        self.viewport_width >= MIN_SUPPORTED_WIDTH
    }

    /// Monthly bar label, shortened to one letter on narrow viewports.
    pub fn month_label(&self, month0: u32) -> &'static str {
        month_axis_label(month0, !self.is_supported_viewport())
    }

    /// Hourly series with temperatures attached where weather is loaded.
    pub fn hourly_overlay(&self) -> Vec<OverlayPoint> {
        match self.data() {
            Some(data) => overlay_weather(&data.series.hourly, self.weather().unwrap_or_default()),
            None => Vec::new(),
        }
    }

    fn hourly_len(&self) -> usize {
        self.data().map_or(0, |d| d.series.hourly.len())
    }

    fn latest_month(&self) -> Option<&'static str> {
        self.data()
            .and_then(|d| latest_month_name(&d.series.daily))
    }
}
