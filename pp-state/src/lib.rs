//! Dashboard state for PowerPlot front ends.
//!
//! `AppState` is one immutable value; every change (a fetch finishing, the
//! brush moving, a month being clicked) is an [`Action`] fed to
//! [`AppState::reduce`], which returns the next state.

pub mod state;

pub use state::{Action, AppState};
