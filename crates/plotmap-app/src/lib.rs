//! PlotMap Application
//!
//! Headless host for boundary maps: loads configuration and boundary input,
//! replays viewport events and exports rendered frames.

mod app;

pub use app::{App, AppConfig, AppError, AppResult};
