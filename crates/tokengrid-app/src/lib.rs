//! Tokengrid market table application.
//!
//! Wires the pipeline together:
//! - instrument store seeded from config or the built-in demo set
//! - simulated feed delivering one batch per tick
//! - highlight tracker with its background sweeper
//! - table view refreshed on every store version bump

pub mod app;
pub mod config;
pub mod error;
pub mod telemetry;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
