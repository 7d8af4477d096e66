//! TUI module: Terminal User Interface using Ratatui.
//!
//! A single screen with:
//! - Model load banner
//! - Patient data form
//! - Prediction result and probability gauge
//! - Collapsible debug panel

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::MedicalTheme;
