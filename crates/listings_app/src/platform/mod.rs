mod app;
pub mod config;
mod effects;
mod filters;
pub mod logging;
mod ui;

pub use app::run_app;
