// ABOUTME: CLI module for the sprig template renderer
// ABOUTME: Exports argument parsing, configuration and the application entry point

pub mod app;
pub mod args;
pub mod config;

pub use app::{render, App};
pub use args::Args;
pub use config::{Config, LoggingConfig};
