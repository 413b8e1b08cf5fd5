//! `jobhub-app`: wiring for the job marketplace shell.
//!
//! Builds the session manager and the standard route table from environment
//! configuration and drives navigation against them.

pub mod app;
pub mod config;

pub use app::{App, AppError, Services, Visit};
pub use config::AppConfig;
