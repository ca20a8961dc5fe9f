//! goproxy-keeper - Go module proxy registry.
//!
//! Publishes Go module source trees as proxy artifacts (`.mod`, `.zip`,
//! `.info`, version list) over pluggable blob storage, and serves the
//! GOPROXY read protocol (`@v/list`, `.info`, `.mod`, `.zip`, `@latest`).

pub mod api;
pub mod config;
pub mod error;
pub mod goproxy;
pub mod services;
pub mod storage;
pub mod telemetry;

pub use config::Config;
pub use error::{AppError, Result};
