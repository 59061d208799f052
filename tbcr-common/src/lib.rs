//! # TBC Recruit Common Library
//!
//! Shared code for the TBC Recruit services including:
//! - Database initialization and stored record models
//! - Configuration loading (TOML, environment, root folder resolution)
//! - Logging setup
//! - Common error type

pub mod config;
pub mod db;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
