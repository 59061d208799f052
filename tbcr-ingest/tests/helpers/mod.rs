//! Test Helper Utilities
//!
//! Shared utilities for testing tbcr-ingest

#![allow(dead_code)]

pub mod db_utils;
pub mod exports;
pub mod log_capture;

pub use db_utils::{create_test_db, create_test_importer};
pub use exports::{character_document, compressed_export, json_export, Compression};
pub use log_capture::capture_logs;
