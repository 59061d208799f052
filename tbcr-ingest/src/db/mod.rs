//! Database access for tbcr-ingest
//!
//! Schema creation lives in `tbcr_common::db`; this module holds the
//! character import queries.

pub mod characters;
