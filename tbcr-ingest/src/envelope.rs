//! Export envelope parsing
//!
//! An export string is `<TAG>|<payload>`:
//!
//! | tag     | payload                                              |
//! |---------|------------------------------------------------------|
//! | `WPE2J` | JSON text, used verbatim                             |
//! | `WPE2`  | base64 of zlib / raw-deflate / plain JSON bytes      |
//!
//! Tags are case-sensitive. Only the first `|` separates tag from payload,
//! so the payload may contain the delimiter itself.

use crate::decompress::decode_compressed_document;
use crate::error::{ImportError, ImportResult};
use serde_json::Value;
use tracing::debug;

/// Shortest export string worth looking at, counted in characters after
/// surrounding whitespace is trimmed
pub const MIN_EXPORT_LEN: usize = 10;

const DELIMITER: char = '|';

/// Closed set of supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// `WPE2J`: uncompressed JSON
    Json,
    /// `WPE2`: base64, optionally compressed
    Compressed,
}

impl ExportFormat {
    /// Literal tag preceding the delimiter
    pub fn tag(self) -> &'static str {
        match self {
            ExportFormat::Json => "WPE2J",
            ExportFormat::Compressed => "WPE2",
        }
    }

    /// Exact, case-sensitive tag lookup
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "WPE2J" => Some(ExportFormat::Json),
            "WPE2" => Some(ExportFormat::Compressed),
            _ => None,
        }
    }
}

/// Export string split into its format tag and payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportEnvelope<'a> {
    pub format: ExportFormat,
    pub payload: &'a str,
}

impl ExportEnvelope<'_> {
    /// Decode the payload into a structured document
    pub fn decode(&self) -> ImportResult<Value> {
        match self.format {
            ExportFormat::Json => Ok(serde_json::from_str(self.payload)?),
            ExportFormat::Compressed => decode_compressed_document(self.payload),
        }
    }
}

/// Identify the format tag of an export string
pub fn parse_envelope(raw: &str) -> ImportResult<ExportEnvelope<'_>> {
    let trimmed = raw.trim();

    if trimmed.chars().count() < MIN_EXPORT_LEN {
        return Err(ImportError::InvalidFormat(format!(
            "export string shorter than {} characters",
            MIN_EXPORT_LEN
        )));
    }

    let (tag, payload) = trimmed
        .split_once(DELIMITER)
        .ok_or_else(|| ImportError::InvalidFormat("missing format tag delimiter".to_string()))?;

    let format = ExportFormat::from_tag(tag)
        .ok_or_else(|| ImportError::InvalidFormat(format!("unknown export prefix '{}'", tag)))?;

    debug!(format = format.tag(), payload_len = payload.len(), "Export envelope parsed");

    Ok(ExportEnvelope { format, payload })
}

/// Parse the envelope and decode its payload
pub fn decode_export(raw: &str) -> ImportResult<Value> {
    parse_envelope(raw)?.decode()
}
