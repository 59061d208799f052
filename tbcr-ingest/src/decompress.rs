//! Base64 + optional compression reversal for `WPE2` payloads
//!
//! The exporting client may or may not compress, and may use either a zlib
//! container or a bare deflate stream. Strategies are tried in order:
//! zlib, raw deflate, then the bytes as-is. A strategy that fails to
//! decompress, or whose output is not a structured document, is a
//! mis-detection and the next one is tried. Only the final plain-text
//! attempt can fail the import.

use crate::error::{ImportError, ImportResult};
use base64::{engine::general_purpose, Engine as _};
use flate2::read::{DeflateDecoder, ZlibDecoder};
use serde_json::Value;
use std::io::{self, Read};
use tracing::debug;

/// Upper bound on decompressed output per strategy
pub const MAX_DECOMPRESSED_BYTES: u64 = 16 * 1024 * 1024;

/// Compression interpretations, in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Zlib,
    RawDeflate,
}

impl Compression {
    const ORDER: [Compression; 2] = [Compression::Zlib, Compression::RawDeflate];

    fn name(self) -> &'static str {
        match self {
            Compression::Zlib => "zlib",
            Compression::RawDeflate => "raw-deflate",
        }
    }
}

/// Decode base64 text (standard alphabet, padded)
///
/// ASCII whitespace is ignored so that exports pasted with line wrapping
/// still decode.
pub fn decode_base64(text: &str) -> ImportResult<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(general_purpose::STANDARD.decode(compact)?)
}

/// Decompress `bytes` with one strategy; `None` when the stream is not valid
pub fn inflate(bytes: &[u8], compression: Compression) -> Option<Vec<u8>> {
    let result = match compression {
        Compression::Zlib => read_capped(ZlibDecoder::new(bytes)),
        Compression::RawDeflate => read_capped(DeflateDecoder::new(bytes)),
    };

    match result {
        Ok(out) => Some(out),
        Err(e) => {
            debug!(strategy = compression.name(), error = %e, "Decompression strategy failed");
            None
        }
    }
}

fn read_capped<R: Read>(reader: R) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    reader
        .take(MAX_DECOMPRESSED_BYTES + 1)
        .read_to_end(&mut out)?;

    if out.len() as u64 > MAX_DECOMPRESSED_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "decompressed export exceeds size limit",
        ));
    }
    Ok(out)
}

/// Lossy UTF-8 decode followed by JSON parse
fn parse_document(bytes: &[u8]) -> Result<Value, serde_json::Error> {
    serde_json::from_str(&String::from_utf8_lossy(bytes))
}

/// Decode a `WPE2` payload into a structured document
pub fn decode_compressed_document(payload: &str) -> ImportResult<Value> {
    let bytes = decode_base64(payload)?;

    for compression in Compression::ORDER {
        let Some(inflated) = inflate(&bytes, compression) else {
            continue;
        };

        match parse_document(&inflated) {
            Ok(document) => {
                debug!(strategy = compression.name(), "Export payload decompressed");
                return Ok(document);
            }
            Err(e) => {
                debug!(
                    strategy = compression.name(),
                    error = %e,
                    "Decompressed output is not JSON, trying next strategy"
                );
            }
        }
    }

    debug!("No compression detected, treating payload as plain JSON");
    parse_document(&bytes).map_err(ImportError::from)
}
