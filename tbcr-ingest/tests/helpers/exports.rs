//! Export string builders

use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::write::{DeflateEncoder, ZlibEncoder};
use serde_json::{json, Value};
use std::io::Write;

/// How the `WPE2` payload is packed
#[derive(Debug, Clone, Copy)]
pub enum Compression {
    Zlib,
    RawDeflate,
    /// Base64 of the plain JSON text
    None,
}

/// Minimal importable document
pub fn character_document(guid: Option<&str>, name: &str, realm: &str, level: i64) -> Value {
    let mut core = json!({
        "name": name,
        "realm": realm,
        "level": level,
        "class": {"file": "WARRIOR", "name": "Warrior"},
        "race": "HUMAN",
        "faction": "Alliance"
    });
    if let Some(guid) = guid {
        core["guid"] = json!(guid);
    }
    json!({
        "meta": {"exportedAt": "2024-03-01T18:30:00+01:00", "locale": "enUS"},
        "character": {
            "core": core,
            "professions": ["Mining", {"name": "Blacksmithing"}],
            "talents": {"tabs": [
                {"name": "Arms", "talents": [{"rank": 5}]},
                {"name": "Fury", "talents": [{"rank": 2}]},
                {"name": "Protection", "talents": [{"rank": 5}, {"rank": 5}, {"rank": 1}]}
            ]}
        },
        "guild": {"summary": {"name": "Stormwind Guard"}}
    })
}

pub fn json_export(document: &Value) -> String {
    format!("WPE2J|{}", document)
}

pub fn compressed_export(document: &Value, compression: Compression) -> String {
    let text = document.to_string();
    let bytes = match compression {
        Compression::Zlib => {
            let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(text.as_bytes()).unwrap();
            encoder.finish().unwrap()
        }
        Compression::RawDeflate => {
            let mut encoder = DeflateEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(text.as_bytes()).unwrap();
            encoder.finish().unwrap()
        }
        Compression::None => text.into_bytes(),
    };
    format!("WPE2|{}", STANDARD.encode(bytes))
}
