//! Missing-tolerant access into a decoded export document
//!
//! Nothing here fails: an absent key, a wrongly typed value or a blank
//! string all read as `None`.

use serde_json::Value;

/// Follow `path` through nested objects
pub fn at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(key))
}

/// Trimmed, non-empty string at `path`
pub fn text_at(value: &Value, path: &[&str]) -> Option<String> {
    at(value, path).and_then(non_blank)
}

/// Integer at `path`; integral floats are accepted, anything else is absent
pub fn int_at(value: &Value, path: &[&str]) -> Option<i64> {
    at(value, path).and_then(as_int)
}

/// Integer view of a number, `None` for fractions or non-numbers
pub fn as_int(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Trimmed, non-empty string value
pub fn non_blank(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A field that exporters emit either as a bare string or as a small object
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextOrObject<'a> {
    Text(&'a str),
    Object(&'a serde_json::Map<String, Value>),
}

impl<'a> TextOrObject<'a> {
    /// Classify a value; other JSON types are not a recognized shape
    pub fn classify(value: &'a Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(TextOrObject::Text(s)),
            Value::Object(map) => Some(TextOrObject::Object(map)),
            _ => None,
        }
    }

    /// The string itself, or the object's `field` when that is a string
    pub fn read(self, field: &str) -> Option<String> {
        match self {
            TextOrObject::Text(s) => non_blank_str(s),
            TextOrObject::Object(map) => map.get(field).and_then(non_blank),
        }
    }
}

fn non_blank_str(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Read a string-or-object value, taking `field` from the object form
pub fn text_or_field(value: Option<&Value>, field: &str) -> Option<String> {
    value
        .and_then(TextOrObject::classify)
        .and_then(|shape| shape.read(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_at_walks_objects_only() {
        let doc = json!({"a": {"b": {"c": 1}}, "list": [{"x": 1}]});
        assert_eq!(at(&doc, &["a", "b", "c"]), Some(&json!(1)));
        assert_eq!(at(&doc, &["a", "missing", "c"]), None);
        assert_eq!(at(&doc, &["list", "x"]), None);
        assert_eq!(at(&doc, &[]), Some(&doc));
    }

    #[test]
    fn test_text_at_trims_and_drops_blank() {
        let doc = json!({"name": "  Thrall ", "blank": "   ", "num": 5});
        assert_eq!(text_at(&doc, &["name"]).as_deref(), Some("Thrall"));
        assert_eq!(text_at(&doc, &["blank"]), None);
        assert_eq!(text_at(&doc, &["num"]), None);
    }

    #[test]
    fn test_int_at() {
        let doc = json!({"a": 70, "b": 70.0, "c": 70.5, "d": "70", "e": null});
        assert_eq!(int_at(&doc, &["a"]), Some(70));
        assert_eq!(int_at(&doc, &["b"]), Some(70));
        assert_eq!(int_at(&doc, &["c"]), None);
        assert_eq!(int_at(&doc, &["d"]), None);
        assert_eq!(int_at(&doc, &["e"]), None);
    }

    #[test]
    fn test_text_or_field_both_shapes() {
        let bare = json!("WARRIOR");
        let nested = json!({"file": "PALADIN", "name": "Paladin"});
        let wrong = json!({"name": "Mage"});

        assert_eq!(text_or_field(Some(&bare), "file").as_deref(), Some("WARRIOR"));
        assert_eq!(text_or_field(Some(&nested), "file").as_deref(), Some("PALADIN"));
        assert_eq!(text_or_field(Some(&wrong), "file"), None);
        assert_eq!(text_or_field(Some(&json!(12)), "file"), None);
        assert_eq!(text_or_field(Some(&json!(["a"])), "file"), None);
        assert_eq!(text_or_field(None, "file"), None);
    }
}
