//! Payload decoding.
//!
//! When the incoming payload is raw text rather than an already-structured
//! record, the handler obtains a [`FieldValue`] tree through an injected
//! [`PayloadDecoder`]. [`JsonDecoder`] is the stock implementation, walking
//! a `serde_json::Value` tree into the engine's value model.

use std::collections::HashMap;

use crate::fieldtally::error::{TallyError, TallyResult};
use crate::fieldtally::types::FieldValue;

/// Decoding collaborator contract: turn a raw textual payload into a
/// structured record. Failure surfaces as [`TallyError::Decoding`] and no
/// counting is attempted for that record.
pub trait PayloadDecoder: Send + Sync {
    /// Decode raw text into a [`FieldValue`] tree
    fn decode(&self, text: &str) -> TallyResult<FieldValue>;
}

/// JSON payload decoder.
///
/// Mapping: JSON object → `Map`, array → `Array`, string → `String`,
/// integral number → `Integer`, other numbers → `Float`, bool → `Boolean`,
/// null → `Null`.
#[derive(Debug, Default)]
pub struct JsonDecoder;

impl JsonDecoder {
    /// Create a new JsonDecoder
    pub fn new() -> Self {
        JsonDecoder
    }
}

impl PayloadDecoder for JsonDecoder {
    fn decode(&self, text: &str) -> TallyResult<FieldValue> {
        let json: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| TallyError::decoding(format!("failed to parse JSON payload: {}", e)))?;
        Ok(json_to_field_value(json))
    }
}

/// Convert a parsed JSON tree into the engine's value model
fn json_to_field_value(value: serde_json::Value) -> FieldValue {
    match value {
        serde_json::Value::String(s) => FieldValue::String(s),
        serde_json::Value::Number(n) if n.is_i64() => {
            FieldValue::Integer(n.as_i64().unwrap_or(0))
        }
        serde_json::Value::Number(n) => FieldValue::Float(n.as_f64().unwrap_or(0.0)),
        serde_json::Value::Bool(b) => FieldValue::Boolean(b),
        serde_json::Value::Null => FieldValue::Null,
        serde_json::Value::Array(items) => {
            FieldValue::Array(items.into_iter().map(json_to_field_value).collect())
        }
        serde_json::Value::Object(obj) => {
            let entries: HashMap<String, FieldValue> = obj
                .into_iter()
                .map(|(k, v)| (k, json_to_field_value(v)))
                .collect();
            FieldValue::Map(entries)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_nested_document() {
        let decoder = JsonDecoder::new();
        let value = decoder
            .decode(r#"{"name":"checkout","count":3,"ratio":0.5,"ok":true,"gone":null,"tags":["a","b"]}"#)
            .unwrap();

        let entries = match value {
            FieldValue::Map(entries) => entries,
            other => panic!("expected map, got {}", other.type_name()),
        };
        assert_eq!(
            entries.get("name"),
            Some(&FieldValue::String("checkout".to_string()))
        );
        assert_eq!(entries.get("count"), Some(&FieldValue::Integer(3)));
        assert_eq!(entries.get("ratio"), Some(&FieldValue::Float(0.5)));
        assert_eq!(entries.get("ok"), Some(&FieldValue::Boolean(true)));
        assert_eq!(entries.get("gone"), Some(&FieldValue::Null));
        assert_eq!(
            entries.get("tags"),
            Some(&FieldValue::Array(vec![
                FieldValue::String("a".to_string()),
                FieldValue::String("b".to_string()),
            ]))
        );
    }

    #[test]
    fn malformed_payload_is_a_decoding_error() {
        let decoder = JsonDecoder::new();
        assert!(matches!(
            decoder.decode("{bad"),
            Err(TallyError::Decoding { .. })
        ));
    }
}
