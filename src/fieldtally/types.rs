//! Core record value types.
//!
//! This module contains the value model the counting engine traverses:
//! - [`FieldValue`] - one node of a semi-structured record
//! - [`NamedPropertyReadable`] - capability trait for typed objects exposing
//!   named-property read access

use std::collections::HashMap;
use std::fmt;

/// A value at one node of a semi-structured record.
///
/// This enum represents every structural kind the engine can traverse:
/// terminal scalars, ordered sequences, keyed maps, and named-property
/// structs. A `FieldValue` tree is immutable for the duration of one
/// counting pass; the engine never writes into the record it receives.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Boolean value (true/false)
    Boolean(bool),
    /// Null or absent value - traversal into this terminates without error
    Null,
    /// Ordered sequence of values; insertion order is significant
    Array(Vec<FieldValue>),
    /// Keyed map with unique string keys; iteration order not significant
    Map(HashMap<String, FieldValue>),
    /// Named-property object (e.g. a decoded record type); traversed
    /// exactly like a map but marks values that originated from a typed
    /// object rather than a literal JSON object
    Struct(HashMap<String, FieldValue>),
}

impl FieldValue {
    /// Get the type name for error messages and debugging
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Integer(_) => "INTEGER",
            FieldValue::Float(_) => "FLOAT",
            FieldValue::String(_) => "STRING",
            FieldValue::Boolean(_) => "BOOLEAN",
            FieldValue::Null => "NULL",
            FieldValue::Array(_) => "ARRAY",
            FieldValue::Map(_) => "MAP",
            FieldValue::Struct(_) => "STRUCT",
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Check if this value is a terminal scalar (not a container, not null)
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            FieldValue::Integer(_)
                | FieldValue::Float(_)
                | FieldValue::String(_)
                | FieldValue::Boolean(_)
        )
    }

    /// Convert this value to its canonical string representation.
    ///
    /// This is the textual form reported to counters: the value's natural
    /// string rendering, with bare (unquoted) strings. Computed only at the
    /// dispatch stage; traversal treats scalars as opaque.
    pub fn to_display_string(&self) -> String {
        match self {
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::String(s) => s.clone(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::Null => "NULL".to_string(),
            FieldValue::Array(arr) => {
                let elements: Vec<String> = arr.iter().map(|v| v.to_display_string()).collect();
                format!("[{}]", elements.join(", "))
            }
            FieldValue::Map(map) | FieldValue::Struct(map) => {
                let pairs: Vec<String> = map
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v.to_display_string()))
                    .collect();
                format!("{{{}}}", pairs.join(", "))
            }
        }
    }

    /// Materialize a named-property object as a [`FieldValue::Struct`].
    ///
    /// This is the composite adapter for the [`NamedPropertyReadable`]
    /// capability: each readable property becomes a struct field. Properties
    /// reported by `property_names` but not readable via `has` are skipped.
    pub fn from_readable(source: &dyn NamedPropertyReadable) -> FieldValue {
        let mut fields = HashMap::new();
        for name in source.property_names() {
            if source.has(&name) {
                fields.insert(name.clone(), source.get(&name));
            }
        }
        FieldValue::Struct(fields)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

/// Capability trait for objects exposing named-property read access.
///
/// Typed record objects implement this instead of relying on runtime
/// reflection: `has` answers whether a property is readable and `get`
/// produces its value. The engine wraps such objects through
/// [`FieldValue::from_readable`] before traversal, so a typed object counts
/// identically to the equivalent literal map.
pub trait NamedPropertyReadable {
    /// Whether the named property exists and is readable
    fn has(&self, name: &str) -> bool;

    /// Read the named property; [`FieldValue::Null`] when absent
    fn get(&self, name: &str) -> FieldValue;

    /// The names of all readable properties, used to materialize a struct
    fn property_names(&self) -> Vec<String>;
}

impl NamedPropertyReadable for HashMap<String, FieldValue> {
    fn has(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn get(&self, name: &str) -> FieldValue {
        HashMap::get(self, name).cloned().unwrap_or(FieldValue::Null)
    }

    fn property_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }
}
