//! Value extraction.
//!
//! Recursive descent of a [`FieldValue`] tree along a [`FieldPath`],
//! producing the leaf values destined for counter dispatch. The traversal
//! rules:
//!
//! - An array encountered at any depth fans the traversal out across all of
//!   its elements with the *same unconsumed path* - the segment is not
//!   consumed by a sequence, and results concatenate in element order.
//! - Maps and structs look the head segment up by exact key; a missing key
//!   or a null value silently produces zero leaves for that branch.
//! - When the last segment resolves to an array, each element is emitted as
//!   its own leaf (terminal-list fan-out).
//! - A scalar with path segments still remaining matches nothing.
//!
//! Absence is never an error: a mapping whose field is missing from a given
//! record simply contributes nothing to its counter for that record.

use crate::fieldtally::path::FieldPath;
use crate::fieldtally::types::FieldValue;

/// Extract every leaf value reachable from `root` along `path`.
///
/// Leaves are borrowed from the record; extraction never clones or mutates
/// record data. The returned order is document order: array elements in
/// sequence, depth-first.
pub fn extract_leaves<'a>(root: &'a FieldValue, path: &FieldPath) -> Vec<&'a FieldValue> {
    let mut leaves = Vec::new();
    descend(root, path.segments(), &mut leaves);
    leaves
}

fn descend<'a>(value: &'a FieldValue, segments: &[String], leaves: &mut Vec<&'a FieldValue>) {
    let segment = match segments.first() {
        Some(s) => s.as_str(),
        None => return,
    };
    let rest = &segments[1..];

    match value {
        // Transparent fan-out: every element sees the same unconsumed path
        FieldValue::Array(items) => {
            for item in items {
                descend(item, segments, leaves);
            }
        }
        FieldValue::Map(entries) | FieldValue::Struct(entries) => {
            let found = match entries.get(segment) {
                Some(v) if !v.is_null() => v,
                // Missing key or null value: zero leaves, not an error
                _ => return,
            };
            if rest.is_empty() {
                emit_terminal(found, leaves);
            } else {
                descend(found, rest, leaves);
            }
        }
        // A scalar cannot be indexed further; null terminates the branch
        FieldValue::Integer(_)
        | FieldValue::Float(_)
        | FieldValue::String(_)
        | FieldValue::Boolean(_)
        | FieldValue::Null => {}
    }
}

/// Emit a value resolved by the final path segment. A terminal array
/// contributes each element as an independent leaf; everything else is a
/// single leaf.
fn emit_terminal<'a>(value: &'a FieldValue, leaves: &mut Vec<&'a FieldValue>) {
    match value {
        FieldValue::Array(items) => leaves.extend(items.iter()),
        other => leaves.push(other),
    }
}
