//! Handler orchestration.
//!
//! [`FieldValueCounterHandler`] binds an immutable set of
//! (field path, counter name) mappings to a counter store and drives
//! resolve → extract → dispatch for every incoming record. The handler is a
//! side-effecting tap on a pass-through pipeline stage: the record is never
//! mutated and is returned for downstream processing.
//!
//! Mappings are processed in declared order and failures are isolated per
//! mapping: one poisoned mapping is recorded, logged, and surfaced in an
//! aggregated error after every mapping has been attempted, so it can never
//! suppress a sibling's counts.

use log::{debug, warn};
use std::sync::Arc;

use crate::fieldtally::dispatch::dispatch_leaves;
use crate::fieldtally::error::{TallyError, TallyResult};
use crate::fieldtally::extract::extract_leaves;
use crate::fieldtally::path::FieldPath;
use crate::fieldtally::serialization::PayloadDecoder;
use crate::fieldtally::store::CounterStore;
use crate::fieldtally::types::{FieldValue, NamedPropertyReadable};

/// One declared (field path, counter name) pair.
///
/// The path expression is resolved eagerly at construction, so a malformed
/// path fails here rather than on first use, and per-record handling never
/// re-tokenizes.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterMapping {
    path: FieldPath,
    counter_name: String,
}

impl CounterMapping {
    /// Create a mapping from a dotted path expression and a counter name.
    ///
    /// Fails with [`TallyError::Configuration`] for an empty counter name
    /// and [`TallyError::InvalidPath`] for a malformed path expression.
    pub fn new(path_expression: &str, counter_name: &str) -> TallyResult<Self> {
        if counter_name.is_empty() {
            return Err(TallyError::configuration(
                "counter name must not be empty",
            ));
        }
        Ok(CounterMapping {
            path: FieldPath::parse(path_expression)?,
            counter_name: counter_name.to_string(),
        })
    }

    /// The resolved field path
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// The counter this mapping reports to
    pub fn counter_name(&self) -> &str {
        &self.counter_name
    }
}

/// An incoming record: either raw text still needing decoding, or an
/// already-structured value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordPayload {
    /// Raw textual payload; decoded through the handler's [`PayloadDecoder`]
    Text(String),
    /// Already-structured record
    Structured(FieldValue),
}

/// Counts occurrences of field values across incoming records.
///
/// Stateless per call beyond the immutable mapping set established at
/// construction; safe for unsynchronized concurrent invocation. All
/// suspension happens inside the counter store and decoder collaborators -
/// the handler itself performs no I/O and holds no locks.
pub struct FieldValueCounterHandler {
    store: Arc<dyn CounterStore>,
    decoder: Arc<dyn PayloadDecoder>,
    mappings: Vec<CounterMapping>,
}

impl FieldValueCounterHandler {
    /// Create a handler over an immutable set of mappings.
    ///
    /// Fails with [`TallyError::Configuration`] when no mapping is supplied.
    /// Counter names and path expressions were already validated by
    /// [`CounterMapping::new`].
    pub fn new(
        store: Arc<dyn CounterStore>,
        decoder: Arc<dyn PayloadDecoder>,
        mappings: Vec<CounterMapping>,
    ) -> TallyResult<Self> {
        if mappings.is_empty() {
            return Err(TallyError::configuration(
                "at least one counter mapping must be supplied",
            ));
        }
        Ok(FieldValueCounterHandler {
            store,
            decoder,
            mappings,
        })
    }

    /// The declared mappings, in processing order
    pub fn mappings(&self) -> &[CounterMapping] {
        &self.mappings
    }

    /// Count field values for one record and pass the record through.
    ///
    /// A text payload is first decoded through the injected collaborator; a
    /// decoding failure surfaces as [`TallyError::Decoding`] with no mapping
    /// attempted and the record not forwarded. Otherwise every mapping runs;
    /// per-mapping failures are aggregated into
    /// [`TallyError::Aggregated`] after all mappings were attempted. On
    /// success the original, unmodified payload is returned for downstream
    /// processing.
    pub async fn handle(&self, payload: RecordPayload) -> TallyResult<RecordPayload> {
        let decoded;
        let record = match &payload {
            RecordPayload::Text(text) => {
                decoded = self.decoder.decode(text)?;
                &decoded
            }
            RecordPayload::Structured(value) => value,
        };
        self.apply_mappings(record).await?;
        Ok(payload)
    }

    /// Count field values read from a named-property object.
    ///
    /// The object is materialized through the composite adapter and counted
    /// with the same mapping loop as a structured record.
    pub async fn handle_readable(&self, source: &dyn NamedPropertyReadable) -> TallyResult<()> {
        let record = FieldValue::from_readable(source);
        self.apply_mappings(&record).await
    }

    async fn apply_mappings(&self, record: &FieldValue) -> TallyResult<()> {
        let mut failures = Vec::new();
        for mapping in &self.mappings {
            let leaves = extract_leaves(record, &mapping.path);
            match dispatch_leaves(self.store.as_ref(), &mapping.counter_name, &leaves).await {
                Ok(issued) => {
                    debug!(
                        "counter '{}': {} increment(s) for path '{}'",
                        mapping.counter_name, issued, mapping.path
                    );
                }
                Err(e) => {
                    warn!(
                        "counter '{}': dispatch failed for path '{}': {}",
                        mapping.counter_name, mapping.path, e
                    );
                    failures.push(e);
                }
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(TallyError::aggregated(failures))
        }
    }
}
