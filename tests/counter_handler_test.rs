/*!
# Tests for Field-Value Counter Handler Orchestration

End-to-end handling scenarios: JSON payload decoding, mapping order,
pass-through semantics, construction-time validation, and per-mapping
failure isolation.
*/

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fieldtally::fieldtally::serialization::JsonDecoder;
use fieldtally::{
    CounterMapping, CounterStore, FieldValue, FieldValueCounterHandler, RecordPayload, TallyError,
    TallyResult,
};

/// Counter store double that records every increment call in order
#[derive(Debug, Default)]
struct RecordingCounterStore {
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingCounterStore {
    fn new() -> Self {
        Self::default()
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CounterStore for RecordingCounterStore {
    async fn increment(&self, counter_name: &str, value: &str) -> TallyResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((counter_name.to_string(), value.to_string()));
        Ok(())
    }
}

fn handler_with(
    store: Arc<RecordingCounterStore>,
    mappings: Vec<CounterMapping>,
) -> FieldValueCounterHandler {
    FieldValueCounterHandler::new(store, Arc::new(JsonDecoder::new()), mappings).unwrap()
}

fn structured(entries: Vec<(&str, FieldValue)>) -> RecordPayload {
    RecordPayload::Structured(FieldValue::Map(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<HashMap<_, _>>(),
    ))
}

#[tokio::test]
async fn counts_statuses_across_job_instances() {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = Arc::new(RecordingCounterStore::new());
    let handler = handler_with(
        store.clone(),
        vec![CounterMapping::new("jobInstances.status", "statusCounts").unwrap()],
    );

    let payload = r#"{"name":"checkout","jobInstances":[{"status":"FAILED"},{"status":"SUCCESS"},{"status":"FAILED"}]}"#;
    handler
        .handle(RecordPayload::Text(payload.to_string()))
        .await
        .unwrap();

    assert_eq!(
        store.calls(),
        vec![
            ("statusCounts".to_string(), "FAILED".to_string()),
            ("statusCounts".to_string(), "SUCCESS".to_string()),
            ("statusCounts".to_string(), "FAILED".to_string()),
        ]
    );
}

#[tokio::test]
async fn absent_field_yields_zero_increments_and_succeeds() {
    let store = Arc::new(RecordingCounterStore::new());
    let handler = handler_with(
        store.clone(),
        vec![CounterMapping::new("name", "nameCounts").unwrap()],
    );

    let payload = structured(vec![("other", FieldValue::Integer(1))]);
    let result = handler.handle(payload).await;

    assert!(result.is_ok());
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn malformed_json_surfaces_decoding_error_with_zero_increments() {
    let store = Arc::new(RecordingCounterStore::new());
    let handler = handler_with(
        store.clone(),
        vec![CounterMapping::new("name", "nameCounts").unwrap()],
    );

    let result = handler.handle(RecordPayload::Text("{bad".to_string())).await;

    assert!(matches!(result, Err(TallyError::Decoding { .. })));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn record_is_passed_through_unmodified() {
    let store = Arc::new(RecordingCounterStore::new());
    let handler = handler_with(
        store.clone(),
        vec![CounterMapping::new("level", "levelCounts").unwrap()],
    );

    let payload = structured(vec![("level", FieldValue::String("WARN".to_string()))]);
    let returned = handler.handle(payload.clone()).await.unwrap();

    assert_eq!(returned, payload);
}

#[tokio::test]
async fn text_payload_is_returned_as_the_original_text() {
    let store = Arc::new(RecordingCounterStore::new());
    let handler = handler_with(
        store.clone(),
        vec![CounterMapping::new("level", "levelCounts").unwrap()],
    );

    let payload = RecordPayload::Text(r#"{"level":"INFO"}"#.to_string());
    let returned = handler.handle(payload.clone()).await.unwrap();

    assert_eq!(returned, payload);
    assert_eq!(
        store.calls(),
        vec![("levelCounts".to_string(), "INFO".to_string())]
    );
}

#[tokio::test]
async fn mappings_are_applied_in_declared_order() {
    let store = Arc::new(RecordingCounterStore::new());
    let handler = handler_with(
        store.clone(),
        vec![
            CounterMapping::new("tags", "tagCounts").unwrap(),
            CounterMapping::new("level", "levelCounts").unwrap(),
        ],
    );

    let payload = structured(vec![
        (
            "tags",
            FieldValue::Array(vec![
                FieldValue::String("a".to_string()),
                FieldValue::String("b".to_string()),
            ]),
        ),
        ("level", FieldValue::String("ERROR".to_string())),
    ]);
    handler.handle(payload).await.unwrap();

    // All of the first mapping's increments precede any of the second's
    assert_eq!(
        store.calls(),
        vec![
            ("tagCounts".to_string(), "a".to_string()),
            ("tagCounts".to_string(), "b".to_string()),
            ("levelCounts".to_string(), "ERROR".to_string()),
        ]
    );
}

#[tokio::test]
async fn poisoned_mapping_does_not_block_siblings() {
    let store = Arc::new(RecordingCounterStore::new());
    let handler = handler_with(
        store.clone(),
        vec![
            CounterMapping::new("codes", "codeCounts").unwrap(),
            CounterMapping::new("level", "levelCounts").unwrap(),
        ],
    );

    // Null element inside the terminal array poisons the first mapping
    let payload = structured(vec![
        (
            "codes",
            FieldValue::Array(vec![FieldValue::Integer(1), FieldValue::Null]),
        ),
        ("level", FieldValue::String("INFO".to_string())),
    ]);
    let result = handler.handle(payload).await;

    let failures = match result {
        Err(TallyError::Aggregated { failures }) => failures,
        other => panic!("expected aggregated error, got {:?}", other),
    };
    assert_eq!(failures.len(), 1);
    assert!(matches!(
        &failures[0],
        TallyError::InvalidValue { counter_name, .. } if counter_name == "codeCounts"
    ));

    // The healthy leaf before the null was counted, and the second mapping
    // still ran to completion
    assert_eq!(
        store.calls(),
        vec![
            ("codeCounts".to_string(), "1".to_string()),
            ("levelCounts".to_string(), "INFO".to_string()),
        ]
    );
}

#[test]
fn construction_requires_at_least_one_mapping() {
    let store: Arc<RecordingCounterStore> = Arc::new(RecordingCounterStore::new());
    let result = FieldValueCounterHandler::new(store, Arc::new(JsonDecoder::new()), vec![]);
    assert!(matches!(result, Err(TallyError::Configuration { .. })));
}

#[test]
fn mapping_rejects_empty_counter_name() {
    assert!(matches!(
        CounterMapping::new("a.b", ""),
        Err(TallyError::Configuration { .. })
    ));
}

#[test]
fn mapping_rejects_malformed_path_eagerly() {
    assert!(matches!(
        CounterMapping::new("a..b", "counts"),
        Err(TallyError::InvalidPath { .. })
    ));
}
