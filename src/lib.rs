//! # fieldtally
//!
//! A field-value counting engine for streaming analytics pipelines. Given a
//! semi-structured record (a JSON-like tree of scalars, arrays, maps, and
//! named-property structs) and a set of declared field paths, the engine
//! extracts every value reachable at each path and reports each one to a
//! named counter, one increment per observed occurrence.
//!
//! ## Features
//!
//! - **Polymorphic traversal**: dotted field paths resolved over arrays,
//!   maps, and structs with transparent list fan-out at any depth
//! - **Skip semantics**: absent or null fields contribute nothing — never an
//!   error
//! - **Pluggable counter storage**: the engine depends only on an async
//!   increment contract; an in-memory store ships for tests and local use
//! - **Per-mapping failure isolation**: one bad mapping cannot suppress the
//!   counts of its siblings
//! - **Definition persistence**: prefix-keyed repository for mapping and job
//!   definitions over any key-value backend
//!
//! ## Quick Start
//!
//! ```rust
//! use fieldtally::{CounterMapping, FieldValueCounterHandler, RecordPayload};
//! use fieldtally::fieldtally::serialization::JsonDecoder;
//! use fieldtally::fieldtally::store::InMemoryCounterStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(InMemoryCounterStore::new());
//!     let handler = FieldValueCounterHandler::new(
//!         store.clone(),
//!         Arc::new(JsonDecoder::new()),
//!         vec![CounterMapping::new("jobInstances.status", "statusCounts")?],
//!     )?;
//!
//!     let payload = r#"{"jobInstances":[{"status":"FAILED"},{"status":"SUCCESS"}]}"#;
//!     handler.handle(RecordPayload::Text(payload.to_string())).await?;
//!
//!     assert_eq!(store.get("statusCounts", "FAILED").await, 1);
//!     assert_eq!(store.get("statusCounts", "SUCCESS").await, 1);
//!     Ok(())
//! }
//! ```

pub mod fieldtally;

// Re-export the types most callers need at the crate root
pub use fieldtally::error::{TallyError, TallyResult};
pub use fieldtally::handler::{CounterMapping, FieldValueCounterHandler, RecordPayload};
pub use fieldtally::store::CounterStore;
pub use fieldtally::types::FieldValue;
