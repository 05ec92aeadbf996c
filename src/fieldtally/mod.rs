pub mod dispatch;
pub mod error;
pub mod extract;
pub mod handler;
pub mod path;
pub mod repository;
pub mod serialization;
pub mod store;
pub mod types;

// Re-export the counting surface for callers that import by area
pub use dispatch::dispatch_leaves;
pub use error::{TallyError, TallyResult};
pub use extract::extract_leaves;
pub use handler::{CounterMapping, FieldValueCounterHandler, RecordPayload};
pub use path::FieldPath;
pub use store::CounterStore;
pub use types::{FieldValue, NamedPropertyReadable};
