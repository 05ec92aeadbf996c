//! Counter dispatch.
//!
//! Converts extracted leaves to their canonical string form and issues
//! exactly one [`CounterStore::increment`] call per countable value. A leaf
//! that is itself a collection fans out here: each element contributes one
//! independent increment rather than one increment of the collection's
//! string form. This is distinct from the mid-path fan-out performed during
//! extraction - both ultimately produce one increment per element.

use crate::fieldtally::error::{TallyError, TallyResult};
use crate::fieldtally::store::CounterStore;
use crate::fieldtally::types::FieldValue;

/// Dispatch every leaf to the named counter, returning the number of
/// increments issued.
///
/// A null leaf, or a null element inside a collection-typed leaf, fails the
/// dispatch with [`TallyError::InvalidValue`]. Increments already issued
/// before the failure are not rolled back; each increment is an independent,
/// committed side effect once invoked.
pub async fn dispatch_leaves(
    store: &dyn CounterStore,
    counter_name: &str,
    leaves: &[&FieldValue],
) -> TallyResult<u64> {
    let mut issued = 0u64;
    for leaf in leaves {
        match leaf {
            FieldValue::Array(elements) => {
                // Leaf-level fan-out: one increment per element
                for element in elements {
                    increment_scalar(store, counter_name, element).await?;
                    issued += 1;
                }
            }
            other => {
                increment_scalar(store, counter_name, other).await?;
                issued += 1;
            }
        }
    }
    Ok(issued)
}

async fn increment_scalar(
    store: &dyn CounterStore,
    counter_name: &str,
    value: &FieldValue,
) -> TallyResult<()> {
    if value.is_null() {
        return Err(TallyError::invalid_value(
            counter_name,
            "null element in collection leaf",
        ));
    }
    store
        .increment(counter_name, &value.to_display_string())
        .await
}
