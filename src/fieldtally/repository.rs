//! Definition persistence.
//!
//! Counter-mapping and job definitions are persisted through a generic
//! prefix-keyed repository over an abstract key-value store: the key is
//! `<prefix>.<id>` and the value is a newline-joined field serialization.
//! The delimiter must not occur inside any serialized field value; the
//! constraint is enforced at serialize time rather than corrupting stored
//! state. `deserialize(serialize(entity)) == entity` holds for every valid
//! entity.

use async_trait::async_trait;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::fieldtally::error::{TallyError, TallyResult};

/// Delimiter between serialized entity fields
pub const FIELD_DELIMITER: char = '\n';

/// Serialization capability for persisted definition entities.
///
/// Implementors define their key prefix, identity, and a field
/// serialization that round-trips through [`join_fields`]/[`split_fields`].
pub trait DefinitionEntity: Sized + Send + Sync {
    /// Key prefix for this entity kind (keys become `<prefix>.<id>`)
    const PREFIX: &'static str;

    /// The identity the entity is stored under
    fn id(&self) -> &str;

    /// Serialize the entity to its stored form
    fn serialize(&self) -> TallyResult<String>;

    /// Reconstruct an entity from its stored form
    fn deserialize(value: &str) -> TallyResult<Self>;
}

/// Join entity fields with the delimiter, rejecting any field that already
/// contains it.
pub fn join_fields(fields: &[&str]) -> TallyResult<String> {
    for field in fields {
        if field.contains(FIELD_DELIMITER) {
            return Err(TallyError::repository(format!(
                "field value '{}' contains the serialization delimiter",
                field.escape_default()
            )));
        }
    }
    Ok(fields.join(&FIELD_DELIMITER.to_string()))
}

/// Split a stored value back into exactly `expected` fields
pub fn split_fields(value: &str, expected: usize) -> TallyResult<Vec<&str>> {
    let parts: Vec<&str> = value.split(FIELD_DELIMITER).collect();
    if parts.len() != expected {
        return Err(TallyError::repository(format!(
            "expected {} serialized fields, found {}",
            expected,
            parts.len()
        )));
    }
    Ok(parts)
}

/// Persisted declaration of one (field path, counter name) mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingDefinition {
    /// Unique name of the mapping declaration
    pub name: String,
    /// Dotted field-path expression
    pub field_path: String,
    /// Counter the extracted values are reported to
    pub counter_name: String,
}

impl MappingDefinition {
    /// Create a mapping definition
    pub fn new(
        name: impl Into<String>,
        field_path: impl Into<String>,
        counter_name: impl Into<String>,
    ) -> Self {
        MappingDefinition {
            name: name.into(),
            field_path: field_path.into(),
            counter_name: counter_name.into(),
        }
    }
}

impl DefinitionEntity for MappingDefinition {
    const PREFIX: &'static str = "mappings";

    fn id(&self) -> &str {
        &self.name
    }

    fn serialize(&self) -> TallyResult<String> {
        join_fields(&[&self.name, &self.field_path, &self.counter_name])
    }

    fn deserialize(value: &str) -> TallyResult<Self> {
        let parts = split_fields(value, 3)?;
        Ok(MappingDefinition::new(parts[0], parts[1], parts[2]))
    }
}

/// Persisted declaration of a processing job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDefinition {
    /// Unique job name
    pub name: String,
    /// The job's definition text
    pub definition: String,
}

impl JobDefinition {
    /// Create a job definition
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        JobDefinition {
            name: name.into(),
            definition: definition.into(),
        }
    }
}

impl DefinitionEntity for JobDefinition {
    const PREFIX: &'static str = "jobs";

    fn id(&self) -> &str {
        &self.name
    }

    fn serialize(&self) -> TallyResult<String> {
        join_fields(&[&self.name, &self.definition])
    }

    fn deserialize(value: &str) -> TallyResult<Self> {
        let parts = split_fields(value, 2)?;
        Ok(JobDefinition::new(parts[0], parts[1]))
    }
}

/// Key-value backend contract the repository persists through.
///
/// Implementations must be safe for concurrent use; a networked backend
/// (Redis and friends) lives with the deployment, [`InMemoryKeyValueStore`]
/// ships here for tests.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    async fn put(&self, key: &str, value: &str) -> TallyResult<()>;

    /// Fetch the value stored under `key`
    async fn get(&self, key: &str) -> TallyResult<Option<String>>;

    /// Remove `key`; returns whether it existed
    async fn delete(&self, key: &str) -> TallyResult<bool>;
}

/// In-memory key-value store for tests and single-process use
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn put(&self, key: &str, value: &str) -> TallyResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> TallyResult<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> TallyResult<bool> {
        let mut entries = self.entries.write().await;
        Ok(entries.remove(key).is_some())
    }
}

/// Generic prefix-keyed repository for one definition entity kind
pub struct DefinitionRepository<D: DefinitionEntity> {
    store: Arc<dyn KeyValueStore>,
    _entity: PhantomData<D>,
}

impl<D: DefinitionEntity> DefinitionRepository<D> {
    /// Create a repository over the given backend
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        DefinitionRepository {
            store,
            _entity: PhantomData,
        }
    }

    fn key_for(id: &str) -> String {
        format!("{}.{}", D::PREFIX, id)
    }

    /// Persist an entity under its prefix-qualified key
    pub async fn store(&self, entity: &D) -> TallyResult<()> {
        let serialized = entity.serialize()?;
        self.store.put(&Self::key_for(entity.id()), &serialized).await
    }

    /// Look one entity up by id
    pub async fn find_one(&self, id: &str) -> TallyResult<Option<D>> {
        match self.store.get(&Self::key_for(id)).await? {
            Some(value) => Ok(Some(D::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    /// Delete one entity by id; returns whether it existed
    pub async fn delete(&self, id: &str) -> TallyResult<bool> {
        self.store.delete(&Self::key_for(id)).await
    }
}
