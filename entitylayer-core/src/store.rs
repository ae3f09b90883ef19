//! Entity store front-end.
//!
//! [`EntityStore`] is the primary API of this crate. It binds a storage
//! backend to the two behavior knobs of the layer, the key-field name and the
//! error-normalization table, and exposes the five operations: create, read,
//! find, read-all, update, and delete. Both knobs are per-instance state;
//! there is no process-wide configuration.
//!
//! # Example
//!
//! ```ignore
//! use entitylayer_core::store::EntityStore;
//!
//! let store = EntityStore::connect(backend_builder)
//!     .await?
//!     .with_key_field("key")
//!     .with_error_mapping("duplicate key", "already exists");
//!
//! let mut room = Record::new();
//! room.insert("RoomNum".to_string(), Value::from("306"));
//! store.create("rooms", "306", room).await?;
//! let found = store.read("rooms", "306").await?;
//! ```

use tracing::debug;

use crate::{
    backend::{EntityBackend, EntityBackendBuilder},
    error::{EntityStoreError, EntityStoreResult},
    normalize::ErrorMap,
    value::{DEFAULT_KEY_FIELD, INTERNAL_ID_FIELD, Record, Value},
};

/// An entity store bound to a specific backend implementation.
///
/// The store owns the single shared connection for the process; the wrapped
/// driver is assumed to manage its own pooling and to be safe for concurrent
/// use, so the store adds no locking. Every operation is one round trip.
#[derive(Debug)]
pub struct EntityStore<B: EntityBackend> {
    backend: B,
    key_field: String,
    error_map: ErrorMap,
}

impl<B: EntityBackend> EntityStore<B> {
    /// Creates a store over an already-constructed backend, with the default
    /// key field and the default error map.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            key_field: DEFAULT_KEY_FIELD.to_string(),
            error_map: ErrorMap::default(),
        }
    }

    /// Builds the backend through its builder and wraps it in a store.
    ///
    /// Connection-establishment failures are normalized through the default
    /// error map before they reach the caller. Failure is terminal for this
    /// call; nothing is retried.
    pub async fn connect<F>(builder: F) -> EntityStoreResult<Self>
    where
        F: EntityBackendBuilder<Backend = B>,
    {
        let map = ErrorMap::default();
        let backend = builder
            .build()
            .await
            .map_err(|e| normalize_with(&map, e))?;

        Ok(Self::new(backend))
    }

    /// Overrides the name of the key field for all subsequent operations.
    pub fn with_key_field(mut self, name: &str) -> Self {
        self.key_field = name.to_string();
        self
    }

    /// Adds an error mapping: backend failures whose message contains
    /// `fragment` are reported with `replacement` as their message instead.
    pub fn with_error_mapping(mut self, fragment: &str, replacement: &str) -> Self {
        self.error_map.insert(fragment, replacement);
        self
    }

    /// Returns the configured key-field name.
    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// Creates a new record in the collection named `entity`.
    ///
    /// When `record` lacks the key field, `key_value` is injected under it
    /// first. Returns a record carrying the backend-assigned internal
    /// identifier and the key value.
    ///
    /// # Errors
    ///
    /// Fails with a normalized backend error on insertion failure, including
    /// violation of an externally defined uniqueness constraint.
    pub async fn create(
        &self,
        entity: &str,
        key_value: &str,
        mut record: Record,
    ) -> EntityStoreResult<Record> {
        record
            .entry(self.key_field.clone())
            .or_insert_with(|| Value::from(key_value));

        debug!(entity, key = key_value, "creating record");
        let inserted_id = self
            .backend
            .insert_record(entity, &self.key_field, record)
            .await
            .map_err(|e| self.normalize(e))?;

        let mut result = Record::new();
        result.insert(INTERNAL_ID_FIELD.to_string(), inserted_id);
        result.insert(self.key_field.clone(), Value::from(key_value));

        Ok(result)
    }

    /// Reads the single record whose key field equals `key_value`, with an
    /// ascending sort on the key field as a tie-break.
    ///
    /// # Errors
    ///
    /// Fails with [`NotFound`](EntityStoreError::NotFound) when no record
    /// matches.
    pub async fn read(&self, entity: &str, key_value: &str) -> EntityStoreResult<Record> {
        self.backend
            .find_by_key(entity, &self.key_field, key_value)
            .await
            .map_err(|e| self.normalize(e))?
            .ok_or_else(|| EntityStoreError::NotFound {
                entity: entity.to_string(),
                key: key_value.to_string(),
            })
    }

    /// Finds every record where `field` equals `value`, or every record in
    /// the collection when `field` is empty. An empty collection yields an
    /// empty vector, never an error. Result order is unspecified.
    pub async fn find(
        &self,
        entity: &str,
        field: &str,
        value: &str,
    ) -> EntityStoreResult<Vec<Record>> {
        let filter = if field.is_empty() {
            None
        } else {
            Some((field, value))
        };

        self.backend
            .find_records(entity, filter)
            .await
            .map_err(|e| self.normalize(e))
    }

    /// Reads every record in the collection. Equivalent to
    /// [`find`](Self::find) with empty field and value.
    pub async fn read_all(&self, entity: &str) -> EntityStoreResult<Vec<Record>> {
        self.find(entity, "", "").await
    }

    /// Updates the record located by `id` with the fields of `record`, as a
    /// partial merge with upsert disabled.
    ///
    /// The filter is resolved in order: a non-empty `id` matches on the key
    /// field; otherwise a string key value inside `record` is used;
    /// otherwise `record`'s internal identifier field; otherwise the call
    /// fails with [`MissingKey`](EntityStoreError::MissingKey).
    ///
    /// # Errors
    ///
    /// Fails with [`NoMatch`](EntityStoreError::NoMatch) when the filter
    /// matched zero records.
    pub async fn update(&self, entity: &str, id: &str, record: Record) -> EntityStoreResult<()> {
        let (filter_field, filter_value) = resolve_update_filter(&self.key_field, id, &record)?;

        debug!(entity, id, field = filter_field.as_str(), "updating record");
        let matched = self
            .backend
            .merge_record(entity, &filter_field, &filter_value, record)
            .await
            .map_err(|e| self.normalize(e))?;

        if matched == 0 {
            return Err(EntityStoreError::NoMatch {
                entity: entity.to_string(),
                id: id.to_string(),
            });
        }

        Ok(())
    }

    /// Deletes the single record whose key field equals `id`, matching under
    /// a case-insensitive collation.
    ///
    /// # Errors
    ///
    /// Fails with [`DeleteFailed`](EntityStoreError::DeleteFailed) when the
    /// deleted count is not exactly one.
    pub async fn delete(&self, entity: &str, id: &str) -> EntityStoreResult<()> {
        let deleted = self
            .backend
            .delete_by_key(entity, &self.key_field, id)
            .await
            .map_err(|e| self.normalize(e))?;

        if deleted != 1 {
            return Err(EntityStoreError::DeleteFailed {
                entity: entity.to_string(),
                id: id.to_string(),
            });
        }

        Ok(())
    }

    /// Shuts down the store and releases the backend's connection.
    ///
    /// This consumes the store and should be called on process shutdown or
    /// test teardown to avoid leaking connections.
    pub async fn shutdown(self) -> EntityStoreResult<()> {
        self.backend.shutdown().await
    }

    fn normalize(&self, err: EntityStoreError) -> EntityStoreError {
        normalize_with(&self.error_map, err)
    }
}

/// Rewrites a backend-originated failure through the error map. Failures the
/// store raises itself pass through untouched.
fn normalize_with(map: &ErrorMap, err: EntityStoreError) -> EntityStoreError {
    let message = match &err {
        EntityStoreError::Backend(message) | EntityStoreError::Initialization(message) => message,
        _ => return err,
    };

    match map.resolve(message) {
        Some(replacement) => EntityStoreError::Normalized(replacement.to_string()),
        None => err,
    }
}

/// Resolves the filter an update uses to locate its target record.
fn resolve_update_filter(
    key_field: &str,
    id: &str,
    record: &Record,
) -> EntityStoreResult<(String, Value)> {
    if !id.is_empty() {
        return Ok((key_field.to_string(), Value::from(id)));
    }
    if let Some(Value::String(key)) = record.get(key_field) {
        return Ok((key_field.to_string(), Value::from(key.clone())));
    }
    if let Some(internal_id) = record.get(INTERNAL_ID_FIELD) {
        return Ok((INTERNAL_ID_FIELD.to_string(), internal_id.clone()));
    }

    Err(EntityStoreError::MissingKey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_id_filters_on_key_field() {
        let filter = resolve_update_filter("key", "306", &Record::new()).unwrap();
        assert_eq!(filter, ("key".to_string(), Value::from("306")));
    }

    #[test]
    fn empty_id_falls_back_to_record_key() {
        let mut record = Record::new();
        record.insert("key".to_string(), Value::from("306"));
        record.insert("RoomNum".to_string(), Value::from("306"));

        let filter = resolve_update_filter("key", "", &record).unwrap();
        assert_eq!(filter, ("key".to_string(), Value::from("306")));
    }

    #[test]
    fn non_string_key_value_is_ignored() {
        let mut record = Record::new();
        record.insert("key".to_string(), Value::from(306));
        record.insert(INTERNAL_ID_FIELD.to_string(), Value::from("abc123"));

        let filter = resolve_update_filter("key", "", &record).unwrap();
        assert_eq!(filter, (INTERNAL_ID_FIELD.to_string(), Value::from("abc123")));
    }

    #[test]
    fn internal_id_is_last_resort() {
        let mut record = Record::new();
        record.insert(INTERNAL_ID_FIELD.to_string(), Value::from("abc123"));

        let filter = resolve_update_filter("key", "", &record).unwrap();
        assert_eq!(filter, (INTERNAL_ID_FIELD.to_string(), Value::from("abc123")));
    }

    #[test]
    fn no_usable_key_is_an_error() {
        let mut record = Record::new();
        record.insert("RoomNum".to_string(), Value::from("306"));

        let err = resolve_update_filter("key", "", &record).unwrap_err();
        assert!(matches!(err, EntityStoreError::MissingKey));
    }

    #[test]
    fn normalization_rewrites_backend_messages_only() {
        let mut map = ErrorMap::new();
        map.insert("duplicate key", "already exists");

        let rewritten =
            normalize_with(&map, EntityStoreError::Backend("E11000 duplicate key".into()));
        assert_eq!(rewritten.to_string(), "already exists");

        let untouched = normalize_with(
            &map,
            EntityStoreError::DeleteFailed {
                entity: "rooms".into(),
                id: "duplicate key".into(),
            },
        );
        assert_eq!(
            untouched.to_string(),
            "failed to delete entity=rooms id=duplicate key"
        );
    }
}
