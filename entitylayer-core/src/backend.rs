//! Storage backend abstraction for the entity store.
//!
//! This module defines the traits that abstract over concrete storage
//! implementations, allowing the [`EntityStore`](crate::store::EntityStore)
//! front-end to work against different backends (in-memory, MongoDB, etc.).
//!
//! Backends operate below the key-field policy: the store decides which field
//! names the key and which filter locates an update target, and passes those
//! decisions in. Backends only execute single round trips and translate their
//! native value types into the generic [`Record`] model on the way out.
//!
//! # Traits
//!
//! - [`EntityBackend`]: the core trait for storage backends
//! - [`EntityBackendBuilder`]: factory trait for constructing backend instances

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::EntityStoreResult,
    value::{Record, Value},
};

/// Abstract interface for entity storage backends.
///
/// Every operation is a single round trip to the underlying store, bounded by
/// the backend's configured communication timeout. No operation retries or
/// batches internally. Implementations must be safe for concurrent use from
/// multiple async tasks; this layer adds no locking of its own beyond what a
/// backend needs internally.
///
/// # Error Handling
///
/// Driver-originated failures are returned as
/// [`Backend`](crate::error::EntityStoreError::Backend) with the driver's
/// message verbatim; the store front-end applies error normalization on top.
#[async_trait]
pub trait EntityBackend: Send + Sync + Debug {
    /// Inserts a record into the named collection and returns the
    /// backend-assigned internal identifier, already converted to a generic
    /// [`Value`].
    ///
    /// The record is guaranteed by the store to carry the key field. A
    /// uniqueness violation under an externally defined constraint surfaces
    /// as a backend error.
    async fn insert_record(
        &self,
        entity: &str,
        key_field: &str,
        record: Record,
    ) -> EntityStoreResult<Value>;

    /// Finds at most one record whose key field equals `key`, sorting
    /// ascending on the key field as a tie-break when several match.
    ///
    /// Returns `Ok(None)` when no record matches; the store turns that into
    /// a not-found error with context.
    async fn find_by_key(
        &self,
        entity: &str,
        key_field: &str,
        key: &str,
    ) -> EntityStoreResult<Option<Record>>;

    /// Returns every record matching the equality filter, or every record in
    /// the collection when `filter` is `None`. An absent or empty collection
    /// yields an empty vector, never an error. Result order is unspecified.
    async fn find_records(
        &self,
        entity: &str,
        filter: Option<(&str, &str)>,
    ) -> EntityStoreResult<Vec<Record>>;

    /// Applies `record`'s fields as a partial merge onto the single record
    /// where `filter_field` equals `filter_value`, without upserting.
    /// Returns the number of records the filter matched.
    async fn merge_record(
        &self,
        entity: &str,
        filter_field: &str,
        filter_value: &Value,
        record: Record,
    ) -> EntityStoreResult<u64>;

    /// Deletes the single record whose key field equals `key`, matching
    /// case-insensitively (collation locale `en_US`, primary strength).
    /// Returns the number of records deleted.
    async fn delete_by_key(
        &self,
        entity: &str,
        key_field: &str,
        key: &str,
    ) -> EntityStoreResult<u64>;

    /// Cleanly shuts down the backend, releasing connections and other
    /// resources. The default implementation is a no-op; backends holding
    /// external connections should override this.
    async fn shutdown(self) -> EntityStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Factory trait for creating backend instances.
///
/// Builders encapsulate everything needed to establish a backend, typically
/// a validated [`ConnectConfig`](crate::config::ConnectConfig). Construction
/// failures surface as
/// [`Initialization`](crate::error::EntityStoreError::Initialization) errors
/// and are terminal for that call; nothing is retried.
#[async_trait]
pub trait EntityBackendBuilder {
    /// The backend type this builder produces.
    type Backend: EntityBackend;

    /// Builds the backend, establishing any underlying connection.
    async fn build(self) -> EntityStoreResult<Self::Backend>;
}
