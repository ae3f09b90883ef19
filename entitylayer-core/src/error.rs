//! Error types and result types for entity store operations.
//!
//! This module provides the error taxonomy for all entity store operations.
//! Use [`EntityStoreResult<T>`] as the return type for fallible operations.

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with an entity store.
///
/// Backend-originated failures are carried as [`Backend`](EntityStoreError::Backend)
/// with the driver's message, and are rewritten to
/// [`Normalized`](EntityStoreError::Normalized) when the store's error map holds a
/// matching fragment. Failures raised by the store itself (missing key, not found,
/// no match, failed delete) carry fixed descriptive messages and are never remapped.
#[derive(Error, Debug)]
pub enum EntityStoreError {
    /// Invalid connection configuration detected before any connection attempt.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// Error during store initialization or connection setup.
    #[error("initialization error: {0}")]
    Initialization(String),
    /// Serialization error when projecting records to another format.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// An update was attempted with no usable key: the `id` argument was empty
    /// and the record carried neither the key field nor an internal identifier.
    #[error("missing key field")]
    MissingKey,
    /// No record matched the requested key on a read.
    #[error("not found: entity={entity} key={key}")]
    NotFound {
        /// The collection name.
        entity: String,
        /// The requested key value.
        key: String,
    },
    /// An update matched zero records.
    #[error("no match found for entity={entity} id={id}")]
    NoMatch {
        /// The collection name.
        entity: String,
        /// The identifier used to locate the target.
        id: String,
    },
    /// A delete removed a number of records other than exactly one.
    #[error("failed to delete entity={entity} id={id}")]
    DeleteFailed {
        /// The collection name.
        entity: String,
        /// The key value of the record to delete.
        id: String,
    },
    /// An error raised by the underlying storage backend, message verbatim.
    #[error("backend error: {0}")]
    Backend(String),
    /// A backend error rewritten through the store's error map.
    /// Displays exactly the replacement message.
    #[error("{0}")]
    Normalized(String),
}

/// A specialized `Result` type for entity store operations.
pub type EntityStoreResult<T> = Result<T, EntityStoreError>;

impl From<SerdeJsonError> for EntityStoreError {
    fn from(err: SerdeJsonError) -> Self {
        EntityStoreError::Serialization(err.to_string())
    }
}
