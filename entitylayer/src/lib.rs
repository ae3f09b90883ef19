//! Main entitylayer crate providing a unified interface for entity-keyed
//! document storage.
//!
//! This crate is the primary entry point for users of the entitylayer
//! project. It re-exports the core types from the sub-crates and provides
//! access to the storage backends.
//!
//! The layer is deliberately thin: it configures a connection, exposes
//! create/read/update/find/delete against named collections keyed by a
//! configurable field, and remaps driver error wording into an
//! application-chosen vocabulary. Everything else - pooling, topology,
//! transactions, indexes - belongs to the wrapped driver and server.
//!
//! # Quick Start
//!
//! ```ignore
//! use entitylayer::{memory::InMemoryStore, prelude::*};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = EntityStore::new(InMemoryStore::new());
//!
//!     let mut room = Record::new();
//!     room.insert("RoomNum".to_string(), Value::from("306"));
//!     room.insert("BedSize".to_string(), Value::from("Twin"));
//!
//!     store.create("rooms", "306", room).await?;
//!
//!     let found = store.read("rooms", "306").await?;
//!     assert_eq!(found.get("key"), Some(&Value::from("306")));
//!
//!     store.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Connecting to MongoDB
//!
//! With the `mongodb` feature enabled:
//!
//! ```ignore
//! use entitylayer::{mongodb::MongoDbStore, prelude::*};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConnectConfig::builder()
//!         .address("127.0.0.1:27017")
//!         .user("u")
//!         .password("p")
//!         .database("d")
//!         .auth_database("admin")
//!         .comm_timeout_ms(5000)
//!         .build()?;
//!
//!     let store = EntityStore::connect(MongoDbStore::builder(config))
//!         .await?
//!         .with_error_mapping("duplicate key", "already exists");
//!
//!     let rooms = store.read_all("rooms").await?;
//!     println!("{} rooms", rooms.len());
//!
//!     store.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires the `mongodb` feature)

pub mod prelude;

pub use entitylayer_core::{backend, config, error, normalize, store, value};

/// In-memory storage backend implementations.
pub mod memory {
    pub use entitylayer_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use entitylayer_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
