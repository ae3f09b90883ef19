//! In-memory entity storage backend for entitylayer.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `EntityBackend` trait. It uses async-aware read-write locks for concurrent
//! access and is intended for development and testing, where it stands in for
//! the MongoDB backend without a running server.
//!
//! # Quick Start
//!
//! ```ignore
//! use entitylayer_core::{store::EntityStore, value::{Record, Value}};
//! use entitylayer_memory::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = EntityStore::new(InMemoryStore::new());
//!
//!     let mut room = Record::new();
//!     room.insert("RoomNum".to_string(), Value::from("306"));
//!     store.create("rooms", "306", room).await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as entitylayer_memory;

pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
