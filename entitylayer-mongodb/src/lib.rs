//! MongoDB backend implementation for entitylayer.
//!
//! This crate provides a MongoDB-based implementation of the `EntityBackend`
//! trait, giving the entity store persistent storage over the official async
//! driver.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! entitylayer = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Connection
//!
//! The backend builder takes a validated
//! [`ConnectConfig`](entitylayer_core::config::ConnectConfig) and derives the
//! connection URI, operation timeout, and connect timeout from it. A ping
//! verifies reachability during construction; on failure the builder returns
//! an initialization error and nothing is retried.
//!
//! # Example
//!
//! ```ignore
//! use entitylayer_core::{config::ConnectConfig, store::EntityStore};
//! use entitylayer_mongodb::MongoDbStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConnectConfig::builder()
//!         .address("127.0.0.1:27017")
//!         .user("u")
//!         .password("p")
//!         .database("d")
//!         .build()?;
//!
//!     let store = EntityStore::connect(MongoDbStore::builder(config)).await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as entitylayer_mongodb;

pub mod convert;
pub mod store;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
