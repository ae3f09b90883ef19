//! A thin entity-keyed access layer over document databases.
//!
//! This crate is the core of the entitylayer project and provides:
//!
//! - **Value model** ([`value`]) - Generic records and field values, free of driver wrapper types
//! - **Connection configuration** ([`config`]) - Validated, immutable connection settings
//! - **Backend abstraction** ([`backend`]) - Traits for implementing storage backends
//! - **Entity store** ([`store`]) - The five operations: create, read, find, read-all, update, delete
//! - **Error normalization** ([`normalize`]) - Remapping driver error wording to an application vocabulary
//! - **Error handling** ([`error`]) - Error taxonomy and result types
//!
//! # Example
//!
//! ```ignore
//! use entitylayer_core::{
//!     config::ConnectConfig,
//!     store::EntityStore,
//!     value::{Record, Value},
//! };
//!
//! let config = ConnectConfig::builder()
//!     .address("127.0.0.1:27017")
//!     .user("u")
//!     .password("p")
//!     .database("d")
//!     .build()?;
//!
//! let store = EntityStore::connect(backend_builder_for(config)).await?;
//!
//! let mut room = Record::new();
//! room.insert("RoomNum".to_string(), Value::from("306"));
//! room.insert("BedSize".to_string(), Value::from("Twin"));
//! store.create("rooms", "306", room).await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as entitylayer_core;

pub mod backend;
pub mod config;
pub mod error;
pub mod normalize;
pub mod store;
pub mod value;
