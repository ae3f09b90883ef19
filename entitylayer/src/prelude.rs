//! Convenient re-exports of commonly used types from entitylayer.
//!
//! Import this prelude module to quickly access the most frequently used
//! types and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use entitylayer::prelude::*;
//! ```

pub use entitylayer_core::{
    backend::{EntityBackend, EntityBackendBuilder},
    config::{ConnectConfig, ConnectConfigBuilder},
    error::{EntityStoreError, EntityStoreResult},
    normalize::ErrorMap,
    store::EntityStore,
    value::{DEFAULT_KEY_FIELD, INTERNAL_ID_FIELD, Record, Value},
};
