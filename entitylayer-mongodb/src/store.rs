//! MongoDB implementation of the entity backend.

use async_trait::async_trait;
use bson::{Document, doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{
    Client, Collection as MongoCollection,
    options::{ClientOptions, Collation, CollationStrength, FindOneOptions},
};
use tracing::debug;

use entitylayer_core::{
    backend::{EntityBackend, EntityBackendBuilder},
    config::ConnectConfig,
    error::{EntityStoreError, EntityStoreResult},
    value::{INTERNAL_ID_FIELD, Record, Value},
};

use crate::convert;

/// Entity backend over a MongoDB deployment.
///
/// Holds the single shared [`Client`] for the process; the driver manages its
/// own connection pool and is safe for concurrent use, so this type adds no
/// locking. Every backend operation is one round trip bounded by the
/// configured timeouts.
#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    /// Creates a store over an existing client, bound to a database.
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    /// Creates a builder that connects using a validated configuration.
    pub fn builder(config: ConnectConfig) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(config)
    }

    fn get_collection(&self, entity: &str) -> MongoCollection<Document> {
        self.client.database(&self.database).collection(entity)
    }
}

fn backend_error(err: mongodb::error::Error) -> EntityStoreError {
    EntityStoreError::Backend(err.to_string())
}

/// Builds the filter document for an update.
///
/// Stored internal identifiers are `ObjectId`-typed, but callers only ever
/// hold the converted canonical hex string, so an internal-id filter has to
/// be parsed back into an `ObjectId` before it can match. Non-hex ids pass
/// through as strings.
fn update_filter(filter_field: &str, filter_value: &Value) -> Document {
    if filter_field == INTERNAL_ID_FIELD {
        if let Some(hex) = filter_value.as_str() {
            if let Ok(oid) = ObjectId::parse_str(hex) {
                return doc! { filter_field: oid };
            }
        }
    }

    doc! { filter_field: convert::from_value(filter_value) }
}

#[async_trait]
impl EntityBackend for MongoDbStore {
    async fn insert_record(
        &self,
        entity: &str,
        _key_field: &str,
        record: Record,
    ) -> EntityStoreResult<Value> {
        let result = self
            .get_collection(entity)
            .insert_one(convert::from_record(&record))
            .await
            .map_err(backend_error)?;

        Ok(convert::to_value(&result.inserted_id))
    }

    async fn find_by_key(
        &self,
        entity: &str,
        key_field: &str,
        key: &str,
    ) -> EntityStoreResult<Option<Record>> {
        let mut options = FindOneOptions::default();
        options.sort = Some(doc! { key_field: 1 });

        Ok(self
            .get_collection(entity)
            .find_one(doc! { key_field: key })
            .with_options(options)
            .await
            .map_err(backend_error)?
            .map(|document| convert::to_record(&document)))
    }

    async fn find_records(
        &self,
        entity: &str,
        filter: Option<(&str, &str)>,
    ) -> EntityStoreResult<Vec<Record>> {
        let filter = match filter {
            Some((field, value)) => doc! { field: value },
            None => doc! {},
        };

        Ok(self
            .get_collection(entity)
            .find(filter)
            .await
            .map_err(backend_error)?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(backend_error)?
            .iter()
            .map(convert::to_record)
            .collect())
    }

    async fn merge_record(
        &self,
        entity: &str,
        filter_field: &str,
        filter_value: &Value,
        record: Record,
    ) -> EntityStoreResult<u64> {
        let result = self
            .get_collection(entity)
            .update_one(
                update_filter(filter_field, filter_value),
                doc! { "$set": convert::from_record(&record) },
            )
            .upsert(false)
            .await
            .map_err(backend_error)?;

        Ok(result.matched_count)
    }

    async fn delete_by_key(
        &self,
        entity: &str,
        key_field: &str,
        key: &str,
    ) -> EntityStoreResult<u64> {
        let collation = Collation::builder()
            .locale("en_US")
            .strength(CollationStrength::Primary)
            .case_level(false)
            .build();

        let result = self
            .get_collection(entity)
            .delete_one(doc! { key_field: key })
            .collation(collation)
            .await
            .map_err(backend_error)?;

        Ok(result.deleted_count)
    }

    async fn shutdown(self) -> EntityStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

/// Builder that establishes a [`MongoDbStore`] from a [`ConnectConfig`].
pub struct MongoDbStoreBuilder {
    config: ConnectConfig,
}

impl MongoDbStoreBuilder {
    /// Wraps a validated configuration for connection.
    pub fn new(config: ConnectConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl EntityBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> EntityStoreResult<Self::Backend> {
        let uri = self.config.connection_uri("mongodb");

        let mut options = ClientOptions::parse(&uri)
            .await
            .map_err(|e| EntityStoreError::Initialization(e.to_string()))?;
        options.connect_timeout = Some(self.config.connect_timeout());
        options.server_selection_timeout = Some(self.config.comm_timeout());

        let client = Client::with_options(options)
            .map_err(|e| EntityStoreError::Initialization(e.to_string()))?;

        // The driver connects lazily; ping so an unreachable or
        // unauthenticated deployment fails here, within the connect timeout,
        // instead of on the first operation.
        client
            .database(self.config.database())
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| EntityStoreError::Initialization(e.to_string()))?;

        debug!(database = self.config.database(), "mongodb connection established");

        Ok(MongoDbStore::new(
            client,
            self.config.database().to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::Bson;

    #[test]
    fn internal_id_filter_parses_hex_back_into_object_id() {
        let oid = ObjectId::new();
        let filter = update_filter(INTERNAL_ID_FIELD, &Value::from(oid.to_hex()));
        assert_eq!(filter.get(INTERNAL_ID_FIELD), Some(&Bson::ObjectId(oid)));
    }

    #[test]
    fn non_hex_internal_id_stays_a_string() {
        let filter = update_filter(
            INTERNAL_ID_FIELD,
            &Value::from("0a1b2c3d-0000-4000-8000-000000000000"),
        );
        assert_eq!(
            filter.get(INTERNAL_ID_FIELD),
            Some(&Bson::String("0a1b2c3d-0000-4000-8000-000000000000".into()))
        );
    }

    #[test]
    fn key_field_filters_pass_through_unconverted() {
        // A key value that happens to look like an object id is still a key.
        let filter = update_filter("key", &Value::from("68af00000000000000000000"));
        assert_eq!(
            filter.get("key"),
            Some(&Bson::String("68af00000000000000000000".into()))
        );
    }
}
