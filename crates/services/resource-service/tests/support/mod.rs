//! Shared fixtures: a migrated in-memory SQLite database and object stores.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;

use common::{AppError, AppResult, DatabaseConfig, ObjectStoreConfig};
use resource_service_lib::infra::Database;
use resource_service_lib::storage::{InMemoryObjectStore, ObjectStore, StoredObject, Uploader};
use resource_service_lib::unit_of_work::Persistence;

pub const BUCKET: &str = "test-uploads";

/// Fresh migrated database; one connection so every query sees the same
/// in-memory schema
pub async fn persistence() -> Persistence {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let db = Database::connect(&config)
        .await
        .expect("in-memory database");
    Persistence::new(db.get_connection())
}

pub fn store_config() -> ObjectStoreConfig {
    ObjectStoreConfig {
        region: "us-east-1".to_string(),
        bucket: BUCKET.to_string(),
        endpoint: None,
        serve_origin: "http://cdn.test".to_string(),
    }
}

/// In-memory store that fails uploads whose key contains `fail_marker` and,
/// optionally, every delete.
pub struct FlakyStore {
    pub inner: InMemoryObjectStore,
    fail_marker: String,
    fail_deletes: bool,
}

impl FlakyStore {
    pub fn new(fail_marker: &str) -> Self {
        Self {
            inner: InMemoryObjectStore::with_bucket(BUCKET),
            fail_marker: fail_marker.to_string(),
            fail_deletes: false,
        }
    }

    pub fn failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }
}

#[async_trait]
impl ObjectStore for FlakyStore {
    async fn create_bucket(&self, bucket: &str) -> AppResult<()> {
        self.inner.create_bucket(bucket).await
    }

    async fn delete_bucket(&self, bucket: &str) -> AppResult<()> {
        self.inner.delete_bucket(bucket).await
    }

    async fn bucket_exists(&self, bucket: &str) -> AppResult<bool> {
        self.inner.bucket_exists(bucket).await
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> AppResult<()> {
        if key.contains(&self.fail_marker) {
            return Err(AppError::object_store(format!("put_object failed for {key}")));
        }
        self.inner.put_object(bucket, key, body, content_type).await
    }

    async fn get_object(&self, bucket: &str, key: &str) -> AppResult<Option<StoredObject>> {
        self.inner.get_object(bucket, key).await
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> AppResult<()> {
        if self.fail_deletes {
            return Err(AppError::object_store("delete_object unavailable"));
        }
        self.inner.delete_object(bucket, key).await
    }
}

pub fn uploader(store: Arc<dyn ObjectStore>) -> Uploader {
    Uploader::new(store, store_config())
}
