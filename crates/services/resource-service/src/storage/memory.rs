use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use common::{AppError, AppResult};

use super::{ObjectStore, StoredObject};

type Bucket = HashMap<String, StoredObject>;

/// Process-local object store with S3 bucket semantics.
///
/// Buckets must exist before objects are written and can only be dropped
/// once empty.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    buckets: RwLock<HashMap<String, Bucket>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with one empty bucket already created
    pub fn with_bucket(bucket: &str) -> Self {
        let mut buckets = HashMap::new();
        buckets.insert(bucket.to_string(), Bucket::new());
        Self {
            buckets: RwLock::new(buckets),
        }
    }

    /// Sorted keys currently held in `bucket`
    pub async fn keys(&self, bucket: &str) -> Vec<String> {
        let buckets = self.buckets.read().await;
        let mut keys: Vec<String> = buckets
            .get(bucket)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

fn no_such_bucket(bucket: &str) -> AppError {
    AppError::object_store(format!("no such bucket '{bucket}'"))
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn create_bucket(&self, bucket: &str) -> AppResult<()> {
        let mut buckets = self.buckets.write().await;
        if buckets.contains_key(bucket) {
            return Err(AppError::object_store(format!("bucket '{bucket}' already exists")));
        }
        buckets.insert(bucket.to_string(), Bucket::new());
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> AppResult<()> {
        let mut buckets = self.buckets.write().await;
        match buckets.get(bucket) {
            None => Err(no_such_bucket(bucket)),
            Some(objects) if !objects.is_empty() => {
                Err(AppError::object_store(format!("bucket '{bucket}' is not empty")))
            }
            Some(_) => {
                buckets.remove(bucket);
                Ok(())
            }
        }
    }

    async fn bucket_exists(&self, bucket: &str) -> AppResult<bool> {
        Ok(self.buckets.read().await.contains_key(bucket))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> AppResult<()> {
        let mut buckets = self.buckets.write().await;
        let objects = buckets.get_mut(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        objects.insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: Some(content_type.to_string()),
            },
        );
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> AppResult<Option<StoredObject>> {
        let buckets = self.buckets.read().await;
        let objects = buckets.get(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        Ok(objects.get(key).cloned())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> AppResult<()> {
        let mut buckets = self.buckets.write().await;
        let objects = buckets.get_mut(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        objects.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bucket_lifecycle() {
        let store = InMemoryObjectStore::new();
        assert!(!store.bucket_exists("media").await.unwrap());

        store.create_bucket("media").await.unwrap();
        assert!(store.bucket_exists("media").await.unwrap());
        assert!(store.create_bucket("media").await.is_err());

        store
            .put_object("media", "a.txt", b"hello".to_vec(), "text/plain")
            .await
            .unwrap();
        assert!(store.delete_bucket("media").await.is_err());

        store.delete_object("media", "a.txt").await.unwrap();
        store.delete_bucket("media").await.unwrap();
        assert!(!store.bucket_exists("media").await.unwrap());
    }

    #[tokio::test]
    async fn objects_round_trip_with_content_type() {
        let store = InMemoryObjectStore::with_bucket("media");
        store
            .put_object("media", "k", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        let object = store.get_object("media", "k").await.unwrap().unwrap();
        assert_eq!(object.body, vec![1, 2, 3]);
        assert_eq!(object.content_type.as_deref(), Some("image/png"));
        assert_eq!(store.get_object("media", "missing").await.unwrap(), None);
        assert!(store.delete_object("media", "missing").await.is_ok());
    }

    #[tokio::test]
    async fn writes_to_missing_bucket_fail() {
        let store = InMemoryObjectStore::new();
        let err = store
            .put_object("nope", "k", vec![1], "text/plain")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "OBJECT_STORE_ERROR");
    }
}
