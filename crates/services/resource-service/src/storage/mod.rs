//! Object-store access: the store contract, its adapters and the uploader
//! that turns attachments into locators.

mod memory;
mod s3;
mod uploader;

pub use memory::InMemoryObjectStore;
pub use s3::S3ObjectStore;
pub use uploader::{Attachment, S3Locator, Uploader};

use async_trait::async_trait;

use common::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Object fetched back from a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

/// S3-style object store.
///
/// Implementations must be safe to share between concurrent sagas. None of
/// the calls take part in a database transaction.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn create_bucket(&self, bucket: &str) -> AppResult<()>;

    /// Delete an empty bucket
    async fn delete_bucket(&self, bucket: &str) -> AppResult<()>;

    async fn bucket_exists(&self, bucket: &str) -> AppResult<bool>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> AppResult<()>;

    /// Fetch an object; `None` if the key does not exist
    async fn get_object(&self, bucket: &str, key: &str) -> AppResult<Option<StoredObject>>;

    /// Delete an object. Deleting a missing key succeeds.
    async fn delete_object(&self, bucket: &str, key: &str) -> AppResult<()>;
}
