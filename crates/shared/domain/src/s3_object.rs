//! Attachment record: a stored object owned by exactly one parent record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::OBJECT_ID_SEPARATOR;
use crate::error::{DomainError, DomainResult};
use crate::patterns::{check_required, MIME_TYPE};
use crate::record::{ModelType, Validate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct S3Object {
    pub id: i32,
    pub metadata: Option<serde_json::Value>,
    pub create_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Owner discriminator (`ModelType` as text)
    pub model_type: String,
    /// Owner id
    pub model_id: i32,
    pub mimetype: String,
    pub is_private: bool,
    pub region: String,
    pub bucket: String,
    pub key: String,
}

impl S3Object {
    /// Parsed owner discriminator, if it is a known model type
    pub fn owner_type(&self) -> Option<ModelType> {
        self.model_type.parse().ok()
    }

    /// Composite `bucket|key` id
    pub fn object_id(&self) -> String {
        format!("{}{}{}", self.bucket, OBJECT_ID_SEPARATOR, self.key)
    }

    /// Public link for the object under the given serve origin
    pub fn public_url(&self, serve_origin: &str) -> String {
        format!("{}/{}", serve_origin.trim_end_matches('/'), self.key)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateS3Object {
    pub metadata: Option<serde_json::Value>,
    pub model_type: ModelType,
    pub model_id: i32,
    pub mimetype: String,
    pub is_private: bool,
    pub region: String,
    pub bucket: String,
    pub key: String,
}

impl Validate for CreateS3Object {
    fn validate(&self) -> DomainResult<()> {
        if self.model_id <= 0 {
            return Err(DomainError::invalid_field("model_id", "must be positive"));
        }
        check_required("mimetype", &self.mimetype, &MIME_TYPE)?;
        if self.bucket.trim().is_empty() {
            return Err(DomainError::invalid_field("bucket", "is required"));
        }
        if self.key.trim().is_empty() {
            return Err(DomainError::invalid_field("key", "is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateS3Object {
    pub metadata: Option<serde_json::Value>,
    pub mimetype: Option<String>,
    pub is_private: Option<bool>,
}
