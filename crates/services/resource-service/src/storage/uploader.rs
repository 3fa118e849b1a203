//! Attachment uploads and the locators derived from them.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use common::{AppError, AppResult, ObjectStoreConfig};
use domain::constants::{OBJECT_ID_SEPARATOR, UPLOAD_KEY_PREFIX};
use domain::patterns::MIME_TYPE;
use domain::{CreateS3Object, ModelType};

use super::ObjectStore;

/// Binary payload to upload alongside an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub mimetype: String,
    pub body: Vec<u8>,
    pub is_private: bool,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, mimetype: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mimetype: mimetype.into(),
            body,
            is_private: false,
        }
    }

    pub fn private(mut self) -> Self {
        self.is_private = true;
        self
    }
}

/// Where an uploaded object lives and how it is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Locator {
    pub region: String,
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub is_private: bool,
    /// `<serve-origin>/<key>`
    pub link: String,
    /// Composite `<bucket>|<key>` id
    pub id: String,
}

impl S3Locator {
    fn new(config: &ObjectStoreConfig, key: String, content_type: String, is_private: bool) -> Self {
        let link = format!("{}/{}", config.serve_origin.trim_end_matches('/'), key);
        let id = format!("{}{}{}", config.bucket, OBJECT_ID_SEPARATOR, key);
        Self {
            region: config.region.clone(),
            bucket: config.bucket.clone(),
            key,
            content_type,
            is_private,
            link,
            id,
        }
    }

    /// Split a composite id into `(bucket, key)`.
    ///
    /// Bucket names cannot contain the separator, so everything after the
    /// first one belongs to the key.
    pub fn parse_id(id: &str) -> Option<(&str, &str)> {
        let (bucket, key) = id.split_once(OBJECT_ID_SEPARATOR)?;
        if bucket.is_empty() || key.is_empty() {
            return None;
        }
        Some((bucket, key))
    }

    /// Attachment row recording this object for an owner
    pub fn to_record_input(&self, model_type: ModelType, model_id: i32) -> CreateS3Object {
        CreateS3Object {
            metadata: None,
            model_type,
            model_id,
            mimetype: self.content_type.clone(),
            is_private: self.is_private,
            region: self.region.clone(),
            bucket: self.bucket.clone(),
            key: self.key.clone(),
        }
    }
}

/// Key for a new upload:
/// `public/static/uploads/<mimetype>/<uuid>.<epoch millis>.<filename>`
fn upload_key(mimetype: &str, filename: &str) -> String {
    format!(
        "{}/{}/{}.{}.{}",
        UPLOAD_KEY_PREFIX,
        mimetype.to_lowercase(),
        Uuid::new_v4(),
        Utc::now().timestamp_millis(),
        filename
    )
}

/// Uploads attachments into the configured bucket.
#[derive(Clone)]
pub struct Uploader {
    store: Arc<dyn ObjectStore>,
    config: ObjectStoreConfig,
}

impl Uploader {
    pub fn new(store: Arc<dyn ObjectStore>, config: ObjectStoreConfig) -> Self {
        Self { store, config }
    }

    /// Upload one attachment and return its locator
    pub async fn upload(&self, attachment: Attachment) -> AppResult<S3Locator> {
        let Attachment {
            filename,
            mimetype,
            body,
            is_private,
        } = attachment;

        if body.is_empty() {
            return Err(AppError::validation(format!("attachment '{filename}' is empty")));
        }
        let filename = filename.trim();
        if filename.is_empty() || filename.contains('/') {
            return Err(AppError::validation("attachment filename is missing or has a path"));
        }
        if !MIME_TYPE.is_match(&mimetype) {
            return Err(AppError::validation(format!("unsupported mimetype '{mimetype}'")));
        }

        let key = upload_key(&mimetype, filename);
        let size = body.len();
        self.store
            .put_object(&self.config.bucket, &key, body, &mimetype)
            .await?;

        tracing::info!(bucket = %self.config.bucket, key = %key, size, "Attachment uploaded");
        Ok(S3Locator::new(&self.config, key, mimetype, is_private))
    }

    /// Delete an uploaded object
    pub async fn remove(&self, locator: &S3Locator) -> AppResult<()> {
        self.store
            .delete_object(&locator.bucket, &locator.key)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{InMemoryObjectStore, MockObjectStore};

    fn config() -> ObjectStoreConfig {
        ObjectStoreConfig {
            region: "eu-west-3".into(),
            bucket: "media".into(),
            endpoint: None,
            serve_origin: "https://cdn.example.com/".into(),
        }
    }

    #[tokio::test]
    async fn upload_derives_key_link_and_id() {
        let store = Arc::new(InMemoryObjectStore::with_bucket("media"));
        let uploader = Uploader::new(store.clone(), config());

        let locator = uploader
            .upload(Attachment::new("avatar.png", "Image/PNG", vec![1, 2, 3]))
            .await
            .unwrap();

        assert!(locator.key.starts_with("public/static/uploads/image/png/"));
        assert!(locator.key.ends_with(".avatar.png"));
        // <uuid>.<millis>.<filename>
        let name = locator.key.rsplit('/').next().unwrap();
        let parts: Vec<&str> = name.splitn(3, '.').collect();
        assert!(Uuid::parse_str(parts[0]).is_ok());
        assert!(parts[1].parse::<i64>().is_ok());

        assert_eq!(locator.link, format!("https://cdn.example.com/{}", locator.key));
        assert_eq!(locator.id, format!("media|{}", locator.key));
        assert_eq!(locator.region, "eu-west-3");
        assert_eq!(locator.content_type, "Image/PNG");
        assert_eq!(store.keys("media").await, vec![locator.key.clone()]);
    }

    #[tokio::test]
    async fn rejects_empty_body_without_touching_the_store() {
        let mut store = MockObjectStore::new();
        store.expect_put_object().never();
        let uploader = Uploader::new(Arc::new(store), config());

        let err = uploader
            .upload(Attachment::new("empty.txt", "text/plain", Vec::new()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejects_bad_mimetype_and_filename() {
        let uploader = Uploader::new(Arc::new(InMemoryObjectStore::with_bucket("media")), config());

        let bad_mime = uploader
            .upload(Attachment::new("a.bin", "not a mime", vec![1]))
            .await;
        assert!(bad_mime.is_err());

        let bad_name = uploader
            .upload(Attachment::new("../etc/passwd", "text/plain", vec![1]))
            .await;
        assert!(bad_name.is_err());
    }

    #[test]
    fn parse_id_splits_on_first_separator() {
        assert_eq!(
            S3Locator::parse_id("media|public/a|b.png"),
            Some(("media", "public/a|b.png"))
        );
        assert_eq!(S3Locator::parse_id("media"), None);
        assert_eq!(S3Locator::parse_id("|key"), None);
        assert_eq!(S3Locator::parse_id("media|"), None);
    }

    #[test]
    fn locator_becomes_attachment_row_input() {
        let locator = S3Locator::new(&config(), "k".into(), "text/plain".into(), true);
        let input = locator.to_record_input(ModelType::User, 7);
        assert_eq!(input.model_type, ModelType::User);
        assert_eq!(input.model_id, 7);
        assert_eq!(input.bucket, "media");
        assert!(input.is_private);
    }
}
