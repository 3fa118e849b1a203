use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;

use common::{AppError, AppResult, ObjectStoreConfig};

use super::{ObjectStore, StoredObject};

/// Object store backed by S3 or an S3-compatible endpoint.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    region: String,
}

impl S3ObjectStore {
    /// Build a client from the ambient AWS environment, overriding the
    /// region and, for local emulators, the endpoint.
    pub async fn from_config(config: &ObjectStoreConfig) -> Self {
        let shared = aws_config::from_env()
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
            region: config.region.clone(),
        }
    }
}

fn store_error(action: &str, err: impl std::error::Error) -> AppError {
    AppError::object_store(format!("{action} failed: {}", DisplayErrorContext(err)))
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn create_bucket(&self, bucket: &str) -> AppResult<()> {
        let mut request = self.client.create_bucket().bucket(bucket);

        // us-east-1 rejects an explicit location constraint
        if self.region != "us-east-1" {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }

        request
            .send()
            .await
            .map_err(|e| store_error("create_bucket", e))?;
        tracing::info!(bucket, region = %self.region, "Bucket created");
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> AppResult<()> {
        self.client
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| store_error("delete_bucket", e))?;
        tracing::info!(bucket, "Bucket deleted");
        Ok(())
    }

    async fn bucket_exists(&self, bucket: &str) -> AppResult<bool> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(false),
            Err(e) => Err(store_error("head_bucket", e)),
        }
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> AppResult<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| store_error("put_object", e))?;
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> AppResult<Option<StoredObject>> {
        let output = match self.client.get_object().bucket(bucket).key(key).send().await {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => {
                return Ok(None)
            }
            Err(e) => return Err(store_error("get_object", e)),
        };

        let content_type = output.content_type().map(str::to_string);
        let body = output
            .body
            .collect()
            .await
            .map_err(|e| store_error("get_object body", e))?
            .into_bytes()
            .to_vec();

        Ok(Some(StoredObject { body, content_type }))
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| store_error("delete_object", e))?;
        Ok(())
    }
}
