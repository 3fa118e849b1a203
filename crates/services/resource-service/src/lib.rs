//! Resource Service Library
//!
//! Persistence layer shared by every resource type: query translation,
//! the generic repository with keyset pagination and soft delete, object
//! storage and the create-with-attachments saga.

pub mod config;
pub mod infra;
pub mod query;
pub mod repository;
pub mod saga;
pub mod service;
pub mod storage;
pub mod unit_of_work;

use tracing::info;

use crate::config::ResourceServiceConfig;
use crate::infra::Database;
use crate::storage::{ObjectStore, S3ObjectStore};

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = ResourceServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Bucket provisioning action type.
#[derive(Debug, Clone, Copy)]
pub enum BucketAction {
    /// Create the upload bucket unless it exists
    Ensure,
    Check,
    /// Delete the upload bucket; it must be empty
    Drop,
}

/// Provision the configured upload bucket (for CLI commands).
pub async fn run_bucket_command(action: BucketAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = ResourceServiceConfig::from_env();
    let store = S3ObjectStore::from_config(&config.object_store).await;
    manage_bucket(&store, &config.object_store.bucket, action).await?;
    Ok(())
}

/// Apply a bucket action against any object store; returns whether the
/// bucket exists afterwards.
pub async fn manage_bucket(
    store: &dyn ObjectStore,
    bucket: &str,
    action: BucketAction,
) -> common::AppResult<bool> {
    match action {
        BucketAction::Ensure => {
            if store.bucket_exists(bucket).await? {
                info!(bucket, "Bucket already exists");
            } else {
                store.create_bucket(bucket).await?;
            }
            Ok(true)
        }
        BucketAction::Check => {
            let exists = store.bucket_exists(bucket).await?;
            println!("{} {}", if exists { "[x]" } else { "[ ]" }, bucket);
            Ok(exists)
        }
        BucketAction::Drop => {
            store.delete_bucket(bucket).await?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryObjectStore;

    #[tokio::test]
    async fn ensure_is_idempotent_and_drop_removes_bucket() {
        let store = InMemoryObjectStore::new();

        assert!(manage_bucket(&store, "uploads", BucketAction::Ensure).await.unwrap());
        assert!(manage_bucket(&store, "uploads", BucketAction::Ensure).await.unwrap());
        assert!(manage_bucket(&store, "uploads", BucketAction::Check).await.unwrap());

        assert!(!manage_bucket(&store, "uploads", BucketAction::Drop).await.unwrap());
        assert!(!manage_bucket(&store, "uploads", BucketAction::Check).await.unwrap());
    }
}
