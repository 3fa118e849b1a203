//! Migration: Add soft delete, owner and natural key indexes.

use sea_orm_migration::prelude::*;

use super::{S3objects, Shared, Tags, UserAuthProviders, UserTags, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

struct IndexSpec {
    name: &'static str,
    table: DynIden,
    columns: Vec<DynIden>,
    unique: bool,
}

fn index(name: &'static str, table: impl IntoIden, columns: Vec<DynIden>) -> IndexSpec {
    IndexSpec {
        name,
        table: table.into_iden(),
        columns,
        unique: false,
    }
}

fn unique(name: &'static str, table: impl IntoIden, columns: Vec<DynIden>) -> IndexSpec {
    IndexSpec {
        unique: true,
        ..index(name, table, columns)
    }
}

fn indexes() -> Vec<IndexSpec> {
    let deleted_at = || vec![Shared::DeletedAt.into_iden()];

    vec![
        // default reads filter on deleted_at IS NULL
        index("idx_users_deleted_at", Users::Table, deleted_at()),
        index("idx_tags_deleted_at", Tags::Table, deleted_at()),
        index("idx_user_tags_deleted_at", UserTags::Table, deleted_at()),
        index(
            "idx_user_auth_providers_deleted_at",
            UserAuthProviders::Table,
            deleted_at(),
        ),
        index("idx_s3objects_deleted_at", S3objects::Table, deleted_at()),
        // natural keys used by upsert
        unique("uq_tags_name", Tags::Table, vec![Tags::Name.into_iden()]),
        unique(
            "uq_user_tags_user_id_tag_id",
            UserTags::Table,
            vec![UserTags::UserId.into_iden(), UserTags::TagId.into_iden()],
        ),
        unique(
            "uq_user_auth_providers_provider",
            UserAuthProviders::Table,
            vec![
                UserAuthProviders::ProviderName.into_iden(),
                UserAuthProviders::ProviderId.into_iden(),
            ],
        ),
        unique(
            "uq_s3objects_bucket_key",
            S3objects::Table,
            vec![S3objects::Bucket.into_iden(), S3objects::Key.into_iden()],
        ),
        // owner-scoped listings
        index(
            "idx_user_auth_providers_user_id",
            UserAuthProviders::Table,
            vec![UserAuthProviders::UserId.into_iden()],
        ),
        index(
            "idx_s3objects_owner",
            S3objects::Table,
            vec![S3objects::ModelType.into_iden(), S3objects::ModelId.into_iden()],
        ),
    ]
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for spec in indexes() {
            let mut statement = Index::create();
            statement.name(spec.name).table(spec.table);
            for column in spec.columns {
                statement.col(column);
            }
            if spec.unique {
                statement.unique();
            }
            manager.create_index(statement).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for spec in indexes().into_iter().rev() {
            manager
                .drop_index(Index::drop().name(spec.name).table(spec.table).to_owned())
                .await?;
        }
        Ok(())
    }
}
