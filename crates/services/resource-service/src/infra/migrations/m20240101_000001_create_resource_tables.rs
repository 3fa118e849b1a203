//! Migration: Create the resource tables.
//!
//! Every table gets `id, metadata, create_at, updated_at, deleted_at`
//! ahead of its own columns.

use sea_orm_migration::prelude::*;

use super::{S3objects, Shared, Tags, UserAuthProviders, UserTags, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Table with the shared columns already defined
fn resource_table<T: Iden + 'static>(table: T) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(
            ColumnDef::new(Shared::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Shared::Metadata).json_binary().null())
        .col(
            ColumnDef::new(Shared::CreateAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Shared::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Shared::DeletedAt)
                .timestamp_with_time_zone()
                .null(),
        )
        .to_owned()
}

fn flag<T: Iden + 'static>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .boolean()
        .not_null()
        .default(false)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                resource_table(Users::Table)
                    .col(ColumnDef::new(Users::StripeCustomerAccountId).string().null())
                    .col(ColumnDef::new(Users::StripeAccountId).string().null())
                    .col(flag(Users::StripeAccountVerified))
                    .col(flag(Users::StripeIdentityVerified))
                    .col(ColumnDef::new(Users::FirstName).string().null())
                    .col(ColumnDef::new(Users::LastName).string().null())
                    .col(ColumnDef::new(Users::Bio).text().null())
                    // no foreign key: attachments are created after their owner
                    .col(ColumnDef::new(Users::IconS3objectId).integer().null())
                    .col(ColumnDef::new(Users::Town).string().null())
                    .col(ColumnDef::new(Users::City).string().null())
                    .col(ColumnDef::new(Users::State).string().null())
                    .col(ColumnDef::new(Users::Zipcode).integer().null())
                    .col(ColumnDef::new(Users::Country).string().null())
                    .col(ColumnDef::new(Users::Tags).text().null())
                    .col(ColumnDef::new(Users::Specialties).text().null())
                    .col(flag(Users::PersonVerified))
                    .col(flag(Users::EmailVerified))
                    .col(flag(Users::PhoneVerified))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                resource_table(Tags::Table)
                    .col(ColumnDef::new(Tags::Name).string().not_null())
                    .col(ColumnDef::new(Tags::Description).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                resource_table(UserTags::Table)
                    .col(ColumnDef::new(UserTags::UserId).integer().not_null())
                    .col(ColumnDef::new(UserTags::TagId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_tags_user_id")
                            .from(UserTags::Table, UserTags::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_tags_tag_id")
                            .from(UserTags::Table, UserTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                resource_table(UserAuthProviders::Table)
                    .col(ColumnDef::new(UserAuthProviders::Details).json_binary().null())
                    .col(ColumnDef::new(UserAuthProviders::UserId).integer().not_null())
                    .col(ColumnDef::new(UserAuthProviders::ProviderName).string().not_null())
                    .col(ColumnDef::new(UserAuthProviders::ProviderId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_auth_providers_user_id")
                            .from(UserAuthProviders::Table, UserAuthProviders::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                resource_table(S3objects::Table)
                    .col(ColumnDef::new(S3objects::ModelType).string().not_null())
                    .col(ColumnDef::new(S3objects::ModelId).integer().not_null())
                    .col(ColumnDef::new(S3objects::Mimetype).string().not_null())
                    .col(flag(S3objects::IsPrivate))
                    .col(ColumnDef::new(S3objects::Region).string().not_null())
                    .col(ColumnDef::new(S3objects::Bucket).string().not_null())
                    .col(ColumnDef::new(S3objects::Key).text().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // dependents first
        manager
            .drop_table(Table::drop().table(S3objects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserAuthProviders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}
