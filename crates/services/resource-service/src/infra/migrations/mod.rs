//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_resource_tables;
mod m20240102_000001_add_lookup_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_resource_tables::Migration),
            Box::new(m20240102_000001_add_lookup_indexes::Migration),
        ]
    }
}

/// Table and column identifiers shared by the migrations
#[derive(DeriveIden)]
pub(super) enum Users {
    Table,
    Id,
    StripeCustomerAccountId,
    StripeAccountId,
    StripeAccountVerified,
    StripeIdentityVerified,
    FirstName,
    LastName,
    Bio,
    #[sea_orm(iden = "icon_s3object_id")]
    IconS3objectId,
    Town,
    City,
    State,
    Zipcode,
    Country,
    Tags,
    Specialties,
    PersonVerified,
    EmailVerified,
    PhoneVerified,
}

#[derive(DeriveIden)]
pub(super) enum Tags {
    Table,
    Id,
    Name,
    Description,
}

#[derive(DeriveIden)]
pub(super) enum UserTags {
    Table,
    UserId,
    TagId,
}

#[derive(DeriveIden)]
pub(super) enum UserAuthProviders {
    Table,
    Details,
    UserId,
    ProviderName,
    ProviderId,
}

#[derive(DeriveIden)]
pub(super) enum S3objects {
    #[sea_orm(iden = "s3objects")]
    Table,
    ModelType,
    ModelId,
    Mimetype,
    IsPrivate,
    Region,
    Bucket,
    Key,
}

/// Columns every resource table carries
#[derive(DeriveIden)]
pub(super) enum Shared {
    Id,
    Metadata,
    CreateAt,
    UpdatedAt,
    DeletedAt,
}
