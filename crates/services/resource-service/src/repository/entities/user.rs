//! User database entity for SeaORM.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{CreateUser, UpdateUser, User};

use crate::repository::record_entity::{apply_patch, shared_columns};
use crate::repository::RecordEntity;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub metadata: Option<Json>,
    pub create_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft delete timestamp (NULL = active, set = deleted)
    pub deleted_at: Option<DateTime<Utc>>,
    pub stripe_customer_account_id: Option<String>,
    pub stripe_account_id: Option<String>,
    pub stripe_account_verified: bool,
    pub stripe_identity_verified: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub icon_s3object_id: Option<i32>,
    pub town: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<i32>,
    pub country: Option<String>,
    pub tags: Option<String>,
    pub specialties: Option<String>,
    pub person_verified: bool,
    pub email_verified: bool,
    pub phone_verified: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain record
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            metadata: model.metadata,
            create_at: model.create_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
            stripe_customer_account_id: model.stripe_customer_account_id,
            stripe_account_id: model.stripe_account_id,
            stripe_account_verified: model.stripe_account_verified,
            stripe_identity_verified: model.stripe_identity_verified,
            first_name: model.first_name,
            last_name: model.last_name,
            bio: model.bio,
            icon_s3object_id: model.icon_s3object_id,
            town: model.town,
            city: model.city,
            state: model.state,
            zipcode: model.zipcode,
            country: model.country,
            tags: model.tags,
            specialties: model.specialties,
            person_verified: model.person_verified,
            email_verified: model.email_verified,
            phone_verified: model.phone_verified,
        }
    }
}

impl RecordEntity for Entity {
    type Active = ActiveModel;
    type Record = User;
    type Create = CreateUser;
    type Patch = UpdateUser;

    const LABEL: &'static str = "user";

    shared_columns!();

    fn new_active(input: CreateUser) -> ActiveModel {
        ActiveModel {
            metadata: Set(input.metadata),
            stripe_customer_account_id: Set(input.stripe_customer_account_id),
            stripe_account_id: Set(input.stripe_account_id),
            stripe_account_verified: Set(false),
            stripe_identity_verified: Set(false),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            bio: Set(input.bio),
            icon_s3object_id: Set(input.icon_s3object_id),
            town: Set(input.town),
            city: Set(input.city),
            state: Set(input.state),
            zipcode: Set(input.zipcode),
            country: Set(input.country),
            tags: Set(input.tags),
            specialties: Set(input.specialties),
            person_verified: Set(false),
            email_verified: Set(false),
            phone_verified: Set(false),
            ..Default::default()
        }
    }

    fn patch_active(patch: UpdateUser) -> ActiveModel {
        let mut active = <ActiveModel as ActiveModelTrait>::default();
        apply_patch!(
            active,
            patch,
            nullable: [
                metadata,
                stripe_customer_account_id,
                stripe_account_id,
                first_name,
                last_name,
                bio,
                icon_s3object_id,
                town,
                city,
                state,
                zipcode,
                country,
                tags,
                specialties,
            ],
            plain: [
                stripe_account_verified,
                stripe_identity_verified,
                person_verified,
                email_verified,
                phone_verified,
            ]
        );
        active
    }
}
