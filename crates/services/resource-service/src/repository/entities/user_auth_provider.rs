use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{CreateUserAuthProvider, UpdateUserAuthProvider, UserAuthProvider};

use crate::repository::record_entity::{apply_patch, shared_columns};
use crate::repository::RecordEntity;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_auth_providers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub metadata: Option<Json>,
    pub create_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    /// Provider payload as returned at sign-in
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub details: Option<Json>,
    pub user_id: i32,
    pub provider_name: String,
    pub provider_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for UserAuthProvider {
    fn from(model: Model) -> Self {
        UserAuthProvider {
            id: model.id,
            metadata: model.metadata,
            create_at: model.create_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
            details: model.details,
            user_id: model.user_id,
            provider_name: model.provider_name,
            provider_id: model.provider_id,
        }
    }
}

impl RecordEntity for Entity {
    type Active = ActiveModel;
    type Record = UserAuthProvider;
    type Create = CreateUserAuthProvider;
    type Patch = UpdateUserAuthProvider;

    const LABEL: &'static str = "user_auth_provider";

    shared_columns!();

    fn unique_columns() -> Vec<Column> {
        vec![Column::ProviderName, Column::ProviderId]
    }

    fn new_active(input: CreateUserAuthProvider) -> ActiveModel {
        ActiveModel {
            metadata: Set(input.metadata),
            details: Set(input.details),
            user_id: Set(input.user_id),
            provider_name: Set(input.provider_name),
            provider_id: Set(input.provider_id),
            ..Default::default()
        }
    }

    fn patch_active(patch: UpdateUserAuthProvider) -> ActiveModel {
        let mut active = <ActiveModel as ActiveModelTrait>::default();
        apply_patch!(
            active,
            patch,
            nullable: [metadata, details],
            plain: [provider_name, provider_id]
        );
        active
    }
}
