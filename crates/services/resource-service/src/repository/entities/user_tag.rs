use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{CreateUserTag, UpdateUserTag, UserTag};

use crate::repository::record_entity::{apply_patch, shared_columns};
use crate::repository::RecordEntity;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub metadata: Option<Json>,
    pub create_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub user_id: i32,
    pub tag_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for UserTag {
    fn from(model: Model) -> Self {
        UserTag {
            id: model.id,
            metadata: model.metadata,
            create_at: model.create_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
            user_id: model.user_id,
            tag_id: model.tag_id,
        }
    }
}

impl RecordEntity for Entity {
    type Active = ActiveModel;
    type Record = UserTag;
    type Create = CreateUserTag;
    type Patch = UpdateUserTag;

    const LABEL: &'static str = "user_tag";

    shared_columns!();

    fn unique_columns() -> Vec<Column> {
        vec![Column::UserId, Column::TagId]
    }

    fn new_active(input: CreateUserTag) -> ActiveModel {
        ActiveModel {
            metadata: Set(input.metadata),
            user_id: Set(input.user_id),
            tag_id: Set(input.tag_id),
            ..Default::default()
        }
    }

    fn patch_active(patch: UpdateUserTag) -> ActiveModel {
        let mut active = <ActiveModel as ActiveModelTrait>::default();
        apply_patch!(active, patch, nullable: [metadata], plain: [user_id, tag_id]);
        active
    }
}
