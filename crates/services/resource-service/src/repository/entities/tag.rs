use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{CreateTag, Tag, UpdateTag};

use crate::repository::record_entity::{apply_patch, shared_columns};
use crate::repository::RecordEntity;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub metadata: Option<Json>,
    pub create_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Tag {
    fn from(model: Model) -> Self {
        Tag {
            id: model.id,
            metadata: model.metadata,
            create_at: model.create_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
            name: model.name,
            description: model.description,
        }
    }
}

impl RecordEntity for Entity {
    type Active = ActiveModel;
    type Record = Tag;
    type Create = CreateTag;
    type Patch = UpdateTag;

    const LABEL: &'static str = "tag";

    shared_columns!();

    fn unique_columns() -> Vec<Column> {
        vec![Column::Name]
    }

    fn new_active(input: CreateTag) -> ActiveModel {
        ActiveModel {
            metadata: Set(input.metadata),
            name: Set(input.name),
            description: Set(input.description),
            ..Default::default()
        }
    }

    fn patch_active(patch: UpdateTag) -> ActiveModel {
        let mut active = <ActiveModel as ActiveModelTrait>::default();
        apply_patch!(active, patch, nullable: [metadata, description], plain: [name]);
        active
    }
}
