//! Attachment rows: owner discriminator plus object-store locator.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{CreateS3Object, S3Object, UpdateS3Object};

use crate::repository::record_entity::{apply_patch, shared_columns};
use crate::repository::RecordEntity;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "s3objects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub metadata: Option<Json>,
    pub create_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub model_type: String,
    pub model_id: i32,
    pub mimetype: String,
    pub is_private: bool,
    pub region: String,
    pub bucket: String,
    pub key: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for S3Object {
    fn from(model: Model) -> Self {
        S3Object {
            id: model.id,
            metadata: model.metadata,
            create_at: model.create_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
            model_type: model.model_type,
            model_id: model.model_id,
            mimetype: model.mimetype,
            is_private: model.is_private,
            region: model.region,
            bucket: model.bucket,
            key: model.key,
        }
    }
}

impl RecordEntity for Entity {
    type Active = ActiveModel;
    type Record = S3Object;
    type Create = CreateS3Object;
    type Patch = UpdateS3Object;

    const LABEL: &'static str = "s3_object";

    shared_columns!();

    fn unique_columns() -> Vec<Column> {
        vec![Column::Bucket, Column::Key]
    }

    fn new_active(input: CreateS3Object) -> ActiveModel {
        ActiveModel {
            metadata: Set(input.metadata),
            model_type: Set(input.model_type.as_str().to_string()),
            model_id: Set(input.model_id),
            mimetype: Set(input.mimetype),
            is_private: Set(input.is_private),
            region: Set(input.region),
            bucket: Set(input.bucket),
            key: Set(input.key),
            ..Default::default()
        }
    }

    fn patch_active(patch: UpdateS3Object) -> ActiveModel {
        let mut active = <ActiveModel as ActiveModelTrait>::default();
        apply_patch!(active, patch, nullable: [metadata], plain: [mimetype, is_private]);
        active
    }
}
