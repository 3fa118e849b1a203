//! Binding between a sea-orm entity and its plain domain record.

use sea_orm::{ActiveModelBehavior, ActiveModelTrait, EntityTrait};

use domain::{Record, Validate};

/// A table the generic repository can serve.
///
/// Implementors name the columns every table shares and say how create and
/// patch inputs map onto an active model. Timestamps are filled in by the
/// repository, so `new_active` and `patch_active` leave them unset.
pub trait RecordEntity: EntityTrait {
    type Active: ActiveModelTrait<Entity = Self> + ActiveModelBehavior + Send + 'static;
    type Record: From<<Self as EntityTrait>::Model> + Record + Clone + Send + Sync + 'static;
    type Create: Validate + Send + Sync + 'static;
    type Patch: Send + Sync + 'static;

    /// Name used in logs and error messages
    const LABEL: &'static str;

    fn id_column() -> Self::Column;
    fn create_at_column() -> Self::Column;
    fn updated_at_column() -> Self::Column;
    fn deleted_at_column() -> Self::Column;

    /// Columns forming the natural key used by upsert. Empty means every
    /// upsert inserts.
    fn unique_columns() -> Vec<Self::Column> {
        Vec::new()
    }

    fn new_active(input: Self::Create) -> Self::Active;
    fn patch_active(patch: Self::Patch) -> Self::Active;
}

/// Implements the shared-column accessors of [`RecordEntity`] for an entity
/// module whose columns follow the common naming.
macro_rules! shared_columns {
    () => {
        fn id_column() -> Column {
            Column::Id
        }
        fn create_at_column() -> Column {
            Column::CreateAt
        }
        fn updated_at_column() -> Column {
            Column::UpdatedAt
        }
        fn deleted_at_column() -> Column {
            Column::DeletedAt
        }
    };
}

/// Copies the `Some` fields of a patch onto an active model.
///
/// `nullable` fields are `Option` columns, `plain` fields are `NOT NULL`.
macro_rules! apply_patch {
    ($active:ident, $patch:ident, nullable: [$($n:ident),* $(,)?], plain: [$($p:ident),* $(,)?]) => {
        $(
            if let Some(value) = $patch.$n {
                $active.$n = sea_orm::Set(Some(value));
            }
        )*
        $(
            if let Some(value) = $patch.$p {
                $active.$p = sea_orm::Set(value);
            }
        )*
    };
}

pub(crate) use apply_patch;
pub(crate) use shared_columns;
