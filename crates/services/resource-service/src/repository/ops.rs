//! Generic repository operations.
//!
//! Every function is generic over the connection so the same code serves a
//! pooled connection and an open transaction.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, EntityTrait, Order,
    QueryFilter, QueryOrder, QuerySelect, Value,
};

use common::{AppError, AppResult};
use domain::constants::{DEFAULT_RANDOM_LIMIT, MAX_SEARCH_LIMIT};
use domain::{Record, Validate};

use super::condition::{random_order, select, write_scope};
use super::{Destroyed, DestroyedOne, RecordEntity, Updated, UpdatedOne, Upserted};
use crate::query::Criteria;

fn to_record<E: RecordEntity>(model: E::Model) -> E::Record {
    E::Record::from(model)
}

fn cleared_deleted_at() -> Value {
    Value::ChronoDateTimeUtc(None)
}

/// Validate and insert; returns the row as stored.
pub(crate) async fn create<E, C>(db: &C, input: E::Create) -> AppResult<E::Record>
where
    E: RecordEntity,
    C: ConnectionTrait,
{
    input.validate()?;
    insert_active::<E, C>(db, E::new_active(input)).await
}

async fn insert_active<E, C>(db: &C, mut active: E::Active) -> AppResult<E::Record>
where
    E: RecordEntity,
    C: ConnectionTrait,
{
    let now = Utc::now();
    active.set(E::create_at_column(), now.into());
    active.set(E::updated_at_column(), now.into());

    let inserted = E::insert(active).exec(db).await?;

    E::find_by_id(inserted.last_insert_id)
        .one(db)
        .await?
        .map(to_record::<E>)
        .ok_or_else(|| AppError::internal(format!("{} row missing after insert", E::LABEL)))
}

pub(crate) async fn find_one<E, C>(db: &C, criteria: &Criteria) -> AppResult<Option<E::Record>>
where
    E: RecordEntity,
    C: ConnectionTrait,
{
    Ok(select::<E>(criteria).one(db).await?.map(to_record::<E>))
}

pub(crate) async fn find_by_id<E, C>(db: &C, id: i32) -> AppResult<Option<E::Record>>
where
    E: RecordEntity,
    C: ConnectionTrait,
{
    find_one::<E, C>(db, &Criteria::by_id(id)).await
}

pub(crate) async fn find_all<E, C>(db: &C, criteria: &Criteria) -> AppResult<Vec<E::Record>>
where
    E: RecordEntity,
    C: ConnectionTrait,
{
    let models = select::<E>(criteria).all(db).await?;
    Ok(models.into_iter().map(to_record::<E>).collect())
}

pub(crate) async fn count<E, C>(db: &C, criteria: &Criteria) -> AppResult<u64>
where
    E: RecordEntity,
    C: ConnectionTrait,
{
    // aggregate query: ordering and limit do not apply
    let unbounded = Criteria {
        order: Vec::new(),
        limit: None,
        ..criteria.clone()
    };

    let total = select::<E>(&unbounded)
        .select_only()
        .column_as(E::id_column().count(), "total")
        .into_tuple::<i64>()
        .one(db)
        .await?
        .unwrap_or(0);

    Ok(u64::try_from(total).unwrap_or(0))
}

/// Ids of the live rows matching the criteria
async fn live_ids<E, C>(db: &C, criteria: &Criteria) -> AppResult<Vec<i32>>
where
    E: RecordEntity,
    C: ConnectionTrait,
{
    let live = Criteria {
        include_deleted: false,
        ..criteria.clone()
    };

    Ok(select::<E>(&live)
        .select_only()
        .column(E::id_column())
        .into_tuple::<i32>()
        .all(db)
        .await?)
}

async fn find_by_ids<E, C>(db: &C, ids: Vec<i32>) -> AppResult<Vec<E::Record>>
where
    E: RecordEntity,
    C: ConnectionTrait,
{
    let models = E::find()
        .filter(E::id_column().is_in(ids))
        .order_by(E::id_column(), Order::Asc)
        .all(db)
        .await?;
    Ok(models.into_iter().map(to_record::<E>).collect())
}

/// Patch every live row matching `criteria`, then re-read those rows by id.
///
/// Every filter must apply to the table; see [`write_scope`].
pub(crate) async fn update<E, C>(
    db: &C,
    patch: E::Patch,
    criteria: &Criteria,
) -> AppResult<Updated<E::Record>>
where
    E: RecordEntity,
    C: ConnectionTrait,
{
    write_scope::<E>(&criteria.filters)?;
    let ids = live_ids::<E, C>(db, criteria).await?;
    if ids.is_empty() {
        return Ok(Updated {
            rows: 0,
            entities: Vec::new(),
        });
    }

    let mut active = E::patch_active(patch);
    active.set(E::updated_at_column(), Utc::now().into());

    let result = E::update_many()
        .set(active)
        .filter(E::id_column().is_in(ids.clone()))
        .exec(db)
        .await?;

    let entities = find_by_ids::<E, C>(db, ids).await?;
    Ok(Updated {
        rows: result.rows_affected,
        entities,
    })
}

pub(crate) async fn update_by_id<E, C>(
    db: &C,
    id: i32,
    patch: E::Patch,
) -> AppResult<UpdatedOne<E::Record>>
where
    E: RecordEntity,
    C: ConnectionTrait,
{
    let updated = update::<E, C>(db, patch, &Criteria::by_id(id)).await?;
    Ok(UpdatedOne {
        rows: updated.rows,
        entity: updated.entities.into_iter().next(),
    })
}

/// Equality condition over the natural key, or `None` when the table has
/// no natural key or the input leaves part of it unset.
fn natural_key<E: RecordEntity>(active: &E::Active) -> Option<Condition> {
    let columns = E::unique_columns();
    if columns.is_empty() {
        return None;
    }

    columns
        .into_iter()
        .try_fold(Condition::all(), |cond, col| match active.get(col) {
            ActiveValue::Set(value) | ActiveValue::Unchanged(value) => Some(cond.add(col.eq(value))),
            ActiveValue::NotSet => None,
        })
}

/// Insert, or update the row already holding the natural key.
///
/// A soft-deleted holder of the key is revived. Concurrent upserts of the
/// same new key race on the unique index; the loser gets the store error.
pub(crate) async fn upsert<E, C>(db: &C, input: E::Create) -> AppResult<Upserted<E::Record>>
where
    E: RecordEntity,
    C: ConnectionTrait,
{
    input.validate()?;
    let mut active = E::new_active(input);

    let existing = match natural_key::<E>(&active) {
        Some(key) => E::find().filter(key).one(db).await?,
        None => None,
    };

    let Some(existing) = existing else {
        let entity = insert_active::<E, C>(db, active).await?;
        return Ok(Upserted {
            entity,
            inserted: true,
        });
    };

    let id = to_record::<E>(existing).id();
    active.set(E::updated_at_column(), Utc::now().into());
    active.set(E::deleted_at_column(), cleared_deleted_at());

    E::update_many()
        .set(active)
        .filter(E::id_column().eq(id))
        .exec(db)
        .await?;

    let entity = find_by_id::<E, C>(db, id)
        .await?
        .ok_or_else(|| AppError::internal(format!("{} row missing after upsert", E::LABEL)))?;

    Ok(Upserted {
        entity,
        inserted: false,
    })
}

/// Soft-delete the live rows matching `criteria`, then re-read the same
/// criteria including soft-deleted rows.
///
/// The two steps are not one transaction; wrap the call in a unit of work
/// when that matters.
pub(crate) async fn destroy<E, C>(db: &C, criteria: &Criteria) -> AppResult<Destroyed<E::Record>>
where
    E: RecordEntity,
    C: ConnectionTrait,
{
    if write_scope::<E>(&criteria.filters)? == 0 {
        return Err(AppError::validation(format!(
            "refusing to delete every {} row",
            E::LABEL
        )));
    }

    let ids = live_ids::<E, C>(db, criteria).await?;
    let count = if ids.is_empty() {
        0
    } else {
        let now = Utc::now();
        E::update_many()
            .col_expr(E::deleted_at_column(), Expr::value(now))
            .col_expr(E::updated_at_column(), Expr::value(now))
            .filter(E::id_column().is_in(ids))
            .exec(db)
            .await?
            .rows_affected
    };

    let entities = find_all::<E, C>(db, &criteria.clone().with_deleted()).await?;
    Ok(Destroyed { count, entities })
}

pub(crate) async fn delete_by_id<E, C>(db: &C, id: i32) -> AppResult<DestroyedOne<E::Record>>
where
    E: RecordEntity,
    C: ConnectionTrait,
{
    let destroyed = destroy::<E, C>(db, &Criteria::by_id(id)).await?;
    Ok(DestroyedOne {
        count: destroyed.count,
        entity: destroyed.entities.into_iter().next(),
    })
}

/// Up to `limit` live rows in random order.
///
/// A zero limit means the default; larger limits are capped. Store failures
/// degrade to an empty sample.
pub(crate) async fn random_models<E, C>(db: &C, limit: u64) -> Vec<E::Record>
where
    E: RecordEntity,
    C: ConnectionTrait,
{
    let limit = match limit {
        0 => DEFAULT_RANDOM_LIMIT,
        n => n.min(MAX_SEARCH_LIMIT),
    };

    let sampled = E::find()
        .filter(E::deleted_at_column().is_null())
        .order_by(random_order(), Order::Asc)
        .limit(limit)
        .all(db)
        .await;

    match sampled {
        Ok(models) => models.into_iter().map(to_record::<E>).collect(),
        Err(e) => {
            tracing::warn!(entity = E::LABEL, error = %e, "Random sample unavailable");
            Vec::new()
        }
    }
}
