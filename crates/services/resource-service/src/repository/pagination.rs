//! Keyset pagination scoped to an owner column.
//!
//! Pages are ordered by `id` descending and hold at most
//! [`CURSOR_PAGE_SIZE`] rows. The next page starts below the last id seen;
//! a page shorter than the page size means the listing is exhausted.

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, Select,
};

use common::{AppError, AppResult};
use domain::constants::CURSOR_PAGE_SIZE;
use domain::Record;

use super::condition::{column, condition};
use super::RecordEntity;
use crate::query::{FilterSet, Predicate};

/// One owner-scoped page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Column holding the owner id, e.g. `user_id`
    pub owner_field: String,
    pub owner_id: i32,
    /// Id of the last row of the previous page; `None` or `Some(0)` starts
    /// from the newest row
    pub cursor: Option<i32>,
    /// Extra criteria AND-ed with the owner scope
    pub filters: FilterSet,
}

impl PageRequest {
    pub fn new(owner_field: impl Into<String>, owner_id: i32) -> Self {
        Self {
            owner_field: owner_field.into(),
            owner_id,
            cursor: None,
            filters: FilterSet::new(),
        }
    }

    pub fn after(mut self, cursor: Option<i32>) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filters.push(predicate);
        self
    }
}

/// Cursor for the page following `page`, or `None` once exhausted.
pub fn next_cursor<R: Record>(page: &[R]) -> Option<i32> {
    if (page.len() as u64) < CURSOR_PAGE_SIZE {
        return None;
    }
    page.last().map(Record::id)
}

fn owner_scope<E: RecordEntity>(
    owner_field: &str,
    owner_id: i32,
    extra: &FilterSet,
) -> AppResult<Select<E>> {
    let owner = column::<E>(owner_field).ok_or_else(|| {
        AppError::validation(format!("{} has no owner field '{owner_field}'", E::LABEL))
    })?;

    Ok(E::find()
        .filter(owner.eq(owner_id))
        .filter(condition::<E>(extra))
        .filter(E::deleted_at_column().is_null())
        .order_by(E::id_column(), Order::Desc))
}

pub(crate) async fn paginate<E, C>(db: &C, request: &PageRequest) -> AppResult<Vec<E::Record>>
where
    E: RecordEntity,
    C: ConnectionTrait,
{
    let mut query = owner_scope::<E>(&request.owner_field, request.owner_id, &request.filters)?;
    // a zero cursor means no cursor
    if let Some(cursor) = request.cursor.filter(|&cursor| cursor != 0) {
        query = query.filter(E::id_column().lt(cursor));
    }

    let models = query.limit(CURSOR_PAGE_SIZE).all(db).await?;
    Ok(models.into_iter().map(E::Record::from).collect())
}

/// Every live row of one owner, newest first. Meant for small collections.
pub(crate) async fn get_all<E, C>(
    db: &C,
    owner_field: &str,
    owner_id: i32,
    extra: &FilterSet,
) -> AppResult<Vec<E::Record>>
where
    E: RecordEntity,
    C: ConnectionTrait,
{
    let models = owner_scope::<E>(owner_field, owner_id, extra)?.all(db).await?;
    Ok(models.into_iter().map(E::Record::from).collect())
}
