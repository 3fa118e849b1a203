//! Generic repository with soft delete support.

use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction};

use common::AppResult;

use super::pagination::{self, PageRequest};
use super::{ops, Destroyed, DestroyedOne, RecordEntity, Updated, UpdatedOne, Upserted};
use crate::query::{Criteria, FilterSet};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Uniform data access for one record type.
///
/// `R` is the record handed back, `C` the create input and `P` the patch
/// input. By default every read excludes soft-deleted rows; only criteria
/// built with [`Criteria::with_deleted`] see them.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EntityRepository<R, C, P>: Send + Sync
where
    R: Send + Sync + 'static,
    C: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    /// Insert a row and return it as stored
    async fn create(&self, input: C) -> AppResult<R>;

    async fn find_one(&self, criteria: &Criteria) -> AppResult<Option<R>>;

    /// Find a live row by id
    async fn find_by_id(&self, id: i32) -> AppResult<Option<R>>;

    async fn find_all(&self, criteria: &Criteria) -> AppResult<Vec<R>>;

    async fn count(&self, criteria: &Criteria) -> AppResult<u64>;

    /// Patch every live row matching the criteria
    async fn update(&self, patch: P, criteria: &Criteria) -> AppResult<Updated<R>>;

    async fn update_by_id(&self, id: i32, patch: P) -> AppResult<UpdatedOne<R>>;

    /// Insert, or update the row holding the same natural key
    async fn upsert(&self, input: C) -> AppResult<Upserted<R>>;

    /// Soft delete matching rows (sets deleted_at timestamp)
    async fn destroy(&self, criteria: &Criteria) -> AppResult<Destroyed<R>>;

    async fn delete_by_id(&self, id: i32) -> AppResult<DestroyedOne<R>>;

    /// One owner-scoped keyset page, newest first
    async fn paginate(&self, request: &PageRequest) -> AppResult<Vec<R>>;

    /// Every live row of one owner, without a cursor
    async fn get_all(&self, owner_field: &str, owner_id: i32, extra: &FilterSet)
        -> AppResult<Vec<R>>;

    /// Random sample of live rows; empty when the store cannot serve it
    async fn random_models(&self, limit: u64) -> Vec<R>;
}

/// Repository over a pooled connection
pub struct SeaRepository<E> {
    db: DatabaseConnection,
    entity: PhantomData<E>,
}

impl<E: RecordEntity> SeaRepository<E> {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            entity: PhantomData,
        }
    }
}

impl<E> Clone for SeaRepository<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E> EntityRepository<E::Record, E::Create, E::Patch> for SeaRepository<E>
where
    E: RecordEntity,
{
    async fn create(&self, input: E::Create) -> AppResult<E::Record> {
        ops::create::<E, _>(&self.db, input).await
    }

    async fn find_one(&self, criteria: &Criteria) -> AppResult<Option<E::Record>> {
        ops::find_one::<E, _>(&self.db, criteria).await
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<E::Record>> {
        ops::find_by_id::<E, _>(&self.db, id).await
    }

    async fn find_all(&self, criteria: &Criteria) -> AppResult<Vec<E::Record>> {
        ops::find_all::<E, _>(&self.db, criteria).await
    }

    async fn count(&self, criteria: &Criteria) -> AppResult<u64> {
        ops::count::<E, _>(&self.db, criteria).await
    }

    async fn update(&self, patch: E::Patch, criteria: &Criteria) -> AppResult<Updated<E::Record>> {
        ops::update::<E, _>(&self.db, patch, criteria).await
    }

    async fn update_by_id(&self, id: i32, patch: E::Patch) -> AppResult<UpdatedOne<E::Record>> {
        ops::update_by_id::<E, _>(&self.db, id, patch).await
    }

    async fn upsert(&self, input: E::Create) -> AppResult<Upserted<E::Record>> {
        ops::upsert::<E, _>(&self.db, input).await
    }

    async fn destroy(&self, criteria: &Criteria) -> AppResult<Destroyed<E::Record>> {
        ops::destroy::<E, _>(&self.db, criteria).await
    }

    async fn delete_by_id(&self, id: i32) -> AppResult<DestroyedOne<E::Record>> {
        ops::delete_by_id::<E, _>(&self.db, id).await
    }

    async fn paginate(&self, request: &PageRequest) -> AppResult<Vec<E::Record>> {
        pagination::paginate::<E, _>(&self.db, request).await
    }

    async fn get_all(
        &self,
        owner_field: &str,
        owner_id: i32,
        extra: &FilterSet,
    ) -> AppResult<Vec<E::Record>> {
        pagination::get_all::<E, _>(&self.db, owner_field, owner_id, extra).await
    }

    async fn random_models(&self, limit: u64) -> Vec<E::Record> {
        ops::random_models::<E, _>(&self.db, limit).await
    }
}

/// Repository bound to an open transaction.
///
/// Writes become visible to other connections only when the owning unit of
/// work commits.
pub struct TxRepository<'a, E> {
    txn: &'a DatabaseTransaction,
    entity: PhantomData<E>,
}

impl<'a, E: RecordEntity> TxRepository<'a, E> {
    pub fn new(txn: &'a DatabaseTransaction) -> Self {
        Self {
            txn,
            entity: PhantomData,
        }
    }

    pub async fn create(&self, input: E::Create) -> AppResult<E::Record> {
        ops::create::<E, _>(self.txn, input).await
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<E::Record>> {
        ops::find_by_id::<E, _>(self.txn, id).await
    }

    pub async fn find_all(&self, criteria: &Criteria) -> AppResult<Vec<E::Record>> {
        ops::find_all::<E, _>(self.txn, criteria).await
    }

    pub async fn update_by_id(&self, id: i32, patch: E::Patch) -> AppResult<UpdatedOne<E::Record>> {
        ops::update_by_id::<E, _>(self.txn, id, patch).await
    }

    pub async fn upsert(&self, input: E::Create) -> AppResult<Upserted<E::Record>> {
        ops::upsert::<E, _>(self.txn, input).await
    }

    /// Soft delete and re-read inside the transaction, so both steps see
    /// the same snapshot
    pub async fn destroy(&self, criteria: &Criteria) -> AppResult<Destroyed<E::Record>> {
        ops::destroy::<E, _>(self.txn, criteria).await
    }
}
