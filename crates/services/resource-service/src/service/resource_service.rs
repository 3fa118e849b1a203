//! Resource manager - one per record type, over the generic repository.
//!
//! Owns the wiring from raw query parameters through the translator to the
//! repository, and maps missing rows to `AppError::NotFound`.

use std::sync::Arc;

use serde::Serialize;

use common::{AppError, AppResult, OptionExt};

use crate::query::{resolve_limit, translate, SortDirection};
use crate::repository::{next_cursor, EntityRepository, PageRequest, Upserted};
use domain::Record;

/// One keyset page plus the cursor for the next one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CursorPage<R> {
    pub items: Vec<R>,
    /// `None` once the listing is exhausted
    pub next_cursor: Option<i32>,
}

/// Concrete resource service over a repository.
pub struct ResourceManager<R, C, P> {
    repo: Arc<dyn EntityRepository<R, C, P>>,
}

impl<R, C, P> Clone for ResourceManager<R, C, P> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<R, C, P> ResourceManager<R, C, P>
where
    R: Record + Send + Sync + 'static,
    C: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    /// Create new service instance with repository
    pub fn new(repo: Arc<dyn EntityRepository<R, C, P>>) -> Self {
        Self { repo }
    }

    /// Get a live record by id
    pub async fn get(&self, id: i32) -> AppResult<R> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    /// Search live records from raw query parameters, newest first.
    ///
    /// Malformed parameters are dropped, never rejected.
    pub async fn search<I, K, V>(&self, params: I) -> AppResult<Vec<R>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let criteria = translate(params)
            .into_criteria()
            .order_by("id", SortDirection::Desc);
        self.repo.find_all(&criteria).await
    }

    /// Number of live records matching raw query parameters; `limit` is
    /// ignored
    pub async fn count<I, K, V>(&self, params: I) -> AppResult<u64>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut criteria = translate(params).into_criteria();
        criteria.limit = None;
        self.repo.count(&criteria).await
    }

    /// One page of an owner's records, newest first
    pub async fn list_for_owner(
        &self,
        owner_field: &str,
        owner_id: i32,
        cursor: Option<i32>,
    ) -> AppResult<CursorPage<R>> {
        let request = PageRequest::new(owner_field, owner_id).after(cursor);
        let items = self.repo.paginate(&request).await?;
        let next_cursor = next_cursor(&items);
        Ok(CursorPage { items, next_cursor })
    }

    /// Every live record of an owner, narrowed by raw query parameters
    pub async fn list_all_for_owner<I, K, V>(
        &self,
        owner_field: &str,
        owner_id: i32,
        params: I,
    ) -> AppResult<Vec<R>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let extra = translate(params).filters;
        self.repo.get_all(owner_field, owner_id, &extra).await
    }

    pub async fn upsert(&self, input: C) -> AppResult<Upserted<R>> {
        self.repo.upsert(input).await
    }

    /// Patch a live record; soft-deleted records are not found
    pub async fn update(&self, id: i32, patch: P) -> AppResult<R> {
        self.repo.update_by_id(id, patch).await?.entity.ok_or_not_found()
    }

    /// Soft delete a live record and return it with `deleted_at` set
    pub async fn delete(&self, id: i32) -> AppResult<R> {
        let destroyed = self.repo.delete_by_id(id).await?;
        if destroyed.count == 0 {
            return Err(AppError::NotFound);
        }
        destroyed.entity.ok_or_not_found()
    }

    /// Random sample of live records; `limit` is a raw query value
    pub async fn random(&self, limit: Option<&str>) -> Vec<R> {
        self.repo.random_models(resolve_limit(limit)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Comparison;
    use crate::repository::{DestroyedOne, MockEntityRepository, UpdatedOne};
    use chrono::Utc;
    use domain::{CreateTag, Tag, UpdateTag};
    use mockall::predicate::eq;

    type MockTags = MockEntityRepository<Tag, CreateTag, UpdateTag>;

    fn tag(id: i32) -> Tag {
        Tag {
            id,
            metadata: None,
            create_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
            name: format!("tag-{id}"),
            description: None,
        }
    }

    fn manager(repo: MockTags) -> ResourceManager<Tag, CreateTag, UpdateTag> {
        ResourceManager::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn get_maps_missing_row_to_not_found() {
        let mut repo = MockTags::new();
        repo.expect_find_by_id()
            .with(eq(9))
            .returning(|_| Ok(None));

        let err = manager(repo).get(9).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn search_translates_params_and_bounds_limit() {
        let mut repo = MockTags::new();
        repo.expect_find_all()
            .withf(|criteria| {
                criteria.limit == Some(100)
                    && !criteria.include_deleted
                    && criteria.filters.len() == 1
                    && criteria.filters.get("id").map(|p| &p.comparison)
                        == Some(&Comparison::In(vec![1, 2]))
                    && criteria.order.len() == 1
            })
            .returning(|_| Ok(vec![tag(2), tag(1)]));

        let found = manager(repo)
            .search([("id_op", "in<1,2>"), ("limit", "500"), ("name_op", "gt<>")])
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn list_for_owner_reports_next_cursor_only_on_full_pages() {
        let mut repo = MockTags::new();
        repo.expect_paginate()
            .withf(|req| req.cursor.is_none())
            .returning(|_| Ok((6..=10).rev().map(tag).collect()));
        repo.expect_paginate()
            .withf(|req| req.cursor == Some(6))
            .returning(|_| Ok((1..=5).rev().map(tag).collect::<Vec<_>>()[..2].to_vec()));

        let service = manager(repo);
        let first = service.list_for_owner("user_id", 1, None).await.unwrap();
        assert_eq!(first.next_cursor, Some(6));

        let second = service
            .list_for_owner("user_id", 1, first.next_cursor)
            .await
            .unwrap();
        assert_eq!(second.items.len(), 2);
        assert_eq!(second.next_cursor, None);
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let mut repo = MockTags::new();
        repo.expect_update_by_id().returning(|_, _| {
            Ok(UpdatedOne {
                rows: 0,
                entity: None,
            })
        });

        let result = manager(repo).update(3, UpdateTag::default()).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn delete_requires_a_live_row() {
        let mut repo = MockTags::new();
        repo.expect_delete_by_id().with(eq(4)).returning(|_| {
            let mut deleted = tag(4);
            deleted.deleted_at = Some(Utc::now());
            Ok(DestroyedOne {
                count: 0,
                entity: Some(deleted),
            })
        });

        assert!(matches!(
            manager(repo).delete(4).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn random_resolves_raw_limit() {
        let mut repo = MockTags::new();
        repo.expect_random_models()
            .with(eq(10))
            .returning(|_| Vec::new());

        assert!(manager(repo).random(Some("abc")).await.is_empty());
    }
}
