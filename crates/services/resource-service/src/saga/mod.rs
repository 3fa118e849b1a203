//! Entity creation with attachment uploads, compensated on failure.
//!
//! The entity row and its attachment rows share one transaction. Uploads
//! cannot take part in it, so every upload that succeeded during a failed
//! attempt is deleted again after the rollback.

mod users;

pub use users::{user_creation, NewUser};

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Mutex;

use common::{AppError, AppResult};
use domain::{ModelType, Record, S3Object, Validate};

use crate::repository::entities::S3Objects;
use crate::repository::{EntityRepository, RecordEntity};
use crate::storage::{Attachment, S3Locator, Uploader};
use crate::unit_of_work::Persistence;

/// Splits a caller's input into the entity draft and its attachments
pub type ExtractFn<E, I> =
    Arc<dyn Fn(I) -> (<E as RecordEntity>::Create, Vec<Attachment>) + Send + Sync>;

/// Derives a patch for the new entity from its attachment rows, e.g. to
/// point at an icon
pub type LinkFn<E> = Arc<
    dyn Fn(&<E as RecordEntity>::Record, &[S3Object]) -> Option<<E as RecordEntity>::Patch>
        + Send
        + Sync,
>;

/// Generic create-with-attachments coordinator for entity `E` taking
/// caller input `I`.
pub struct UploadCoordinator<E: RecordEntity, I> {
    persistence: Persistence,
    uploader: Uploader,
    owner_type: ModelType,
    extract: ExtractFn<E, I>,
    link: Option<LinkFn<E>>,
}

impl<E, I> UploadCoordinator<E, I>
where
    E: RecordEntity,
    I: Send + 'static,
{
    pub fn builder() -> UploadCoordinatorBuilder<E, I> {
        UploadCoordinatorBuilder::default()
    }

    /// Create the entity and its attachments.
    ///
    /// Returns the committed entity as re-read after commit. Draft
    /// validation errors are returned as-is; anything failing after that
    /// point is wrapped in [`AppError::CreationFailed`].
    pub async fn create(&self, input: I) -> AppResult<E::Record> {
        let (draft, attachments) = (self.extract)(input);
        draft.validate()?;

        let uploaded: Arc<Mutex<Vec<S3Locator>>> = Arc::default();

        let tracker = uploaded.clone();
        let uploader = self.uploader.clone();
        let owner_type = self.owner_type;
        let link = self.link.clone();

        let outcome = self
            .persistence
            .transaction(move |ctx| {
                Box::pin(async move {
                    let entity = ctx.repo::<E>().create(draft).await?;
                    let owner_id = entity.id();

                    let uploads = attachments.into_iter().map(|attachment| {
                        let uploader = uploader.clone();
                        let tracker = tracker.clone();
                        async move {
                            let locator = uploader.upload(attachment).await?;
                            tracker.lock().await.push(locator.clone());
                            Ok::<_, AppError>(locator)
                        }
                    });
                    let locators = join_all(uploads)
                        .await
                        .into_iter()
                        .collect::<AppResult<Vec<_>>>()?;

                    let objects_repo = ctx.repo::<S3Objects>();
                    let mut objects = Vec::with_capacity(locators.len());
                    for locator in &locators {
                        let input = locator.to_record_input(owner_type, owner_id);
                        objects.push(objects_repo.create(input).await?);
                    }

                    if let Some(patch) = link.as_ref().and_then(|link| link(&entity, &objects)) {
                        ctx.repo::<E>().update_by_id(owner_id, patch).await?;
                    }

                    Ok(owner_id)
                })
            })
            .await;

        match outcome {
            Ok(id) => {
                tracing::info!(entity = E::LABEL, id, "Created with attachments");
                self.persistence
                    .repository::<E>()
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| {
                        AppError::internal(format!("{} {id} missing after commit", E::LABEL))
                    })
            }
            Err(err) => {
                tracing::warn!(entity = E::LABEL, error = %err, "Creation aborted, compensating uploads");
                self.compensate(&uploaded).await;
                Err(AppError::creation_failed(E::LABEL, err))
            }
        }
    }

    /// Best-effort delete of every upload recorded for this attempt.
    /// Failures are logged and otherwise ignored.
    async fn compensate(&self, uploaded: &Mutex<Vec<S3Locator>>) {
        let locators = std::mem::take(&mut *uploaded.lock().await);
        if locators.is_empty() {
            return;
        }

        let removals = join_all(locators.iter().map(|locator| self.uploader.remove(locator))).await;
        for (locator, result) in locators.iter().zip(removals) {
            match result {
                Ok(()) => tracing::info!(key = %locator.key, "Compensating delete done"),
                Err(e) => tracing::error!(
                    bucket = %locator.bucket,
                    key = %locator.key,
                    error = %e,
                    "Compensating delete failed"
                ),
            }
        }
    }
}

/// Builder for [`UploadCoordinator`]. Persistence, uploader, owner type and
/// extract function are required; the link function is optional.
pub struct UploadCoordinatorBuilder<E: RecordEntity, I> {
    persistence: Option<Persistence>,
    uploader: Option<Uploader>,
    owner_type: Option<ModelType>,
    extract: Option<ExtractFn<E, I>>,
    link: Option<LinkFn<E>>,
}

impl<E: RecordEntity, I> Default for UploadCoordinatorBuilder<E, I> {
    fn default() -> Self {
        Self {
            persistence: None,
            uploader: None,
            owner_type: None,
            extract: None,
            link: None,
        }
    }
}

impl<E, I> UploadCoordinatorBuilder<E, I>
where
    E: RecordEntity,
    I: Send + 'static,
{
    pub fn persistence(mut self, persistence: Persistence) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn uploader(mut self, uploader: Uploader) -> Self {
        self.uploader = Some(uploader);
        self
    }

    /// Discriminator written on the attachment rows
    pub fn owner_type(mut self, owner_type: ModelType) -> Self {
        self.owner_type = Some(owner_type);
        self
    }

    pub fn extract<F>(mut self, extract: F) -> Self
    where
        F: Fn(I) -> (E::Create, Vec<Attachment>) + Send + Sync + 'static,
    {
        self.extract = Some(Arc::new(extract));
        self
    }

    pub fn link<F>(mut self, link: F) -> Self
    where
        F: Fn(&E::Record, &[S3Object]) -> Option<E::Patch> + Send + Sync + 'static,
    {
        self.link = Some(Arc::new(link));
        self
    }

    pub fn build(self) -> AppResult<UploadCoordinator<E, I>> {
        let missing = |part: &str| {
            AppError::internal(format!("{} upload coordinator is missing its {part}", E::LABEL))
        };

        Ok(UploadCoordinator {
            persistence: self.persistence.ok_or_else(|| missing("persistence"))?,
            uploader: self.uploader.ok_or_else(|| missing("uploader"))?,
            owner_type: self.owner_type.ok_or_else(|| missing("owner type"))?,
            extract: self.extract.ok_or_else(|| missing("extract function"))?,
            link: self.link,
        })
    }
}
