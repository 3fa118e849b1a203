//! Create-with-attachments saga tests.

mod support;

use std::sync::Arc;

use common::AppError;
use domain::{CreateTag, CreateUser, ModelType, S3Object, Tag, UpdateTag};
use resource_service_lib::query::Criteria;
use resource_service_lib::repository::entities::{S3Objects, Tags, Users};
use resource_service_lib::repository::EntityRepository;
use resource_service_lib::saga::{user_creation, NewUser, UploadCoordinator};
use resource_service_lib::storage::{Attachment, InMemoryObjectStore, ObjectStore};

use support::{FlakyStore, BUCKET};

/// Tag draft with any number of attachments
struct TagWithFiles {
    tag: CreateTag,
    files: Vec<Attachment>,
}

fn tag_coordinator(
    db: resource_service_lib::unit_of_work::Persistence,
    store: Arc<dyn ObjectStore>,
) -> UploadCoordinator<Tags, TagWithFiles> {
    UploadCoordinator::<Tags, TagWithFiles>::builder()
        .persistence(db)
        .uploader(support::uploader(store))
        .owner_type(ModelType::Tag)
        .extract(|input: TagWithFiles| (input.tag, input.files))
        .build()
        .unwrap()
}

fn png(name: &str) -> Attachment {
    Attachment::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
}

async fn live_and_deleted_tags(db: &resource_service_lib::unit_of_work::Persistence) -> u64 {
    db.repository::<Tags>()
        .count(&Criteria::new().with_deleted())
        .await
        .unwrap()
}

#[tokio::test]
async fn success_commits_entity_and_attachment_rows() {
    let db = support::persistence().await;
    let store = Arc::new(InMemoryObjectStore::with_bucket(BUCKET));
    let saga = tag_coordinator(db.clone(), store.clone());

    let tag: Tag = saga
        .create(TagWithFiles {
            tag: CreateTag::named("photos"),
            files: vec![png("a.png"), png("b.png")],
        })
        .await
        .unwrap();

    assert_eq!(tag.name, "photos");
    let objects = db
        .repository::<S3Objects>()
        .find_all(&Criteria::new().eq("model_id", i64::from(tag.id)))
        .await
        .unwrap();
    assert_eq!(objects.len(), 2);
    for object in &objects {
        assert_eq!(object.owner_type(), Some(ModelType::Tag));
        assert_eq!(object.bucket, BUCKET);
        assert_eq!(object.mimetype, "image/png");
    }

    let mut stored_keys: Vec<String> = objects.iter().map(|o| o.key.clone()).collect();
    stored_keys.sort();
    assert_eq!(store.keys(BUCKET).await, stored_keys);
}

#[tokio::test]
async fn failed_second_upload_compensates_first_and_leaves_no_row() {
    let db = support::persistence().await;
    let flaky = Arc::new(FlakyStore::new("broken"));
    let saga = tag_coordinator(db.clone(), flaky.clone());

    let err = saga
        .create(TagWithFiles {
            tag: CreateTag::named("doomed"),
            files: vec![png("good.png"), png("broken.png")],
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::CreationFailed { entity: "tag", .. }));
    assert!(matches!(err.root_cause(), AppError::ObjectStore(_)));

    // the uploaded object was deleted again and the transaction rolled back
    assert!(flaky.inner.keys(BUCKET).await.is_empty());
    assert_eq!(live_and_deleted_tags(&db).await, 0);
    assert!(db
        .repository::<Tags>()
        .find_one(&Criteria::new().matches("name", "doomed"))
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        db.repository::<S3Objects>()
            .count(&Criteria::new().with_deleted())
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn compensation_failure_does_not_mask_original_error() {
    let db = support::persistence().await;
    let flaky = Arc::new(FlakyStore::new("broken").failing_deletes());
    let saga = tag_coordinator(db.clone(), flaky.clone());

    let err = saga
        .create(TagWithFiles {
            tag: CreateTag::named("doomed"),
            files: vec![png("good.png"), png("broken.png")],
        })
        .await
        .unwrap_err();

    match err.root_cause() {
        AppError::ObjectStore(msg) => assert!(msg.contains("put_object")),
        other => panic!("unexpected root cause: {other:?}"),
    }
    // the orphan stays behind, the row does not
    assert_eq!(flaky.inner.keys(BUCKET).await.len(), 1);
    assert_eq!(live_and_deleted_tags(&db).await, 0);
}

#[tokio::test]
async fn failing_link_step_rolls_back_rows_and_compensates_uploads() {
    let db = support::persistence().await;
    let store = Arc::new(InMemoryObjectStore::with_bucket(BUCKET));
    db.repository::<Tags>()
        .create(CreateTag::named("taken"))
        .await
        .unwrap();

    // renaming onto an existing name violates the unique index after the
    // uploads and attachment rows are already in place
    let saga = UploadCoordinator::<Tags, TagWithFiles>::builder()
        .persistence(db.clone())
        .uploader(support::uploader(store.clone()))
        .owner_type(ModelType::Tag)
        .extract(|input: TagWithFiles| (input.tag, input.files))
        .link(|_tag: &Tag, _objects: &[S3Object]| {
            Some(UpdateTag {
                name: Some("taken".to_string()),
                ..Default::default()
            })
        })
        .build()
        .unwrap();

    let err = saga
        .create(TagWithFiles {
            tag: CreateTag::named("fresh"),
            files: vec![png("a.png"), png("b.png")],
        })
        .await
        .unwrap_err();

    assert_eq!(err.code(), "CREATION_FAILED");
    assert!(matches!(err.root_cause(), AppError::Database(_)));
    assert!(store.keys(BUCKET).await.is_empty());
    assert_eq!(live_and_deleted_tags(&db).await, 1);
    assert_eq!(
        db.repository::<S3Objects>()
            .count(&Criteria::new().with_deleted())
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn invalid_draft_is_rejected_before_any_upload() {
    let db = support::persistence().await;
    let store = Arc::new(InMemoryObjectStore::with_bucket(BUCKET));
    let saga = tag_coordinator(db.clone(), store.clone());

    let err = saga
        .create(TagWithFiles {
            tag: CreateTag::named("   "),
            files: vec![png("a.png")],
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(store.keys(BUCKET).await.is_empty());
}

#[tokio::test]
async fn user_icon_upload_links_attachment() {
    let db = support::persistence().await;
    let store = Arc::new(InMemoryObjectStore::with_bucket(BUCKET));
    let saga = user_creation(db.clone(), support::uploader(store.clone())).unwrap();

    let user = saga
        .create(NewUser {
            profile: CreateUser {
                first_name: Some("Ada".to_string()),
                ..Default::default()
            },
            icon: Some(png("me.png")),
        })
        .await
        .unwrap();

    let icon_id = user.icon_s3object_id.expect("icon linked");
    let icon = db
        .repository::<S3Objects>()
        .find_by_id(icon_id)
        .await
        .unwrap()
        .expect("icon row");
    assert_eq!(icon.model_id, user.id);
    assert_eq!(icon.owner_type(), Some(ModelType::User));
    assert!(icon.key.ends_with(".me.png"));
    assert_eq!(
        icon.public_url("http://cdn.test"),
        format!("http://cdn.test/{}", icon.key)
    );
    assert!(store.get_object(BUCKET, &icon.key).await.unwrap().is_some());
}

#[tokio::test]
async fn user_without_icon_is_created_unlinked() {
    let db = support::persistence().await;
    let store = Arc::new(InMemoryObjectStore::with_bucket(BUCKET));
    let saga = user_creation(db.clone(), support::uploader(store)).unwrap();

    let user = saga.create(NewUser::default()).await.unwrap();
    assert!(user.icon_s3object_id.is_none());
    assert_eq!(
        db.repository::<Users>().count(&Criteria::new()).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn builder_requires_extract_function() {
    let db = support::persistence().await;
    let store: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::with_bucket(BUCKET));

    let result = UploadCoordinator::<Tags, TagWithFiles>::builder()
        .persistence(db)
        .uploader(support::uploader(store))
        .owner_type(ModelType::Tag)
        .build();
    assert!(matches!(result, Err(AppError::Internal(_))));
}
