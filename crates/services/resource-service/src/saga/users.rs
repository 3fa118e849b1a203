//! User sign-up with an optional profile icon.

use domain::{CreateUser, ModelType, S3Object, UpdateUser, User};

use super::UploadCoordinator;
use crate::repository::entities::Users;
use crate::storage::{Attachment, Uploader};
use crate::unit_of_work::Persistence;
use common::AppResult;

/// User draft plus the icon to attach
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub profile: CreateUser,
    pub icon: Option<Attachment>,
}

/// Coordinator creating users; an uploaded image becomes the user's icon.
pub fn user_creation(
    persistence: Persistence,
    uploader: Uploader,
) -> AppResult<UploadCoordinator<Users, NewUser>> {
    UploadCoordinator::<Users, NewUser>::builder()
        .persistence(persistence)
        .uploader(uploader)
        .owner_type(ModelType::User)
        .extract(|new_user: NewUser| (new_user.profile, new_user.icon.into_iter().collect()))
        .link(|_user: &User, objects: &[S3Object]| {
            objects
                .iter()
                .find(|object| object.mimetype.to_lowercase().starts_with("image/"))
                .map(|icon| UpdateUser {
                    icon_s3object_id: Some(icon.id),
                    ..Default::default()
                })
        })
        .build()
}
