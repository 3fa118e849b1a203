//! sea-orm entities, one module per table.

pub mod s3_object;
pub mod tag;
pub mod user;
pub mod user_auth_provider;
pub mod user_tag;

pub use s3_object::Entity as S3Objects;
pub use tag::Entity as Tags;
pub use user::Entity as Users;
pub use user_auth_provider::Entity as UserAuthProviders;
pub use user_tag::Entity as UserTags;
