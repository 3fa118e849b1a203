//! Domain layer - plain records and value objects for every resource.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Records here are what repositories hand back to callers; storage rows
//! never leave the persistence layer.

pub mod constants;
pub mod error;
pub mod patterns;
pub mod record;
pub mod s3_object;
pub mod tag;
pub mod user;
pub mod user_auth_provider;
pub mod user_tag;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use record::{ModelType, Record, Validate};
pub use s3_object::{CreateS3Object, S3Object, UpdateS3Object};
pub use tag::{CreateTag, Tag, UpdateTag};
pub use user::{CreateUser, UpdateUser, User};
pub use user_auth_provider::{CreateUserAuthProvider, UpdateUserAuthProvider, UserAuthProvider};
pub use user_tag::{CreateUserTag, UpdateUserTag, UserTag};
