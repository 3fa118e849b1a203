//! Shared record behaviour and the attachment owner discriminator.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Common shape of every persisted record.
///
/// Every table carries an integer id and three timestamps; a record with
/// `deleted_at` set has been soft-deleted and is hidden from default reads.
pub trait Record {
    fn id(&self) -> i32;
    fn create_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    /// Check if the record is soft deleted
    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }
}

/// Explicit input validation, applied before anything is written.
pub trait Validate {
    fn validate(&self) -> DomainResult<()>;
}

macro_rules! impl_record {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Record for $ty {
                fn id(&self) -> i32 {
                    self.id
                }
                fn create_at(&self) -> DateTime<Utc> {
                    self.create_at
                }
                fn updated_at(&self) -> DateTime<Utc> {
                    self.updated_at
                }
                fn deleted_at(&self) -> Option<DateTime<Utc>> {
                    self.deleted_at
                }
            }
        )+
    };
}

impl_record!(
    crate::User,
    crate::Tag,
    crate::UserTag,
    crate::UserAuthProvider,
    crate::S3Object,
);

/// Owner discriminator stored on attachment rows (`model_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    User,
    Tag,
    UserTag,
    UserAuthProvider,
    S3Object,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::User => "user",
            ModelType::Tag => "tag",
            ModelType::UserTag => "user_tag",
            ModelType::UserAuthProvider => "user_auth_provider",
            ModelType::S3Object => "s3_object",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s {
            "user" => Ok(ModelType::User),
            "tag" => Ok(ModelType::Tag),
            "user_tag" => Ok(ModelType::UserTag),
            "user_auth_provider" => Ok(ModelType::UserAuthProvider),
            "s3_object" => Ok(ModelType::S3Object),
            other => Err(DomainError::UnknownModelType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_type_round_trips_through_str() {
        for ty in [ModelType::User, ModelType::Tag, ModelType::S3Object] {
            assert_eq!(ty.as_str().parse::<ModelType>().unwrap(), ty);
        }
        assert_eq!(
            "widget".parse::<ModelType>(),
            Err(DomainError::UnknownModelType("widget".into()))
        );
    }
}
