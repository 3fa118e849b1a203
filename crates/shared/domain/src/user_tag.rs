//! Join record between users and tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::record::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTag {
    pub id: i32,
    pub metadata: Option<serde_json::Value>,
    pub create_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub user_id: i32,
    pub tag_id: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserTag {
    pub metadata: Option<serde_json::Value>,
    pub user_id: i32,
    pub tag_id: i32,
}

impl Validate for CreateUserTag {
    fn validate(&self) -> DomainResult<()> {
        if self.user_id <= 0 {
            return Err(DomainError::invalid_field("user_id", "must be positive"));
        }
        if self.tag_id <= 0 {
            return Err(DomainError::invalid_field("tag_id", "must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserTag {
    pub metadata: Option<serde_json::Value>,
    pub user_id: Option<i32>,
    pub tag_id: Option<i32>,
}
