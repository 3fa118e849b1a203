//! External identity provider link for a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::patterns::{check_required, GENERIC_TEXT};
use crate::record::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAuthProvider {
    pub id: i32,
    pub metadata: Option<serde_json::Value>,
    pub create_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Provider-specific payload
    pub details: Option<serde_json::Value>,
    pub user_id: i32,
    pub provider_name: String,
    pub provider_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserAuthProvider {
    pub metadata: Option<serde_json::Value>,
    pub details: Option<serde_json::Value>,
    pub user_id: i32,
    pub provider_name: String,
    pub provider_id: String,
}

impl Validate for CreateUserAuthProvider {
    fn validate(&self) -> DomainResult<()> {
        if self.user_id <= 0 {
            return Err(DomainError::invalid_field("user_id", "must be positive"));
        }
        check_required("provider_name", &self.provider_name, &GENERIC_TEXT)?;
        check_required("provider_id", &self.provider_id, &GENERIC_TEXT)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserAuthProvider {
    pub metadata: Option<serde_json::Value>,
    pub details: Option<serde_json::Value>,
    pub provider_name: Option<String>,
    pub provider_id: Option<String>,
}
