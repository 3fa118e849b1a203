//! Tag domain record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainResult;
use crate::patterns::{check_required, GENERIC_TEXT};
use crate::record::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i32,
    pub metadata: Option<serde_json::Value>,
    pub create_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Unique tag name
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTag {
    pub metadata: Option<serde_json::Value>,
    pub name: String,
    pub description: Option<String>,
}

impl CreateTag {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Validate for CreateTag {
    fn validate(&self) -> DomainResult<()> {
        check_required("name", &self.name, &GENERIC_TEXT)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTag {
    pub metadata: Option<serde_json::Value>,
    pub name: Option<String>,
    pub description: Option<String>,
}
