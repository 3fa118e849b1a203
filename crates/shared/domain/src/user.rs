//! User domain record and related inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_ZIPCODE;
use crate::error::{DomainError, DomainResult};
use crate::patterns::{check_optional, GENERIC_TEXT, PERSON_NAME};
use crate::record::Validate;

/// User domain record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub metadata: Option<serde_json::Value>,
    pub create_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft delete timestamp (None = active, Some = deleted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub stripe_customer_account_id: Option<String>,
    pub stripe_account_id: Option<String>,
    pub stripe_account_verified: bool,
    pub stripe_identity_verified: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    /// Attachment row holding the user's icon
    pub icon_s3object_id: Option<i32>,
    pub town: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<i32>,
    pub country: Option<String>,
    pub tags: Option<String>,
    pub specialties: Option<String>,
    pub person_verified: bool,
    pub email_verified: bool,
    pub phone_verified: bool,
}

/// User creation input
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUser {
    pub metadata: Option<serde_json::Value>,
    pub stripe_customer_account_id: Option<String>,
    pub stripe_account_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub icon_s3object_id: Option<i32>,
    pub town: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<i32>,
    pub country: Option<String>,
    pub tags: Option<String>,
    pub specialties: Option<String>,
}

impl Validate for CreateUser {
    fn validate(&self) -> DomainResult<()> {
        check_optional("first_name", self.first_name.as_deref(), &PERSON_NAME)?;
        check_optional("last_name", self.last_name.as_deref(), &PERSON_NAME)?;
        check_optional("town", self.town.as_deref(), &GENERIC_TEXT)?;
        check_optional("city", self.city.as_deref(), &GENERIC_TEXT)?;
        check_optional("state", self.state.as_deref(), &GENERIC_TEXT)?;
        check_optional("country", self.country.as_deref(), &GENERIC_TEXT)?;
        if let Some(zip) = self.zipcode {
            if !(0..=MAX_ZIPCODE).contains(&zip) {
                return Err(DomainError::invalid_field("zipcode", "must be five digits"));
            }
        }
        Ok(())
    }
}

/// User update input; only `Some` fields are written
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub metadata: Option<serde_json::Value>,
    pub stripe_customer_account_id: Option<String>,
    pub stripe_account_id: Option<String>,
    pub stripe_account_verified: Option<bool>,
    pub stripe_identity_verified: Option<bool>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub icon_s3object_id: Option<i32>,
    pub town: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<i32>,
    pub country: Option<String>,
    pub tags: Option<String>,
    pub specialties: Option<String>,
    pub person_verified: Option<bool>,
    pub email_verified: Option<bool>,
    pub phone_verified: Option<bool>,
}
