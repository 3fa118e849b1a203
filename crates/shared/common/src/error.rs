//! Unified error handling for the persistence layer.
//!
//! Provides a single error type shared by repositories, the object store
//! adapters and the upload coordinator.

use domain::DomainError;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Object store error: {0}")]
    ObjectStore(String),

    // Saga
    #[error("Could not create {entity}")]
    CreationFailed {
        entity: &'static str,
        #[source]
        source: Box<AppError>,
    },

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::ObjectStore(_) => "OBJECT_STORE_ERROR",
            AppError::CreationFailed { .. } => "CREATION_FAILED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Conflict(msg) => {
                if msg.ends_with("already exists") {
                    msg.clone()
                } else {
                    format!("{} already exists", msg)
                }
            }

            // Hide details for internal errors
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::ObjectStore(msg) => {
                tracing::error!("Object store error: {}", msg);
                "A storage error occurred".to_string()
            }
            AppError::CreationFailed { entity, source } => {
                tracing::error!("Creating {} failed: {:?}", entity, source);
                format!("Could not create {}", entity)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }

    /// The error that started a failed creation, or `self` otherwise
    pub fn root_cause(&self) -> &AppError {
        match self {
            AppError::CreationFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        // every domain error is a rejected input
        AppError::Validation(err.to_string())
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn object_store(msg: impl Into<String>) -> Self {
        AppError::ObjectStore(msg.into())
    }

    pub fn creation_failed(entity: &'static str, source: AppError) -> Self {
        AppError::CreationFailed {
            entity,
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_onto_app_errors() {
        let err: AppError = DomainError::invalid_field("name", "is required").into();
        assert!(matches!(err, AppError::Validation(ref m) if m == "name: is required"));
        assert_eq!(err.code(), "VALIDATION_ERROR");

        let err: AppError = DomainError::UnknownModelType("widget".into()).into();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("widget")));
    }

    #[test]
    fn creation_failure_keeps_the_original_cause() {
        let err = AppError::creation_failed("user", AppError::object_store("put failed"));
        assert_eq!(err.code(), "CREATION_FAILED");
        assert_eq!(err.user_message(), "Could not create user");
        assert!(matches!(err.root_cause(), AppError::ObjectStore(m) if m == "put failed"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn internal_details_are_hidden() {
        let err = AppError::internal("pool exhausted");
        assert_eq!(err.user_message(), "An internal error occurred");
        assert_eq!(AppError::conflict("Tag").user_message(), "Tag already exists");
    }

    #[test]
    fn option_ext_maps_none_to_not_found() {
        let missing: Option<i32> = None;
        assert!(matches!(missing.ok_or_not_found(), Err(AppError::NotFound)));
        assert_eq!(Some(3).ok_or_not_found().unwrap(), 3);
    }
}
