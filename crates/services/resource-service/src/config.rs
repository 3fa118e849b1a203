//! Resource service configuration.

use std::env;

use common::{DatabaseConfig, ObjectStoreConfig};

/// Resource service configuration.
///
/// `Debug` output never contains the database URL.
#[derive(Debug, Clone, Default)]
pub struct ResourceServiceConfig {
    pub database: DatabaseConfig,
    pub object_store: ObjectStoreConfig,
}

fn var_or(name: &str, default: String) -> String {
    env::var(name).unwrap_or(default)
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl ResourceServiceConfig {
    /// Load configuration from environment variables, falling back to
    /// development defaults.
    pub fn from_env() -> Self {
        let db_defaults = DatabaseConfig::default();
        let store_defaults = ObjectStoreConfig::default();

        Self {
            database: DatabaseConfig {
                url: env::var("RESOURCE_SERVICE_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(db_defaults.url),
                max_connections: parsed_or("DATABASE_MAX_CONNECTIONS", db_defaults.max_connections),
                min_connections: parsed_or("DATABASE_MIN_CONNECTIONS", db_defaults.min_connections),
            },
            object_store: ObjectStoreConfig {
                region: var_or("S3_REGION", store_defaults.region),
                bucket: var_or("S3_BUCKET", store_defaults.bucket),
                endpoint: env::var("S3_ENDPOINT").ok().filter(|e| !e.trim().is_empty()),
                serve_origin: var_or("S3_SERVE_ORIGIN", store_defaults.serve_origin),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_database_url() {
        let mut config = ResourceServiceConfig::default();
        config.database.url = "postgres://app:hunter2@db:5432/resources".into();

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("bucket"));
    }
}
