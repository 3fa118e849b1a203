//! Service layer - caller-facing operations over the repositories.

mod resource_service;

pub use resource_service::{CursorPage, ResourceManager};
