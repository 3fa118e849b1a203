//! Domain-level constants.
//!
//! These constants define query limits and storage conventions shared by
//! every resource.

// =============================================================================
// Search limits
// =============================================================================

/// Default number of rows returned by an ad-hoc search
pub const DEFAULT_SEARCH_LIMIT: u64 = 10;

/// Maximum number of rows an ad-hoc search may request
pub const MAX_SEARCH_LIMIT: u64 = 100;

/// Minimum number of rows an ad-hoc search may request
pub const MIN_SEARCH_LIMIT: u64 = 1;

// =============================================================================
// Keyset pagination
// =============================================================================

/// Fixed page size for owner-scoped cursor pagination
pub const CURSOR_PAGE_SIZE: u64 = 5;

// =============================================================================
// Random sampling
// =============================================================================

/// Default sample size when a caller asks for zero random rows
pub const DEFAULT_RANDOM_LIMIT: u64 = 10;

// =============================================================================
// Object storage
// =============================================================================

/// Key prefix under which every upload is stored
pub const UPLOAD_KEY_PREFIX: &str = "public/static/uploads";

/// Separator between bucket and key in composite object ids
pub const OBJECT_ID_SEPARATOR: char = '|';

// =============================================================================
// Validation
// =============================================================================

/// Largest valid zipcode value (five digits)
pub const MAX_ZIPCODE: i32 = 99_999;
