//! Result shapes of mutating repository operations.

/// Rows touched by `update` plus their post-update state.
#[derive(Debug, Clone, PartialEq)]
pub struct Updated<R> {
    pub rows: u64,
    pub entities: Vec<R>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdatedOne<R> {
    pub rows: u64,
    /// `None` when no live row had the id
    pub entity: Option<R>,
}

/// Outcome of an insert-or-update keyed by a natural key.
#[derive(Debug, Clone, PartialEq)]
pub struct Upserted<R> {
    pub entity: R,
    /// `true` when a new row was inserted
    pub inserted: bool,
}

/// Rows soft-deleted by `destroy` and the re-read of the same criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct Destroyed<R> {
    pub count: u64,
    pub entities: Vec<R>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DestroyedOne<R> {
    pub count: u64,
    pub entity: Option<R>,
}
