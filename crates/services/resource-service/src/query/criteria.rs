use super::{FilterSet, Predicate};

/// Sort direction for [`SortOrder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: String,
    pub direction: SortDirection,
}

/// What a repository call selects: AND-ed filters, soft-delete mode,
/// optional ordering and an optional row bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub filters: FilterSet,
    /// Include rows whose `deleted_at` is set
    pub include_deleted: bool,
    pub order: Vec<SortOrder>,
    pub limit: Option<u64>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_filters(filters: FilterSet) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    /// Criteria selecting a single row by primary key
    pub fn by_id(id: i32) -> Self {
        Self::new().filter(Predicate::eq("id", i64::from(id)))
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filters.push(predicate);
        self
    }

    /// Integer equality shorthand
    pub fn eq(self, field: impl Into<String>, value: i64) -> Self {
        self.filter(Predicate::eq(field, value))
    }

    /// Plain-value equality shorthand
    pub fn matches(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter(Predicate::matches(field, value))
    }

    /// Also return soft-deleted rows
    pub fn with_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order.push(SortOrder {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}
