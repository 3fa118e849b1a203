//! Query predicate translation.
//!
//! Turns flat key/value query parameters into structured filter criteria.
//! Malformed input never fails a search: the offending filter is dropped.

mod criteria;
mod predicate;
mod translator;

pub use criteria::{Criteria, SortDirection, SortOrder};
pub use predicate::{Comparison, FilterSet, Predicate};
pub use translator::{resolve_limit, translate, SearchQuery, LIMIT_PARAM, OP_SUFFIX};
