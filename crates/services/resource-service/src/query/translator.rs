//! Flat query parameters to structured filters.
//!
//! Wire convention: `<field>_op=<comparator>` for comparator filters,
//! `<field>=<value>` for plain equality filters, `limit=<n>` for the page
//! size of ad-hoc searches.

use domain::constants::{DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT, MIN_SEARCH_LIMIT};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Comparison, Criteria, FilterSet, Predicate};

/// Suffix marking a comparator parameter
pub const OP_SUFFIX: &str = "_op";

/// Reserved parameter carrying the search limit
pub const LIMIT_PARAM: &str = "limit";

static FIELD_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("field name pattern"));

/// Character allow-list for plain filter values.
static PLAIN_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\s_.,:/@-]{1,250}$").expect("plain value pattern"));

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("digits pattern"));

/// Result of translating one request's query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub filters: FilterSet,
    pub limit: u64,
}

impl SearchQuery {
    /// Criteria for a live-row search bounded by the resolved limit
    pub fn into_criteria(self) -> Criteria {
        Criteria::from_filters(self.filters).limit(self.limit)
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            filters: FilterSet::new(),
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

/// Translate raw parameters into a filter set plus a bounded limit.
///
/// Never fails. Parameters that do not follow the grammar are logged at
/// debug level and left out. Predicates are ordered by field name so the
/// output does not depend on the iteration order of the input map.
pub fn translate<I, K, V>(params: I) -> SearchQuery
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut limit = None;
    let mut predicates = Vec::new();

    for (key, value) in params {
        let (key, value) = (key.as_ref(), value.as_ref());

        if key == LIMIT_PARAM {
            limit = Some(resolve_limit(Some(value)));
            continue;
        }

        match parse_param(key, value) {
            Some(predicate) => predicates.push(predicate),
            None => tracing::debug!(param = key, value, "Omitting malformed filter"),
        }
    }

    predicates.sort_by(|a, b| a.field.cmp(&b.field));

    SearchQuery {
        filters: predicates.into_iter().collect(),
        limit: limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
    }
}

fn parse_param(key: &str, value: &str) -> Option<Predicate> {
    if let Some(field) = key.strip_suffix(OP_SUFFIX) {
        if !FIELD_NAME.is_match(field) {
            return None;
        }
        return Comparison::parse(value).map(|comparison| Predicate::new(field, comparison));
    }

    let value = value.trim();
    if !FIELD_NAME.is_match(key) || value.is_empty() || !PLAIN_VALUE.is_match(value) {
        return None;
    }
    Some(Predicate::matches(key, value))
}

/// Resolve a raw `limit` parameter.
///
/// Absent, zero, negative or non-numeric values give the default. Positive
/// values are clamped to the search bounds, including ones too large to
/// represent.
pub fn resolve_limit(raw: Option<&str>) -> u64 {
    let Some(raw) = raw.map(str::trim) else {
        return DEFAULT_SEARCH_LIMIT;
    };
    if !DIGITS.is_match(raw) {
        return DEFAULT_SEARCH_LIMIT;
    }

    match raw.parse::<u64>() {
        Ok(0) => DEFAULT_SEARCH_LIMIT,
        Ok(n) => n.clamp(MIN_SEARCH_LIMIT, MAX_SEARCH_LIMIT),
        // all digits but out of range: larger than any bound
        Err(_) => MAX_SEARCH_LIMIT,
    }
}
