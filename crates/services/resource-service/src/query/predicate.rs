//! Filter predicates: one tagged variant per comparison operator.

use once_cell::sync::Lazy;
use regex::Regex;

/// `<op><N>`, `<between|notBetween><A,B>` or `<in|notIn><N,...>`, unsigned integers only.
static COMPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(eq|ne|gte|lte|gt|lt)<(\d+)>|(between|notBetween)<(\d+),(\d+)>|(in|notIn)<(\d+(?:,\d+)*)>)$",
    )
    .expect("comparator pattern")
});

/// Comparison applied to a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Eq(i64),
    Ne(i64),
    Gt(i64),
    Lt(i64),
    Gte(i64),
    Lte(i64),
    /// Inclusive range, stored low bound first
    Between(i64, i64),
    /// Outside the inclusive range, stored low bound first
    NotBetween(i64, i64),
    /// Non-empty set membership
    In(Vec<i64>),
    NotIn(Vec<i64>),
    /// Plain field value; compared for equality, typed by the target column
    Matches(String),
}

impl Comparison {
    /// Parse a comparator expression such as `gt<5>` or `in<1,2,3>`.
    ///
    /// Returns `None` for anything outside the grammar, including integers
    /// that do not fit in an `i64`.
    pub fn parse(expr: &str) -> Option<Self> {
        let caps = COMPARATOR.captures(expr.trim())?;

        if let (Some(op), Some(value)) = (caps.get(1), caps.get(2)) {
            let value: i64 = value.as_str().parse().ok()?;
            return Some(match op.as_str() {
                "eq" => Comparison::Eq(value),
                "ne" => Comparison::Ne(value),
                "gt" => Comparison::Gt(value),
                "lt" => Comparison::Lt(value),
                "gte" => Comparison::Gte(value),
                "lte" => Comparison::Lte(value),
                _ => return None,
            });
        }

        if let (Some(op), Some(a), Some(b)) = (caps.get(3), caps.get(4), caps.get(5)) {
            let a: i64 = a.as_str().parse().ok()?;
            let b: i64 = b.as_str().parse().ok()?;
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            return Some(match op.as_str() {
                "between" => Comparison::Between(low, high),
                "notBetween" => Comparison::NotBetween(low, high),
                _ => return None,
            });
        }

        if let (Some(op), Some(list)) = (caps.get(6), caps.get(7)) {
            let values = list
                .as_str()
                .split(',')
                .map(str::parse::<i64>)
                .collect::<Result<Vec<_>, _>>()
                .ok()?;
            return Some(match op.as_str() {
                "in" => Comparison::In(values),
                "notIn" => Comparison::NotIn(values),
                _ => return None,
            });
        }

        None
    }

    /// Operator name as written in the query grammar
    pub fn operator(&self) -> &'static str {
        match self {
            Comparison::Eq(_) => "eq",
            Comparison::Ne(_) => "ne",
            Comparison::Gt(_) => "gt",
            Comparison::Lt(_) => "lt",
            Comparison::Gte(_) => "gte",
            Comparison::Lte(_) => "lte",
            Comparison::Between(..) => "between",
            Comparison::NotBetween(..) => "notBetween",
            Comparison::In(_) => "in",
            Comparison::NotIn(_) => "notIn",
            Comparison::Matches(_) => "matches",
        }
    }
}

/// A single `(field, comparison)` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub field: String,
    pub comparison: Comparison,
}

impl Predicate {
    pub fn new(field: impl Into<String>, comparison: Comparison) -> Self {
        Self {
            field: field.into(),
            comparison,
        }
    }

    /// Integer equality
    pub fn eq(field: impl Into<String>, value: i64) -> Self {
        Self::new(field, Comparison::Eq(value))
    }

    /// Plain-value equality, typed by the column it lands on
    pub fn matches(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, Comparison::Matches(value.into()))
    }
}

/// Predicates combined with logical AND. There is no OR and no grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    predicates: Vec<Predicate>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    /// Builder-style push
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.push(predicate);
        self
    }

    /// Append every predicate of another set
    pub fn extend(&mut self, other: FilterSet) {
        self.predicates.extend(other.predicates);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Predicate> {
        self.predicates.iter()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// First predicate targeting `field`
    pub fn get(&self, field: &str) -> Option<&Predicate> {
        self.predicates.iter().find(|p| p.field == field)
    }
}

impl FromIterator<Predicate> for FilterSet {
    fn from_iter<I: IntoIterator<Item = Predicate>>(iter: I) -> Self {
        Self {
            predicates: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FilterSet {
    type Item = Predicate;
    type IntoIter = std::vec::IntoIter<Predicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.predicates.into_iter()
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a Predicate;
    type IntoIter = std::slice::Iter<'a, Predicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.predicates.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_value_operators() {
        assert_eq!(Comparison::parse("gt<5>"), Some(Comparison::Gt(5)));
        assert_eq!(Comparison::parse("gte<5>"), Some(Comparison::Gte(5)));
        assert_eq!(Comparison::parse("lt<0>"), Some(Comparison::Lt(0)));
        assert_eq!(Comparison::parse("lte<12>"), Some(Comparison::Lte(12)));
        assert_eq!(Comparison::parse("eq<42>"), Some(Comparison::Eq(42)));
        assert_eq!(Comparison::parse("ne<7>"), Some(Comparison::Ne(7)));
    }

    #[test]
    fn parses_ranges_inclusively() {
        assert_eq!(
            Comparison::parse("between<1,10>"),
            Some(Comparison::Between(1, 10))
        );
        assert_eq!(
            Comparison::parse("notBetween<3,4>"),
            Some(Comparison::NotBetween(3, 4))
        );
    }

    #[test]
    fn reversed_range_bounds_are_normalised() {
        assert_eq!(
            Comparison::parse("between<10,1>"),
            Some(Comparison::Between(1, 10))
        );
    }

    #[test]
    fn parses_sets() {
        assert_eq!(
            Comparison::parse("in<1,2,3>"),
            Some(Comparison::In(vec![1, 2, 3]))
        );
        assert_eq!(Comparison::parse("notIn<9>"), Some(Comparison::NotIn(vec![9])));
    }

    #[test]
    fn rejects_malformed_expressions() {
        for raw in [
            "gt<>",
            "foo<5>",
            "between<1>",
            "between<1,2,3>",
            "in<>",
            "in<1,>",
            "gt<-5>",
            "gt<5",
            "gt 5",
            "GT<5>",
            "gt<5>x",
            "gt<99999999999999999999>",
        ] {
            assert_eq!(Comparison::parse(raw), None, "{raw} should not parse");
        }
    }

    #[test]
    fn filter_set_keeps_insertion_order() {
        let set = FilterSet::new()
            .and(Predicate::eq("id", 1))
            .and(Predicate::matches("city", "Paris"));
        let fields: Vec<_> = set.iter().map(|p| p.field.as_str()).collect();
        assert_eq!(fields, ["id", "city"]);
        assert_eq!(set.get("city").map(|p| p.comparison.operator()), Some("matches"));
    }
}
