//! Filter sets to sea-orm conditions.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ColumnTrait, ColumnType, Condition, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect,
    Select, Value,
};

use common::{AppError, AppResult};

use crate::query::{Comparison, Criteria, FilterSet, Predicate, SortDirection};

use super::RecordEntity;

/// Resolve a column by its snake_case name
pub(crate) fn column<E: EntityTrait>(name: &str) -> Option<E::Column> {
    E::Column::from_str(name).ok()
}

/// Filter set resolved against one table.
pub(crate) struct Resolved {
    pub(crate) condition: Condition,
    pub(crate) applied: usize,
    /// Fields whose predicate could not apply to the table
    pub(crate) omitted: Vec<String>,
}

/// AND every predicate that maps onto a column of `E`; the rest are dropped.
pub(crate) fn resolve<E: EntityTrait>(filters: &FilterSet) -> Resolved {
    let mut resolved = Resolved {
        condition: Condition::all(),
        applied: 0,
        omitted: Vec::new(),
    };

    for predicate in filters.iter() {
        match expression::<E>(predicate) {
            Some(expr) => {
                resolved.condition = resolved.condition.add(expr);
                resolved.applied += 1;
            }
            None => {
                tracing::debug!(
                    field = %predicate.field,
                    op = predicate.comparison.operator(),
                    "Omitting filter not applicable to this table"
                );
                resolved.omitted.push(predicate.field.clone());
            }
        }
    }

    resolved
}

pub(crate) fn condition<E: EntityTrait>(filters: &FilterSet) -> Condition {
    resolve::<E>(filters).condition
}

/// Number of predicates a write is scoped by.
///
/// Reads drop inapplicable predicates; a write must not, since dropping one
/// widens the set of rows it touches.
pub(crate) fn write_scope<E: RecordEntity>(filters: &FilterSet) -> AppResult<usize> {
    let resolved = resolve::<E>(filters);
    if !resolved.omitted.is_empty() {
        return Err(AppError::validation(format!(
            "{} cannot be filtered by: {}",
            E::LABEL,
            resolved.omitted.join(", ")
        )));
    }
    Ok(resolved.applied)
}

fn expression<E: EntityTrait>(predicate: &Predicate) -> Option<SimpleExpr> {
    let col = column::<E>(&predicate.field)?;
    let expr = match &predicate.comparison {
        Comparison::Matches(raw) => col.eq(typed_value(&col, raw)?),
        // comparators carry integers
        _ if !is_integer(&col) => return None,
        Comparison::Eq(v) => col.eq(*v),
        Comparison::Ne(v) => col.ne(*v),
        Comparison::Gt(v) => col.gt(*v),
        Comparison::Lt(v) => col.lt(*v),
        Comparison::Gte(v) => col.gte(*v),
        Comparison::Lte(v) => col.lte(*v),
        Comparison::Between(low, high) => col.between(*low, *high),
        Comparison::NotBetween(low, high) => col.not_between(*low, *high),
        Comparison::In(values) => col.is_in(values.iter().copied()),
        Comparison::NotIn(values) => col.is_not_in(values.iter().copied()),
    };
    Some(expr)
}

fn is_integer<C: ColumnTrait>(col: &C) -> bool {
    matches!(
        col.def().get_column_type(),
        ColumnType::TinyInteger
            | ColumnType::SmallInteger
            | ColumnType::Integer
            | ColumnType::BigInteger
    )
}

/// Plain filter text typed by the column it is compared against.
fn typed_value<C: ColumnTrait>(col: &C, raw: &str) -> Option<Value> {
    if is_integer(col) {
        return raw.parse::<i64>().ok().map(Value::from);
    }
    match col.def().get_column_type() {
        ColumnType::Boolean => raw.parse::<bool>().ok().map(Value::from),
        ColumnType::Timestamp | ColumnType::TimestampWithTimeZone | ColumnType::DateTime => {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| Value::from(dt.with_timezone(&Utc)))
        }
        ColumnType::Json | ColumnType::JsonBinary => None,
        _ => Some(Value::from(raw.to_string())),
    }
}

/// Base select for a set of criteria: filters, the live-row guard, ordering
/// and limit.
pub(crate) fn select<E: RecordEntity>(criteria: &Criteria) -> Select<E> {
    let mut query = E::find().filter(condition::<E>(&criteria.filters));

    if !criteria.include_deleted {
        query = query.filter(E::deleted_at_column().is_null());
    }

    for sort in &criteria.order {
        match column::<E>(&sort.field) {
            Some(col) => {
                let order = match sort.direction {
                    SortDirection::Asc => Order::Asc,
                    SortDirection::Desc => Order::Desc,
                };
                query = query.order_by(col, order);
            }
            None => tracing::debug!(field = %sort.field, "Ignoring unknown sort field"),
        }
    }

    if let Some(limit) = criteria.limit {
        query = query.limit(limit);
    }

    query
}

/// Random ordering expression understood by Postgres and SQLite
pub(crate) fn random_order() -> SimpleExpr {
    Expr::cust("RANDOM()")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::translate;
    use crate::repository::entities::{Tags, Users};
    use sea_orm::{DbBackend, QueryTrait};

    fn postgres_sql<E: RecordEntity>(params: &[(&str, &str)]) -> String {
        let criteria = translate(params.iter().copied()).into_criteria();
        select::<E>(&criteria).build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn comparators_skip_non_integer_columns() {
        let sql = postgres_sql::<Tags>(&[("name_op", "gt<5>")]);
        assert!(!sql.contains(r#""tags"."name""#), "{sql}");
        assert!(sql.contains(r#""tags"."deleted_at" IS NULL"#), "{sql}");

        let sql = postgres_sql::<Users>(&[
            ("create_at_op", "lt<3>"),
            ("email_verified_op", "eq<1>"),
            ("zipcode_op", "gte<75000>"),
        ]);
        assert!(!sql.contains("create_at"), "{sql}");
        assert!(!sql.contains("email_verified"), "{sql}");
        assert!(sql.contains(r#""users"."zipcode" >= 75000"#), "{sql}");
    }

    #[test]
    fn resolve_reports_omitted_fields() {
        let filters = translate([
            ("name_op", "gt<5>"),
            ("nme", "rust"),
            ("id_op", "in<1,2>"),
            ("metadata", "x"),
        ])
        .filters;

        let resolved = resolve::<Tags>(&filters);
        assert_eq!(resolved.applied, 1);
        assert_eq!(resolved.omitted, ["metadata", "name", "nme"]);
    }

    #[test]
    fn write_scope_rejects_any_omission() {
        let filters = translate([("id_op", "eq<1>"), ("no_such_column", "x")]).filters;
        assert!(matches!(write_scope::<Tags>(&filters), Err(AppError::Validation(_))));

        let filters = translate([("id_op", "eq<1>"), ("name", "rust")]).filters;
        assert_eq!(write_scope::<Tags>(&filters).unwrap(), 2);
        assert_eq!(write_scope::<Tags>(&FilterSet::new()).unwrap(), 0);
    }
}
