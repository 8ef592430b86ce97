//! SQL rendering of [`ListingQuery`] for the knack and knack idea tables.
//!
//! Queries join the owner as `u`; the listed table uses the alias passed in.
//! Conditions are ANDed; the free-text search is a single ORed group.

use knacks_core::listing::{like_pattern, ListingQuery, SortOrder};

/// Typed bind value for dynamically-built listing queries.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BindValue {
    BigInt(i64),
    BigIntArray(Vec<i64>),
    Double(f64),
    Text(String),
}

/// Build a WHERE clause and bind values from a listing query.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
/// The `where_clause` is empty if no filters are active, or starts with `WHERE `.
pub(crate) fn build_listing_filter(query: &ListingQuery, alias: &str) -> (String, Vec<BindValue>, u32) {
    let filter = &query.filter;
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    let mut push = |condition: String, value: BindValue, bind_idx: &mut u32| {
        conditions.push(condition);
        bind_values.push(value);
        *bind_idx += 1;
    };

    if let Some(id) = filter.id {
        push(format!("{alias}.id = ${bind_idx}"), BindValue::BigInt(id), &mut bind_idx);
    }

    if let Some(user_id) = filter.user_id {
        push(
            format!("{alias}.owner_id = ${bind_idx}"),
            BindValue::BigInt(user_id),
            &mut bind_idx,
        );
    }

    if let Some(ref kind) = filter.kind {
        push(
            format!("{alias}.type = ${bind_idx}"),
            BindValue::Text(kind.clone()),
            &mut bind_idx,
        );
    }

    if let Some(min_age) = filter.min_age {
        push(format!("u.age >= ${bind_idx}"), BindValue::Double(min_age), &mut bind_idx);
    }

    if let Some(max_age) = filter.max_age {
        push(format!("u.age <= ${bind_idx}"), BindValue::Double(max_age), &mut bind_idx);
    }

    if let Some(min_price) = filter.min_price {
        push(
            format!("{alias}.price >= ${bind_idx}"),
            BindValue::Double(min_price),
            &mut bind_idx,
        );
    }

    if let Some(max_price) = filter.max_price {
        push(
            format!("{alias}.price <= ${bind_idx}"),
            BindValue::Double(max_price),
            &mut bind_idx,
        );
    }

    if let Some(ref gender) = filter.gender {
        push(
            format!("u.gender = ${bind_idx}"),
            BindValue::Text(gender.clone()),
            &mut bind_idx,
        );
    }

    if let Some(ref college) = filter.college {
        push(
            format!("LOWER(u.college) = LOWER(${bind_idx})"),
            BindValue::Text(college.clone()),
            &mut bind_idx,
        );
    }

    if !filter.categories.is_empty() {
        push(
            format!("{alias}.category_id = ANY(${bind_idx})"),
            BindValue::BigIntArray(filter.categories.clone()),
            &mut bind_idx,
        );
    }

    if let Some(ref search_text) = query.search_text {
        push(
            format!(
                "(u.first_name ILIKE ${bind_idx} OR u.last_name ILIKE ${bind_idx} \
                 OR {alias}.name ILIKE ${bind_idx} OR {alias}.description ILIKE ${bind_idx})"
            ),
            BindValue::Text(like_pattern(search_text)),
            &mut bind_idx,
        );
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// ORDER BY clause for a listing query.
///
/// Ties on `modified_at` are broken by id so pagination stays stable.
pub(crate) fn order_clause(sort: SortOrder, alias: &str) -> String {
    match sort {
        SortOrder::ModifiedDesc => format!("ORDER BY {alias}.modified_at DESC, {alias}.id DESC"),
        SortOrder::Default => format!("ORDER BY {alias}.id ASC"),
    }
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
pub(crate) fn bind_listing_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::BigIntArray(v) => q = q.bind(v.as_slice()),
            BindValue::Double(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
pub(crate) fn bind_listing_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::BigIntArray(v) => q = q.bind(v.as_slice()),
            BindValue::Double(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}
