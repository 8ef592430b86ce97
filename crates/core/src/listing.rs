//! Listing query parsing for knacks and knack ideas.
//!
//! Request parameters arrive as a flat string map. [`ListingQuery::from_params`]
//! turns them into a typed filter plus sort order without any knowledge of
//! the storage schema; the repository layer renders the result into SQL.
//!
//! The same parameter set applies to both knacks and knack ideas.

use std::collections::HashMap;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Parameter names
// ---------------------------------------------------------------------------

pub const PARAM_ID: &str = "id";
pub const PARAM_USER_ID: &str = "user_id";
pub const PARAM_TYPE: &str = "type";
pub const PARAM_MIN_AGE: &str = "min_age";
pub const PARAM_MAX_AGE: &str = "max_age";
pub const PARAM_MIN_PRICE: &str = "min_price";
pub const PARAM_MAX_PRICE: &str = "max_price";
pub const PARAM_GENDER: &str = "gender";
pub const PARAM_COLLEGE: &str = "college";
pub const PARAM_CATEGORIES: &str = "categories";
pub const PARAM_SEARCH_TEXT: &str = "search_text";
pub const PARAM_SORT_BY: &str = "sort_by";

/// Owner parameters that are dropped entirely when sent as an empty string.
const BLANK_DROPPED_PARAMS: &[&str] = &[PARAM_GENDER, PARAM_COLLEGE];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Structured filter over a knack (or knack idea) collection.
///
/// Every field is optional; `None` (or an empty `categories` list) means the
/// corresponding restriction is not applied. Numeric bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    /// Exact match on the entity id.
    pub id: Option<DbId>,
    /// Exact match on the owner id.
    pub user_id: Option<DbId>,
    /// Exact match on the entity `type` column.
    pub kind: Option<String>,
    /// Owner age lower bound.
    pub min_age: Option<f64>,
    /// Owner age upper bound.
    pub max_age: Option<f64>,
    /// Entity price lower bound.
    pub min_price: Option<f64>,
    /// Entity price upper bound.
    pub max_price: Option<f64>,
    /// Exact, case-sensitive match on owner gender.
    pub gender: Option<String>,
    /// Case-insensitive match on owner college.
    pub college: Option<String>,
    /// Category id membership. Empty means unrestricted.
    pub categories: Vec<DbId>,
}

impl ListingFilter {
    /// Whether no restriction at all is active.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Result ordering for listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Storage default (stable id order).
    #[default]
    Default,
    /// Most recently modified first.
    ModifiedDesc,
}

/// A fully parsed listing request: filter, free-text search and ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    pub filter: ListingFilter,
    /// Case-insensitive substring searched in owner first/last name, entity
    /// name and description, combined with OR.
    pub search_text: Option<String>,
    pub sort: SortOrder,
}

impl ListingQuery {
    /// Parse a listing query from raw request parameters.
    ///
    /// Unrecognised parameters are ignored. A malformed numeric value fails
    /// the whole parse with [`CoreError::FieldValidation`] naming the field,
    /// so no partial filter ever reaches the database.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, CoreError> {
        let mut params = params.clone();
        strip_blank_owner_params(&mut params);

        let filter = ListingFilter {
            id: parse_id(&params, PARAM_ID)?,
            user_id: parse_id(&params, PARAM_USER_ID)?,
            kind: non_empty(&params, PARAM_TYPE).map(str::to_string),
            min_age: parse_number(&params, PARAM_MIN_AGE)?,
            max_age: parse_number(&params, PARAM_MAX_AGE)?,
            min_price: parse_number(&params, PARAM_MIN_PRICE)?,
            max_price: parse_number(&params, PARAM_MAX_PRICE)?,
            gender: params.get(PARAM_GENDER).cloned(),
            college: params.get(PARAM_COLLEGE).cloned(),
            categories: parse_id_list(&params, PARAM_CATEGORIES)?,
        };

        let search_text = non_empty(&params, PARAM_SEARCH_TEXT).map(str::to_string);

        let sort = if non_empty(&params, PARAM_SORT_BY).is_some() {
            SortOrder::ModifiedDesc
        } else {
            SortOrder::Default
        };

        Ok(Self {
            filter,
            search_text,
            sort,
        })
    }

    /// Force most-recently-modified-first ordering.
    pub fn newest_first(mut self) -> Self {
        self.sort = SortOrder::ModifiedDesc;
        self
    }
}

// ---------------------------------------------------------------------------
// Parameter helpers
// ---------------------------------------------------------------------------

/// Remove `gender` and `college` when they were sent as empty strings.
///
/// An empty owner parameter is indistinguishable from an absent one.
pub fn strip_blank_owner_params(params: &mut HashMap<String, String>) {
    for key in BLANK_DROPPED_PARAMS {
        if params.get(*key).is_some_and(|v| v.is_empty()) {
            params.remove(*key);
        }
    }
}

/// Build an `ILIKE` pattern matching `text` as a literal substring.
///
/// `\`, `%` and `_` are escaped so user input cannot act as a wildcard.
pub fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn non_empty<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

fn parse_id(params: &HashMap<String, String>, key: &'static str) -> Result<Option<DbId>, CoreError> {
    non_empty(params, key)
        .map(|raw| {
            raw.trim()
                .parse::<DbId>()
                .map_err(|_| CoreError::field(key, format!("'{raw}' is not a valid integer")))
        })
        .transpose()
}

fn parse_number(
    params: &HashMap<String, String>,
    key: &'static str,
) -> Result<Option<f64>, CoreError> {
    non_empty(params, key)
        .map(|raw| match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(CoreError::field(key, format!("'{raw}' is not a valid number"))),
        })
        .transpose()
}

fn parse_id_list(
    params: &HashMap<String, String>,
    key: &'static str,
) -> Result<Vec<DbId>, CoreError> {
    let Some(raw) = non_empty(params, key) else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<DbId>().map_err(|_| {
                CoreError::field(key, format!("'{token}' is not a valid category id"))
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
