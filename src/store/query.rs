//! # Query Translation
//!
//! Turns flat request parameters into the filter, sort and pagination
//! structure the record store evaluates.
//!
//! Control parameters all start with `$`:
//!
//! - `$limit=<n>` / `$offset=<n>` (alias `$skip`)
//! - `$sort=name,-age` or `$sort[name]=1` / `$sort[age]=-1`
//! - `$paginate=false` returns every match as a plain array
//! - `$select=name,email` projects fields (the identifier is always kept)
//!
//! Every other key filters: `status=active` is equality, `age[$gt]=18`
//! applies an operator.

use std::collections::HashMap;
use std::num::IntErrorKind;

use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use super::filter::{FilterExpr, FilterOperator, FilterSet};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// A parsed find query
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Field predicates, all of which must hold
    pub filters: FilterSet,

    /// Sort keys, most significant first
    pub sort: Vec<SortKey>,

    /// Requested page size (None = store default)
    pub limit: Option<usize>,

    /// Number of matches to skip
    pub offset: usize,

    /// False returns every match without an envelope
    pub paginate: bool,

    /// Fields to keep (None = all)
    pub select: Option<Vec<String>>,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            filters: FilterSet::new(),
            sort: Vec::new(),
            limit: None,
            offset: 0,
            paginate: true,
            select: None,
        }
    }
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: FilterExpr) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sort.push(key);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn without_pagination(mut self) -> Self {
        self.paginate = false;
        self
    }

    pub fn select(mut self, fields: Vec<String>) -> Self {
        self.select = Some(fields);
        self
    }

    /// Parse query parameters from a HashMap.
    ///
    /// Keys are visited in sorted order so repeated `$sort[...]` keys
    /// resolve deterministically; use [`Query::from_pairs`] to keep the
    /// caller's order.
    pub fn from_params(params: &HashMap<String, String>) -> StoreResult<Self> {
        let mut pairs: Vec<(&String, &String)> = params.iter().collect();
        pairs.sort();
        Self::from_pairs(pairs)
    }

    /// Parse query parameters in the order given
    pub fn from_pairs<I, K, V>(pairs: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Query::default();

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());

            if let Some(control) = key.strip_prefix('$') {
                query.apply_control(control, value)?;
            } else {
                query.filters.push(parse_filter(key, value)?);
            }
        }

        Ok(query)
    }

    fn apply_control(&mut self, control: &str, value: &str) -> StoreResult<()> {
        match control {
            "limit" => self.limit = Some(parse_count("$limit", value)?),
            "offset" | "skip" => self.offset = parse_count("$offset", value)?,
            "sort" => self.sort.extend(parse_sort_list(value)?),
            "paginate" => self.paginate = parse_flag("$paginate", value)?,
            "select" => self.select = Some(parse_select(value)?),
            _ => {
                if let Some(field) = control
                    .strip_prefix("sort[")
                    .and_then(|rest| rest.strip_suffix(']'))
                {
                    self.sort.push(parse_sort_entry(field, value)?);
                } else {
                    return Err(StoreError::invalid_query(format!(
                        "Unknown control parameter: ${}",
                        control
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Parse a non-negative integer parameter
///
/// Values too large for `usize` saturate; the store clamps them anyway.
fn parse_count(name: &str, value: &str) -> StoreResult<usize> {
    value.trim().parse::<usize>().or_else(|e| match e.kind() {
        IntErrorKind::PosOverflow => Ok(usize::MAX),
        _ => Err(StoreError::invalid_query(format!("Invalid {}: {}", name, value))),
    })
}

fn parse_flag(name: &str, value: &str) -> StoreResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(StoreError::invalid_query(format!(
            "Invalid {}: {}",
            name, value
        ))),
    }
}

/// Parse `$sort=name,-age`
fn parse_sort_list(value: &str) -> StoreResult<Vec<SortKey>> {
    let mut keys = Vec::new();

    for part in value.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let key = match part.strip_prefix('-') {
            Some(field) => SortKey::desc(field),
            None => SortKey::asc(part.strip_prefix('+').unwrap_or(part)),
        };

        if key.field.is_empty() {
            return Err(StoreError::invalid_query(format!("Invalid $sort: {}", value)));
        }
        keys.push(key);
    }

    if keys.is_empty() {
        return Err(StoreError::invalid_query("$sort cannot be empty"));
    }

    Ok(keys)
}

/// Parse `$sort[field]=<direction>`
fn parse_sort_entry(field: &str, direction: &str) -> StoreResult<SortKey> {
    if field.is_empty() {
        return Err(StoreError::invalid_query("$sort field cannot be empty"));
    }

    match direction.trim().to_lowercase().as_str() {
        "1" | "asc" => Ok(SortKey::asc(field)),
        "-1" | "desc" => Ok(SortKey::desc(field)),
        _ => Err(StoreError::invalid_query(format!(
            "Invalid sort direction for {}: {}",
            field, direction
        ))),
    }
}

/// Parse `$select` (comma-separated field list)
fn parse_select(value: &str) -> StoreResult<Vec<String>> {
    let fields: Vec<String> = value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if fields.is_empty() {
        return Err(StoreError::invalid_query("$select cannot be empty"));
    }

    Ok(fields)
}

/// Parse `field=value` or `field[$op]=value`
fn parse_filter(key: &str, value: &str) -> StoreResult<FilterExpr> {
    let operator_part = key
        .find('[')
        .filter(|_| key.ends_with(']'))
        .map(|open| (&key[..open], &key[open + 1..key.len() - 1]));

    let (field, operator) = match operator_part {
        Some((field, token)) if token.starts_with('$') => {
            let op = FilterOperator::parse(token).ok_or_else(|| {
                StoreError::invalid_query(format!("Unknown operator {} on {}", token, field))
            })?;
            (field, op)
        }
        _ => (key, FilterOperator::Eq),
    };

    if field.is_empty() {
        return Err(StoreError::invalid_query(format!("Invalid filter: {}", key)));
    }

    if operator == FilterOperator::Like {
        return Ok(FilterExpr::new(field, operator, Value::String(value.to_string())));
    }

    // Keep the text next to the coerced value so "12345" or "true" stored as
    // strings stay reachable from a query string
    let (typed, raw) = if operator.takes_list() {
        let items: Vec<&str> = value.split(',').map(str::trim).collect();
        let typed: Vec<Value> = items.iter().map(|item| coerce_scalar(item)).collect();
        let raw = typed
            .iter()
            .any(|v| !v.is_string())
            .then(|| Value::Array(items.iter().map(|item| Value::from(*item)).collect()));
        (Value::Array(typed), raw)
    } else {
        let typed = coerce_scalar(value);
        let raw = (!typed.is_string()).then(|| Value::from(value));
        (typed, raw)
    };

    let expr = FilterExpr::new(field, operator, typed);
    Ok(match raw {
        Some(raw) => expr.with_raw(raw),
        None => expr,
    })
}

/// Interpret a raw string as a JSON scalar.
///
/// Only text that is itself a JSON `null`, boolean or number converts, so
/// non-canonical spellings such as `007` or `+5` stay strings.
fn coerce_scalar(value: &str) -> Value {
    match serde_json::from_str::<Value>(value) {
        Ok(scalar @ (Value::Null | Value::Bool(_) | Value::Number(_))) => scalar,
        _ => Value::String(value.to_string()),
    }
}
