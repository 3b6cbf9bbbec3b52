//! # Filter Expressions
//!
//! Field predicates evaluated against stored records.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    /// Equals
    #[serde(rename = "$eq")]
    Eq,

    /// Not equals
    #[serde(rename = "$ne")]
    Ne,

    /// Greater than
    #[serde(rename = "$gt")]
    Gt,

    /// Greater than or equal
    #[serde(rename = "$gte")]
    Gte,

    /// Less than
    #[serde(rename = "$lt")]
    Lt,

    /// Less than or equal
    #[serde(rename = "$lte")]
    Lte,

    /// Value in list
    #[serde(rename = "$in")]
    In,

    /// Value not in list
    #[serde(rename = "$nin")]
    Nin,

    /// Pattern match (% and _ wildcards)
    #[serde(rename = "$like")]
    Like,
}

impl FilterOperator {
    /// Get the operator string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "$eq",
            FilterOperator::Ne => "$ne",
            FilterOperator::Gt => "$gt",
            FilterOperator::Gte => "$gte",
            FilterOperator::Lt => "$lt",
            FilterOperator::Lte => "$lte",
            FilterOperator::In => "$in",
            FilterOperator::Nin => "$nin",
            FilterOperator::Like => "$like",
        }
    }

    /// Parse an operator token such as `$gt`
    pub fn parse(token: &str) -> Option<Self> {
        let op = match token {
            "$eq" => FilterOperator::Eq,
            "$ne" => FilterOperator::Ne,
            "$gt" => FilterOperator::Gt,
            "$gte" => FilterOperator::Gte,
            "$lt" => FilterOperator::Lt,
            "$lte" => FilterOperator::Lte,
            "$in" => FilterOperator::In,
            "$nin" => FilterOperator::Nin,
            "$like" => FilterOperator::Like,
            _ => return None,
        };
        Some(op)
    }

    /// Operators whose operand is a list
    pub fn takes_list(&self) -> bool {
        matches!(self, FilterOperator::In | FilterOperator::Nin)
    }
}

/// A filter expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterExpr {
    /// Field to filter on
    pub field: String,

    /// Comparison operator
    pub operator: FilterOperator,

    /// Value to compare against
    pub value: Value,

    /// Request text behind a coerced `value` (a string, or a list of strings
    /// for `$in`/`$nin`); equality also accepts a record holding that text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl FilterExpr {
    /// Create a new filter expression
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
            raw: None,
        }
    }

    /// Also accept records whose field holds the original request text
    pub fn with_raw(mut self, raw: Value) -> Self {
        self.raw = Some(raw);
        self
    }

    /// Create an equality filter
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::Eq, value)
    }

    /// Create a greater than filter
    pub fn gt(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::Gt, value)
    }

    /// Create a less than filter
    pub fn lt(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::Lt, value)
    }

    /// Create an "in list" filter
    pub fn in_list(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::new(field, FilterOperator::In, Value::Array(values))
    }

    /// Check if a record matches this filter.
    ///
    /// A record without the field never matches, whatever the operator.
    pub fn matches(&self, record: &Map<String, Value>) -> bool {
        let field_value = match record.get(&self.field) {
            Some(v) => v,
            None => return false,
        };

        match self.operator {
            FilterOperator::Eq => self.equals_operand(field_value),
            FilterOperator::Ne => !self.equals_operand(field_value),
            FilterOperator::Gt => same_kind_cmp(field_value, &self.value) == Some(Ordering::Greater),
            FilterOperator::Gte => matches!(
                same_kind_cmp(field_value, &self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FilterOperator::Lt => same_kind_cmp(field_value, &self.value) == Some(Ordering::Less),
            FilterOperator::Lte => matches!(
                same_kind_cmp(field_value, &self.value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            FilterOperator::In => self.listed(field_value),
            FilterOperator::Nin => self.value.is_array() && !self.listed(field_value),
            FilterOperator::Like => match (field_value.as_str(), self.value.as_str()) {
                (Some(text), Some(pattern)) => like_match(text, pattern),
                _ => false,
            },
        }
    }

    fn equals_operand(&self, field_value: &Value) -> bool {
        values_equal(field_value, &self.value)
            || self
                .raw
                .as_ref()
                .is_some_and(|raw| values_equal(field_value, raw))
    }

    /// Whether the field equals any entry of the `$in`/`$nin` list
    fn listed(&self, field_value: &Value) -> bool {
        let contains = |list: Option<&Vec<Value>>| {
            list.is_some_and(|items| items.iter().any(|item| values_equal(field_value, item)))
        };

        contains(self.value.as_array()) || contains(self.raw.as_ref().and_then(Value::as_array))
    }
}

/// Equality where numbers compare by value (`2` equals `2.0`) and other
/// kinds compare structurally; different kinds are never equal
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => number_cmp(a, b) == Some(Ordering::Equal),
        _ => a == b,
    }
}

/// Order two values of the same kind; `None` when the kinds differ
fn same_kind_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => number_cmp(a, b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn number_cmp(a: &serde_json::Number, b: &serde_json::Number) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return Some(a.cmp(&b));
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return Some(a.cmp(&b));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

/// Rank of a JSON kind when ordering mixed values
fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order used for sorting.
///
/// Missing values sort after present ones; different kinds order by kind.
pub(crate) fn sort_cmp(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (Some(a), Some(b)) => same_kind_cmp(a, b)
            .unwrap_or_else(|| kind_rank(a).cmp(&kind_rank(b))),
    }
}

/// LIKE matching: `%` is any run of characters, `_` exactly one
fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    // Iterative wildcard match with single backtrack point
    let (mut t, mut p) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '%' {
            star = Some((p, t));
            p += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == '%' {
        p += 1;
    }
    p == pattern.len()
}

/// A set of filters combined with AND logic
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    pub filters: Vec<FilterExpr>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, filter: FilterExpr) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn push(&mut self, filter: FilterExpr) {
        self.filters.push(filter);
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Check if a record matches all filters
    pub fn matches(&self, record: &Map<String, Value>) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_eq_filter_is_type_sensitive() {
        let filter = FilterExpr::eq("n", json!(1));

        assert!(filter.matches(&rec(json!({"n": 1}))));
        assert!(!filter.matches(&rec(json!({"n": "1"}))));
    }

    #[test]
    fn test_numeric_equality_ignores_representation() {
        let record = rec(json!({"price": 2}));

        assert!(FilterExpr::eq("price", json!(2.0)).matches(&record));
        assert!(FilterExpr::in_list("price", vec![json!(2.0)]).matches(&record));
        assert!(!FilterExpr::new("price", FilterOperator::Ne, json!(2.0)).matches(&record));
        assert!(!FilterExpr::new("price", FilterOperator::Nin, json!([2.0])).matches(&record));
        assert!(!FilterExpr::eq("price", json!("2")).matches(&record));
    }

    #[test]
    fn test_raw_text_also_matches() {
        let filter = FilterExpr::eq("zip", json!(12345)).with_raw(json!("12345"));
        assert!(filter.matches(&rec(json!({"zip": "12345"}))));
        assert!(filter.matches(&rec(json!({"zip": 12345}))));
        assert!(!filter.matches(&rec(json!({"zip": "12346"}))));

        let nin = FilterExpr::new("code", FilterOperator::Nin, json!([7])).with_raw(json!(["007"]));
        assert!(!nin.matches(&rec(json!({"code": "007"}))));
        assert!(nin.matches(&rec(json!({"code": "008"}))));
    }

    #[test]
    fn test_missing_field_never_matches() {
        let record = rec(json!({"name": "Alice"}));

        assert!(!FilterExpr::eq("status", json!("active")).matches(&record));
        assert!(!FilterExpr::new("status", FilterOperator::Ne, json!("active")).matches(&record));
        assert!(!FilterExpr::new("status", FilterOperator::Nin, json!(["x"])).matches(&record));
    }

    #[test]
    fn test_gt_filter() {
        let filter = FilterExpr::gt("age", json!(18));

        assert!(filter.matches(&rec(json!({"age": 21}))));
        assert!(filter.matches(&rec(json!({"age": 18.5}))));
        assert!(!filter.matches(&rec(json!({"age": 18}))));
        assert!(!filter.matches(&rec(json!({"age": "21"}))));
    }

    #[test]
    fn test_lte_filter() {
        let filter = FilterExpr::new("name", FilterOperator::Lte, json!("m"));

        assert!(filter.matches(&rec(json!({"name": "alice"}))));
        assert!(filter.matches(&rec(json!({"name": "m"}))));
        assert!(!filter.matches(&rec(json!({"name": "zed"}))));
    }

    #[test]
    fn test_in_and_nin_filters() {
        let filter = FilterExpr::in_list("status", vec![json!("active"), json!("pending")]);

        assert!(filter.matches(&rec(json!({"status": "active"}))));
        assert!(filter.matches(&rec(json!({"status": "pending"}))));
        assert!(!filter.matches(&rec(json!({"status": "inactive"}))));

        let nin = FilterExpr::new("status", FilterOperator::Nin, json!(["active"]));
        assert!(nin.matches(&rec(json!({"status": "inactive"}))));
        assert!(!nin.matches(&rec(json!({"status": "active"}))));
    }

    #[test]
    fn test_like_filter() {
        let filter = FilterExpr::new("name", FilterOperator::Like, json!("%son"));

        assert!(filter.matches(&rec(json!({"name": "Johnson"}))));
        assert!(filter.matches(&rec(json!({"name": "Wilson"}))));
        assert!(!filter.matches(&rec(json!({"name": "Smith"}))));

        assert!(like_match("abc", "a_c"));
        assert!(like_match("abc", "%"));
        assert!(like_match("", "%"));
        assert!(!like_match("abc", "a_"));
        assert!(like_match("aXbXc", "a%b%c"));
    }

    #[test]
    fn test_filter_set() {
        let filters = FilterSet::new()
            .and(FilterExpr::eq("status", json!("active")))
            .and(FilterExpr::gt("age", json!(18)));

        assert!(filters.matches(&rec(json!({"status": "active", "age": 21}))));
        assert!(!filters.matches(&rec(json!({"status": "inactive", "age": 21}))));
        assert!(FilterSet::new().matches(&rec(json!({}))));
    }

    #[test]
    fn test_sort_cmp_orders_missing_last() {
        let one = json!(1);
        let text = json!("a");
        assert_eq!(sort_cmp(Some(&one), None), Ordering::Less);
        assert_eq!(sort_cmp(None, Some(&one)), Ordering::Greater);
        assert_eq!(sort_cmp(Some(&one), Some(&text)), Ordering::Less);
    }
}
