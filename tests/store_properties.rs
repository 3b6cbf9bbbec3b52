//! Record Store Property Tests
//!
//! Observable guarantees of the in-memory store:
//! - Assigned identifiers increase strictly and are never reused
//! - Reads return exactly what was written
//! - Pagination slices after filtering and sorting, with the full total
//! - Disabling pagination returns every match as a plain array

use pulse_api::store::{
    FilterExpr, FindResult, Query, RecordStore, SortKey, StoreConfig, StoreError,
};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn store_with(count: usize) -> RecordStore {
    let mut store = RecordStore::new(StoreConfig::default());
    for i in 0..count {
        store.create(json!({ "n": i })).unwrap();
    }
    store
}

fn ids(result: &FindResult) -> Vec<u64> {
    result
        .records()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect()
}

// =============================================================================
// Identifier Tests
// =============================================================================

/// Sequential creates yield strictly increasing ids from the start id.
#[test]
fn test_ids_increase_from_start_id() {
    let mut store = RecordStore::new(StoreConfig::default().with_start_id(100));

    let assigned: Vec<u64> = (0..5)
        .map(|_| store.create(json!({})).unwrap()["id"].as_u64().unwrap())
        .collect();

    assert_eq!(assigned, vec![100, 101, 102, 103, 104]);
}

/// Removing the newest record does not free its id.
#[test]
fn test_ids_not_reused_after_remove() {
    let mut store = store_with(3);
    store.remove(3).unwrap();

    let next = store.create(json!({})).unwrap();
    assert_eq!(next["id"], 4);
}

/// A caller-supplied id cannot bring back a removed record's id.
#[test]
fn test_supplied_id_not_reused_after_remove() {
    let mut store = store_with(3);
    store.remove(3).unwrap();

    assert!(matches!(
        store.create(json!({ "id": 3 })),
        Err(StoreError::InvalidRecord(_))
    ));
    assert_eq!(store.create(json!({ "id": 10 })).unwrap()["id"], 10);
    assert_eq!(store.create(json!({})).unwrap()["id"], 11);
}

// =============================================================================
// CRUD Tests
// =============================================================================

/// get after create returns the created record.
#[test]
fn test_get_returns_created_record() {
    let mut store = RecordStore::new(StoreConfig::default());
    let created = store.create(json!({ "text": "hello", "tags": ["a"] })).unwrap();

    assert_eq!(store.get(1).unwrap(), created);
}

/// remove then get is NotFound.
#[test]
fn test_remove_then_get_not_found() {
    let mut store = store_with(2);
    store.remove(1).unwrap();

    assert_eq!(store.get(1), Err(StoreError::NotFound(1)));
    assert_eq!(store.remove(1), Err(StoreError::NotFound(1)));
    assert_eq!(store.len(), 1);
}

/// patch changes only the supplied field.
#[test]
fn test_patch_changes_only_supplied_field() {
    let mut store = RecordStore::new(StoreConfig::default());
    store
        .create(json!({ "title": "a", "done": false, "rank": 3 }))
        .unwrap();

    let patched = store.patch(1, json!({ "done": true })).unwrap();
    assert_eq!(
        Value::Object(patched),
        json!({ "id": 1, "title": "a", "done": true, "rank": 3 })
    );
}

/// update replaces every field but the identifier.
#[test]
fn test_update_replaces_body() {
    let mut store = RecordStore::new(StoreConfig::default());
    store.create(json!({ "title": "a", "done": false })).unwrap();

    let updated = store.update(1, json!({ "title": "b", "id": 99 })).unwrap();
    assert_eq!(Value::Object(updated), json!({ "id": 1, "title": "b" }));
    assert!(store.get(99).is_err());
}

// =============================================================================
// Pagination Tests
// =============================================================================

/// 25 records, limit 10, offset 20: 5 records, total 25.
#[test]
fn test_last_partial_page() {
    let store = store_with(25);
    let result = store.find(&Query::new().limit(10).offset(20));

    match &result {
        FindResult::Page(page) => {
            assert_eq!(page.total, 25);
            assert_eq!(page.limit, 10);
            assert_eq!(page.offset, 20);
        }
        FindResult::All(_) => panic!("expected a page"),
    }
    assert_eq!(ids(&result), vec![21, 22, 23, 24, 25]);
}

/// Requests above max_limit are clamped.
#[test]
fn test_limit_clamped_to_max() {
    let store = store_with(80);
    let result = store.find(&Query::new().limit(1000));

    assert_eq!(result.records().len(), 50);
    assert_eq!(result.total(), 80);
}

/// Offset past the end: empty page, correct total.
#[test]
fn test_offset_past_end() {
    let store = store_with(4);
    let result = store.find(&Query::new().offset(10));

    assert!(result.records().is_empty());
    assert_eq!(result.total(), 4);
}

// =============================================================================
// Filter and Sort Tests
// =============================================================================

/// Equality filter returns the matching subset in insertion order.
#[test]
fn test_equality_filter_keeps_insertion_order() {
    let mut store = RecordStore::new(StoreConfig::default());
    for status in ["active", "idle", "active", "active", "idle"] {
        store.create(json!({ "status": status })).unwrap();
    }

    let result = store.find(&Query::new().filter(FilterExpr::eq("status", json!("active"))));
    assert_eq!(ids(&result), vec![1, 3, 4]);
    assert_eq!(result.total(), 3);
}

/// Numeric 1 and string "1" are different values.
#[test]
fn test_equality_is_type_sensitive() {
    let mut store = RecordStore::new(StoreConfig::default());
    store.create(json!({ "v": 1 })).unwrap();
    store.create(json!({ "v": "1" })).unwrap();

    let numeric = store.find(&Query::new().filter(FilterExpr::eq("v", json!(1))));
    assert_eq!(ids(&numeric), vec![1]);

    let text = store.find(&Query::new().filter(FilterExpr::eq("v", json!("1"))));
    assert_eq!(ids(&text), vec![2]);
}

/// Filtering precedes sorting, sorting precedes slicing.
#[test]
fn test_filter_sort_then_slice() {
    let mut store = RecordStore::new(StoreConfig::default());
    for score in [5, 40, 12, 33, 7, 50] {
        store.create(json!({ "score": score })).unwrap();
    }

    let query = Query::new()
        .filter(FilterExpr::gt("score", json!(6)))
        .sort_by(SortKey::desc("score"))
        .limit(2)
        .offset(1);
    let result = store.find(&query);

    let scores: Vec<i64> = result
        .records()
        .iter()
        .map(|r| r["score"].as_i64().unwrap())
        .collect();
    assert_eq!(scores, vec![40, 33]);
    assert_eq!(result.total(), 5);
}

// =============================================================================
// Pagination Disabled
// =============================================================================

/// Three creates then an unpaginated find returns all three, in order.
#[test]
fn test_unpaginated_find_returns_plain_array() {
    let mut store = RecordStore::new(StoreConfig::default());
    store.create(json!({ "text": "a" })).unwrap();
    store.create(json!({ "text": "b" })).unwrap();
    store.create(json!({ "text": "c" })).unwrap();

    let result = store.find(&Query::new().limit(1).offset(2).without_pagination());

    assert!(!result.is_paginated());
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!([
            { "id": 1, "text": "a" },
            { "id": 2, "text": "b" },
            { "id": 3, "text": "c" }
        ])
    );
}
