//! # Find Results
//!
//! Shapes returned by a store find.

use serde::Serialize;
use serde_json::{Map, Value};

/// A stored record: a JSON object with a reserved identifier field
pub type Record = Map<String, Value>;

/// Paginated result envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T: Serialize> {
    /// Matches after filtering, before pagination
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub data: Vec<T>,
}

impl<T: Serialize> Page<T> {
    pub fn new(data: Vec<T>, total: usize, limit: usize, offset: usize) -> Self {
        Self {
            total,
            limit,
            offset,
            data,
        }
    }
}

/// Result of a find: an envelope, or every match when pagination is off
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FindResult {
    Page(Page<Record>),
    All(Vec<Record>),
}

impl FindResult {
    /// Records in this result, in order
    pub fn records(&self) -> &[Record] {
        match self {
            FindResult::Page(page) => &page.data,
            FindResult::All(records) => records,
        }
    }

    /// Consume into the record list
    pub fn into_records(self) -> Vec<Record> {
        match self {
            FindResult::Page(page) => page.data,
            FindResult::All(records) => records,
        }
    }

    /// Total matches (for `All`, the record count)
    pub fn total(&self) -> usize {
        match self {
            FindResult::Page(page) => page.total,
            FindResult::All(records) => records.len(),
        }
    }

    pub fn is_paginated(&self) -> bool {
        matches!(self, FindResult::Page(_))
    }
}
