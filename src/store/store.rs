//! # Record Store
//!
//! Ordered in-memory collection of records keyed by a numeric identifier.
//!
//! The store exclusively owns its records: every read hands back a clone,
//! so callers can never mutate stored state behind the store's back.

use serde_json::Value;

use super::config::StoreConfig;
use super::errors::{StoreError, StoreResult};
use super::filter::sort_cmp;
use super::query::{Query, SortDirection};
use super::response::{FindResult, Page, Record};

/// In-memory record store
#[derive(Debug, Clone)]
pub struct RecordStore {
    config: StoreConfig,

    /// Records in insertion order
    records: Vec<Record>,

    /// Next identifier to hand out
    next_id: u64,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl RecordStore {
    /// Create an empty store
    pub fn new(config: StoreConfig) -> Self {
        let next_id = config.start_id;
        Self {
            config,
            records: Vec::new(),
            next_id,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Identifier of a stored record
    fn id_of(&self, record: &Record) -> Option<u64> {
        record.get(&self.config.id_field).and_then(Value::as_u64)
    }

    fn position(&self, id: u64) -> StoreResult<usize> {
        self.records
            .iter()
            .position(|r| self.id_of(r) == Some(id))
            .ok_or(StoreError::NotFound(id))
    }

    /// Unwrap a request body into a record
    fn into_record(body: Value) -> StoreResult<Record> {
        match body {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::invalid_record(format!(
                "expected a JSON object, got {}",
                kind_name(&other)
            ))),
        }
    }

    /// Store a new record and return it with its identifier.
    ///
    /// A body that already carries an identifier keeps it, provided it is a
    /// non-negative integer at or above the counter; the counter then moves
    /// past it, so identifiers are never reused even after deletion.
    pub fn create(&mut self, body: Value) -> StoreResult<Record> {
        let mut record = Self::into_record(body)?;

        let supplied = match record.get(&self.config.id_field) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.as_u64().ok_or_else(|| {
                StoreError::invalid_record(format!(
                    "{} must be a non-negative integer",
                    self.config.id_field
                ))
            })?),
        };

        let id = match supplied {
            Some(id) => {
                // Every id in use or ever handed out is below the counter
                if id < self.next_id {
                    return Err(StoreError::invalid_record(format!(
                        "{} {} has already been used",
                        self.config.id_field, id
                    )));
                }
                self.next_id = id
                    .checked_add(1)
                    .ok_or_else(|| StoreError::invalid_record("identifier space exhausted"))?;
                id
            }
            None => {
                let id = self.next_id;
                self.next_id = id
                    .checked_add(1)
                    .ok_or_else(|| StoreError::invalid_record("identifier space exhausted"))?;
                id
            }
        };

        record.insert(self.config.id_field.clone(), Value::from(id));
        self.records.push(record.clone());
        Ok(record)
    }

    /// Filter, then sort, then paginate.
    pub fn find(&self, query: &Query) -> FindResult {
        let mut matches: Vec<&Record> = self
            .records
            .iter()
            .filter(|r| query.filters.matches(r))
            .collect();

        if !query.sort.is_empty() {
            // sort_by is stable: ties keep insertion order
            matches.sort_by(|a, b| {
                for key in &query.sort {
                    let ord = sort_cmp(a.get(&key.field), b.get(&key.field));
                    let ord = match key.direction {
                        SortDirection::Ascending => ord,
                        SortDirection::Descending => ord.reverse(),
                    };
                    if ord.is_ne() {
                        return ord;
                    }
                }
                std::cmp::Ordering::Equal
            });
        }

        if !query.paginate {
            let records = matches
                .into_iter()
                .map(|r| self.project(r, query.select.as_deref()))
                .collect();
            return FindResult::All(records);
        }

        let total = matches.len();
        let limit = self.config.effective_limit(query.limit);
        let data = matches
            .into_iter()
            .skip(query.offset)
            .take(limit)
            .map(|r| self.project(r, query.select.as_deref()))
            .collect();

        FindResult::Page(Page::new(data, total, limit, query.offset))
    }

    /// Copy a record, keeping only selected fields plus the identifier
    fn project(&self, record: &Record, select: Option<&[String]>) -> Record {
        match select {
            None => record.clone(),
            Some(fields) => record
                .iter()
                .filter(|(k, _)| **k == self.config.id_field || fields.contains(*k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Get a single record by identifier
    pub fn get(&self, id: u64) -> StoreResult<Record> {
        let idx = self.position(id)?;
        Ok(self.records[idx].clone())
    }

    /// Replace every field except the identifier
    pub fn update(&mut self, id: u64, body: Value) -> StoreResult<Record> {
        let idx = self.position(id)?;
        let mut record = Self::into_record(body)?;

        record.insert(self.config.id_field.clone(), Value::from(id));
        self.records[idx] = record.clone();
        Ok(record)
    }

    /// Overwrite only the supplied fields
    pub fn patch(&mut self, id: u64, body: Value) -> StoreResult<Record> {
        let idx = self.position(id)?;
        let changes = Self::into_record(body)?;

        let record = &mut self.records[idx];
        for (key, value) in changes {
            if key != self.config.id_field {
                record.insert(key, value);
            }
        }
        Ok(record.clone())
    }

    /// Delete a record and return it
    pub fn remove(&mut self, id: u64) -> StoreResult<Record> {
        let idx = self.position(id)?;
        Ok(self.records.remove(idx))
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
