//! # Record Store Module
//!
//! In-memory record collections with filtering, sorting and pagination.
//!
//! - [`RecordStore`]: the collection and its identifier sequence
//! - [`Query`]: filters, sort keys and page bounds for a find
//! - [`FindResult`]: a [`Page`] envelope or a plain record list

pub mod config;
pub mod errors;
pub mod filter;
pub mod query;
pub mod response;
pub mod store;

pub use config::StoreConfig;
pub use errors::{StoreError, StoreResult};
pub use filter::{FilterExpr, FilterOperator, FilterSet};
pub use query::{Query, SortDirection, SortKey};
pub use response::{FindResult, Page, Record};
pub use store::RecordStore;
