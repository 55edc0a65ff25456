//! Storage abstraction for knowledge documents.
//!
//! The [`DocumentStore`] trait is the only contract between the search
//! operations and persistence. A document is an arbitrary JSON tree stored
//! under a `(category, key)` pair, e.g. `("codebase", "repositories.json")`.
//!
//! Implementations report backend failures as `Err`; callers go through
//! [`KnowledgeBase`](crate::knowledge::KnowledgeBase), which logs and
//! degrades those errors to empty results so no failure reaches a tool.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// A knowledge document together with its storage coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredDocument {
    /// Top-level category (`codebase`, `documentation`, `teams`, ...).
    pub category: String,
    /// Optional grouping below the category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// Document key within the category (historically a file name).
    pub key: String,
    /// The document body.
    #[serde(skip_serializing)]
    pub data: Value,
}

impl StoredDocument {
    pub fn new(category: impl Into<String>, key: impl Into<String>, data: Value) -> Self {
        Self {
            category: category.into(),
            subcategory: None,
            key: key.into(),
            data,
        }
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }
}

/// Abstract document store.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`load`](DocumentStore::load) | One document by `(category, key)` |
/// | [`load_category`](DocumentStore::load_category) | All documents in a category, in insertion order |
/// | [`search_all`](DocumentStore::search_all) | Case-insensitive substring scan over every document |
/// | [`upsert`](DocumentStore::upsert) | Insert or replace a document |
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load(&self, category: &str, key: &str) -> Result<Option<Value>>;

    async fn load_category(&self, category: &str) -> Result<Vec<(String, Value)>>;

    /// Return every document whose serialized JSON contains `term`,
    /// ignoring case.
    async fn search_all(&self, term: &str) -> Result<Vec<StoredDocument>>;

    async fn upsert(&self, doc: &StoredDocument) -> Result<()>;
}
