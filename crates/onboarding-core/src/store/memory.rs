//! In-memory [`DocumentStore`] implementation for tests and embedding.
//!
//! Documents live in a `Vec` behind `std::sync::RwLock`, so iteration order
//! is insertion order and replacing a document keeps its original slot.

use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::{DocumentStore, StoredDocument};

/// In-memory store for tests.
pub struct InMemoryDocumentStore {
    docs: RwLock<Vec<StoredDocument>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
        }
    }

    /// Build a store pre-populated with `(category, key, data)` triples.
    pub fn with_documents<I>(docs: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, &'static str, Value)>,
    {
        let store = Self::new();
        {
            let mut guard = store.docs.write().unwrap_or_else(|e| e.into_inner());
            for (category, key, data) in docs {
                guard.push(StoredDocument::new(category, key, data));
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.docs.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn load(&self, category: &str, key: &str) -> Result<Option<Value>> {
        let docs = self.docs.read().map_err(|_| anyhow!("document store lock poisoned"))?;
        Ok(docs
            .iter()
            .find(|d| d.category == category && d.key == key)
            .map(|d| d.data.clone()))
    }

    async fn load_category(&self, category: &str) -> Result<Vec<(String, Value)>> {
        let docs = self.docs.read().map_err(|_| anyhow!("document store lock poisoned"))?;
        Ok(docs
            .iter()
            .filter(|d| d.category == category)
            .map(|d| (d.key.clone(), d.data.clone()))
            .collect())
    }

    async fn search_all(&self, term: &str) -> Result<Vec<StoredDocument>> {
        let needle = term.to_lowercase();
        let docs = self.docs.read().map_err(|_| anyhow!("document store lock poisoned"))?;
        Ok(docs
            .iter()
            .filter(|d| d.data.to_string().to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn upsert(&self, doc: &StoredDocument) -> Result<()> {
        let mut docs = self
            .docs
            .write()
            .map_err(|_| anyhow!("document store lock poisoned"))?;
        match docs
            .iter_mut()
            .find(|d| d.category == doc.category && d.key == doc.key)
        {
            Some(existing) => *existing = doc.clone(),
            None => docs.push(doc.clone()),
        }
        Ok(())
    }
}
