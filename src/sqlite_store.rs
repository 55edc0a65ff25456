//! SQLite-backed [`DocumentStore`] implementation.
//!
//! Each knowledge document is one row of `json_documents`, keyed by
//! `(category, filename)` with the JSON body stored as text. The pool is
//! opened on first use and re-opened if it has been closed, so a store
//! handle stays usable across [`SqliteDocumentStore::close`] calls.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use sha2::{Digest, Sha256};
use sqlx::{Row, SqlitePool};
use tokio::sync::Mutex;

use onboarding_core::store::{DocumentStore, StoredDocument};

use crate::config::Config;
use crate::{db, migrate};

/// What an upsert did to the stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    /// The stored content hash already matched; nothing was written.
    Unchanged,
}

/// SQLite implementation of the [`DocumentStore`] trait.
pub struct SqliteDocumentStore {
    path: PathBuf,
    pool: Mutex<Option<SqlitePool>>,
}

impl SqliteDocumentStore {
    /// A store over the database at `path`. Nothing is opened until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pool: Mutex::new(None),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.db.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The live pool, connecting (and migrating) when there is none or the
    /// previous one was closed.
    async fn pool(&self) -> Result<SqlitePool> {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.as_ref() {
            if !pool.is_closed() {
                return Ok(pool.clone());
            }
            tracing::debug!(
                path = %self.path.display(),
                "knowledge database pool closed, reconnecting"
            );
        }

        let pool = db::connect_path(&self.path).await?;
        migrate::apply(&pool).await?;
        *guard = Some(pool.clone());
        Ok(pool)
    }

    /// Release the pool. The next operation reconnects.
    pub async fn close(&self) {
        if let Some(pool) = self.pool.lock().await.take() {
            pool.close().await;
        }
    }

    /// Insert or replace a document, skipping the write when the content
    /// hash is unchanged.
    pub async fn upsert_if_changed(&self, doc: &StoredDocument) -> Result<UpsertOutcome> {
        let pool = self.pool().await?;
        let data = serde_json::to_string(&doc.data)?;
        let hash = content_hash(&data);

        let existing: Option<String> = sqlx::query_scalar(
            "SELECT content_hash FROM json_documents WHERE category = ? AND filename = ?",
        )
        .bind(&doc.category)
        .bind(&doc.key)
        .fetch_optional(&pool)
        .await?;

        let outcome = match existing {
            Some(ref stored) if *stored == hash => return Ok(UpsertOutcome::Unchanged),
            Some(_) => UpsertOutcome::Updated,
            None => UpsertOutcome::Inserted,
        };

        sqlx::query(
            r#"
            INSERT INTO json_documents (id, category, subcategory, filename, data,
                                        content_hash, imported_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(category, filename) DO UPDATE SET
                subcategory = excluded.subcategory,
                data = excluded.data,
                content_hash = excluded.content_hash,
                imported_at = excluded.imported_at
            "#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(&doc.category)
        .bind(&doc.subcategory)
        .bind(&doc.key)
        .bind(&data)
        .bind(&hash)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&pool)
        .await
        .with_context(|| format!("Failed to store {}/{}", doc.category, doc.key))?;

        Ok(outcome)
    }

    /// Number of stored documents.
    pub async fn count(&self) -> Result<i64> {
        let pool = self.pool().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM json_documents")
            .fetch_one(&pool)
            .await?;
        Ok(count)
    }
}

/// Hex SHA-256 of the serialized document body.
pub fn content_hash(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}

fn parse_data(category: &str, key: &str, data: &str) -> Result<Value> {
    serde_json::from_str(data)
        .with_context(|| format!("Stored document {}/{} is not valid JSON", category, key))
}

/// Whether the serialized body contains `needle` (already lowercased),
/// folding case with full Unicode rules.
fn mentions(data: &str, needle: &str) -> bool {
    data.to_lowercase().contains(needle)
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn load(&self, category: &str, key: &str) -> Result<Option<Value>> {
        let pool = self.pool().await?;
        let data: Option<String> = sqlx::query_scalar(
            "SELECT data FROM json_documents WHERE category = ? AND filename = ?",
        )
        .bind(category)
        .bind(key)
        .fetch_optional(&pool)
        .await?;

        data.map(|d| parse_data(category, key, &d)).transpose()
    }

    async fn load_category(&self, category: &str) -> Result<Vec<(String, Value)>> {
        let pool = self.pool().await?;
        let rows = sqlx::query(
            "SELECT filename, data FROM json_documents WHERE category = ? ORDER BY rowid",
        )
        .bind(category)
        .fetch_all(&pool)
        .await?;

        rows.iter()
            .map(|row| {
                let key: String = row.get("filename");
                let data: String = row.get("data");
                let value = parse_data(category, &key, &data)?;
                Ok((key, value))
            })
            .collect()
    }

    async fn search_all(&self, term: &str) -> Result<Vec<StoredDocument>> {
        let pool = self.pool().await?;
        // SQLite's lower() folds ASCII only, so matching happens here.
        let needle = term.to_lowercase();
        let rows = sqlx::query(
            "SELECT category, subcategory, filename, data FROM json_documents ORDER BY rowid",
        )
        .fetch_all(&pool)
        .await?;

        let mut found = Vec::new();
        for row in &rows {
            let data: String = row.get("data");
            if !mentions(&data, &needle) {
                continue;
            }
            let category: String = row.get("category");
            let subcategory: Option<String> = row.get("subcategory");
            let key: String = row.get("filename");
            let value = parse_data(&category, &key, &data)?;
            let doc = StoredDocument::new(category, key, value);
            found.push(match subcategory {
                Some(sub) => doc.with_subcategory(sub),
                None => doc,
            });
        }
        Ok(found)
    }

    async fn upsert(&self, doc: &StoredDocument) -> Result<()> {
        self.upsert_if_changed(doc).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentions_folds_unicode_case() {
        assert!(mentions(r#"{"title":"ÉCOLE Übersicht"}"#, "übersicht"));
        assert!(mentions(r#"{"note":"100% done"}"#, "100%"));
        assert!(!mentions(r#"{"note":"100 done"}"#, "100%"));
    }

    #[test]
    fn test_content_hash_is_stable_hex() {
        let h = content_hash("{\"a\":1}");
        assert_eq!(h.len(), 64);
        assert_eq!(h, content_hash("{\"a\":1}"));
        assert_ne!(h, content_hash("{\"a\":2}"));
    }
}
