use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    apply(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Create the knowledge schema on an open pool. Idempotent.
pub async fn apply(pool: &SqlitePool) -> Result<()> {
    // One row per imported JSON file
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS json_documents (
            id TEXT PRIMARY KEY,
            category TEXT NOT NULL,
            subcategory TEXT,
            filename TEXT NOT NULL,
            data TEXT NOT NULL,
            content_hash TEXT NOT NULL,
            imported_at TEXT NOT NULL,
            UNIQUE(category, filename)
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create json_documents table")?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_json_documents_category ON json_documents(category)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_json_documents_subcategory \
         ON json_documents(category, subcategory)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
