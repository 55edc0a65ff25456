//! Knowledge import: load JSON files from disk into the document store.
//!
//! The import root is laid out as `<category>/<file>.json`, optionally with
//! nested groupings `<category>/<sub>/<file>.json`. The first directory is
//! the category, any directories between it and the file form the
//! subcategory, and the file name is the document key.
//!
//! ```text
//! knowledge/
//! ├── codebase/repositories.json        → ("codebase", "repositories.json")
//! ├── teams/team_members.json           → ("teams", "team_members.json")
//! └── policies/eu/compliance_docs.json  → ("policies", sub "eu", "compliance_docs.json")
//! ```
//!
//! Unchanged files are detected by content hash and not rewritten. Files
//! that do not parse as JSON are reported and skipped; the rest of the
//! import continues.

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use onboarding_core::store::StoredDocument;

use crate::config::{Config, ImportConfig};
use crate::sqlite_store::{SqliteDocumentStore, UpsertOutcome};

/// A JSON file discovered under the import root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeFile {
    pub path: PathBuf,
    /// Path relative to the import root, with `/` separators.
    pub relative: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub filename: String,
}

/// Counts reported by an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub found: usize,
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Relative paths of files that failed to read or parse, with the reason.
    pub invalid: Vec<(String, String)>,
}

pub fn scan_knowledge(import: &ImportConfig) -> Result<Vec<KnowledgeFile>> {
    let root = &import.root;
    if !root.exists() {
        bail!("Import root does not exist: {}", root.display());
    }

    let include_set = build_globset(&import.include_globs)?;

    let mut default_excludes = vec!["**/.git/**".to_string(), "**/node_modules/**".to_string()];
    default_excludes.extend(import.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let mut files = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative_string(relative);

        if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
            continue;
        }

        match classify(relative) {
            Some((category, subcategory, filename)) => files.push(KnowledgeFile {
                path: path.to_path_buf(),
                relative: rel_str,
                category,
                subcategory,
                filename,
            }),
            None => tracing::warn!(file = %rel_str, "skipping file outside any category directory"),
        }
    }

    // Sort for deterministic ordering
    files.sort_by(|a, b| a.relative.cmp(&b.relative));

    for (kept, shadowed) in shadowed_files(&files) {
        tracing::warn!(
            file = %shadowed,
            replaced_by = %kept,
            "two files share a category and filename; only the later one is stored"
        );
    }

    Ok(files)
}

/// Pairs `(kept, shadowed)` of sorted files that map to the same stored
/// `(category, filename)` row. The later file in order overwrites the
/// earlier one.
fn shadowed_files(files: &[KnowledgeFile]) -> Vec<(&str, &str)> {
    let mut latest: HashMap<(&str, &str), &str> = HashMap::new();
    let mut shadowed = Vec::new();
    for file in files {
        let key = (file.category.as_str(), file.filename.as_str());
        if let Some(previous) = latest.insert(key, file.relative.as_str()) {
            shadowed.push((file.relative.as_str(), previous));
        }
    }
    shadowed
}

/// Split a root-relative path into `(category, subcategory, filename)`.
fn classify(relative: &Path) -> Option<(String, Option<String>, String)> {
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();

    match parts.as_slice() {
        [category, rest @ .., filename] if !rest.is_empty() => Some((
            category.clone(),
            Some(rest.join("/")),
            filename.clone(),
        )),
        [category, filename] => Some((category.clone(), None, filename.clone())),
        _ => None,
    }
}

fn relative_string(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn read_document(file: &KnowledgeFile) -> Result<StoredDocument> {
    let text = std::fs::read_to_string(&file.path)
        .with_context(|| format!("Failed to read {}", file.path.display()))?;
    let data: Value = serde_json::from_str(&text).context("invalid JSON")?;

    let doc = StoredDocument::new(&file.category, &file.filename, data);
    Ok(match &file.subcategory {
        Some(sub) => doc.with_subcategory(sub),
        None => doc,
    })
}

/// Import `files` into `store`. With `dry_run` every file is parsed but
/// nothing is written.
pub async fn import_files(
    store: &SqliteDocumentStore,
    files: &[KnowledgeFile],
    dry_run: bool,
) -> Result<ImportSummary> {
    let mut summary = ImportSummary {
        found: files.len(),
        ..Default::default()
    };

    for file in files {
        let doc = match read_document(file) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(file = %file.relative, error = %e, "skipping knowledge file");
                summary.invalid.push((file.relative.clone(), format!("{:#}", e)));
                continue;
            }
        };

        if dry_run {
            continue;
        }

        match store.upsert_if_changed(&doc).await? {
            UpsertOutcome::Inserted => summary.inserted += 1,
            UpsertOutcome::Updated => summary.updated += 1,
            UpsertOutcome::Unchanged => summary.unchanged += 1,
        }
        tracing::debug!(category = %doc.category, key = %doc.key, "imported knowledge document");
    }

    Ok(summary)
}

/// Run the `import` command: scan, load, and print a report.
pub async fn run_import(config: &Config, root: Option<PathBuf>, dry_run: bool) -> Result<()> {
    let mut import = config.import.clone();
    if let Some(root) = root {
        import.root = root;
    }

    let files = scan_knowledge(&import)?;
    let store = SqliteDocumentStore::from_config(config);
    let summary = import_files(&store, &files, dry_run).await;
    store.close().await;
    let summary = summary?;

    tracing::info!(
        root = %import.root.display(),
        found = summary.found,
        inserted = summary.inserted,
        updated = summary.updated,
        unchanged = summary.unchanged,
        invalid = summary.invalid.len(),
        dry_run,
        "knowledge import finished"
    );

    if dry_run {
        println!("import {} (dry-run)", import.root.display());
        println!("  files found: {}", summary.found);
        println!("  valid: {}", summary.found - summary.invalid.len());
    } else {
        println!("import {}", import.root.display());
        println!("  files found: {}", summary.found);
        println!("  inserted: {}", summary.inserted);
        println!("  updated: {}", summary.updated);
        println!("  unchanged: {}", summary.unchanged);
    }
    for (file, reason) in &summary.invalid {
        println!("  invalid: {} ({})", file, reason);
    }
    println!("ok");

    Ok(())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).with_context(|| format!("Invalid glob: {}", pattern))?);
    }
    Ok(builder.build()?)
}
