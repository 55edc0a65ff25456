//! Typed, failure-tolerant access to the knowledge documents.
//!
//! [`KnowledgeBase`] is the resource every operation receives. It resolves a
//! [`DocumentKind`] to its storage coordinates, decodes the document into the
//! typed schema, and turns every failure (backend error, missing document,
//! schema mismatch) into an empty default plus a warning. Operations therefore
//! never see a partial or missing document and never propagate a store error.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::store::{DocumentStore, StoredDocument};

/// Every knowledge document the operations read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Repositories,
    Dependencies,
    BestPractices,
    TechStack,
    WikiPages,
    ApiDocs,
    Tutorials,
    CommonErrors,
    Solutions,
    Diagnostics,
    HrHandbook,
    ComplianceDocs,
    SecurityGuidelines,
    TeamStructure,
    TeamMembers,
    Scheduling,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 16] = [
        DocumentKind::Repositories,
        DocumentKind::Dependencies,
        DocumentKind::BestPractices,
        DocumentKind::TechStack,
        DocumentKind::WikiPages,
        DocumentKind::ApiDocs,
        DocumentKind::Tutorials,
        DocumentKind::CommonErrors,
        DocumentKind::Solutions,
        DocumentKind::Diagnostics,
        DocumentKind::HrHandbook,
        DocumentKind::ComplianceDocs,
        DocumentKind::SecurityGuidelines,
        DocumentKind::TeamStructure,
        DocumentKind::TeamMembers,
        DocumentKind::Scheduling,
    ];

    pub fn category(&self) -> &'static str {
        match self {
            DocumentKind::Repositories
            | DocumentKind::Dependencies
            | DocumentKind::BestPractices
            | DocumentKind::TechStack => "codebase",
            DocumentKind::WikiPages | DocumentKind::ApiDocs | DocumentKind::Tutorials => {
                "documentation"
            }
            DocumentKind::CommonErrors | DocumentKind::Solutions | DocumentKind::Diagnostics => {
                "troubleshooting"
            }
            DocumentKind::HrHandbook
            | DocumentKind::ComplianceDocs
            | DocumentKind::SecurityGuidelines => "policies",
            DocumentKind::TeamStructure | DocumentKind::TeamMembers | DocumentKind::Scheduling => {
                "teams"
            }
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            DocumentKind::Repositories => "repositories.json",
            DocumentKind::Dependencies => "dependencies.json",
            DocumentKind::BestPractices => "best_practices.json",
            DocumentKind::TechStack => "tech_stack.json",
            DocumentKind::WikiPages => "wiki_pages.json",
            DocumentKind::ApiDocs => "api_docs.json",
            DocumentKind::Tutorials => "tutorials.json",
            DocumentKind::CommonErrors => "common_errors.json",
            DocumentKind::Solutions => "solutions.json",
            DocumentKind::Diagnostics => "diagnostics.json",
            DocumentKind::HrHandbook => "hr_handbook.json",
            DocumentKind::ComplianceDocs => "compliance_docs.json",
            DocumentKind::SecurityGuidelines => "security_guidelines.json",
            DocumentKind::TeamStructure => "team_structure.json",
            DocumentKind::TeamMembers => "team_members.json",
            DocumentKind::Scheduling => "scheduling.json",
        }
    }
}

/// Shared, cloneable handle over a [`DocumentStore`].
#[derive(Clone)]
pub struct KnowledgeBase {
    store: Arc<dyn DocumentStore>,
}

impl KnowledgeBase {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Load and decode one knowledge document, or its empty default.
    pub async fn document<T>(&self, kind: DocumentKind) -> T
    where
        T: DeserializeOwned + Default,
    {
        let (category, key) = (kind.category(), kind.key());
        let value = match self.store.load(category, key).await {
            Ok(Some(value)) => value,
            Ok(None) => {
                tracing::warn!(category, key, "knowledge document not found");
                return T::default();
            }
            Err(e) => {
                tracing::warn!(category, key, error = %e, "failed to load knowledge document");
                return T::default();
            }
        };

        match serde_json::from_value(value) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(category, key, error = %e, "knowledge document failed validation");
                T::default()
            }
        }
    }

    /// All raw documents in a category, or none on failure.
    pub async fn category(&self, category: &str) -> Vec<(String, serde_json::Value)> {
        self.store
            .load_category(category)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(category, error = %e, "failed to load knowledge category");
                Vec::new()
            })
    }

    /// Raw substring scan across every stored document, or none on failure.
    pub async fn search_all(&self, term: &str) -> Vec<StoredDocument> {
        self.store.search_all(term).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "knowledge base scan failed");
            Vec::new()
        })
    }
}
