//! Raw cross-category scan.

use serde::Serialize;

use crate::envelope::{RecoveryHints, ToolError};
use crate::knowledge::KnowledgeBase;
use crate::store::StoredDocument;

const HIT_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeSearch {
    pub term: String,
    pub total_found: usize,
    /// Coordinates of each matching document; bodies are not included.
    pub results: Vec<StoredDocument>,
    pub additional_results_available: usize,
}

/// Every stored document whose JSON text contains `term`, ignoring case.
///
/// Unlike the typed searches this one has no scoring: a document either
/// contains the term somewhere or it does not.
pub async fn search_knowledge_base(
    kb: &KnowledgeBase,
    term: &str,
) -> Result<KnowledgeSearch, ToolError> {
    if term.trim().is_empty() {
        return Err(ToolError::invalid_input(
            "A non-empty search term is required",
            RecoveryHints::default()
                .suggest("Use one of the topic-specific tools to browse a whole category"),
        ));
    }

    let mut results = kb.search_all(term).await;
    let total_found = results.len();
    results.truncate(HIT_LIMIT);

    Ok(KnowledgeSearch {
        term: term.to_string(),
        total_found,
        additional_results_available: total_found - results.len(),
        results,
    })
}
