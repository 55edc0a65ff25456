//! Internal documentation: wiki pages, API references, tutorials.

use serde::Serialize;
use serde_json::Value;

use crate::envelope::{RecoveryHints, ToolError};
use crate::knowledge::{DocumentKind, KnowledgeBase};
use crate::models::{Api, ApiCatalog, Endpoint, Tutorial, TutorialCatalog, WikiCatalog, WikiPage};
use crate::ops::distinct;
use crate::score::{self, rank, Needle, Scored};

const SECTION_LIMIT: usize = 5;
const MAIN_PAGE_LIMIT: usize = 3;
const RELATED_PAGE_LIMIT: usize = 5;
const MAIN_PAGE_THRESHOLD: u32 = 3;
const CONTENT_PREVIEW_CHARS: usize = 500;

/// Which documentation sections a search covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocType {
    All,
    Wiki,
    Api,
    Tutorial,
}

impl DocType {
    pub const NAMES: [&'static str; 4] = ["all", "wiki", "api", "tutorial"];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(DocType::All),
            "wiki" => Some(DocType::Wiki),
            "api" => Some(DocType::Api),
            "tutorial" => Some(DocType::Tutorial),
            _ => None,
        }
    }

    fn covers(self, section: DocType) -> bool {
        self == DocType::All || self == section
    }
}

// ═══════════════════════════════════════════════════════════════════════
// search_documentation
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct WikiResult {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub last_updated: String,
    pub author: String,
    pub tags: Vec<String>,
}

impl From<WikiPage> for WikiResult {
    fn from(page: WikiPage) -> Self {
        Self {
            title: page.title,
            url: page.url,
            summary: page.summary,
            last_updated: page.last_updated,
            author: page.author,
            tags: page.tags,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiResult {
    pub name: String,
    pub description: String,
    pub version: String,
    pub base_url: String,
    pub documentation_url: String,
    pub key_endpoints: Vec<Endpoint>,
}

impl From<Api> for ApiResult {
    fn from(api: Api) -> Self {
        Self {
            name: api.name,
            description: api.description,
            version: api.version,
            base_url: api.base_url,
            documentation_url: api.documentation_url,
            key_endpoints: api.key_endpoints,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TutorialResult {
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub estimated_time: String,
    pub url: String,
    pub topics: Vec<String>,
}

impl From<Tutorial> for TutorialResult {
    fn from(t: Tutorial) -> Self {
        Self {
            title: t.title,
            description: t.description,
            difficulty: t.difficulty,
            estimated_time: t.estimated_time,
            url: t.url,
            topics: t.topics,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentationSearch {
    pub query: String,
    pub doc_type: String,
    pub wiki_results: Vec<Scored<WikiResult>>,
    pub api_results: Vec<Scored<ApiResult>>,
    pub tutorial_results: Vec<Scored<TutorialResult>>,
    /// Matches across all sections, before truncation.
    pub total_found: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_doc_types: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Search wiki pages, APIs and tutorials. Each section is ranked
/// separately with its own scorer.
pub async fn search_documentation(
    kb: &KnowledgeBase,
    query: &str,
    doc_type: &str,
) -> Result<DocumentationSearch, ToolError> {
    let q = Needle::new(query);
    let selected = DocType::parse(doc_type);
    let wants = |section| selected.is_some_and(|s| s.covers(section));

    let mut total_found = 0;
    let mut wiki_results = Vec::new();
    let mut api_results = Vec::new();
    let mut tutorial_results = Vec::new();

    if wants(DocType::Wiki) {
        let wiki: WikiCatalog = kb.document(DocumentKind::WikiPages).await;
        let ranked = rank(
            wiki.pages.into_iter().map(|p| {
                let s = score::wiki_page(&p, &q);
                (WikiResult::from(p), s)
            }),
            SECTION_LIMIT,
        );
        total_found += ranked.total;
        wiki_results = ranked.items;
    }
    if wants(DocType::Api) {
        let apis: ApiCatalog = kb.document(DocumentKind::ApiDocs).await;
        let ranked = rank(
            apis.apis.into_iter().map(|a| {
                let s = score::api(&a, &q);
                (ApiResult::from(a), s)
            }),
            SECTION_LIMIT,
        );
        total_found += ranked.total;
        api_results = ranked.items;
    }
    if wants(DocType::Tutorial) {
        let tutorials: TutorialCatalog = kb.document(DocumentKind::Tutorials).await;
        let ranked = rank(
            tutorials.tutorials.into_iter().map(|t| {
                let s = score::tutorial(&t, &q);
                (TutorialResult::from(t), s)
            }),
            SECTION_LIMIT,
        );
        total_found += ranked.total;
        tutorial_results = ranked.items;
    }

    if selected.is_none() {
        tracing::debug!(doc_type, "unknown documentation type");
    }

    let nothing = total_found == 0;
    Ok(DocumentationSearch {
        query: query.to_string(),
        doc_type: doc_type.to_string(),
        wiki_results,
        api_results,
        tutorial_results,
        total_found,
        available_doc_types: nothing.then(|| DocType::NAMES.to_vec()),
        suggestion: nothing
            .then(|| "Try different keywords or one of the available doc types".to_string()),
    })
}

// ═══════════════════════════════════════════════════════════════════════
// find_wiki_content
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct WikiPageHit {
    pub title: String,
    pub url: String,
    pub summary: String,
    /// At most 500 characters, with `...` appended when cut.
    pub content: String,
    pub last_updated: String,
    pub author: String,
    pub tags: Vec<String>,
}

impl From<WikiPage> for WikiPageHit {
    fn from(page: WikiPage) -> Self {
        Self {
            content: preview(&page.content),
            title: page.title,
            url: page.url,
            summary: page.summary,
            last_updated: page.last_updated,
            author: page.author,
            tags: page.tags,
        }
    }
}

fn preview(content: &str) -> String {
    match content.char_indices().nth(CONTENT_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WikiContent {
    pub topic: String,
    pub main_pages: Vec<Scored<WikiPageHit>>,
    pub related_pages: Vec<Scored<WikiPageHit>>,
    pub total_pages_found: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Split matching wiki pages into main pages (score ≥ 3, i.e. at least a
/// title hit) and related pages.
pub async fn find_wiki_content(kb: &KnowledgeBase, topic: &str) -> Result<WikiContent, ToolError> {
    let wiki: WikiCatalog = kb.document(DocumentKind::WikiPages).await;
    let q = Needle::new(topic);

    let tags = distinct(wiki.pages.iter().flat_map(|p| p.tags.iter()));
    let (main, related): (Vec<_>, Vec<_>) = wiki
        .pages
        .into_iter()
        .map(|p| {
            let s = score::wiki_page(&p, &q);
            (p, s)
        })
        .filter(|(_, s)| *s > 0)
        .partition(|(_, s)| *s >= MAIN_PAGE_THRESHOLD);

    let to_hits = |pages: Vec<(WikiPage, u32)>| {
        pages
            .into_iter()
            .map(|(p, s)| (WikiPageHit::from(p), s))
            .collect::<Vec<_>>()
    };
    let main = rank(to_hits(main), MAIN_PAGE_LIMIT);
    let related = rank(to_hits(related), RELATED_PAGE_LIMIT);

    let total = main.total + related.total;
    let nothing = total == 0;
    Ok(WikiContent {
        topic: topic.to_string(),
        main_pages: main.items,
        related_pages: related.items,
        total_pages_found: total,
        available_tags: nothing.then_some(tags),
        suggestion: nothing.then(|| "Try a broader topic or one of the available tags".to_string()),
    })
}

// ═══════════════════════════════════════════════════════════════════════
// get_api_docs
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct ApiSummary {
    pub name: String,
    pub description: String,
    pub version: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiDetail {
    pub api_name: String,
    pub description: String,
    pub version: String,
    pub base_url: String,
    pub authentication: Value,
    pub documentation_url: String,
    /// The API's lifecycle status (`stable`, `beta`, ...). Named apart from
    /// the envelope's own `status`.
    pub api_status: String,
    pub endpoints: Vec<Endpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_filter: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ApiDocs {
    Catalog {
        available_apis: Vec<ApiSummary>,
        message: String,
    },
    Detail(ApiDetail),
}

/// With no `api_name`, list every API. Otherwise return the first API whose
/// name contains `api_name`, with endpoints optionally narrowed by
/// `endpoint`.
pub async fn get_api_docs(
    kb: &KnowledgeBase,
    api_name: &str,
    endpoint: &str,
) -> Result<ApiDocs, ToolError> {
    let catalog: ApiCatalog = kb.document(DocumentKind::ApiDocs).await;

    if api_name.is_empty() {
        let available_apis = catalog
            .apis
            .into_iter()
            .map(|a| ApiSummary {
                name: a.name,
                description: a.description,
                version: a.version,
                status: a.status,
            })
            .collect();
        return Ok(ApiDocs::Catalog {
            available_apis,
            message: "Specify an api_name to get detailed information".to_string(),
        });
    }

    let q = Needle::new(api_name);
    let Some(api) = catalog.apis.iter().find(|a| q.found_in(&a.name)) else {
        let hints = RecoveryHints {
            available_apis: Some(catalog.apis.iter().map(|a| a.name.clone()).collect()),
            ..Default::default()
        };
        return Err(ToolError::not_found(
            format!("API '{}' not found", api_name),
            hints,
        ));
    };

    let (endpoints, endpoint_filter) = if endpoint.is_empty() {
        (api.key_endpoints.clone(), None)
    } else {
        let ep = Needle::new(endpoint);
        let matching = api
            .key_endpoints
            .iter()
            .filter(|e| ep.found_in(&e.path) || ep.found_in(&e.description))
            .cloned()
            .collect();
        (matching, Some(endpoint.to_string()))
    };

    Ok(ApiDocs::Detail(ApiDetail {
        api_name: api.name.clone(),
        description: api.description.clone(),
        version: api.version.clone(),
        base_url: api.base_url.clone(),
        authentication: api.authentication.clone(),
        documentation_url: api.documentation_url.clone(),
        api_status: api.status.clone(),
        endpoints,
        endpoint_filter,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Envelope;
    use crate::ops::fixtures;

    #[tokio::test]
    async fn test_search_documentation_all_sections() {
        let kb = fixtures::knowledge_base();
        let result = search_documentation(&kb, "auth", "all").await.unwrap();

        assert_eq!(result.wiki_results.len(), 2);
        assert_eq!(result.wiki_results[0].item.title, "Authentication Guide");
        assert_eq!(result.wiki_results[0].relevance_score, 6);
        assert_eq!(result.api_results.len(), 1);
        assert_eq!(result.tutorial_results.len(), 1);
        assert_eq!(result.total_found, 4);
        assert!(result.suggestion.is_none());
    }

    #[tokio::test]
    async fn test_search_documentation_single_section() {
        let kb = fixtures::knowledge_base();
        let result = search_documentation(&kb, "deploy", "tutorial").await.unwrap();
        assert!(result.wiki_results.is_empty());
        assert_eq!(result.tutorial_results.len(), 1);
        assert_eq!(result.tutorial_results[0].relevance_score, 4);
        assert_eq!(result.total_found, 1);
    }

    #[tokio::test]
    async fn test_search_documentation_unknown_type_falls_back() {
        let kb = fixtures::knowledge_base();
        let result = search_documentation(&kb, "auth", "podcast").await.unwrap();
        assert_eq!(result.total_found, 0);
        assert_eq!(
            result.available_doc_types.unwrap(),
            vec!["all", "wiki", "api", "tutorial"]
        );
    }

    #[tokio::test]
    async fn test_find_wiki_content_splits_main_and_related() {
        let kb = fixtures::knowledge_base();
        let result = find_wiki_content(&kb, "auth").await.unwrap();

        assert_eq!(result.main_pages.len(), 1);
        assert_eq!(result.related_pages.len(), 1);
        assert_eq!(result.related_pages[0].item.title, "Deployment Process");
        assert_eq!(result.total_pages_found, 2);

        let content = &result.main_pages[0].item.content;
        assert!(content.ends_with("..."));
        assert_eq!(content.chars().count(), CONTENT_PREVIEW_CHARS + 3);
    }

    #[tokio::test]
    async fn test_find_wiki_content_no_match_suggests_tags() {
        let kb = fixtures::knowledge_base();
        let result = find_wiki_content(&kb, "quantum").await.unwrap();
        assert_eq!(result.total_pages_found, 0);
        assert_eq!(
            result.available_tags.unwrap(),
            vec!["auth", "security", "deploy", "culture"]
        );
    }

    #[test]
    fn test_preview_leaves_short_content_alone() {
        assert_eq!(preview("short"), "short");
        let exact = "é".repeat(CONTENT_PREVIEW_CHARS);
        assert_eq!(preview(&exact), exact);
    }

    #[tokio::test]
    async fn test_get_api_docs_catalog_and_detail() {
        let kb = fixtures::knowledge_base();
        match get_api_docs(&kb, "", "").await.unwrap() {
            ApiDocs::Catalog { available_apis, .. } => assert_eq!(available_apis.len(), 2),
            other => panic!("unexpected {:?}", other),
        }

        let result = get_api_docs(&kb, "AUTH", "refresh").await;
        let env = Envelope::from_result("get API information", result)
            .into_value("get API information");
        assert_eq!(env["status"], "success");
        assert_eq!(env["api_name"], "auth-service API");
        assert_eq!(env["api_status"], "stable");
        assert_eq!(env["endpoints"].as_array().unwrap().len(), 1);
        assert_eq!(env["endpoints"][0]["method"], "POST");
        assert_eq!(env["endpoint_filter"], "refresh");
    }

    #[tokio::test]
    async fn test_get_api_docs_not_found() {
        let kb = fixtures::knowledge_base();
        let result = get_api_docs(&kb, "ledger", "").await;
        let env = Envelope::from_result("get API information", result)
            .into_value("get API information");
        assert_eq!(env["status"], "error");
        assert_eq!(
            env["available_apis"],
            serde_json::json!(["auth-service API", "payment-api"])
        );
    }

    #[tokio::test]
    async fn test_search_documentation_is_idempotent() {
        let kb = fixtures::knowledge_base();
        let first = serde_json::to_string(&search_documentation(&kb, "auth", "all").await.unwrap())
            .unwrap();
        let second = serde_json::to_string(&search_documentation(&kb, "auth", "all").await.unwrap())
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_documentation_searches_on_empty_store_are_success() {
        let kb = fixtures::empty_knowledge_base();

        let result = search_documentation(&kb, "auth", "all").await;
        let env = Envelope::from_result("search documentation", result)
            .into_value("search documentation");
        assert_eq!(env["status"], "success");
        assert_eq!(env["total_found"], 0);

        let result = find_wiki_content(&kb, "onboarding").await;
        let env = Envelope::from_result("find wiki content", result)
            .into_value("find wiki content");
        assert_eq!(env["status"], "success");
        assert_eq!(env["total_pages_found"], 0);
        assert_eq!(env["available_tags"], serde_json::json!([]));
    }
}
