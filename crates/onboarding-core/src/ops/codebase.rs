//! Codebase navigation: repositories, dependency graph, coding standards,
//! and the technology stack.

use serde::Serialize;
use serde_json::Value;

use crate::envelope::{RecoveryHints, ToolError};
use crate::knowledge::{DocumentKind, KnowledgeBase};
use crate::models::{
    BestPractices, CodeSnippet, DependencyGraph, Repository, RepositoryCatalog, TechCategory,
    TechStack,
};
use crate::ops::distinct;
use crate::score::{self, rank, Needle, Scored};

const REPOSITORY_LIMIT: usize = 5;
const SNIPPET_LIMIT: usize = 3;

// ═══════════════════════════════════════════════════════════════════════
// search_codebase
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct RepositoryHit {
    pub repo_name: String,
    pub description: String,
    pub language: String,
    pub framework: String,
    pub key_files: Vec<String>,
    pub team: String,
    pub documentation: String,
    pub examples: Value,
}

impl From<Repository> for RepositoryHit {
    fn from(repo: Repository) -> Self {
        Self {
            repo_name: repo.name,
            description: repo.description,
            language: repo.language,
            framework: repo.framework,
            key_files: repo.key_files,
            team: repo.team,
            documentation: repo.documentation,
            examples: repo.examples,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SnippetHit {
    /// The snippet's key in the catalog.
    #[serde(rename = "type")]
    pub kind: String,
    pub file: String,
    pub function: String,
    pub code: String,
    pub description: String,
    pub best_practices: Vec<Value>,
}

impl SnippetHit {
    fn new(key: &str, snippet: &CodeSnippet) -> Self {
        Self {
            kind: key.to_string(),
            file: snippet.file.clone(),
            function: snippet.function.clone(),
            code: snippet.code.clone(),
            description: snippet.description.clone(),
            best_practices: snippet.best_practices.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CodebaseSearch {
    pub query: String,
    pub file_type: String,
    pub repositories: Vec<Scored<RepositoryHit>>,
    pub code_snippets: Vec<SnippetHit>,
    pub total_repositories_found: usize,
    pub total_snippets_found: usize,
    pub additional_repositories_available: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_languages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// `"all"` means no filter; anything else is a file extension such as `py`.
fn extension_filter(file_type: &str) -> Option<String> {
    let ext = file_type.trim().trim_start_matches('.').to_lowercase();
    if ext.is_empty() || ext == "all" {
        None
    } else {
        Some(format!(".{}", ext))
    }
}

fn has_extension(path: &str, ext: Option<&str>) -> bool {
    ext.map_or(true, |ext| path.to_lowercase().ends_with(ext))
}

/// Rank repositories by name/description/dependency hits and collect code
/// snippets whose key or description mentions the query.
pub async fn search_codebase(
    kb: &KnowledgeBase,
    query: &str,
    file_type: &str,
) -> Result<CodebaseSearch, ToolError> {
    let catalog: RepositoryCatalog = kb.document(DocumentKind::Repositories).await;
    let q = Needle::new(query);
    let ext = extension_filter(file_type);
    let ext = ext.as_deref();

    let languages = distinct(catalog.repositories.iter().map(|r| r.language.as_str()));

    let ranked = rank(
        catalog
            .repositories
            .into_iter()
            .filter(|repo| ext.is_none() || repo.key_files.iter().any(|f| has_extension(f, ext)))
            .map(|repo| {
                let s = score::repository(&repo, &q);
                (RepositoryHit::from(repo), s)
            }),
        REPOSITORY_LIMIT,
    );

    let snippets: Vec<SnippetHit> = catalog
        .code_snippets
        .iter()
        .filter(|(_, snippet)| has_extension(&snippet.file, ext))
        .filter(|(key, snippet)| q.found_in(key) || q.found_in(&snippet.description))
        .map(|(key, snippet)| SnippetHit::new(key, snippet))
        .collect();
    let total_snippets_found = snippets.len();

    tracing::debug!(
        query,
        repositories = ranked.total,
        snippets = total_snippets_found,
        "codebase search"
    );

    let nothing = ranked.is_empty() && snippets.is_empty();
    Ok(CodebaseSearch {
        query: query.to_string(),
        file_type: file_type.to_string(),
        additional_repositories_available: ranked.suppressed(),
        total_repositories_found: ranked.total,
        repositories: ranked.items,
        code_snippets: snippets.into_iter().take(SNIPPET_LIMIT).collect(),
        total_snippets_found,
        available_languages: nothing.then_some(languages),
        suggestion: nothing.then(|| {
            "Try a broader term, a service name, or file_type \"all\"".to_string()
        }),
    })
}

// ═══════════════════════════════════════════════════════════════════════
// analyze_dependencies
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct DependencyReport {
    pub module: String,
    pub description: String,
    pub dependencies: Vec<String>,
    pub dependents: Vec<String>,
    pub architecture_layer: String,
    pub communication_methods: Vec<Value>,
    pub data_flows: Vec<Value>,
    pub integration_points: Vec<Value>,
}

/// Look up a module by case-insensitive substring of its name. The first
/// module in document order wins.
pub async fn analyze_dependencies(
    kb: &KnowledgeBase,
    module_name: &str,
) -> Result<DependencyReport, ToolError> {
    let graph: DependencyGraph = kb.document(DocumentKind::Dependencies).await;
    let q = Needle::new(module_name);

    let Some((name, module)) = graph.modules.iter().find(|(name, _)| q.found_in(name)) else {
        let hints = RecoveryHints {
            available_modules: Some(graph.modules.keys().map(str::to_string).collect()),
            ..Default::default()
        }
        .suggest("Try searching for one of the available modules listed above");
        return Err(ToolError::not_found(
            format!("Module '{}' not found in dependency graph", module_name),
            hints,
        ));
    };

    Ok(DependencyReport {
        module: name.to_string(),
        description: module.description.clone(),
        dependencies: module.dependencies.clone(),
        dependents: module.dependents.clone(),
        architecture_layer: module.architecture_layer.clone(),
        communication_methods: module.communication_methods.clone(),
        data_flows: module.data_flows.clone(),
        integration_points: module.integration_points.clone(),
    })
}

// ═══════════════════════════════════════════════════════════════════════
// check_best_practices
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub rule: String,
    pub message: String,
    pub severity: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub rule: String,
    pub message: String,
    pub improvement: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CodeAnalysis {
    pub violations: Vec<Violation>,
    pub recommendations: Vec<Recommendation>,
    pub quality_score: u32,
    pub analysis_summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BestPracticesReport {
    pub language: String,
    pub general_guidelines: Vec<Value>,
    pub language_specific: Vec<Value>,
    pub code_quality_checklist: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_analysis: Option<CodeAnalysis>,
}

/// `(total - violations) / total * 100`, floored; 100 when there are no
/// rules at all.
///
/// A rule that did not trigger counts as passed.
pub fn quality_score(total_rules: usize, violations: usize) -> u32 {
    if total_rules == 0 {
        return 100;
    }
    let passed = total_rules.saturating_sub(violations);
    (passed * 100 / total_rules) as u32
}

fn analyze_code(practices: &BestPractices, code: &str) -> CodeAnalysis {
    let code = code.to_lowercase();
    let mut violations = Vec::new();
    let mut recommendations = Vec::new();

    for rule in &practices.rules {
        let trigger = rule.trigger.to_lowercase();
        if trigger.is_empty() || !code.contains(&trigger) {
            continue;
        }
        if rule.is_violation() {
            violations.push(Violation {
                rule: rule.rule.clone(),
                message: rule.message.clone(),
                severity: rule.severity.clone(),
            });
        } else {
            recommendations.push(Recommendation {
                rule: rule.rule.clone(),
                message: rule.message.clone(),
                improvement: rule.improvement.clone(),
            });
        }
    }

    let total = practices.rules.len();
    CodeAnalysis {
        quality_score: quality_score(total, violations.len()),
        analysis_summary: format!(
            "Found {} potential issues out of {} checks",
            violations.len(),
            total
        ),
        violations,
        recommendations,
    }
}

/// Return coding guidelines for `language` and, when `code_snippet` is
/// non-empty, evaluate it against the trigger rules.
pub async fn check_best_practices(
    kb: &KnowledgeBase,
    code_snippet: &str,
    language: &str,
) -> Result<BestPracticesReport, ToolError> {
    let practices: BestPractices = kb.document(DocumentKind::BestPractices).await;

    let language_specific = practices
        .languages
        .get(language)
        .map(|set| set.guidelines.clone())
        .unwrap_or_default();
    let code_analysis = (!code_snippet.is_empty()).then(|| analyze_code(&practices, code_snippet));

    Ok(BestPracticesReport {
        language: language.to_string(),
        general_guidelines: practices.general.guidelines.clone(),
        language_specific,
        code_quality_checklist: practices.quality_checklist.clone(),
        code_analysis,
    })
}

// ═══════════════════════════════════════════════════════════════════════
// get_tech_stack_info
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TechStackInfo {
    Overview(TechStack),
    Component {
        component: String,
        category: &'static str,
        details: Value,
    },
}

/// With no component, the whole stack. Otherwise the first component whose
/// name contains `component`, searching categories in a fixed order.
pub async fn get_tech_stack_info(
    kb: &KnowledgeBase,
    component: &str,
) -> Result<TechStackInfo, ToolError> {
    let stack: TechStack = kb.document(DocumentKind::TechStack).await;
    if component.is_empty() {
        return Ok(TechStackInfo::Overview(stack));
    }

    let q = Needle::new(component);
    for category in TechCategory::ALL {
        if let Some((name, details)) = category
            .components(&stack)
            .iter()
            .find(|(name, _)| q.found_in(name))
        {
            return Ok(TechStackInfo::Component {
                component: name.to_string(),
                category: category.as_str(),
                details: details.clone(),
            });
        }
    }

    let available: Vec<String> = TechCategory::ALL
        .iter()
        .flat_map(|c| c.components(&stack).keys().map(str::to_string))
        .collect();
    let hints = RecoveryHints {
        available_components: Some(available),
        ..Default::default()
    }
    .suggest("Try searching for frontend, backend, database, or infrastructure components");
    Err(ToolError::not_found(
        format!("Component '{}' not found in tech stack", component),
        hints,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Envelope;
    use crate::ops::fixtures;

    #[tokio::test]
    async fn test_search_codebase_ranks_by_score() {
        let kb = fixtures::knowledge_base();
        let result = search_codebase(&kb, "auth", "all").await.unwrap();

        let names: Vec<&str> = result
            .repositories
            .iter()
            .map(|r| r.item.repo_name.as_str())
            .collect();
        assert_eq!(names, vec!["user-auth-service", "web-dashboard"]);
        assert_eq!(result.repositories[0].relevance_score, 5);
        assert_eq!(result.repositories[1].relevance_score, 1);
        assert_eq!(result.total_snippets_found, 1);
        assert_eq!(result.code_snippets[0].kind, "authentication");
        assert!(result.suggestion.is_none());
    }

    #[tokio::test]
    async fn test_search_codebase_file_type_filter() {
        let kb = fixtures::knowledge_base();
        let result = search_codebase(&kb, "auth", "py").await.unwrap();
        assert_eq!(result.total_repositories_found, 1);
        assert_eq!(result.repositories[0].item.repo_name, "user-auth-service");

        let result = search_codebase(&kb, "auth", "java").await.unwrap();
        assert_eq!(result.total_repositories_found, 0);
        assert_eq!(result.total_snippets_found, 0);
        assert_eq!(
            result.available_languages.unwrap(),
            vec!["Python", "Java", "TypeScript"]
        );
        assert!(result.suggestion.is_some());
    }

    #[tokio::test]
    async fn test_search_codebase_empty_store_is_success() {
        let kb = fixtures::empty_knowledge_base();
        let result = search_codebase(&kb, "auth", "all").await;
        let env = Envelope::from_result("search codebase", result).into_value("search codebase");
        assert_eq!(env["status"], "success");
        assert_eq!(env["total_repositories_found"], 0);
        assert_eq!(env["total_snippets_found"], 0);
    }

    #[tokio::test]
    async fn test_analyze_dependencies_substring_lookup() {
        let kb = fixtures::knowledge_base();
        let report = analyze_dependencies(&kb, "auth").await.unwrap();
        assert_eq!(report.module, "user-auth-service");
        assert_eq!(report.dependents, vec!["payment-gateway", "web-dashboard"]);
    }

    #[tokio::test]
    async fn test_analyze_dependencies_not_found_lists_modules() {
        let kb = fixtures::knowledge_base();
        let env = Envelope::from_result(
            "analyze dependencies",
            analyze_dependencies(&kb, "nonexistent-xyz").await,
        )
        .into_value("analyze dependencies");
        assert_eq!(env["status"], "error");
        let modules = env["available_modules"].as_array().unwrap();
        assert!(modules.iter().any(|m| m == "user-auth-service"));
        assert!(env["suggestion"].is_string());
    }

    #[test]
    fn test_quality_score() {
        assert_eq!(quality_score(4, 1), 75);
        assert_eq!(quality_score(3, 1), 66);
        assert_eq!(quality_score(0, 0), 100);
        assert_eq!(quality_score(2, 5), 0);
    }

    #[tokio::test]
    async fn test_check_best_practices_with_code() {
        let kb = fixtures::knowledge_base();
        let report = check_best_practices(&kb, "print('hi')  # todo: remove", "python")
            .await
            .unwrap();
        assert_eq!(report.language_specific.len(), 1);

        let analysis = report.code_analysis.unwrap();
        assert_eq!(analysis.violations.len(), 1);
        assert_eq!(analysis.violations[0].rule, "no-print");
        assert_eq!(analysis.recommendations.len(), 1);
        assert_eq!(analysis.quality_score, 75);
        assert_eq!(
            analysis.analysis_summary,
            "Found 1 potential issues out of 4 checks"
        );
    }

    #[tokio::test]
    async fn test_check_best_practices_without_code_skips_analysis() {
        let kb = fixtures::knowledge_base();
        let report = check_best_practices(&kb, "", "rust").await.unwrap();
        assert!(report.code_analysis.is_none());
        assert!(report.language_specific.is_empty());
        assert_eq!(report.general_guidelines.len(), 1);
    }

    #[tokio::test]
    async fn test_tech_stack_component_search_order() {
        let kb = fixtures::knowledge_base();
        match get_tech_stack_info(&kb, "script").await.unwrap() {
            TechStackInfo::Component {
                component, category, ..
            } => {
                assert_eq!(component, "TypeScript");
                assert_eq!(category, "frontend");
            }
            other => panic!("unexpected {:?}", other),
        }
        match get_tech_stack_info(&kb, "postgres").await.unwrap() {
            TechStackInfo::Component { category, .. } => assert_eq!(category, "databases"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_tech_stack_overview_and_not_found() {
        let kb = fixtures::knowledge_base();
        let env = Envelope::from_result("get tech stack info", get_tech_stack_info(&kb, "").await)
            .into_value("get tech stack info");
        assert_eq!(env["overview"], "Polyglot microservices on Kubernetes");
        assert_eq!(env["databases"]["Redis"]["purpose"], "cache");

        let env = Envelope::from_result(
            "get tech stack info",
            get_tech_stack_info(&kb, "cobol").await,
        )
        .into_value("get tech stack info");
        assert_eq!(env["status"], "error");
        assert!(env["available_components"]
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c == "Kubernetes"));
    }
}
