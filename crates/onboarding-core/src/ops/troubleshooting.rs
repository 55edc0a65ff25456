//! Troubleshooting: error classification, solution lookup, canned
//! diagnostics.

use serde::Serialize;
use serde_json::Value;

use crate::envelope::{RecoveryHints, ToolError};
use crate::knowledge::{DocumentKind, KnowledgeBase};
use crate::models::{DiagnosticsCatalog, ErrorCatalog, Solution, SolutionCatalog};
use crate::ops::distinct;
use crate::score::{self, rank, Needle, Scored};

const SOLUTION_LIMIT: usize = 3;
const WARNING_PASS_RATIO: f64 = 0.8;

// ═══════════════════════════════════════════════════════════════════════
// analyze_error
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct MatchedAnalysis {
    pub error_category: String,
    pub error_type: String,
    pub description: String,
    pub severity: String,
    pub common_causes: Vec<Value>,
    pub initial_troubleshooting_steps: Vec<Value>,
    pub pattern_matched: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenericAnalysis {
    pub category: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: &'static str,
    pub suggested_approach: [&'static str; 4],
    pub severity: &'static str,
}

impl GenericAnalysis {
    fn unknown() -> Self {
        Self {
            category: "unknown",
            kind: "Unrecognized Error",
            description: "This error pattern is not in our common issues database",
            suggested_approach: [
                "Check the full stack trace for more context",
                "Look for similar errors in logs",
                "Check recent code changes",
                "Verify environment configuration",
            ],
            severity: "unknown",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Analysis {
    Matched(MatchedAnalysis),
    Unrecognized(GenericAnalysis),
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorAnalysis {
    /// The submitted error text, echoed back.
    pub error_message: String,
    pub analysis: Analysis,
    pub context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_matches: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<&'static str>,
}

/// Classify an error message against the known patterns.
///
/// Every `(category, pattern)` pair whose pattern occurs in the message is a
/// hit; the first hit in document order is reported and the rest are
/// counted.
pub async fn analyze_error(
    kb: &KnowledgeBase,
    error_message: &str,
    context: &str,
) -> Result<ErrorAnalysis, ToolError> {
    let catalog: ErrorCatalog = kb.document(DocumentKind::CommonErrors).await;
    let lowered = error_message.to_lowercase();
    let message = lowered.as_str();

    let mut hits = catalog.error_patterns.iter().flat_map(|(category, info)| {
        info.patterns
            .iter()
            .filter(move |p| message.contains(&p.to_lowercase()))
            .map(move |p| (category, info, p))
    });

    let Some((category, info, pattern)) = hits.next() else {
        return Ok(ErrorAnalysis {
            error_message: error_message.to_string(),
            analysis: Analysis::Unrecognized(GenericAnalysis::unknown()),
            context: context.to_string(),
            additional_matches: None,
            recommendation: Some(
                "Try using find_solutions to search for similar issues or run_diagnostics for system checks",
            ),
        });
    };
    let additional = hits.count();

    tracing::debug!(category, pattern = %pattern, additional, "error classified");

    Ok(ErrorAnalysis {
        error_message: error_message.to_string(),
        analysis: Analysis::Matched(MatchedAnalysis {
            error_category: category.to_string(),
            error_type: info.kind.clone(),
            description: info.description.clone(),
            severity: info.severity.clone(),
            common_causes: info.common_causes.clone(),
            initial_troubleshooting_steps: info.initial_steps.clone(),
            pattern_matched: pattern.clone(),
        }),
        context: context.to_string(),
        additional_matches: Some(additional),
        recommendation: None,
    })
}

// ═══════════════════════════════════════════════════════════════════════
// find_solutions
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct SolutionHit {
    pub title: String,
    pub category: String,
    pub description: String,
    pub difficulty: String,
    pub estimated_time: String,
    pub prerequisites: Vec<Value>,
    pub steps: Vec<Value>,
    pub verification: Vec<Value>,
    pub prevention: Vec<Value>,
    pub related_issues: Vec<Value>,
}

impl From<Solution> for SolutionHit {
    fn from(s: Solution) -> Self {
        Self {
            title: s.title,
            category: s.category,
            description: s.description,
            difficulty: s.difficulty,
            estimated_time: s.estimated_time,
            prerequisites: s.prerequisites,
            steps: s.steps,
            verification: s.verification,
            prevention: s.prevention,
            related_issues: s.related_issues,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SolutionSearch {
    pub problem_description: String,
    pub category_filter: String,
    pub solutions_found: usize,
    pub top_solutions: Vec<Scored<SolutionHit>>,
    pub additional_solutions_available: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Rank solutions for a free-text problem description, optionally boosted
/// by a category facet.
pub async fn find_solutions(
    kb: &KnowledgeBase,
    problem_description: &str,
    category: &str,
) -> Result<SolutionSearch, ToolError> {
    let catalog: SolutionCatalog = kb.document(DocumentKind::Solutions).await;
    let problem = Needle::new(problem_description);
    let facet = (!category.is_empty()).then(|| Needle::new(category));

    let categories = distinct(catalog.solutions.iter().map(|s| s.category.as_str()));
    let ranked = rank(
        catalog.solutions.into_iter().map(|sol| {
            let s = score::solution(&sol, &problem, facet.as_ref());
            (SolutionHit::from(sol), s)
        }),
        SOLUTION_LIMIT,
    );

    let nothing = ranked.is_empty();
    Ok(SolutionSearch {
        problem_description: problem_description.to_string(),
        category_filter: if category.is_empty() {
            "all".to_string()
        } else {
            category.to_string()
        },
        solutions_found: ranked.total,
        additional_solutions_available: ranked.suppressed(),
        top_solutions: ranked.items,
        available_categories: nothing.then_some(categories),
        suggestion: nothing.then(|| {
            "Try rephrasing your problem or specify a category from the available list".to_string()
        }),
    })
}

// ═══════════════════════════════════════════════════════════════════════
// run_diagnostics
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

impl HealthStatus {
    /// Every check passed → healthy, at least 80% → warning, else critical.
    pub fn from_counts(passed: usize, total: usize) -> Self {
        if passed == total {
            HealthStatus::Healthy
        } else if passed as f64 >= total as f64 * WARNING_PASS_RATIO {
            HealthStatus::Warning
        } else {
            HealthStatus::Critical
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub description: String,
    pub status: String,
    pub value: String,
    pub expected: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub check: String,
    pub issue: String,
    pub severity: String,
    pub suggested_action: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticSummary {
    pub total_checks: usize,
    pub passed_checks: usize,
    pub failed_checks: usize,
    pub health_score: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub component: String,
    pub check_type: String,
    pub timestamp: String,
    pub overall_status: HealthStatus,
    pub checks_performed: Vec<CheckResult>,
    pub issues_found: Vec<Issue>,
    pub recommendations: Vec<Value>,
    pub summary: DiagnosticSummary,
}

/// Report the canned outcome of a component's check suite. Nothing is
/// probed; results depend only on the diagnostics document.
pub async fn run_diagnostics(
    kb: &KnowledgeBase,
    component: &str,
    check_type: &str,
) -> Result<DiagnosticReport, ToolError> {
    let catalog: DiagnosticsCatalog = kb.document(DocumentKind::Diagnostics).await;

    let suites = match catalog.components.get(component) {
        Some(suites) if !suites.is_empty() => suites,
        _ => {
            let hints = RecoveryHints {
                available_components: Some(catalog.components.keys().map(str::to_string).collect()),
                ..Default::default()
            };
            return Err(ToolError::not_found(
                format!("Component '{}' not available for diagnostics", component),
                hints,
            ));
        }
    };

    let Some(suite) = suites.get(check_type) else {
        let hints = RecoveryHints {
            available_check_types: Some(suites.keys().map(str::to_string).collect()),
            ..Default::default()
        };
        return Err(ToolError::not_found(
            format!(
                "Check type '{}' not available for component '{}'",
                check_type, component
            ),
            hints,
        ));
    };

    let checks_performed: Vec<CheckResult> = suite
        .checks
        .iter()
        .map(|c| CheckResult {
            name: c.name.clone(),
            description: c.description.clone(),
            status: c.mock_status.clone(),
            value: c.mock_value.clone(),
            expected: c.expected.clone(),
            message: c.mock_message.clone(),
        })
        .collect();
    let issues_found: Vec<Issue> = suite
        .checks
        .iter()
        .filter(|c| !c.passed())
        .map(|c| Issue {
            check: c.name.clone(),
            issue: c.mock_message.clone(),
            severity: c.severity.clone(),
            suggested_action: c.suggested_action.clone(),
        })
        .collect();

    let total = suite.checks.len();
    let passed = total - issues_found.len();
    let health_score = if total == 0 {
        0
    } else {
        (passed * 100 / total) as u32
    };

    Ok(DiagnosticReport {
        component: component.to_string(),
        check_type: check_type.to_string(),
        timestamp: catalog.timestamp.clone(),
        overall_status: HealthStatus::from_counts(passed, total),
        checks_performed,
        issues_found,
        recommendations: suite.recommendations.clone(),
        summary: DiagnosticSummary {
            total_checks: total,
            passed_checks: passed,
            failed_checks: total - passed,
            health_score,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Envelope;
    use crate::ops::fixtures;

    #[tokio::test]
    async fn test_analyze_error_network() {
        let kb = fixtures::knowledge_base();
        let result = analyze_error(&kb, "Connection refused: could not reach host", "")
            .await
            .unwrap();
        let Analysis::Matched(analysis) = result.analysis else {
            panic!("expected a matched analysis");
        };
        assert_eq!(analysis.error_category, "network");
        assert_eq!(analysis.error_type, "Connectivity");
        assert_eq!(analysis.pattern_matched, "connection refused");
        assert_eq!(result.additional_matches, Some(0));
    }

    #[tokio::test]
    async fn test_analyze_error_counts_additional_hits() {
        let kb = fixtures::knowledge_base();
        let result = analyze_error(
            &kb,
            "Request timed out after connection refused, then 401",
            "deploying to staging",
        )
        .await
        .unwrap();
        assert_eq!(result.additional_matches, Some(2));
        assert_eq!(result.context, "deploying to staging");
    }

    #[tokio::test]
    async fn test_analyze_error_unknown_is_success() {
        let kb = fixtures::knowledge_base();
        let env = Envelope::from_result(
            "analyze error",
            analyze_error(&kb, "segfault in the flux capacitor", "").await,
        )
        .into_value("analyze error");
        assert_eq!(env["status"], "success");
        assert_eq!(env["analysis"]["category"], "unknown");
        assert_eq!(env["analysis"]["type"], "Unrecognized Error");
        assert!(env["recommendation"].is_string());
        assert!(env.get("additional_matches").is_none());
    }

    #[tokio::test]
    async fn test_find_solutions_ranks_keyword_and_title() {
        let kb = fixtures::knowledge_base();
        let result = find_solutions(&kb, "connection pool exhausted", "")
            .await
            .unwrap();
        assert_eq!(result.solutions_found, 1);
        assert_eq!(result.top_solutions[0].relevance_score, 3);
        assert_eq!(result.category_filter, "all");
    }

    #[tokio::test]
    async fn test_find_solutions_category_facet() {
        let kb = fixtures::knowledge_base();
        let result = find_solutions(&kb, "pods keep restarting", "infra")
            .await
            .unwrap();
        assert_eq!(result.solutions_found, 1);
        assert_eq!(result.top_solutions[0].item.title, "Restart stuck pods");
        // "pods" in the title plus the category facet.
        assert_eq!(result.top_solutions[0].relevance_score, 4);
        assert_eq!(result.category_filter, "infra");
    }

    #[tokio::test]
    async fn test_find_solutions_none_lists_categories() {
        let kb = fixtures::knowledge_base();
        let result = find_solutions(&kb, "gremlins", "").await.unwrap();
        assert_eq!(result.solutions_found, 0);
        assert_eq!(
            result.available_categories.unwrap(),
            vec!["database", "authentication", "infrastructure"]
        );
    }

    #[test]
    fn test_health_status_thresholds() {
        assert_eq!(HealthStatus::from_counts(5, 5), HealthStatus::Healthy);
        assert_eq!(HealthStatus::from_counts(4, 5), HealthStatus::Warning);
        assert_eq!(HealthStatus::from_counts(2, 5), HealthStatus::Critical);
    }

    #[tokio::test]
    async fn test_run_diagnostics_outcomes() {
        let kb = fixtures::knowledge_base();

        let healthy = run_diagnostics(&kb, "system", "basic").await.unwrap();
        assert_eq!(healthy.overall_status, HealthStatus::Healthy);
        assert_eq!(healthy.summary.health_score, 100);
        assert_eq!(healthy.timestamp, "2025-01-01T12:00:00Z");

        let warning = run_diagnostics(&kb, "system", "detailed").await.unwrap();
        assert_eq!(warning.overall_status, HealthStatus::Warning);
        assert_eq!(warning.summary.health_score, 80);
        assert_eq!(warning.issues_found.len(), 1);
        assert_eq!(warning.issues_found[0].severity, "high");

        let critical = run_diagnostics(&kb, "system", "performance").await.unwrap();
        assert_eq!(critical.overall_status, HealthStatus::Critical);
        assert_eq!(critical.summary.failed_checks, 3);
    }

    #[tokio::test]
    async fn test_run_diagnostics_empty_suite_scores_zero() {
        let kb = fixtures::knowledge_base();
        let report = run_diagnostics(&kb, "database", "basic").await.unwrap();
        assert_eq!(report.summary.total_checks, 0);
        assert_eq!(report.summary.health_score, 0);
    }

    #[tokio::test]
    async fn test_run_diagnostics_unknown_inputs() {
        let kb = fixtures::knowledge_base();
        let result = run_diagnostics(&kb, "gpu", "basic").await;
        let env = Envelope::from_result("run diagnostics", result)
            .into_value("run diagnostics");
        assert_eq!(env["status"], "error");
        assert_eq!(env["available_components"], serde_json::json!(["system", "database"]));

        let result = run_diagnostics(&kb, "system", "deep").await;
        let env = Envelope::from_result("run diagnostics", result)
            .into_value("run diagnostics");
        assert_eq!(
            env["available_check_types"],
            serde_json::json!(["basic", "detailed", "performance"])
        );
    }

    #[tokio::test]
    async fn test_run_diagnostics_is_idempotent() {
        let kb = fixtures::knowledge_base();
        let a = run_diagnostics(&kb, "system", "detailed").await.unwrap();
        let b = run_diagnostics(&kb, "system", "detailed").await.unwrap();
        let a = serde_json::to_string(&a).unwrap();
        let b = serde_json::to_string(&b).unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_troubleshooting_searches_on_empty_store_are_success() {
        let kb = fixtures::empty_knowledge_base();

        let result = find_solutions(&kb, "pods keep restarting", "").await;
        let env = Envelope::from_result("find solutions", result).into_value("find solutions");
        assert_eq!(env["status"], "success");
        assert_eq!(env["solutions_found"], 0);

        let result = analyze_error(&kb, "Connection refused", "").await.unwrap();
        assert!(matches!(result.analysis, Analysis::Unrecognized(_)));
        let env = Envelope::from_result("analyze error", Ok::<_, ToolError>(result))
            .into_value("analyze error");
        assert_eq!(env["status"], "success");
        assert_eq!(env["analysis"]["category"], "unknown");
    }
}
