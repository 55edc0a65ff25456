//! HR policies, regulatory compliance, and security guidelines.

use serde::Serialize;
use serde_json::Value;

use crate::envelope::ToolError;
use crate::knowledge::{DocumentKind, KnowledgeBase};
use crate::models::{ComplianceCatalog, Guideline, HrHandbook, Policy, Requirement, SecurityCatalog};
use crate::score::{self, rank, Needle, Scored};

const POLICY_LIMIT: usize = 5;
const STANDARD_REQUIREMENT_LIMIT: usize = 3;
const RECOMMENDED_REQUIREMENT_LIMIT: usize = 2;
const HIGH_GUIDELINE_LIMIT: usize = 3;
const MEDIUM_GUIDELINE_LIMIT: usize = 5;

/// `true` when `facet` selects `category`: `"all"` selects everything,
/// otherwise the facet must be a substring of the category name.
fn facet_selects(facet: &str, wildcard: &str, category: &str) -> bool {
    facet.eq_ignore_ascii_case(wildcard) || Needle::new(facet).found_in(category)
}

// ═══════════════════════════════════════════════════════════════════════
// search_policies
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct PolicyHit {
    pub category: String,
    pub title: String,
    pub description: String,
    pub details: Vec<Value>,
    pub effective_date: String,
    pub last_updated: String,
    pub contact: String,
    pub keywords: Vec<String>,
}

impl PolicyHit {
    fn new(category: &str, policy: &Policy) -> Self {
        Self {
            category: category.to_string(),
            title: policy.title.clone(),
            description: policy.description.clone(),
            details: policy.details.clone(),
            effective_date: policy.effective_date.clone(),
            last_updated: policy.last_updated.clone(),
            contact: policy.contact.clone(),
            keywords: policy.keywords.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicySearch {
    pub topic: String,
    pub policy_type_filter: String,
    pub policies_found: usize,
    pub matching_policies: Vec<Scored<PolicyHit>>,
    pub additional_policies_available: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Rank HR policies for a topic within the categories `policy_type`
/// selects.
pub async fn search_policies(
    kb: &KnowledgeBase,
    topic: &str,
    policy_type: &str,
) -> Result<PolicySearch, ToolError> {
    let handbook: HrHandbook = kb.document(DocumentKind::HrHandbook).await;
    let q = Needle::new(topic);

    let ranked = rank(
        handbook
            .policies
            .iter()
            .filter(|(category, _)| facet_selects(policy_type, "all", category))
            .flat_map(|(category, policies)| policies.iter().map(move |p| (category, p)))
            .map(|(category, p)| (PolicyHit::new(category, p), score::policy(p, &q))),
        POLICY_LIMIT,
    );

    let nothing = ranked.is_empty();
    Ok(PolicySearch {
        topic: topic.to_string(),
        policy_type_filter: policy_type.to_string(),
        policies_found: ranked.total,
        additional_policies_available: ranked.suppressed(),
        matching_policies: ranked.items,
        available_categories: nothing
            .then(|| handbook.policies.keys().map(str::to_string).collect()),
        suggestion: nothing
            .then(|| "Try searching with different keywords or browse by category".to_string()),
    })
}

// ═══════════════════════════════════════════════════════════════════════
// check_compliance
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct RequirementHit {
    pub regulation: String,
    pub regulation_description: String,
    pub requirement_title: String,
    pub description: String,
    pub mandatory_actions: Vec<Value>,
    pub prohibited_actions: Vec<Value>,
    pub documentation_required: Vec<Value>,
    pub compliance_level: String,
    pub penalties: String,
    pub review_frequency: String,
    pub responsible_team: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceSummary {
    pub critical_requirements: usize,
    pub standard_requirements: usize,
    pub recommended_requirements: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceReport {
    pub scenario: String,
    pub regulation_filter: String,
    pub total_requirements: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_summary: Option<ComplianceSummary>,
    pub critical_requirements: Vec<RequirementHit>,
    pub standard_requirements: Vec<RequirementHit>,
    pub recommended_requirements: Vec<RequirementHit>,
    pub general_guidance: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_regulations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A requirement applies when any of its scenario keywords occurs in the
/// scenario text. Short keywords match liberally.
fn applies(requirement: &Requirement, scenario: &str) -> bool {
    requirement
        .applicable_scenarios
        .iter()
        .any(|k| scenario.contains(&k.to_lowercase()))
}

/// Collect the requirements that apply to a scenario, grouped by
/// compliance level.
pub async fn check_compliance(
    kb: &KnowledgeBase,
    scenario: &str,
    regulation_type: &str,
) -> Result<ComplianceReport, ToolError> {
    let catalog: ComplianceCatalog = kb.document(DocumentKind::ComplianceDocs).await;
    let lowered = scenario.to_lowercase();
    let scenario_text = lowered.as_str();
    let facet = (!regulation_type.is_empty()).then(|| Needle::new(regulation_type));

    let applicable: Vec<RequirementHit> = catalog
        .regulations
        .iter()
        .filter(|(name, _)| facet.as_ref().map_or(true, |f| f.found_in(name)))
        .flat_map(|(name, reg)| {
            reg.requirements
                .iter()
                .filter(move |r| applies(r, scenario_text))
                .map(move |r| RequirementHit {
                    regulation: name.to_string(),
                    regulation_description: reg.description.clone(),
                    requirement_title: r.title.clone(),
                    description: r.description.clone(),
                    mandatory_actions: r.mandatory_actions.clone(),
                    prohibited_actions: r.prohibited_actions.clone(),
                    documentation_required: r.documentation_required.clone(),
                    compliance_level: r.compliance_level.clone(),
                    penalties: r.penalties.clone(),
                    review_frequency: r.review_frequency.clone(),
                    responsible_team: r.responsible_team.clone(),
                })
        })
        .collect();

    let regulation_filter = if regulation_type.is_empty() {
        "all".to_string()
    } else {
        regulation_type.to_string()
    };

    if applicable.is_empty() {
        return Ok(ComplianceReport {
            scenario: scenario.to_string(),
            regulation_filter,
            total_requirements: 0,
            compliance_summary: None,
            critical_requirements: Vec::new(),
            standard_requirements: Vec::new(),
            recommended_requirements: Vec::new(),
            general_guidance: catalog.general_guidance.clone(),
            available_regulations: Some(catalog.regulations.keys().map(str::to_string).collect()),
            suggestion: Some(
                "Scenario may not have specific compliance requirements, or try rephrasing"
                    .to_string(),
            ),
        });
    }

    let at_level = |level: &str| -> Vec<RequirementHit> {
        applicable
            .iter()
            .filter(|r| r.compliance_level == level)
            .cloned()
            .collect()
    };
    let critical = at_level("critical");
    let standard = at_level("standard");
    let recommended = at_level("recommended");

    Ok(ComplianceReport {
        scenario: scenario.to_string(),
        regulation_filter,
        total_requirements: applicable.len(),
        compliance_summary: Some(ComplianceSummary {
            critical_requirements: critical.len(),
            standard_requirements: standard.len(),
            recommended_requirements: recommended.len(),
        }),
        critical_requirements: critical,
        standard_requirements: standard
            .into_iter()
            .take(STANDARD_REQUIREMENT_LIMIT)
            .collect(),
        recommended_requirements: recommended
            .into_iter()
            .take(RECOMMENDED_REQUIREMENT_LIMIT)
            .collect(),
        general_guidance: catalog.general_guidance.clone(),
        available_regulations: None,
        suggestion: None,
    })
}

// ═══════════════════════════════════════════════════════════════════════
// find_guidelines
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct GuidelineHit {
    pub category: String,
    pub title: String,
    pub description: String,
    pub requirements: Vec<Value>,
    pub best_practices: Vec<Value>,
    pub common_violations: Vec<Value>,
    pub implementation_guide: Vec<Value>,
    pub severity: String,
    pub compliance_frameworks: Vec<String>,
    pub last_updated: String,
    pub tags: Vec<String>,
}

impl GuidelineHit {
    fn new(category: &str, g: &Guideline) -> Self {
        Self {
            category: category.to_string(),
            title: g.title.clone(),
            description: g.description.clone(),
            requirements: g.requirements.clone(),
            best_practices: g.best_practices.clone(),
            common_violations: g.common_violations.clone(),
            implementation_guide: g.implementation_guide.clone(),
            severity: g.severity.clone(),
            compliance_frameworks: g.compliance_frameworks.clone(),
            last_updated: g.last_updated.clone(),
            tags: g.tags.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeverityBreakdown {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuidelineReport {
    pub guideline_type: String,
    pub specific_topic: String,
    pub total_guidelines_found: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity_breakdown: Option<SeverityBreakdown>,
    pub critical_guidelines: Vec<Scored<GuidelineHit>>,
    pub high_priority_guidelines: Vec<Scored<GuidelineHit>>,
    pub standard_guidelines: Vec<Scored<GuidelineHit>>,
    pub general_security_principles: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Security guidelines in the categories `guideline_type` selects
/// (`"general"` selects all), scored against `specific_topic` when given
/// and grouped by severity.
pub async fn find_guidelines(
    kb: &KnowledgeBase,
    guideline_type: &str,
    specific_topic: &str,
) -> Result<GuidelineReport, ToolError> {
    let catalog: SecurityCatalog = kb.document(DocumentKind::SecurityGuidelines).await;
    let topic = (!specific_topic.is_empty()).then(|| Needle::new(specific_topic));

    let ranked = rank(
        catalog
            .guidelines
            .iter()
            .filter(|(category, _)| facet_selects(guideline_type, "general", category))
            .flat_map(|(category, group)| group.items.iter().map(move |g| (category, g)))
            .map(|(category, g)| {
                (
                    GuidelineHit::new(category, g),
                    score::guideline(g, topic.as_ref()),
                )
            }),
        usize::MAX,
    );

    let specific_topic = if specific_topic.is_empty() {
        "all topics".to_string()
    } else {
        specific_topic.to_string()
    };

    if ranked.is_empty() {
        return Ok(GuidelineReport {
            guideline_type: guideline_type.to_string(),
            specific_topic,
            total_guidelines_found: 0,
            severity_breakdown: None,
            critical_guidelines: Vec::new(),
            high_priority_guidelines: Vec::new(),
            standard_guidelines: Vec::new(),
            general_security_principles: catalog.general_principles.clone(),
            available_categories: Some(catalog.guidelines.keys().map(str::to_string).collect()),
            suggestion: Some(
                "Try a different guideline type or topic from the available categories"
                    .to_string(),
            ),
        });
    }

    let total = ranked.total;
    let mut critical = Vec::new();
    let mut high = Vec::new();
    let mut medium = Vec::new();
    for hit in ranked.items {
        match hit.item.severity.as_str() {
            "critical" => critical.push(hit),
            "high" => high.push(hit),
            "medium" => medium.push(hit),
            _ => {}
        }
    }
    let breakdown = SeverityBreakdown {
        critical: critical.len(),
        high: high.len(),
        medium: medium.len(),
    };
    high.truncate(HIGH_GUIDELINE_LIMIT);
    medium.truncate(MEDIUM_GUIDELINE_LIMIT);

    Ok(GuidelineReport {
        guideline_type: guideline_type.to_string(),
        specific_topic,
        total_guidelines_found: total,
        severity_breakdown: Some(breakdown),
        critical_guidelines: critical,
        high_priority_guidelines: high,
        standard_guidelines: medium,
        general_security_principles: catalog.general_principles.clone(),
        available_categories: None,
        suggestion: None,
    })
}
