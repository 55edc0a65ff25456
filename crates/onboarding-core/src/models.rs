//! Typed knowledge schema.
//!
//! One struct per knowledge document and per record inside it. Every field
//! is optional and falls back to an empty or documented neutral value, so
//! scoring code never has to check for missing keys. Field-level leniency
//! lives in [`crate::de`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::de::{self, KeyedMap, Records};

fn medium() -> String {
    "medium".to_string()
}

fn standard() -> String {
    "standard".to_string()
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

// ═══════════════════════════════════════════════════════════════════════
// Codebase
// ═══════════════════════════════════════════════════════════════════════

/// `codebase/repositories.json`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RepositoryCatalog {
    #[serde(deserialize_with = "de::seq")]
    pub repositories: Vec<Repository>,
    pub code_snippets: KeyedMap<CodeSnippet>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Repository {
    #[serde(deserialize_with = "de::text")]
    pub name: String,
    #[serde(deserialize_with = "de::text")]
    pub description: String,
    #[serde(deserialize_with = "de::text")]
    pub language: String,
    #[serde(deserialize_with = "de::text")]
    pub framework: String,
    #[serde(deserialize_with = "de::texts")]
    pub key_files: Vec<String>,
    #[serde(deserialize_with = "de::texts")]
    pub dependencies: Vec<String>,
    #[serde(deserialize_with = "de::text")]
    pub team: String,
    #[serde(deserialize_with = "de::text")]
    pub documentation: String,
    #[serde(default = "empty_object")]
    pub examples: Value,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CodeSnippet {
    #[serde(deserialize_with = "de::text")]
    pub file: String,
    #[serde(deserialize_with = "de::text")]
    pub function: String,
    #[serde(deserialize_with = "de::text")]
    pub code: String,
    #[serde(deserialize_with = "de::text")]
    pub description: String,
    #[serde(deserialize_with = "de::seq")]
    pub best_practices: Vec<Value>,
}

/// `codebase/dependencies.json`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DependencyGraph {
    pub modules: KeyedMap<Module>,
}

/// A node in the service dependency graph, keyed by module name.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Module {
    #[serde(deserialize_with = "de::text")]
    pub description: String,
    #[serde(deserialize_with = "de::texts")]
    pub dependencies: Vec<String>,
    #[serde(deserialize_with = "de::texts")]
    pub dependents: Vec<String>,
    #[serde(deserialize_with = "de::text")]
    pub architecture_layer: String,
    #[serde(deserialize_with = "de::seq")]
    pub communication_methods: Vec<Value>,
    #[serde(deserialize_with = "de::seq")]
    pub data_flows: Vec<Value>,
    #[serde(deserialize_with = "de::seq")]
    pub integration_points: Vec<Value>,
}

/// `codebase/best_practices.json`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BestPractices {
    pub general: GuidelineSet,
    pub languages: KeyedMap<GuidelineSet>,
    #[serde(deserialize_with = "de::seq")]
    pub quality_checklist: Vec<Value>,
    #[serde(deserialize_with = "de::seq")]
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GuidelineSet {
    #[serde(deserialize_with = "de::seq")]
    pub guidelines: Vec<Value>,
}

/// A literal-substring code check. `kind == "violation"` counts against the
/// quality score; anything else is reported as a recommendation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Rule {
    #[serde(deserialize_with = "de::text")]
    pub trigger: String,
    #[serde(rename = "type", deserialize_with = "de::text")]
    pub kind: String,
    #[serde(deserialize_with = "de::text")]
    pub rule: String,
    #[serde(deserialize_with = "de::text")]
    pub message: String,
    #[serde(default = "medium", deserialize_with = "de::text")]
    pub severity: String,
    #[serde(deserialize_with = "de::text")]
    pub improvement: String,
}

impl Rule {
    pub fn is_violation(&self) -> bool {
        self.kind == "violation"
    }
}

/// `codebase/tech_stack.json`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TechStack {
    #[serde(deserialize_with = "de::text")]
    pub overview: String,
    pub frontend: KeyedMap<Value>,
    pub backend: KeyedMap<Value>,
    pub infrastructure: KeyedMap<Value>,
    pub tools: KeyedMap<Value>,
    pub databases: KeyedMap<Value>,
}

/// The fixed set of tech-stack sections, in search order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TechCategory {
    Frontend,
    Backend,
    Infrastructure,
    Tools,
    Databases,
}

impl TechCategory {
    pub const ALL: [TechCategory; 5] = [
        TechCategory::Frontend,
        TechCategory::Backend,
        TechCategory::Infrastructure,
        TechCategory::Tools,
        TechCategory::Databases,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TechCategory::Frontend => "frontend",
            TechCategory::Backend => "backend",
            TechCategory::Infrastructure => "infrastructure",
            TechCategory::Tools => "tools",
            TechCategory::Databases => "databases",
        }
    }

    pub fn components<'a>(&self, stack: &'a TechStack) -> &'a KeyedMap<Value> {
        match self {
            TechCategory::Frontend => &stack.frontend,
            TechCategory::Backend => &stack.backend,
            TechCategory::Infrastructure => &stack.infrastructure,
            TechCategory::Tools => &stack.tools,
            TechCategory::Databases => &stack.databases,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Documentation
// ═══════════════════════════════════════════════════════════════════════

/// `documentation/wiki_pages.json`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WikiCatalog {
    #[serde(deserialize_with = "de::seq")]
    pub pages: Vec<WikiPage>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WikiPage {
    #[serde(deserialize_with = "de::text")]
    pub title: String,
    #[serde(deserialize_with = "de::text")]
    pub url: String,
    #[serde(deserialize_with = "de::text")]
    pub summary: String,
    #[serde(deserialize_with = "de::text")]
    pub content: String,
    #[serde(deserialize_with = "de::texts")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "de::text")]
    pub last_updated: String,
    #[serde(deserialize_with = "de::text")]
    pub author: String,
}

/// `documentation/api_docs.json`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiCatalog {
    #[serde(deserialize_with = "de::seq")]
    pub apis: Vec<Api>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Api {
    #[serde(deserialize_with = "de::text")]
    pub name: String,
    #[serde(deserialize_with = "de::text")]
    pub description: String,
    #[serde(deserialize_with = "de::text")]
    pub version: String,
    #[serde(deserialize_with = "de::text")]
    pub base_url: String,
    #[serde(deserialize_with = "de::text")]
    pub documentation_url: String,
    #[serde(deserialize_with = "de::text")]
    pub status: String,
    #[serde(default = "empty_object")]
    pub authentication: Value,
    #[serde(deserialize_with = "de::seq")]
    pub key_endpoints: Vec<Endpoint>,
}

/// An API endpoint. `path` and `description` are matched; everything else
/// (method, parameters, examples, ...) passes through untouched.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Endpoint {
    #[serde(deserialize_with = "de::text")]
    pub path: String,
    #[serde(deserialize_with = "de::text")]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `documentation/tutorials.json`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TutorialCatalog {
    #[serde(deserialize_with = "de::seq")]
    pub tutorials: Vec<Tutorial>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Tutorial {
    #[serde(deserialize_with = "de::text")]
    pub title: String,
    #[serde(deserialize_with = "de::text")]
    pub description: String,
    #[serde(deserialize_with = "de::text")]
    pub difficulty: String,
    #[serde(deserialize_with = "de::text")]
    pub estimated_time: String,
    #[serde(deserialize_with = "de::text")]
    pub url: String,
    #[serde(deserialize_with = "de::texts")]
    pub topics: Vec<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// Troubleshooting
// ═══════════════════════════════════════════════════════════════════════

/// `troubleshooting/common_errors.json`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ErrorCatalog {
    pub error_patterns: KeyedMap<ErrorPattern>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ErrorPattern {
    #[serde(rename = "type", deserialize_with = "de::text")]
    pub kind: String,
    #[serde(deserialize_with = "de::text")]
    pub description: String,
    #[serde(deserialize_with = "de::seq")]
    pub common_causes: Vec<Value>,
    #[serde(deserialize_with = "de::seq")]
    pub initial_steps: Vec<Value>,
    #[serde(default = "medium", deserialize_with = "de::text")]
    pub severity: String,
    /// Literal substrings looked for in the submitted error text.
    #[serde(deserialize_with = "de::texts")]
    pub patterns: Vec<String>,
}

/// `troubleshooting/solutions.json`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SolutionCatalog {
    #[serde(deserialize_with = "de::seq")]
    pub solutions: Vec<Solution>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Solution {
    #[serde(deserialize_with = "de::text")]
    pub title: String,
    #[serde(deserialize_with = "de::text")]
    pub category: String,
    #[serde(deserialize_with = "de::text")]
    pub description: String,
    #[serde(deserialize_with = "de::texts")]
    pub keywords: Vec<String>,
    #[serde(default = "medium", deserialize_with = "de::text")]
    pub difficulty: String,
    #[serde(deserialize_with = "de::text")]
    pub estimated_time: String,
    #[serde(deserialize_with = "de::seq")]
    pub prerequisites: Vec<Value>,
    #[serde(deserialize_with = "de::seq")]
    pub steps: Vec<Value>,
    #[serde(deserialize_with = "de::seq")]
    pub verification: Vec<Value>,
    #[serde(deserialize_with = "de::seq")]
    pub prevention: Vec<Value>,
    #[serde(deserialize_with = "de::seq")]
    pub related_issues: Vec<Value>,
}

pub const DEFAULT_DIAGNOSTIC_TIMESTAMP: &str = "2025-01-01T12:00:00Z";

fn diagnostic_timestamp() -> String {
    DEFAULT_DIAGNOSTIC_TIMESTAMP.to_string()
}

/// `troubleshooting/diagnostics.json`: component → check type → suite.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiagnosticsCatalog {
    pub components: KeyedMap<KeyedMap<CheckSuite>>,
    #[serde(default = "diagnostic_timestamp", deserialize_with = "de::text")]
    pub timestamp: String,
}

impl Default for DiagnosticsCatalog {
    fn default() -> Self {
        Self {
            components: KeyedMap::new(),
            timestamp: diagnostic_timestamp(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CheckSuite {
    pub checks: Records<Check>,
    #[serde(deserialize_with = "de::seq")]
    pub recommendations: Vec<Value>,
}

fn pass() -> String {
    "pass".to_string()
}

fn ok() -> String {
    "OK".to_string()
}

fn completed() -> String {
    "Check completed successfully".to_string()
}

fn review() -> String {
    "Review check details".to_string()
}

/// A diagnostic check with a canned outcome. Nothing is probed live.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Check {
    #[serde(deserialize_with = "de::text")]
    pub name: String,
    #[serde(deserialize_with = "de::text")]
    pub description: String,
    #[serde(default = "pass", deserialize_with = "de::text")]
    pub mock_status: String,
    #[serde(default = "ok", deserialize_with = "de::text")]
    pub mock_value: String,
    #[serde(deserialize_with = "de::text")]
    pub expected: String,
    #[serde(default = "completed", deserialize_with = "de::text")]
    pub mock_message: String,
    #[serde(default = "medium", deserialize_with = "de::text")]
    pub severity: String,
    #[serde(default = "review", deserialize_with = "de::text")]
    pub suggested_action: String,
}

impl Default for Check {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            mock_status: pass(),
            mock_value: ok(),
            expected: String::new(),
            mock_message: completed(),
            severity: medium(),
            suggested_action: review(),
        }
    }
}

impl Check {
    pub fn passed(&self) -> bool {
        self.mock_status == "pass"
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Policies
// ═══════════════════════════════════════════════════════════════════════

/// `policies/hr_handbook.json`: policy category → policies.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HrHandbook {
    pub policies: KeyedMap<Records<Policy>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Policy {
    #[serde(deserialize_with = "de::text")]
    pub title: String,
    #[serde(deserialize_with = "de::text")]
    pub description: String,
    #[serde(deserialize_with = "de::seq")]
    pub details: Vec<Value>,
    #[serde(deserialize_with = "de::texts")]
    pub keywords: Vec<String>,
    #[serde(deserialize_with = "de::text")]
    pub effective_date: String,
    #[serde(deserialize_with = "de::text")]
    pub last_updated: String,
    #[serde(deserialize_with = "de::text")]
    pub contact: String,
}

/// `policies/compliance_docs.json`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ComplianceCatalog {
    pub regulations: KeyedMap<Regulation>,
    #[serde(deserialize_with = "de::seq")]
    pub general_guidance: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Regulation {
    #[serde(deserialize_with = "de::text")]
    pub description: String,
    #[serde(deserialize_with = "de::seq")]
    pub requirements: Vec<Requirement>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Requirement {
    #[serde(deserialize_with = "de::text")]
    pub title: String,
    #[serde(deserialize_with = "de::text")]
    pub description: String,
    #[serde(deserialize_with = "de::seq")]
    pub mandatory_actions: Vec<Value>,
    #[serde(deserialize_with = "de::seq")]
    pub prohibited_actions: Vec<Value>,
    #[serde(deserialize_with = "de::seq")]
    pub documentation_required: Vec<Value>,
    /// Keywords matched as literal substrings of the scenario text.
    #[serde(deserialize_with = "de::texts")]
    pub applicable_scenarios: Vec<String>,
    #[serde(default = "standard", deserialize_with = "de::text")]
    pub compliance_level: String,
    #[serde(deserialize_with = "de::text")]
    pub penalties: String,
    #[serde(deserialize_with = "de::text")]
    pub review_frequency: String,
    #[serde(deserialize_with = "de::text")]
    pub responsible_team: String,
}

/// `policies/security_guidelines.json`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityCatalog {
    pub guidelines: KeyedMap<GuidelineCategory>,
    #[serde(deserialize_with = "de::seq")]
    pub general_principles: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GuidelineCategory {
    #[serde(deserialize_with = "de::seq")]
    pub items: Vec<Guideline>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Guideline {
    #[serde(deserialize_with = "de::text")]
    pub title: String,
    #[serde(deserialize_with = "de::text")]
    pub description: String,
    #[serde(deserialize_with = "de::seq")]
    pub requirements: Vec<Value>,
    #[serde(deserialize_with = "de::seq")]
    pub best_practices: Vec<Value>,
    #[serde(deserialize_with = "de::seq")]
    pub common_violations: Vec<Value>,
    #[serde(deserialize_with = "de::seq")]
    pub implementation_guide: Vec<Value>,
    #[serde(default = "medium", deserialize_with = "de::text")]
    pub severity: String,
    #[serde(deserialize_with = "de::texts")]
    pub compliance_frameworks: Vec<String>,
    #[serde(deserialize_with = "de::text")]
    pub last_updated: String,
    #[serde(deserialize_with = "de::texts")]
    pub tags: Vec<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// Teams
// ═══════════════════════════════════════════════════════════════════════

/// `teams/team_structure.json`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TeamDirectory {
    #[serde(default = "empty_object")]
    pub organization_structure: Value,
    pub teams: KeyedMap<Team>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Team {
    #[serde(deserialize_with = "de::text")]
    pub description: String,
    #[serde(deserialize_with = "de::text")]
    pub manager: String,
    #[serde(deserialize_with = "de::seq")]
    pub members: Vec<Value>,
    #[serde(deserialize_with = "de::texts")]
    pub focus_areas: Vec<String>,
    #[serde(deserialize_with = "de::seq")]
    pub collaboration_tools: Vec<Value>,
    #[serde(default = "empty_object")]
    pub meeting_schedule: Value,
    #[serde(deserialize_with = "de::seq")]
    pub key_projects: Vec<Value>,
    #[serde(deserialize_with = "de::text")]
    pub team_culture: String,
}

/// `teams/team_members.json`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MemberDirectory {
    #[serde(deserialize_with = "de::seq")]
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Member {
    #[serde(deserialize_with = "de::text")]
    pub name: String,
    #[serde(deserialize_with = "de::text")]
    pub role: String,
    #[serde(deserialize_with = "de::text")]
    pub team: String,
    #[serde(deserialize_with = "de::text")]
    pub email: String,
    #[serde(deserialize_with = "de::text")]
    pub slack_handle: String,
    #[serde(deserialize_with = "de::texts")]
    pub expertise: Vec<String>,
    #[serde(deserialize_with = "de::text")]
    pub bio: String,
    #[serde(deserialize_with = "de::text")]
    pub location: String,
    #[serde(deserialize_with = "de::text")]
    pub timezone: String,
    #[serde(deserialize_with = "de::text")]
    pub availability: String,
    #[serde(deserialize_with = "de::text")]
    pub fun_fact: String,
}

pub const DEFAULT_CALENDAR_BASE_URL: &str = "https://calendar.company.com/schedule";

fn calendar_base_url() -> String {
    DEFAULT_CALENDAR_BASE_URL.to_string()
}

/// `teams/scheduling.json`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulingGuide {
    #[serde(deserialize_with = "de::seq")]
    pub default_slots: Vec<Value>,
    /// Purpose (lowercased) → tips.
    pub meeting_tips: KeyedMap<Records<Value>>,
    #[serde(default = "calendar_base_url", deserialize_with = "de::text")]
    pub calendar_base_url: String,
}

impl Default for SchedulingGuide {
    fn default() -> Self {
        Self {
            default_slots: Vec::new(),
            meeting_tips: KeyedMap::new(),
            calendar_base_url: calendar_base_url(),
        }
    }
}
