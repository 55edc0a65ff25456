//! Tool trait and the built-in knowledge tools.
//!
//! Every knowledge operation is exposed as a [`Tool`]: a name, a one-line
//! description, a JSON Schema for its parameters, and an async `execute`.
//! The HTTP server and the `onboard tool` CLI both go through the same
//! [`ToolRegistry`], so a tool behaves identically from either surface.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │              ToolRegistry                │
//! │  ┌──────────┐ ┌──────────┐ ┌──────────┐ │
//! │  │ codebase │ │   docs   │ │  policy  │ │
//! │  │ troubles │ │   team   │ │  search  │ │
//! │  └──────────┘ └──────────┘ └──────────┘ │
//! └──────────────┬───────────────────────────┘
//!                ▼
//!   POST /tools/{name}  ·  onboard tool call
//! ```
//!
//! Built-in tools never fail: whatever the operation returns, including a
//! not-found or invalid-input outcome, is rendered as a status envelope
//! (`{"status": "success", ...}` or `{"status": "error", "error_message": ...}`).
//!
//! # Usage
//!
//! ```rust,no_run
//! use onboarding_harness::traits::{ToolContext, ToolRegistry};
//! # async fn example(ctx: &ToolContext) -> anyhow::Result<()> {
//! let tools = ToolRegistry::with_builtins();
//! let tool = tools.find("analyze_dependencies").unwrap();
//! let result = tool
//!     .execute(serde_json::json!({ "module_name": "auth" }), ctx)
//!     .await?;
//! assert_eq!(result["status"], "success");
//! # Ok(())
//! # }
//! ```

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Map, Value};

use onboarding_core::ops::{codebase, documentation, policy, search, team, troubleshooting};
use onboarding_core::{Envelope, KnowledgeBase, ToolError};

// ═══════════════════════════════════════════════════════════════════════
// Tool Trait
// ═══════════════════════════════════════════════════════════════════════

/// A named operation callable over HTTP or from the CLI.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name, used as the URL path segment (`/tools/{name}`).
    fn name(&self) -> &str;

    /// One-line description for tool discovery.
    fn description(&self) -> &str;

    /// Whether the tool ships with the harness.
    fn is_builtin(&self) -> bool {
        false
    }

    /// JSON Schema (`type: object`) describing accepted parameters.
    fn parameters_schema(&self) -> Value;

    /// Run the tool. `params` has already passed [`validate_params`].
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value>;
}

/// What a tool can reach at execution time.
#[derive(Clone)]
pub struct ToolContext {
    kb: KnowledgeBase,
}

impl ToolContext {
    pub fn new(kb: KnowledgeBase) -> Self {
        Self { kb }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.kb
    }
}

/// Serializable tool info for the `/tools/list` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub builtin: bool,
    pub parameters: Value,
}

impl ToolInfo {
    pub fn from_tool(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            builtin: tool.is_builtin(),
            parameters: tool.parameters_schema(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Operations
// ═══════════════════════════════════════════════════════════════════════

/// A declared string parameter.
struct Param {
    name: &'static str,
    description: &'static str,
    required: bool,
    default: Option<&'static str>,
}

const fn required(name: &'static str, description: &'static str) -> Param {
    Param {
        name,
        description,
        required: true,
        default: None,
    }
}

const fn optional(
    name: &'static str,
    description: &'static str,
    default: &'static str,
) -> Param {
    Param {
        name,
        description,
        required: false,
        default: Some(default),
    }
}

/// The built-in knowledge operations, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SearchCodebase,
    AnalyzeDependencies,
    CheckBestPractices,
    GetTechStackInfo,
    SearchDocumentation,
    FindWikiContent,
    GetApiDocs,
    AnalyzeError,
    FindSolutions,
    RunDiagnostics,
    SearchPolicies,
    CheckCompliance,
    FindGuidelines,
    GetTeamInfo,
    FindTeamMember,
    ScheduleMeeting,
    SearchKnowledgeBase,
}

impl Operation {
    pub const ALL: [Operation; 17] = [
        Operation::SearchCodebase,
        Operation::AnalyzeDependencies,
        Operation::CheckBestPractices,
        Operation::GetTechStackInfo,
        Operation::SearchDocumentation,
        Operation::FindWikiContent,
        Operation::GetApiDocs,
        Operation::AnalyzeError,
        Operation::FindSolutions,
        Operation::RunDiagnostics,
        Operation::SearchPolicies,
        Operation::CheckCompliance,
        Operation::FindGuidelines,
        Operation::GetTeamInfo,
        Operation::FindTeamMember,
        Operation::ScheduleMeeting,
        Operation::SearchKnowledgeBase,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::SearchCodebase => "search_codebase",
            Operation::AnalyzeDependencies => "analyze_dependencies",
            Operation::CheckBestPractices => "check_best_practices",
            Operation::GetTechStackInfo => "get_tech_stack_info",
            Operation::SearchDocumentation => "search_documentation",
            Operation::FindWikiContent => "find_wiki_content",
            Operation::GetApiDocs => "get_api_docs",
            Operation::AnalyzeError => "analyze_error",
            Operation::FindSolutions => "find_solutions",
            Operation::RunDiagnostics => "run_diagnostics",
            Operation::SearchPolicies => "search_policies",
            Operation::CheckCompliance => "check_compliance",
            Operation::FindGuidelines => "find_guidelines",
            Operation::GetTeamInfo => "get_team_info",
            Operation::FindTeamMember => "find_team_member",
            Operation::ScheduleMeeting => "schedule_meeting",
            Operation::SearchKnowledgeBase => "search_knowledge_base",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Operation::SearchCodebase => {
                "Search repositories and code snippets by name, description, or dependency"
            }
            Operation::AnalyzeDependencies => {
                "Show dependencies, dependents, and architecture context of a module"
            }
            Operation::CheckBestPractices => {
                "Coding guidelines for a language, optionally checked against a code snippet"
            }
            Operation::GetTechStackInfo => {
                "Describe the technology stack or one component of it"
            }
            Operation::SearchDocumentation => "Search wiki pages, API references, and tutorials",
            Operation::FindWikiContent => "Find wiki pages about a topic with content previews",
            Operation::GetApiDocs => "List internal APIs or show endpoints of one API",
            Operation::AnalyzeError => "Match an error message against known error patterns",
            Operation::FindSolutions => "Find documented solutions for a problem",
            Operation::RunDiagnostics => "Report the recorded health checks for a component",
            Operation::SearchPolicies => "Search HR handbook policies",
            Operation::CheckCompliance => {
                "List regulatory requirements that apply to a scenario"
            }
            Operation::FindGuidelines => "Find security guidelines grouped by severity",
            Operation::GetTeamInfo => "Describe the organization or one team",
            Operation::FindTeamMember => "Find people by name, expertise, or role",
            Operation::ScheduleMeeting => "Suggest meeting slots and preparation for a colleague",
            Operation::SearchKnowledgeBase => {
                "Find every knowledge document that mentions a term"
            }
        }
    }

    /// Verb phrase used in `Failed to <action>: ...` messages.
    pub fn action(&self) -> &'static str {
        match self {
            Operation::SearchCodebase => "search codebase",
            Operation::AnalyzeDependencies => "analyze dependencies",
            Operation::CheckBestPractices => "check best practices",
            Operation::GetTechStackInfo => "get tech stack info",
            Operation::SearchDocumentation => "search documentation",
            Operation::FindWikiContent => "find wiki content",
            Operation::GetApiDocs => "get API information",
            Operation::AnalyzeError => "analyze error",
            Operation::FindSolutions => "find solutions",
            Operation::RunDiagnostics => "run diagnostics",
            Operation::SearchPolicies => "search policies",
            Operation::CheckCompliance => "check compliance",
            Operation::FindGuidelines => "find guidelines",
            Operation::GetTeamInfo => "get team information",
            Operation::FindTeamMember => "find team members",
            Operation::ScheduleMeeting => "schedule meeting",
            Operation::SearchKnowledgeBase => "search knowledge base",
        }
    }

    fn params(&self) -> &'static [Param] {
        const SEARCH_CODEBASE: &[Param] = &[
            required("query", "Words to look for in repository names, descriptions, dependencies"),
            optional("file_type", "File extension to restrict to, or 'all'", "all"),
        ];
        const ANALYZE_DEPENDENCIES: &[Param] =
            &[required("module_name", "Module name or part of it")];
        const CHECK_BEST_PRACTICES: &[Param] = &[
            optional("code_snippet", "Code to check against the rules", ""),
            optional("language", "Language whose guidelines to include", "python"),
        ];
        const GET_TECH_STACK_INFO: &[Param] = &[optional(
            "component",
            "Component name; empty for the whole stack",
            "",
        )];
        const SEARCH_DOCUMENTATION: &[Param] = &[
            required("query", "Words to look for"),
            optional("doc_type", "One of all, wiki, api, tutorial", "all"),
        ];
        const FIND_WIKI_CONTENT: &[Param] = &[required("topic", "Topic to look for")];
        const GET_API_DOCS: &[Param] = &[
            optional("api_name", "API name; empty to list all APIs", ""),
            optional("endpoint", "Restrict to endpoints matching this path or text", ""),
        ];
        const ANALYZE_ERROR: &[Param] = &[
            required("error_message", "The error text as reported"),
            optional("context", "What was happening when the error occurred", ""),
        ];
        const FIND_SOLUTIONS: &[Param] = &[
            required("problem_description", "Description of the problem"),
            optional("category", "Solution category to prefer", ""),
        ];
        const RUN_DIAGNOSTICS: &[Param] = &[
            optional("component", "Component to check", "system"),
            optional("check_type", "Depth of the check", "basic"),
        ];
        const SEARCH_POLICIES: &[Param] = &[
            required("topic", "Policy topic to look for"),
            optional("policy_type", "Policy category, or 'all'", "all"),
        ];
        const CHECK_COMPLIANCE: &[Param] = &[
            required("scenario", "Description of what you are about to do"),
            optional("regulation_type", "Regulation to restrict to", ""),
        ];
        const FIND_GUIDELINES: &[Param] = &[
            required("guideline_type", "Guideline category, or 'general' for all"),
            optional("specific_topic", "Topic to rank guidelines by", ""),
        ];
        const GET_TEAM_INFO: &[Param] = &[optional(
            "team_name",
            "Team name; empty for the whole organization",
            "",
        )];
        const FIND_TEAM_MEMBER: &[Param] = &[
            optional("name", "Part of the person's name", ""),
            optional("expertise", "Skill or area of expertise", ""),
            optional("role", "Job role", ""),
        ];
        const SCHEDULE_MEETING: &[Param] = &[
            required("with_person", "Name or email of the colleague"),
            required("purpose", "Why you want to meet"),
            optional("duration", "Meeting length", "30 minutes"),
        ];
        const SEARCH_KNOWLEDGE_BASE: &[Param] = &[required("term", "Text to look for")];

        match self {
            Operation::SearchCodebase => SEARCH_CODEBASE,
            Operation::AnalyzeDependencies => ANALYZE_DEPENDENCIES,
            Operation::CheckBestPractices => CHECK_BEST_PRACTICES,
            Operation::GetTechStackInfo => GET_TECH_STACK_INFO,
            Operation::SearchDocumentation => SEARCH_DOCUMENTATION,
            Operation::FindWikiContent => FIND_WIKI_CONTENT,
            Operation::GetApiDocs => GET_API_DOCS,
            Operation::AnalyzeError => ANALYZE_ERROR,
            Operation::FindSolutions => FIND_SOLUTIONS,
            Operation::RunDiagnostics => RUN_DIAGNOSTICS,
            Operation::SearchPolicies => SEARCH_POLICIES,
            Operation::CheckCompliance => CHECK_COMPLIANCE,
            Operation::FindGuidelines => FIND_GUIDELINES,
            Operation::GetTeamInfo => GET_TEAM_INFO,
            Operation::FindTeamMember => FIND_TEAM_MEMBER,
            Operation::ScheduleMeeting => SCHEDULE_MEETING,
            Operation::SearchKnowledgeBase => SEARCH_KNOWLEDGE_BASE,
        }
    }

    pub fn parameters_schema(&self) -> Value {
        let mut properties = Map::new();
        for p in self.params() {
            let mut prop = json!({ "type": "string", "description": p.description });
            if let Some(default) = p.default {
                prop["default"] = json!(default);
            }
            properties.insert(p.name.to_string(), prop);
        }
        let required: Vec<&str> = self
            .params()
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// The string argument `name`, else its declared default, else `""`.
    fn arg<'a>(&self, params: &'a Value, name: &str) -> &'a str {
        if let Some(value) = params.get(name).and_then(Value::as_str) {
            return value;
        }
        self.params()
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.default)
            .unwrap_or("")
    }

    /// Run the operation and render its status envelope.
    pub async fn run(&self, kb: &KnowledgeBase, params: &Value) -> Value {
        let a = |name: &str| self.arg(params, name);

        match self {
            Operation::SearchCodebase => self.envelope(
                codebase::search_codebase(kb, a("query"), a("file_type")).await,
            ),
            Operation::AnalyzeDependencies => {
                self.envelope(codebase::analyze_dependencies(kb, a("module_name")).await)
            }
            Operation::CheckBestPractices => self.envelope(
                codebase::check_best_practices(kb, a("code_snippet"), a("language")).await,
            ),
            Operation::GetTechStackInfo => {
                self.envelope(codebase::get_tech_stack_info(kb, a("component")).await)
            }
            Operation::SearchDocumentation => self.envelope(
                documentation::search_documentation(kb, a("query"), a("doc_type")).await,
            ),
            Operation::FindWikiContent => {
                self.envelope(documentation::find_wiki_content(kb, a("topic")).await)
            }
            Operation::GetApiDocs => self.envelope(
                documentation::get_api_docs(kb, a("api_name"), a("endpoint")).await,
            ),
            Operation::AnalyzeError => self.envelope(
                troubleshooting::analyze_error(kb, a("error_message"), a("context")).await,
            ),
            Operation::FindSolutions => self.envelope(
                troubleshooting::find_solutions(kb, a("problem_description"), a("category"))
                    .await,
            ),
            Operation::RunDiagnostics => self.envelope(
                troubleshooting::run_diagnostics(kb, a("component"), a("check_type")).await,
            ),
            Operation::SearchPolicies => self.envelope(
                policy::search_policies(kb, a("topic"), a("policy_type")).await,
            ),
            Operation::CheckCompliance => self.envelope(
                policy::check_compliance(kb, a("scenario"), a("regulation_type")).await,
            ),
            Operation::FindGuidelines => self.envelope(
                policy::find_guidelines(kb, a("guideline_type"), a("specific_topic")).await,
            ),
            Operation::GetTeamInfo => {
                self.envelope(team::get_team_info(kb, a("team_name")).await)
            }
            Operation::FindTeamMember => self.envelope(
                team::find_team_member(kb, a("name"), a("expertise"), a("role")).await,
            ),
            Operation::ScheduleMeeting => self.envelope(
                team::schedule_meeting(kb, a("with_person"), a("purpose"), a("duration")).await,
            ),
            Operation::SearchKnowledgeBase => {
                self.envelope(search::search_knowledge_base(kb, a("term")).await)
            }
        }
    }

    fn envelope<T: Serialize>(&self, result: Result<T, ToolError>) -> Value {
        if let Err(ref e) = result {
            tracing::debug!(tool = self.name(), outcome = %e, "tool returned error envelope");
        }
        Envelope::from_result(self.action(), result).into_value(self.action())
    }
}

/// Adapter exposing an [`Operation`] as a [`Tool`].
pub struct KnowledgeTool(pub Operation);

#[async_trait]
impl Tool for KnowledgeTool {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn description(&self) -> &str {
        self.0.description()
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        self.0.parameters_schema()
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        tracing::debug!(tool = self.0.name(), "executing tool");
        Ok(self.0.run(ctx.knowledge(), &params).await)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Parameter Validation
// ═══════════════════════════════════════════════════════════════════════

/// Check `params` against a tool's JSON Schema and fill in defaults.
///
/// Rejects missing required keys, values of the wrong declared type, and
/// values outside a declared `enum`. Absent optional keys that declare a
/// `default` are inserted into the returned object.
pub fn validate_params(schema: &Value, params: &Value) -> Result<Value> {
    let params_obj = match params {
        Value::Object(map) => map.clone(),
        Value::Null => Map::new(),
        other => bail!("parameters must be a JSON object, got {}", json_type_name(other)),
    };

    let properties = schema
        .get("properties")
        .and_then(|p| p.as_object())
        .cloned()
        .unwrap_or_default();

    let required: Vec<&str> = schema
        .get("required")
        .and_then(|r| r.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    for field in &required {
        if !params_obj.contains_key(*field) {
            bail!("missing required parameter: {}", field);
        }
    }

    let mut result = params_obj.clone();

    for (prop_name, prop_schema) in &properties {
        let Some(value) = params_obj.get(prop_name) else {
            if let Some(default) = prop_schema.get("default") {
                result.insert(prop_name.clone(), default.clone());
            }
            continue;
        };

        if let Some(expected) = prop_schema.get("type").and_then(|t| t.as_str()) {
            let type_ok = match expected {
                "string" => value.is_string(),
                "integer" => value.is_i64() || value.is_u64(),
                "number" => value.is_number(),
                "boolean" => value.is_boolean(),
                "array" => value.is_array(),
                "object" => value.is_object(),
                _ => true,
            };
            if !type_ok {
                bail!(
                    "parameter '{}' must be of type '{}', got {}",
                    prop_name,
                    expected,
                    json_type_name(value)
                );
            }
        }

        if let Some(allowed) = prop_schema.get("enum").and_then(|e| e.as_array()) {
            if !allowed.contains(value) {
                let names: Vec<String> = allowed.iter().map(|v| v.to_string()).collect();
                bail!(
                    "parameter '{}' must be one of [{}], got {}",
                    prop_name,
                    names.join(", "),
                    value
                );
            }
        }
    }

    Ok(Value::Object(result))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════

/// Registry for tools (built-in and custom Rust).
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty tool registry.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Create a registry pre-loaded with every knowledge operation.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for op in Operation::ALL {
            registry.register(Box::new(KnowledgeTool(op)));
        }
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    /// Find a tool by name.
    pub fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use onboarding_core::store::memory::InMemoryDocumentStore;

    fn context() -> ToolContext {
        let store = InMemoryDocumentStore::with_documents([
            (
                "codebase",
                "dependencies.json",
                json!({
                    "modules": {
                        "user-auth-service": {
                            "dependencies": ["postgres"],
                            "dependents": ["web-dashboard"],
                            "architecture_layer": "service"
                        }
                    }
                }),
            ),
            (
                "troubleshooting",
                "diagnostics.json",
                json!({
                    "components": {
                        "system": {
                            "basic": {
                                "checks": [
                                    { "name": "disk", "mock_status": "pass" },
                                    { "name": "memory", "mock_status": "pass" }
                                ]
                            },
                            "detailed": {
                                "checks": [
                                    { "name": "disk", "mock_status": "pass" },
                                    { "name": "swap", "mock_status": "fail" }
                                ]
                            }
                        }
                    }
                }),
            ),
        ]);
        ToolContext::new(KnowledgeBase::new(Arc::new(store)))
    }

    #[test]
    fn test_builtins_register_every_operation_once() {
        let tools = ToolRegistry::with_builtins();
        assert_eq!(tools.len(), 17);
        let mut names: Vec<&str> = tools.tools().iter().map(|t| t.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 17);
        assert!(tools.find("schedule_meeting").is_some());
        assert!(tools.find("search").is_none());
    }

    #[test]
    fn test_schema_lists_required_and_defaults() {
        let schema = Operation::ScheduleMeeting.parameters_schema();
        assert_eq!(schema["required"], json!(["with_person", "purpose"]));
        assert_eq!(schema["properties"]["duration"]["default"], "30 minutes");
    }

    #[test]
    fn test_validate_rejects_missing_required() {
        let schema = Operation::AnalyzeError.parameters_schema();
        let err = validate_params(&schema, &json!({ "context": "deploy" })).unwrap_err();
        assert!(err.to_string().contains("error_message"));
    }

    #[test]
    fn test_validate_rejects_wrong_type() {
        let schema = Operation::FindWikiContent.parameters_schema();
        let err = validate_params(&schema, &json!({ "topic": 5 })).unwrap_err();
        assert!(err.to_string().contains("must be of type 'string'"));
    }

    #[test]
    fn test_validate_checks_enum() {
        let schema = json!({
            "type": "object",
            "properties": { "mode": { "type": "string", "enum": ["a", "b"] } }
        });
        assert!(validate_params(&schema, &json!({ "mode": "c" })).is_err());
        assert!(validate_params(&schema, &json!({ "mode": "a" })).is_ok());
    }

    #[test]
    fn test_validate_injects_defaults() {
        let schema = Operation::RunDiagnostics.parameters_schema();
        let params = validate_params(&schema, &Value::Null).unwrap();
        assert_eq!(params["component"], "system");
        assert_eq!(params["check_type"], "basic");
    }

    #[tokio::test]
    async fn test_execute_wraps_success_envelope() {
        let ctx = context();
        let tools = ToolRegistry::with_builtins();
        let result = tools
            .find("analyze_dependencies")
            .unwrap()
            .execute(json!({ "module_name": "AUTH" }), &ctx)
            .await
            .unwrap();
        assert_eq!(result["status"], "success");
        assert_eq!(result["module"], "user-auth-service");
        assert_eq!(result["architecture_layer"], "service");
    }

    #[tokio::test]
    async fn test_execute_applies_declared_defaults_without_validation() {
        let ctx = context();
        let result = KnowledgeTool(Operation::RunDiagnostics)
            .execute(json!({}), &ctx)
            .await
            .unwrap();
        assert_eq!(result["status"], "success");
        assert_eq!(result["check_type"], "basic");
        assert_eq!(result["overall_status"], "healthy");
        assert_eq!(result["summary"]["total_checks"], 2);
    }

    #[tokio::test]
    async fn test_execute_wraps_error_envelope() {
        let ctx = context();
        let result = KnowledgeTool(Operation::AnalyzeDependencies)
            .execute(json!({ "module_name": "nonexistent-xyz" }), &ctx)
            .await
            .unwrap();
        assert_eq!(result["status"], "error");
        assert_eq!(result["available_modules"], json!(["user-auth-service"]));
    }

    #[test]
    fn test_internal_failures_use_operation_action() {
        let env = Operation::GetApiDocs.envelope::<()>(Err(ToolError::Internal("boom".into())));
        assert_eq!(env["error_message"], "Failed to get API information: boom");

        let env =
            Operation::FindTeamMember.envelope::<()>(Err(ToolError::Internal("boom".into())));
        assert_eq!(env["error_message"], "Failed to find team members: boom");
    }

    #[test]
    fn test_descriptions_only_name_scored_fields() {
        assert!(!Operation::SearchCodebase.description().contains("language"));
        assert!(!Operation::AnalyzeDependencies
            .description()
            .contains("external packages"));
    }
}
