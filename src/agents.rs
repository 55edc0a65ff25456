//! Agent personas for the onboarding assistant.
//!
//! An agent is a named persona: a system prompt plus the subset of tools it
//! should be given. The harness only *describes* agents; the model-side
//! orchestration that routes a question to a specialist lives in the
//! client. Agents are discovered via `GET /agents/list` and resolved via
//! `POST /agents/{name}/prompt`.
//!
//! # Agent Sources
//!
//! | Source | Config Key | Struct |
//! |--------|------------|--------|
//! | Built-in specialist | n/a | [`BuiltinAgent`] |
//! | Inline TOML | `[agents.inline.<name>]` | [`TomlAgent`] |
//! | Custom Rust | `registry.register(...)` | User-defined [`Agent`] impl |
//!
//! Built-in agents accept an optional `question` argument. When it is
//! given, the resolved prompt carries the question as an opening user
//! message, preceded by a note of which knowledge categories currently
//! hold documents so the client can tell an empty knowledge base apart
//! from an unhelpful one.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::traits::{Operation, ToolContext};

// ═══════════════════════════════════════════════════════════════════════
// Agent Trait
// ═══════════════════════════════════════════════════════════════════════

/// An agent persona that provides a system prompt and tool scoping.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Unique, URL-safe name (e.g. `"codebase_navigator"`).
    fn name(&self) -> &str;

    /// One-line description for agent discovery.
    fn description(&self) -> &str;

    /// Names of the tools this agent should be given.
    fn tools(&self) -> Vec<String>;

    /// `"builtin"`, `"toml"`, or `"rust"`.
    fn source(&self) -> &str {
        "rust"
    }

    fn arguments(&self) -> Vec<AgentArgument> {
        vec![]
    }

    /// Resolve the prompt for the given argument object.
    async fn resolve(&self, args: Value, ctx: &ToolContext) -> Result<AgentPrompt>;
}

// ═══════════════════════════════════════════════════════════════════════
// Data Types
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct AgentArgument {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// A resolved agent prompt ready for the LLM.
#[derive(Debug, Clone, Serialize)]
pub struct AgentPrompt {
    pub system: String,
    pub tools: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<PromptMessage>,
}

/// A message to inject at conversation start.
#[derive(Debug, Clone, Serialize)]
pub struct PromptMessage {
    /// `"user"`, `"assistant"`, or `"system"`.
    pub role: String,
    pub content: String,
}

/// Serializable agent info for the `/agents/list` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AgentInfo {
    pub name: String,
    pub description: String,
    pub tools: Vec<String>,
    pub source: String,
    pub arguments: Vec<AgentArgument>,
}

impl AgentInfo {
    pub fn from_agent(agent: &dyn Agent) -> Self {
        Self {
            name: agent.name().to_string(),
            description: agent.description().to_string(),
            tools: agent.tools(),
            source: agent.source().to_string(),
            arguments: agent.arguments(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Specialists
// ═══════════════════════════════════════════════════════════════════════

/// A persona shipped with the harness.
pub struct BuiltinAgent {
    name: &'static str,
    description: &'static str,
    tools: &'static [Operation],
    /// Knowledge categories this persona draws on.
    categories: &'static [&'static str],
    system_prompt: &'static str,
}

const CODEBASE_NAVIGATOR: BuiltinAgent = BuiltinAgent {
    name: "codebase_navigator",
    description: "Repository structure, module dependencies, coding standards, and the tech stack",
    tools: &[
        Operation::SearchCodebase,
        Operation::AnalyzeDependencies,
        Operation::CheckBestPractices,
        Operation::GetTechStackInfo,
    ],
    categories: &["codebase"],
    system_prompt: "You help engineers who are new to the company find their way around the \
codebase. Use search_codebase to locate repositories and example code, analyze_dependencies \
to explain how services relate, check_best_practices to review code against house rules, and \
get_tech_stack_info to explain the tools and frameworks in use. Explain concepts plainly, show \
code in fenced markdown blocks, and close with a suggestion of what to explore next.",
};

const DOCUMENTATION_ASSISTANT: BuiltinAgent = BuiltinAgent {
    name: "documentation_assistant",
    description: "Internal wiki pages, API references, and tutorials",
    tools: &[
        Operation::SearchDocumentation,
        Operation::FindWikiContent,
        Operation::GetApiDocs,
    ],
    categories: &["documentation"],
    system_prompt: "You help new engineers find internal documentation. Use search_documentation \
for broad questions, find_wiki_content for team knowledge on a topic, and get_api_docs for \
endpoint details of internal services. Always name the page or API you are quoting and point \
to related material the reader may want next.",
};

const TROUBLESHOOTING_COPILOT: BuiltinAgent = BuiltinAgent {
    name: "troubleshooting_copilot",
    description: "Error analysis, known solutions, and component health checks",
    tools: &[
        Operation::AnalyzeError,
        Operation::FindSolutions,
        Operation::RunDiagnostics,
    ],
    categories: &["troubleshooting"],
    system_prompt: "You help new engineers debug problems. Start with analyze_error on the exact \
error text, look for known fixes with find_solutions, and use run_diagnostics to check the \
health of the component involved. Give numbered steps, put commands and logs in code blocks, \
and say how to confirm the fix worked.",
};

const POLICY_GUIDE: BuiltinAgent = BuiltinAgent {
    name: "policy_guide",
    description: "HR policies, regulatory compliance, and security guidelines",
    tools: &[
        Operation::SearchPolicies,
        Operation::CheckCompliance,
        Operation::FindGuidelines,
    ],
    categories: &["policies"],
    system_prompt: "You answer questions about company policy. Use search_policies for HR \
topics, check_compliance to find regulatory requirements that apply to a planned change, and \
find_guidelines for security rules. Quote requirements precisely, name the contact for each \
policy, and say when a question needs HR, Legal, or Security to decide.",
};

const TEAM_INTEGRATOR: BuiltinAgent = BuiltinAgent {
    name: "team_integrator",
    description: "Team structure, finding colleagues, and setting up introductions",
    tools: &[
        Operation::GetTeamInfo,
        Operation::FindTeamMember,
        Operation::ScheduleMeeting,
    ],
    categories: &["teams"],
    system_prompt: "You help new hires meet the people they will work with. Use get_team_info to \
explain how teams are organized, find_team_member to find the right person for a question, and \
schedule_meeting to suggest times and preparation for an introduction. Be warm and concrete.",
};

const ONBOARDING_ORCHESTRATOR: BuiltinAgent = BuiltinAgent {
    name: "onboarding_orchestrator",
    description: "Entry point that routes onboarding questions to the right specialist",
    tools: &[Operation::SearchKnowledgeBase],
    categories: &["codebase", "documentation", "troubleshooting", "policies", "teams"],
    system_prompt: "You are the first point of contact for a new hire. Work out what they need \
and hand the question to one specialist: codebase_navigator for code and architecture, \
documentation_assistant for wikis and API references, troubleshooting_copilot for errors, \
policy_guide for HR, compliance, and security rules, and team_integrator for people and \
meetings. When a greeting has no question, describe these areas briefly. Use \
search_knowledge_base to check whether a term appears anywhere before routing an unusual \
question.",
};

/// Every built-in persona, orchestrator last.
pub const BUILTIN_AGENTS: [BuiltinAgent; 6] = [
    CODEBASE_NAVIGATOR,
    DOCUMENTATION_ASSISTANT,
    TROUBLESHOOTING_COPILOT,
    POLICY_GUIDE,
    TEAM_INTEGRATOR,
    ONBOARDING_ORCHESTRATOR,
];

#[async_trait]
impl Agent for BuiltinAgent {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn tools(&self) -> Vec<String> {
        self.tools.iter().map(|op| op.name().to_string()).collect()
    }

    fn source(&self) -> &str {
        "builtin"
    }

    fn arguments(&self) -> Vec<AgentArgument> {
        vec![AgentArgument {
            name: "question".to_string(),
            description: "The new hire's question, injected as the opening message".to_string(),
            required: false,
        }]
    }

    async fn resolve(&self, args: Value, ctx: &ToolContext) -> Result<AgentPrompt> {
        let mut messages = Vec::new();

        let question = args
            .get("question")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or("");

        if !question.is_empty() {
            let mut stocked = Vec::new();
            let mut empty = Vec::new();
            for category in self.categories {
                let docs = ctx.knowledge().category(category).await;
                if docs.is_empty() {
                    empty.push(*category);
                } else {
                    stocked.push(format!("{} ({} documents)", category, docs.len()));
                }
            }

            let available = if stocked.is_empty() {
                "none".to_string()
            } else {
                stocked.join(", ")
            };
            let mut note = format!("Knowledge available: {}", available);
            if !empty.is_empty() {
                note.push_str(&format!(". Not loaded: {}", empty.join(", ")));
            }

            messages.push(PromptMessage {
                role: "system".to_string(),
                content: note,
            });
            messages.push(PromptMessage {
                role: "user".to_string(),
                content: question.to_string(),
            });
        }

        Ok(AgentPrompt {
            system: self.system_prompt.to_string(),
            tools: self.tools(),
            messages,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════
// TomlAgent
// ═══════════════════════════════════════════════════════════════════════

/// An agent defined inline in TOML configuration.
///
/// Static system prompt and fixed tool list, no arguments.
pub struct TomlAgent {
    name: String,
    description: String,
    tools: Vec<String>,
    system_prompt: String,
}

impl TomlAgent {
    pub fn new(
        name: String,
        description: String,
        tools: Vec<String>,
        system_prompt: String,
    ) -> Self {
        Self {
            name,
            description,
            tools,
            system_prompt,
        }
    }
}

#[async_trait]
impl Agent for TomlAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn tools(&self) -> Vec<String> {
        self.tools.clone()
    }

    fn source(&self) -> &str {
        "toml"
    }

    async fn resolve(&self, _args: Value, _ctx: &ToolContext) -> Result<AgentPrompt> {
        Ok(AgentPrompt {
            system: self.system_prompt.clone(),
            tools: self.tools.clone(),
            messages: vec![],
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════
// AgentRegistry
// ═══════════════════════════════════════════════════════════════════════

/// Registry for agents (built-in, TOML, and custom Rust).
pub struct AgentRegistry {
    agents: Vec<Box<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self { agents: Vec::new() }
    }

    /// Create a registry holding the built-in personas.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for agent in BUILTIN_AGENTS {
            registry.register(Box::new(agent));
        }
        registry
    }

    /// Built-in personas plus every `[agents.inline.*]` entry.
    ///
    /// An inline agent whose name matches a built-in replaces it, and a
    /// tool name that no built-in provides is logged but kept.
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::with_builtins();

        for (name, cfg) in &config.agents.inline {
            for tool in &cfg.tools {
                if !Operation::ALL.iter().any(|op| op.name() == tool) {
                    tracing::warn!(agent = %name, tool = %tool, "agent references an unknown tool");
                }
            }
            registry.agents.retain(|a| a.name() != name);
            registry.register(Box::new(TomlAgent::new(
                name.clone(),
                cfg.description.clone(),
                cfg.tools.clone(),
                cfg.system_prompt.clone(),
            )));
        }

        registry
    }

    pub fn register(&mut self, agent: Box<dyn Agent>) {
        self.agents.push(agent);
    }

    pub fn agents(&self) -> &[Box<dyn Agent>] {
        &self.agents
    }

    /// Find an agent by name.
    pub fn find(&self, name: &str) -> Option<&dyn Agent> {
        self.agents
            .iter()
            .find(|a| a.name() == name)
            .map(|a| a.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use onboarding_core::store::memory::InMemoryDocumentStore;
    use onboarding_core::KnowledgeBase;
    use serde_json::json;
    use std::sync::Arc;

    fn context() -> ToolContext {
        let store = InMemoryDocumentStore::with_documents([(
            "teams",
            "team_members.json",
            json!({ "members": [] }),
        )]);
        ToolContext::new(KnowledgeBase::new(Arc::new(store)))
    }

    #[test]
    fn test_builtin_tools_exist_in_tool_registry() {
        let tools = crate::traits::ToolRegistry::with_builtins();
        for agent in AgentRegistry::with_builtins().agents() {
            for tool in agent.tools() {
                assert!(tools.find(&tool).is_some(), "{} -> {}", agent.name(), tool);
            }
        }
    }

    #[test]
    fn test_specialists_cover_every_domain_tool_once() {
        let registry = AgentRegistry::with_builtins();
        let mut scoped: Vec<String> = registry
            .agents()
            .iter()
            .filter(|a| a.name() != "onboarding_orchestrator")
            .flat_map(|a| a.tools())
            .collect();
        scoped.sort();
        scoped.dedup();
        assert_eq!(scoped.len(), 16);
    }

    #[tokio::test]
    async fn test_resolve_without_question_has_no_messages() {
        let agent = registry_agent("team_integrator");
        let prompt = agent.resolve(json!({}), &context()).await.unwrap();
        assert!(prompt.messages.is_empty());
        assert_eq!(
            prompt.tools,
            vec!["get_team_info", "find_team_member", "schedule_meeting"]
        );
    }

    #[tokio::test]
    async fn test_resolve_with_question_reports_loaded_categories() {
        let agent = registry_agent("onboarding_orchestrator");
        let prompt = agent
            .resolve(json!({ "question": "Who owns payments?" }), &context())
            .await
            .unwrap();
        assert_eq!(prompt.messages.len(), 2);
        assert!(prompt.messages[0].content.contains("teams (1 documents)"));
        assert!(prompt.messages[0].content.contains("Not loaded: codebase"));
        assert_eq!(prompt.messages[1].role, "user");
        assert_eq!(prompt.messages[1].content, "Who owns payments?");
    }

    #[test]
    fn test_inline_agent_overrides_builtin() {
        let config = parse_config(
            r#"
            [db]
            path = "kb.sqlite"

            [agents.inline.policy_guide]
            description = "Local policy bot"
            tools = ["search_policies"]
            system_prompt = "Answer from the handbook only."
            "#,
        )
        .unwrap();
        let registry = AgentRegistry::from_config(&config);
        assert_eq!(registry.len(), 6);
        let agent = registry.find("policy_guide").unwrap();
        assert_eq!(agent.source(), "toml");
        assert_eq!(agent.tools(), vec!["search_policies"]);
    }

    fn registry_agent(name: &str) -> BuiltinAgent {
        BUILTIN_AGENTS
            .into_iter()
            .find(|a| a.name == name)
            .unwrap()
    }
}
