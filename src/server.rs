//! HTTP server exposing the knowledge tools and agent personas.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/tools/list` | List all registered tools with schemas |
//! | `POST` | `/tools/{name}` | Call a tool; body is the parameter object |
//! | `GET`  | `/agents/list` | List agent personas |
//! | `POST` | `/agents/{name}/prompt` | Resolve an agent's prompt |
//!
//! # Error Contract
//!
//! Transport-level failures use a single shape:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "no tool registered with name: foo" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `tool_error` (500).
//!
//! Knowledge outcomes are *not* transport errors: an unknown module or an
//! empty search still returns `200` with `{"result": {"status": "error", ...}}`
//! so the calling agent can read the recovery hints.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser-based
//! assistants can call the API directly.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use onboarding_core::KnowledgeBase;

use crate::agents::{AgentInfo, AgentPrompt, AgentRegistry};
use crate::config::Config;
use crate::sqlite_store::SqliteDocumentStore;
use crate::traits::{validate_params, ToolContext, ToolInfo, ToolRegistry};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    ctx: ToolContext,
    tools: Arc<ToolRegistry>,
    agents: Arc<AgentRegistry>,
}

impl AppState {
    pub fn new(kb: KnowledgeBase, tools: ToolRegistry, agents: AgentRegistry) -> Self {
        Self {
            ctx: ToolContext::new(kb),
            tools: Arc::new(tools),
            agents: Arc::new(agents),
        }
    }
}

/// Build the router over prepared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/tools/list", get(handle_list_tools))
        .route("/tools/{name}", post(handle_tool_call))
        .route("/agents/list", get(handle_list_agents))
        .route("/agents/{name}/prompt", post(handle_agent_prompt))
        .layer(cors)
        .with_state(state)
}

/// Starts the HTTP server on `[server].bind` and runs until Ctrl-C.
///
/// The knowledge database pool is closed on shutdown.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let store = Arc::new(SqliteDocumentStore::from_config(config));
    let kb = KnowledgeBase::new(store.clone());
    let tools = ToolRegistry::with_builtins();
    let agents = AgentRegistry::from_config(config);

    for t in tools.tools() {
        tracing::debug!(tool = t.name(), builtin = t.is_builtin(), "registered tool");
    }
    tracing::info!(
        tools = tools.len(),
        agents = agents.len(),
        db = %config.db.path.display(),
        "starting onboarding server"
    );

    let app = router(AppState::new(kb, tools, agents));

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!("listening on http://{}", config.server.bind);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .await;

    store.close().await;
    tracing::info!("server stopped");
    served?;
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// Error response
// ═══════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found",
        message: message.into(),
    }
}

fn tool_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "tool_error",
        message: message.into(),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Handlers
// ═══════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct ToolListResponse {
    tools: Vec<ToolInfo>,
}

async fn handle_list_tools(State(state): State<AppState>) -> Json<ToolListResponse> {
    let tools = state
        .tools
        .tools()
        .iter()
        .map(|t| ToolInfo::from_tool(t.as_ref()))
        .collect();
    Json(ToolListResponse { tools })
}

/// `POST /tools/{name}`: validate the body against the tool's schema,
/// execute, and wrap the envelope as `{"result": ...}`.
async fn handle_tool_call(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, AppError> {
    let tool = state
        .tools
        .find(&name)
        .ok_or_else(|| not_found(format!("no tool registered with name: {}", name)))?;

    let params = body.map(|Json(v)| v).unwrap_or(Value::Null);
    let validated = validate_params(&tool.parameters_schema(), &params)
        .map_err(|e| bad_request(format!("{}: {}", name, e)))?;

    tracing::debug!(tool = %name, "tool call");
    let result = tool
        .execute(validated, &state.ctx)
        .await
        .map_err(|e| tool_error(format!("{}: {:#}", name, e)))?;

    Ok(Json(serde_json::json!({ "result": result })))
}

#[derive(Serialize)]
struct AgentListResponse {
    agents: Vec<AgentInfo>,
}

async fn handle_list_agents(State(state): State<AppState>) -> Json<AgentListResponse> {
    let agents = state
        .agents
        .agents()
        .iter()
        .map(|a| AgentInfo::from_agent(a.as_ref()))
        .collect();
    Json(AgentListResponse { agents })
}

/// `POST /agents/{name}/prompt`: body is the argument object (may be empty).
async fn handle_agent_prompt(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Option<Json<Value>>,
) -> Result<Json<AgentPrompt>, AppError> {
    let agent = state
        .agents
        .find(&name)
        .ok_or_else(|| not_found(format!("no agent registered with name: {}", name)))?;

    let args = body.map(|Json(v)| v).unwrap_or_else(|| serde_json::json!({}));
    if !args.is_object() {
        return Err(bad_request("agent arguments must be a JSON object"));
    }

    let prompt = agent
        .resolve(args, &state.ctx)
        .await
        .map_err(|e| tool_error(format!("{}: {:#}", name, e)))?;

    Ok(Json(prompt))
}
