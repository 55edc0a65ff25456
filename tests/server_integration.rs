//! End-to-end tests for the HTTP API over an in-memory knowledge base.

use serde_json::{json, Value};
use std::sync::Arc;

use onboarding_core::store::memory::InMemoryDocumentStore;
use onboarding_core::KnowledgeBase;
use onboarding_harness::agents::AgentRegistry;
use onboarding_harness::server::{router, AppState};
use onboarding_harness::traits::ToolRegistry;

fn knowledge() -> KnowledgeBase {
    let store = InMemoryDocumentStore::with_documents([
        (
            "codebase",
            "dependencies.json",
            json!({
                "modules": {
                    "user-auth-service": { "dependencies": ["postgres"] },
                    "payment-gateway": { "dependencies": ["user-auth-service"] }
                }
            }),
        ),
        (
            "teams",
            "team_members.json",
            json!({
                "members": [
                    { "name": "Alex Chen", "role": "Engineering Manager",
                      "expertise": ["leadership"], "email": "alex.chen@company.com" },
                    { "name": "Sam Patel", "role": "SRE",
                      "expertise": ["kubernetes", "terraform"], "email": "sam.patel@company.com" }
                ]
            }),
        ),
    ]);
    KnowledgeBase::new(Arc::new(store))
}

/// Serve the router on an ephemeral port and return its base URL.
async fn spawn_server() -> String {
    let state = AppState::new(
        knowledge(),
        ToolRegistry::with_builtins(),
        AgentRegistry::with_builtins(),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_health() {
    let base = spawn_server().await;
    let body: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_tools_list_has_every_operation() {
    let base = spawn_server().await;
    let body: Value = reqwest::get(format!("{}/tools/list", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let tools = body["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 17);
    let first = &tools[0];
    assert_eq!(first["name"], "search_codebase");
    assert_eq!(first["builtin"], true);
    assert_eq!(first["parameters"]["required"], json!(["query"]));
}

#[tokio::test]
async fn test_tool_call_success_envelope() {
    let base = spawn_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/tools/analyze_dependencies", base))
        .json(&json!({ "module_name": "payment" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["result"]["status"], "success");
    assert_eq!(body["result"]["module"], "payment-gateway");
}

#[tokio::test]
async fn test_tool_call_knowledge_miss_is_still_200() {
    let base = spawn_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/tools/find_team_member", base))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["result"]["status"], "error");
    assert!(body["result"]["available_roles"].is_array());
}

#[tokio::test]
async fn test_tool_call_ranks_team_members() {
    let base = spawn_server().await;
    let body: Value = reqwest::Client::new()
        .post(format!("{}/tools/find_team_member", base))
        .json(&json!({ "expertise": "kubernetes" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["result"]["members_found"], 1);
    assert_eq!(body["result"]["matching_members"][0]["name"], "Sam Patel");
}

#[tokio::test]
async fn test_unknown_tool_is_404() {
    let base = spawn_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/tools/does_not_exist", base))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_missing_required_param_is_400() {
    let base = spawn_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/tools/search_codebase", base))
        .json(&json!({ "file_type": "py" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "bad_request");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("missing required parameter: query"));
}

#[tokio::test]
async fn test_agents_list_and_prompt() {
    let base = spawn_server().await;
    let list: Value = reqwest::get(format!("{}/agents/list", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = list["agents"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|a| a["name"].as_str())
        .collect();
    assert!(names.contains(&"codebase_navigator"));
    assert!(names.contains(&"onboarding_orchestrator"));

    let prompt: Value = reqwest::Client::new()
        .post(format!("{}/agents/codebase_navigator/prompt", base))
        .json(&json!({ "question": "How is auth wired?" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(prompt["system"].as_str().unwrap().contains("search_codebase"));
    assert_eq!(prompt["messages"][1]["content"], "How is auth wired?");
}

#[tokio::test]
async fn test_unknown_agent_is_404() {
    let base = spawn_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/agents/ghost/prompt", base))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
