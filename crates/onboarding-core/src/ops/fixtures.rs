//! A small, complete knowledge base shared by the operation tests.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::knowledge::KnowledgeBase;
use crate::store::memory::InMemoryDocumentStore;

/// `passed` passing checks followed by failing ones, `total` in all.
fn checks(passed: usize, total: usize) -> Value {
    let checks: Vec<Value> = (0..total)
        .map(|i| {
            if i < passed {
                json!({ "name": format!("check-{}", i), "description": "Probe" })
            } else {
                json!({
                    "name": format!("check-{}", i),
                    "description": "Probe",
                    "mock_status": "fail",
                    "mock_value": "98%",
                    "expected": "< 80%",
                    "mock_message": "Disk usage above threshold",
                    "severity": "high",
                    "suggested_action": "Free up disk space"
                })
            }
        })
        .collect();
    json!({ "checks": checks, "recommendations": ["Monitor disk usage weekly"] })
}

pub(crate) fn documents() -> Vec<(&'static str, &'static str, Value)> {
    let long_content = format!("JWT authentication for every service. {}", "x".repeat(600));

    vec![
        (
            "codebase",
            "repositories.json",
            json!({
                "repositories": [
                    {
                        "name": "user-auth-service",
                        "description": "Handles user authentication and session tokens",
                        "language": "Python",
                        "framework": "FastAPI",
                        "key_files": ["src/auth/login.py", "src/auth/tokens.py"],
                        "dependencies": ["jwt", "redis"],
                        "team": "Identity",
                        "documentation": "https://wiki.company.com/auth",
                        "examples": { "login": "POST /v2/login" }
                    },
                    {
                        "name": "payment-gateway",
                        "description": "Processes payments and refunds",
                        "language": "Java",
                        "framework": "Spring Boot",
                        "key_files": ["src/main/java/PaymentController.java"],
                        "dependencies": ["stripe-sdk", "postgres"],
                        "team": "Payments"
                    },
                    {
                        "name": "web-dashboard",
                        "description": "Customer-facing dashboard",
                        "language": "TypeScript",
                        "framework": "React",
                        "key_files": ["src/App.tsx"],
                        "dependencies": ["react", "auth-client"],
                        "team": "Frontend"
                    }
                ],
                "code_snippets": {
                    "authentication": {
                        "file": "src/auth/login.py",
                        "function": "login",
                        "code": "def login(user, password): ...",
                        "description": "JWT login flow",
                        "best_practices": ["Never log passwords"]
                    },
                    "payment_processing": {
                        "file": "src/main/java/PaymentController.java",
                        "function": "charge",
                        "code": "public Receipt charge(Card card) { ... }",
                        "description": "Charge a card"
                    }
                }
            }),
        ),
        (
            "codebase",
            "dependencies.json",
            json!({
                "modules": {
                    "user-auth-service": {
                        "description": "Identity and session management",
                        "dependencies": ["postgres", "redis"],
                        "dependents": ["payment-gateway", "web-dashboard"],
                        "architecture_layer": "service",
                        "communication_methods": ["REST", "gRPC"]
                    },
                    "payment-gateway": {
                        "description": "Payment orchestration",
                        "dependencies": ["user-auth-service"],
                        "architecture_layer": "service"
                    }
                }
            }),
        ),
        (
            "codebase",
            "best_practices.json",
            json!({
                "general": { "guidelines": ["Write tests for new code"] },
                "languages": {
                    "python": { "guidelines": ["Follow PEP 8"] },
                    "java": { "guidelines": ["Prefer immutability"] }
                },
                "quality_checklist": ["Tests pass", "Docs updated"],
                "rules": [
                    { "trigger": "print(", "type": "violation", "rule": "no-print",
                      "message": "Use the logging module", "severity": "low" },
                    { "trigger": "except:", "type": "violation", "rule": "no-bare-except",
                      "message": "Catch specific exceptions", "severity": "high" },
                    { "trigger": "TODO", "type": "recommendation", "rule": "track-todos",
                      "message": "Untracked TODO", "improvement": "Open a ticket" },
                    { "trigger": "", "type": "violation", "rule": "never-fires" }
                ]
            }),
        ),
        (
            "codebase",
            "tech_stack.json",
            json!({
                "overview": "Polyglot microservices on Kubernetes",
                "frontend": { "React": { "version": "18" }, "TypeScript": { "version": "5" } },
                "backend": { "FastAPI": { "language": "Python" }, "Spring Boot": { "language": "Java" } },
                "infrastructure": { "Kubernetes": { "distribution": "EKS" } },
                "tools": { "GitHub Actions": { "purpose": "CI" } },
                "databases": { "PostgreSQL": { "version": "15" }, "Redis": { "purpose": "cache" } }
            }),
        ),
        (
            "documentation",
            "wiki_pages.json",
            json!({
                "pages": [
                    {
                        "title": "Authentication Guide",
                        "url": "https://wiki.company.com/auth",
                        "summary": "How we authenticate",
                        "content": long_content,
                        "tags": ["auth", "security"],
                        "last_updated": "2024-11-02",
                        "author": "Alex Chen"
                    },
                    {
                        "title": "Deployment Process",
                        "url": "https://wiki.company.com/deploy",
                        "content": "Deploy with ArgoCD. Requires an auth token.",
                        "tags": ["deploy"]
                    },
                    {
                        "title": "Team Rituals",
                        "content": "Standups at 9:30",
                        "tags": ["culture"]
                    }
                ]
            }),
        ),
        (
            "documentation",
            "api_docs.json",
            json!({
                "apis": [
                    {
                        "name": "auth-service API",
                        "description": "Token issuance",
                        "version": "v2",
                        "base_url": "https://api.company.com/auth/v2",
                        "status": "stable",
                        "authentication": { "type": "client_credentials" },
                        "key_endpoints": [
                            { "path": "/v2/login", "method": "POST", "description": "Log in" },
                            { "path": "/v2/refresh", "method": "POST", "description": "Refresh a token" }
                        ]
                    },
                    {
                        "name": "payment-api",
                        "description": "Charges and refunds",
                        "version": "v1",
                        "status": "beta",
                        "key_endpoints": [
                            { "path": "/v1/charges", "method": "POST", "description": "Create a charge" }
                        ]
                    }
                ]
            }),
        ),
        (
            "documentation",
            "tutorials.json",
            json!({
                "tutorials": [
                    {
                        "title": "Your first deployment",
                        "description": "Ship a change to staging",
                        "difficulty": "beginner",
                        "estimated_time": "45 minutes",
                        "topics": ["deploy", "kubernetes"]
                    },
                    {
                        "title": "Writing auth middleware",
                        "description": "Protect an endpoint",
                        "difficulty": "intermediate",
                        "topics": ["auth"]
                    }
                ]
            }),
        ),
        (
            "troubleshooting",
            "common_errors.json",
            json!({
                "error_patterns": {
                    "network": {
                        "type": "Connectivity",
                        "description": "A service could not be reached",
                        "common_causes": ["Service down", "Firewall rule"],
                        "initial_steps": ["Check service health", "Verify DNS"],
                        "severity": "high",
                        "patterns": ["connection refused", "timed out"]
                    },
                    "database": {
                        "type": "Database",
                        "description": "Database access failed",
                        "patterns": ["deadlock", "connection pool"]
                    },
                    "auth": {
                        "type": "Authentication",
                        "patterns": ["401", "unauthorized"]
                    }
                }
            }),
        ),
        (
            "troubleshooting",
            "solutions.json",
            json!({
                "solutions": [
                    {
                        "title": "Fix database connection pool exhaustion",
                        "category": "database",
                        "description": "Raise the pool size or release leaked connections",
                        "keywords": ["connection pool", "too many connections"],
                        "estimated_time": "30 minutes",
                        "steps": ["Inspect active connections", "Raise max pool size"]
                    },
                    {
                        "title": "Reset expired credentials",
                        "category": "authentication",
                        "keywords": ["401", "expired token"],
                        "difficulty": "easy"
                    },
                    {
                        "title": "Restart stuck pods",
                        "category": "infrastructure",
                        "keywords": ["crashloop"]
                    }
                ]
            }),
        ),
        (
            "troubleshooting",
            "diagnostics.json",
            json!({
                "components": {
                    "system": {
                        "basic": checks(5, 5),
                        "detailed": checks(4, 5),
                        "performance": checks(2, 5)
                    },
                    "database": {
                        "basic": { "checks": [] }
                    }
                }
            }),
        ),
        (
            "policies",
            "hr_handbook.json",
            json!({
                "policies": {
                    "leave": [
                        { "title": "Vacation Policy", "description": "Paid time off accrual",
                          "keywords": ["pto", "vacation"], "contact": "hr@company.com" },
                        { "title": "Parental Leave", "description": "Sixteen weeks paid",
                          "keywords": ["family"] }
                    ],
                    "remote_work": [
                        { "title": "Remote Work", "description": "Work from approved countries",
                          "keywords": ["wfh", "remote"] }
                    ],
                    "benefits": [
                        { "title": "Health Benefits", "description": "Medical, dental, vision",
                          "keywords": ["insurance"] }
                    ]
                }
            }),
        ),
        (
            "policies",
            "compliance_docs.json",
            json!({
                "regulations": {
                    "GDPR": {
                        "description": "EU data protection",
                        "requirements": [
                            { "title": "Lawful basis", "applicable_scenarios": ["customer data", "personal data"],
                              "compliance_level": "critical", "responsible_team": "Legal" },
                            { "title": "Data minimization", "applicable_scenarios": ["customer data"] },
                            { "title": "Privacy training", "applicable_scenarios": ["data"],
                              "compliance_level": "recommended" }
                        ]
                    },
                    "SOX": {
                        "description": "Financial reporting controls",
                        "requirements": [
                            { "title": "Change approval", "applicable_scenarios": ["financial report", "production deploy"],
                              "compliance_level": "critical" }
                        ]
                    }
                },
                "general_guidance": ["When in doubt, ask Legal"]
            }),
        ),
        (
            "policies",
            "security_guidelines.json",
            json!({
                "guidelines": {
                    "data_security": {
                        "items": [
                            { "title": "Encrypt data at rest", "description": "Use AES-256",
                              "severity": "critical", "tags": ["encryption"] },
                            { "title": "Classify data", "severity": "high", "tags": ["classification"] }
                        ]
                    },
                    "access_control": {
                        "items": [
                            { "title": "Enforce MFA", "description": "Multi-factor sign-in for all accounts",
                              "severity": "critical", "tags": ["mfa", "auth"] },
                            { "title": "Least privilege", "tags": ["iam"] }
                        ]
                    },
                    "development_security": {
                        "items": [
                            { "title": "Dependency scanning", "severity": "high", "tags": ["supply-chain"] }
                        ]
                    }
                },
                "general_principles": ["Defense in depth"]
            }),
        ),
        (
            "teams",
            "team_structure.json",
            json!({
                "organization_structure": { "cto": "Dana Brooks" },
                "teams": {
                    "Platform Engineering": {
                        "description": "Runs the shared infrastructure",
                        "manager": "Alex Chen",
                        "members": ["Alex Chen", "Sam Patel"],
                        "focus_areas": ["Kubernetes", "CI/CD"],
                        "team_culture": "Blameless postmortems"
                    },
                    "Payments": {
                        "description": "Owns checkout",
                        "manager": "Jordan Lee",
                        "members": ["Jordan Lee"]
                    }
                }
            }),
        ),
        (
            "teams",
            "team_members.json",
            json!({
                "members": [
                    { "name": "Alex Chen", "role": "Platform Engineer", "team": "Platform Engineering",
                      "email": "alex.chen@company.com", "expertise": ["Kubernetes", "Terraform"],
                      "timezone": "America/Los_Angeles" },
                    { "name": "Alex Rivera", "role": "Product Designer", "team": "Design",
                      "email": "alex.rivera@company.com", "expertise": ["Figma"] },
                    { "name": "Sam Patel", "role": "Backend Engineer", "team": "Platform Engineering",
                      "email": "sam.patel@company.com", "expertise": ["Python", "PostgreSQL"] },
                    { "name": "Jordan Lee", "role": "Payments Engineer", "team": "Payments",
                      "email": "jordan.lee@company.com", "expertise": ["Java", "Kubernetes"] }
                ]
            }),
        ),
        (
            "teams",
            "scheduling.json",
            json!({
                "default_slots": ["Tuesday 10:00", "Thursday 14:00"],
                "meeting_tips": {
                    "introduction": ["Share your background", "Ask about current projects"]
                }
            }),
        ),
    ]
}

/// A knowledge base holding every fixture document.
pub(crate) fn knowledge_base() -> KnowledgeBase {
    KnowledgeBase::new(Arc::new(InMemoryDocumentStore::with_documents(
        documents(),
    )))
}

/// A knowledge base with nothing in it.
pub(crate) fn empty_knowledge_base() -> KnowledgeBase {
    KnowledgeBase::new(Arc::new(InMemoryDocumentStore::new()))
}
