//! Uniform success/error response shape.
//!
//! Every operation returns `Result<T, ToolError>`; [`Envelope::from_result`]
//! turns that into the wire shape the orchestration layer consumes:
//!
//! ```json
//! { "status": "success", "query": "auth", "repositories": [...] }
//! { "status": "error", "error_message": "Module 'x' not found in dependency graph",
//!   "available_modules": ["user-auth-service"] }
//! ```
//!
//! "No results" is not an error: searches that match nothing return a
//! success envelope with zero counts and suggestions. Only invalid input,
//! failed single-entity lookups, and unexpected failures are error-shaped.

use serde::Serialize;
use serde_json::Value;

/// Optional recovery aids attached to an error envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecoveryHints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_modules: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_apis: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_teams: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_components: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_check_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_roles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expertise_areas: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl RecoveryHints {
    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Why an operation could not produce a success envelope.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// A single-entity lookup found nothing.
    #[error("{message}")]
    NotFound {
        message: String,
        hints: RecoveryHints,
    },

    /// The caller supplied unusable parameters.
    #[error("{message}")]
    InvalidInput {
        message: String,
        hints: RecoveryHints,
    },

    /// Anything unexpected. Rendered as `Failed to <operation>: <cause>`.
    #[error("{0}")]
    Internal(String),
}

impl ToolError {
    pub fn not_found(message: impl Into<String>, hints: RecoveryHints) -> Self {
        ToolError::NotFound {
            message: message.into(),
            hints,
        }
    }

    pub fn invalid_input(message: impl Into<String>, hints: RecoveryHints) -> Self {
        ToolError::InvalidInput {
            message: message.into(),
            hints,
        }
    }

    fn into_failure(self, operation: &str) -> Failure {
        match self {
            ToolError::NotFound { message, hints } | ToolError::InvalidInput { message, hints } => {
                Failure {
                    error_message: message,
                    hints,
                }
            }
            ToolError::Internal(cause) => Failure {
                error_message: format!("Failed to {}: {}", operation, cause),
                hints: RecoveryHints::default(),
            },
        }
    }
}

/// Error body: message plus flattened hints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub error_message: String,
    #[serde(flatten)]
    pub hints: RecoveryHints,
}

/// The response envelope, tagged by `status`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope<T> {
    Success(T),
    Error(Failure),
}

impl<T: Serialize> Envelope<T> {
    /// `operation` is a verb phrase such as `"search codebase"`.
    pub fn from_result(operation: &str, result: Result<T, ToolError>) -> Self {
        match result {
            Ok(body) => Envelope::Success(body),
            Err(e) => Envelope::Error(e.into_failure(operation)),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    /// Render as JSON. A body that cannot be serialized becomes an error
    /// envelope instead of escaping as an `Err`.
    pub fn into_value(self, operation: &str) -> Value {
        match serde_json::to_value(&self) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(operation, error = %e, "failed to serialize response");
                let failure: Envelope<()> =
                    Envelope::Error(ToolError::Internal(e.to_string()).into_failure(operation));
                serde_json::to_value(failure).unwrap_or(Value::Null)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Body {
        module: String,
    }

    #[test]
    fn test_success_flattens_body_under_status() {
        let env = Envelope::from_result(
            "analyze dependencies",
            Ok(Body {
                module: "user-auth-service".into(),
            }),
        );
        assert!(env.is_success());
        assert_eq!(
            env.into_value("analyze dependencies"),
            json!({ "status": "success", "module": "user-auth-service" })
        );
    }

    #[test]
    fn test_not_found_carries_hints() {
        let hints = RecoveryHints {
            available_modules: Some(vec!["user-auth-service".into()]),
            ..Default::default()
        }
        .suggest("Try one of the available modules");
        let env: Envelope<Body> = Envelope::from_result(
            "analyze dependencies",
            Err(ToolError::not_found("Module 'x' not found", hints)),
        );
        let value = env.into_value("analyze dependencies");
        assert_eq!(value["status"], "error");
        assert_eq!(value["error_message"], "Module 'x' not found");
        assert_eq!(value["available_modules"], json!(["user-auth-service"]));
        assert!(value.get("available_teams").is_none());
    }

    #[test]
    fn test_internal_error_wraps_cause() {
        let env: Envelope<Body> = Envelope::from_result(
            "search codebase",
            Err(ToolError::Internal("disk on fire".into())),
        );
        assert_eq!(
            env.into_value("search codebase")["error_message"],
            "Failed to search codebase: disk on fire"
        );
    }
}
