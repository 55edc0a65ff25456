//! Search operations, one module per knowledge area.
//!
//! Every operation takes the shared [`KnowledgeBase`](crate::KnowledgeBase)
//! plus its parameters and returns `Result<T, ToolError>`, where `T` is a
//! serializable response body. Wrap the result with
//! [`Envelope::from_result`](crate::Envelope::from_result) to get the wire
//! shape.
//!
//! Operations are stateless: they load documents, score, rank, and build a
//! response. Calling one twice with the same inputs against the same
//! documents produces identical output.
//!
//! | Area | Operations |
//! |------|------------|
//! | [`codebase`] | `search_codebase`, `analyze_dependencies`, `check_best_practices`, `get_tech_stack_info` |
//! | [`documentation`] | `search_documentation`, `find_wiki_content`, `get_api_docs` |
//! | [`troubleshooting`] | `analyze_error`, `find_solutions`, `run_diagnostics` |
//! | [`policy`] | `search_policies`, `check_compliance`, `find_guidelines` |
//! | [`team`] | `get_team_info`, `find_team_member`, `schedule_meeting` |
//! | [`search`] | `search_knowledge_base` |

pub mod codebase;
pub mod documentation;
pub mod policy;
pub mod search;
pub mod team;
pub mod troubleshooting;

#[cfg(test)]
pub(crate) mod fixtures;

/// Distinct non-empty values in first-seen order.
pub(crate) fn distinct<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for value in values {
        let value = value.as_ref();
        if !value.is_empty() && !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_keeps_first_seen_order() {
        let values = ["database", "auth", "", "database", "network"];
        assert_eq!(distinct(values), vec!["database", "auth", "network"]);
    }
}
