//! Team directory: team structure, people search, meeting preparation.

use serde::Serialize;
use serde_json::Value;

use crate::envelope::{RecoveryHints, ToolError};
use crate::knowledge::{DocumentKind, KnowledgeBase};
use crate::models::{Member, MemberDirectory, SchedulingGuide, TeamDirectory};
use crate::ops::distinct;
use crate::score::{self, rank, MemberCriteria, Needle, Scored};

const MEMBER_LIMIT: usize = 10;
const DEFAULT_TIMEZONE: &str = "UTC";

// ═══════════════════════════════════════════════════════════════════════
// get_team_info
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct TeamSummary {
    pub name: String,
    pub description: String,
    pub size: usize,
    pub manager: String,
    pub focus_areas: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamDetail {
    pub team_name: String,
    pub description: String,
    pub manager: String,
    pub size: usize,
    pub members: Vec<Value>,
    pub focus_areas: Vec<String>,
    pub collaboration_tools: Vec<Value>,
    pub meeting_schedule: Value,
    pub key_projects: Vec<Value>,
    pub team_culture: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TeamInfo {
    Overview {
        organization_structure: Value,
        teams: Vec<TeamSummary>,
        total_teams: usize,
        message: String,
    },
    Detail(TeamDetail),
}

/// With no `team_name`, summarize every team. Otherwise describe the first
/// team whose name contains `team_name`.
pub async fn get_team_info(kb: &KnowledgeBase, team_name: &str) -> Result<TeamInfo, ToolError> {
    let directory: TeamDirectory = kb.document(DocumentKind::TeamStructure).await;

    if team_name.is_empty() {
        let teams: Vec<TeamSummary> = directory
            .teams
            .iter()
            .map(|(name, team)| TeamSummary {
                name: name.to_string(),
                description: team.description.clone(),
                size: team.members.len(),
                manager: team.manager.clone(),
                focus_areas: team.focus_areas.clone(),
            })
            .collect();
        return Ok(TeamInfo::Overview {
            organization_structure: directory.organization_structure.clone(),
            total_teams: teams.len(),
            teams,
            message: "Specify a team_name to get detailed information".to_string(),
        });
    }

    let q = Needle::new(team_name);
    let Some((name, team)) = directory.teams.iter().find(|(name, _)| q.found_in(name)) else {
        let hints = RecoveryHints {
            available_teams: Some(directory.teams.keys().map(str::to_string).collect()),
            ..Default::default()
        }
        .suggest("Try searching for one of the available teams listed above");
        return Err(ToolError::not_found(
            format!("Team '{}' not found", team_name),
            hints,
        ));
    };

    Ok(TeamInfo::Detail(TeamDetail {
        team_name: name.to_string(),
        description: team.description.clone(),
        manager: team.manager.clone(),
        size: team.members.len(),
        members: team.members.clone(),
        focus_areas: team.focus_areas.clone(),
        collaboration_tools: team.collaboration_tools.clone(),
        meeting_schedule: team.meeting_schedule.clone(),
        key_projects: team.key_projects.clone(),
        team_culture: team.team_culture.clone(),
    }))
}

// ═══════════════════════════════════════════════════════════════════════
// find_team_member
// ═══════════════════════════════════════════════════════════════════════

/// The criteria as supplied; unsupplied ones serialize as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchCriteria {
    pub name: Option<String>,
    pub expertise: Option<String>,
    pub role: Option<String>,
}

impl SearchCriteria {
    fn new(name: &str, expertise: &str, role: &str) -> Self {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            name: opt(name),
            expertise: opt(expertise),
            role: opt(role),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberSearch {
    pub search_criteria: SearchCriteria,
    pub members_found: usize,
    pub matching_members: Vec<Scored<Member>>,
    pub additional_members_available: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Rank people by name (5), expertise (3) and role (2). At least one
/// criterion is required.
pub async fn find_team_member(
    kb: &KnowledgeBase,
    name: &str,
    expertise: &str,
    role: &str,
) -> Result<MemberSearch, ToolError> {
    let directory: MemberDirectory = kb.document(DocumentKind::TeamMembers).await;
    let criteria = MemberCriteria::new(name, expertise, role);

    if criteria.is_empty() {
        let hints = RecoveryHints {
            available_roles: Some(distinct(directory.members.iter().map(|m| m.role.as_str()))),
            expertise_areas: Some(distinct(
                directory.members.iter().flat_map(|m| m.expertise.iter()),
            )),
            ..Default::default()
        };
        return Err(ToolError::invalid_input(
            "Please provide at least one search criterion: name, expertise, or role",
            hints,
        ));
    }

    let ranked = rank(
        directory.members.into_iter().map(|m| {
            let s = score::member(&m, &criteria);
            (m, s)
        }),
        MEMBER_LIMIT,
    );

    Ok(MemberSearch {
        search_criteria: SearchCriteria::new(name, expertise, role),
        members_found: ranked.total,
        additional_members_available: ranked.suppressed(),
        message: ranked
            .is_empty()
            .then(|| "No team members found matching your criteria".to_string()),
        matching_members: ranked.items,
    })
}

// ═══════════════════════════════════════════════════════════════════════
// schedule_meeting
// ═══════════════════════════════════════════════════════════════════════

const INTRODUCTION_TIPS: [&str; 4] = [
    "Prepare a brief introduction about yourself",
    "Think about what you'd like to learn from them",
    "Review their expertise areas beforehand",
    "Have questions ready about their work",
];

const HELP_TIPS: [&str; 4] = [
    "Document your specific questions or issues",
    "Gather any relevant context or error messages",
    "Be specific about what kind of help you need",
    "Consider what you've already tried",
];

fn preparation_tips(purpose: &str) -> Option<Vec<&'static str>> {
    let purpose = purpose.to_lowercase();
    if purpose.contains("introduction") || purpose.contains("meet") {
        Some(INTRODUCTION_TIPS.to_vec())
    } else if purpose.contains("help") || purpose.contains("question") {
        Some(HELP_TIPS.to_vec())
    } else {
        None
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingPlan {
    pub meeting_with: String,
    pub email: String,
    pub purpose: String,
    pub duration: String,
    pub suggested_times: Vec<Value>,
    pub timezone: String,
    pub calendar_link: String,
    pub meeting_tips: Vec<Value>,
    pub next_steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparation_tips: Option<Vec<&'static str>>,
}

/// Prepare a meeting with the first person whose name or email contains
/// `with_person`. Nothing is written to any calendar.
pub async fn schedule_meeting(
    kb: &KnowledgeBase,
    with_person: &str,
    purpose: &str,
    duration: &str,
) -> Result<MeetingPlan, ToolError> {
    let directory: MemberDirectory = kb.document(DocumentKind::TeamMembers).await;
    let q = Needle::new(with_person);

    let Some(person) = directory
        .members
        .into_iter()
        .find(|m| q.found_in(&m.name) || q.found_in(&m.email))
    else {
        let hints = RecoveryHints::default()
            .suggest("Please use find_team_member to search for the correct name or email");
        return Err(ToolError::not_found(
            format!("Person '{}' not found in the team directory", with_person),
            hints,
        ));
    };

    let guide: SchedulingGuide = kb.document(DocumentKind::Scheduling).await;
    let handle = person.email.split('@').next().unwrap_or_default();
    let calendar_link = format!("{}/{}", guide.calendar_base_url.trim_end_matches('/'), handle);
    let meeting_tips = guide
        .meeting_tips
        .get(&purpose.to_lowercase())
        .map(|tips| tips.to_vec())
        .unwrap_or_default();
    let timezone = if person.timezone.is_empty() {
        DEFAULT_TIMEZONE.to_string()
    } else {
        person.timezone.clone()
    };

    Ok(MeetingPlan {
        next_steps: vec![
            format!("Click the calendar link to see {}'s availability", person.name),
            "Choose a time slot that works for both of you".to_string(),
            "Include the meeting purpose in your invitation".to_string(),
            "Prepare any questions or topics you'd like to discuss".to_string(),
        ],
        meeting_with: person.name,
        email: person.email,
        purpose: purpose.to_string(),
        duration: duration.to_string(),
        suggested_times: guide.default_slots,
        timezone,
        calendar_link,
        meeting_tips,
        preparation_tips: preparation_tips(purpose),
    })
}
