//! Relevance scoring and top-K ranking.
//!
//! Every scorer is a pure function returning a non-negative integer: a sum
//! of hand-tuned weights for case-insensitive substring hits. There is no
//! fuzzy matching and no tokenization beyond the whitespace split used by
//! [`solution`].
//!
//! | Entity | Weights |
//! |--------|---------|
//! | repository | name 3, description 2, any dependency 1 |
//! | wiki page | title 3, content 2, any tag 1 |
//! | api | name 3, description 2 |
//! | tutorial | title 3, description 2, any topic 1 |
//! | policy | title 3, description 2, any keyword 1 |
//! | guideline | title 3, description 2, any tag 1 |
//! | solution | keyword in problem 2, problem word in title 1, category 3 |
//! | team member | name 5, expertise 3, role 2 |
//!
//! A record scoring 0 never appears in results. An empty query is a
//! substring of every field, so it matches every record; callers keep that
//! behavior rather than special-casing it.

use serde::Serialize;

use crate::models::{Api, Guideline, Member, Policy, Repository, Solution, Tutorial, WikiPage};

/// Lowercased query text, computed once per search.
#[derive(Debug, Clone)]
pub struct Needle(String);

impl Needle {
    pub fn new(query: &str) -> Self {
        Self(query.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Does `haystack` contain this needle, ignoring case?
    pub fn found_in(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0)
    }

    /// Does any element of `items` contain this needle, ignoring case?
    pub fn found_in_any<S: AsRef<str>>(&self, items: &[S]) -> bool {
        items.iter().any(|item| self.found_in(item.as_ref()))
    }
}

fn weight(hit: bool, w: u32) -> u32 {
    if hit {
        w
    } else {
        0
    }
}

pub fn repository(repo: &Repository, q: &Needle) -> u32 {
    weight(q.found_in(&repo.name), 3)
        + weight(q.found_in(&repo.description), 2)
        + weight(q.found_in_any(&repo.dependencies), 1)
}

pub fn wiki_page(page: &WikiPage, q: &Needle) -> u32 {
    weight(q.found_in(&page.title), 3)
        + weight(q.found_in(&page.content), 2)
        + weight(q.found_in_any(&page.tags), 1)
}

pub fn api(api: &Api, q: &Needle) -> u32 {
    weight(q.found_in(&api.name), 3) + weight(q.found_in(&api.description), 2)
}

pub fn tutorial(tutorial: &Tutorial, q: &Needle) -> u32 {
    weight(q.found_in(&tutorial.title), 3)
        + weight(q.found_in(&tutorial.description), 2)
        + weight(q.found_in_any(&tutorial.topics), 1)
}

pub fn policy(policy: &Policy, q: &Needle) -> u32 {
    weight(q.found_in(&policy.title), 3)
        + weight(q.found_in(&policy.description), 2)
        + weight(q.found_in_any(&policy.keywords), 1)
}

/// With no topic every guideline in a selected category scores 1.
pub fn guideline(guideline: &Guideline, topic: Option<&Needle>) -> u32 {
    match topic {
        None => 1,
        Some(q) => {
            weight(q.found_in(&guideline.title), 3)
                + weight(q.found_in(&guideline.description), 2)
                + weight(q.found_in_any(&guideline.tags), 1)
        }
    }
}

/// Solutions match in the opposite direction to the other scorers: the
/// solution's keywords are looked for inside the problem text.
pub fn solution(solution: &Solution, problem: &Needle, category: Option<&Needle>) -> u32 {
    let keyword_hit = solution
        .keywords
        .iter()
        .any(|k| problem.as_str().contains(&k.to_lowercase()));
    let title = solution.title.to_lowercase();
    let title_hit = problem
        .as_str()
        .split_whitespace()
        .any(|word| title.contains(word));
    let category_hit = category.is_some_and(|c| c.found_in(&solution.category));

    weight(keyword_hit, 2) + weight(title_hit, 1) + weight(category_hit, 3)
}

/// Member search criteria; `None` means the criterion was not supplied.
#[derive(Debug, Clone, Default)]
pub struct MemberCriteria {
    pub name: Option<Needle>,
    pub expertise: Option<Needle>,
    pub role: Option<Needle>,
}

impl MemberCriteria {
    pub fn new(name: &str, expertise: &str, role: &str) -> Self {
        let opt = |s: &str| (!s.is_empty()).then(|| Needle::new(s));
        Self {
            name: opt(name),
            expertise: opt(expertise),
            role: opt(role),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.expertise.is_none() && self.role.is_none()
    }
}

pub fn member(member: &Member, c: &MemberCriteria) -> u32 {
    weight(c.name.as_ref().is_some_and(|q| q.found_in(&member.name)), 5)
        + weight(
            c.expertise
                .as_ref()
                .is_some_and(|q| q.found_in_any(&member.expertise)),
            3,
        )
        + weight(c.role.as_ref().is_some_and(|q| q.found_in(&member.role)), 2)
}

// ═══════════════════════════════════════════════════════════════════════
// Ranking
// ═══════════════════════════════════════════════════════════════════════

/// A record annotated with its relevance score.
#[derive(Debug, Clone, Serialize)]
pub struct Scored<T> {
    #[serde(flatten)]
    pub item: T,
    pub relevance_score: u32,
}

/// The top-K slice of a ranking plus how many matches it stood for.
#[derive(Debug, Clone)]
pub struct Ranked<T> {
    pub items: Vec<Scored<T>>,
    /// Matches before truncation.
    pub total: usize,
}

impl<T> Ranked<T> {
    /// Matches dropped by truncation.
    pub fn suppressed(&self) -> usize {
        self.total - self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Drop zero scores, stable-sort descending, keep the best `k`.
///
/// Ties keep their input order, which makes results deterministic for a
/// given document.
pub fn rank<T, I>(candidates: I, k: usize) -> Ranked<T>
where
    I: IntoIterator<Item = (T, u32)>,
{
    let mut matched: Vec<Scored<T>> = candidates
        .into_iter()
        .filter(|(_, score)| *score > 0)
        .map(|(item, relevance_score)| Scored {
            item,
            relevance_score,
        })
        .collect();
    matched.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));

    let total = matched.len();
    matched.truncate(k);
    Ranked {
        items: matched,
        total,
    }
}
