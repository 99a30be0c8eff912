//! Pure mapping from a GitHub issue to the canonical destination record.

use std::collections::HashSet;

use crate::github::types::{IssueState, SourceIssue, StateReason};
use crate::sync::tags::TagTable;
use crate::sync::types::{CanonicalIssue, CanonicalState};

/// Idempotency key for a source issue: `github:<owner>/<repo>#<number>`.
///
/// Without a derivable repo the middle part is empty (`github:#42`).
pub fn external_id(issue: &SourceIssue) -> String {
  format!(
    "github:{}#{}",
    issue.repo_full_name.as_deref().unwrap_or(""),
    issue.number
  )
}

/// Map a source issue. Labels without a matching tag are dropped.
pub fn map_issue(issue: &SourceIssue, tags: &TagTable) -> CanonicalIssue {
  let summary = match issue.title.as_deref() {
    Some(title) if !title.is_empty() => title.to_string(),
    _ => format!("GH#{}", issue.number),
  };

  CanonicalIssue {
    summary,
    description: build_description(issue),
    state: map_state(&issue.state, issue.state_reason),
    assignee_login: issue.assignee.clone(),
    external_id: external_id(issue),
    tag_ids: resolve_tag_ids(&issue.labels, tags),
  }
}

pub fn map_state(state: &IssueState, reason: Option<StateReason>) -> Option<CanonicalState> {
  match (state, reason) {
    (IssueState::Open, _) => Some(CanonicalState::Open),
    (IssueState::Closed, Some(StateReason::NotPlanned)) => Some(CanonicalState::WontFix),
    (IssueState::Closed, Some(StateReason::Reopened)) => Some(CanonicalState::Open),
    (IssueState::Closed, _) => Some(CanonicalState::Done),
    (IssueState::Other(_), _) => None,
  }
}

fn build_description(issue: &SourceIssue) -> String {
  let mut lines = vec![
    format!("Imported from GitHub issue #{}", issue.number),
    String::new(),
  ];

  if let Some(author) = issue.author.as_deref() {
    lines.push(format!("Author: @{}", author));
  }
  if !issue.labels.is_empty() {
    lines.push(format!("Labels: {}", issue.labels.join(", ")));
  }

  lines.push(String::new());

  if let Some(body) = issue.body.as_deref().filter(|b| !b.is_empty()) {
    lines.push(body.to_string());
  }

  lines.join("\n")
}

/// Resolve label names to tag ids, first occurrence wins.
fn resolve_tag_ids(labels: &[String], tags: &TagTable) -> Vec<String> {
  let mut seen = HashSet::new();
  labels
    .iter()
    .filter_map(|label| tags.resolve(label))
    .filter(|id| seen.insert(*id))
    .map(String::from)
    .collect()
}
