//! Serde-deserializable types matching GitHub issue and webhook payloads.
//!
//! These stay separate from `SourceIssue` so the loose shapes GitHub sends
//! (labels as strings or objects, nullable everything) are handled once here.

use serde::Deserialize;

use super::types::{IssueState, SourceIssue, StateReason};

// ============================================================================
// Common nested field types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
  pub login: Option<String>,
}

/// A label is either a bare name or an object carrying one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiLabel {
  Name(String),
  Object { name: Option<String> },
}

impl ApiLabel {
  pub fn into_name(self) -> Option<String> {
    match self {
      ApiLabel::Name(name) => Some(name),
      ApiLabel::Object { name } => name,
    }
    .filter(|name| !name.is_empty())
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiRepository {
  pub full_name: Option<String>,
}

// ============================================================================
// Issue (list endpoint and webhook `issue` object)
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ApiIssue {
  pub number: u64,
  pub title: Option<String>,
  pub body: Option<String>,
  #[serde(default)]
  pub state: String,
  pub state_reason: Option<String>,
  pub labels: Option<Vec<ApiLabel>>,
  pub assignee: Option<ApiUser>,
  pub user: Option<ApiUser>,
  pub repository_url: Option<String>,
  // Present (with any content) only on pull requests
  pub pull_request: Option<serde_json::Value>,
}

impl ApiIssue {
  pub fn is_pull_request(&self) -> bool {
    self.pull_request.is_some()
  }

  pub fn into_source(self) -> SourceIssue {
    SourceIssue {
      number: self.number,
      title: self.title,
      body: self.body,
      state: IssueState::parse(&self.state),
      state_reason: self.state_reason.as_deref().map(StateReason::parse),
      labels: self
        .labels
        .unwrap_or_default()
        .into_iter()
        .filter_map(ApiLabel::into_name)
        .collect(),
      assignee: self.assignee.and_then(|u| u.login).filter(|l| !l.is_empty()),
      author: self.user.and_then(|u| u.login).filter(|l| !l.is_empty()),
      repo_full_name: self.repository_url.as_deref().and_then(repo_from_url),
    }
  }
}

// ============================================================================
// Webhook payload
// ============================================================================

/// Body of an `issues` webhook delivery. Other event kinds are not parsed
/// beyond these fields.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
  pub action: Option<String>,
  pub issue: Option<ApiIssue>,
  pub repository: Option<ApiRepository>,
}

// ============================================================================
// Helpers
// ============================================================================

/// Take "owner/repo" from the last two segments of a repository URL such as
/// `https://api.github.com/repos/acme/app`.
fn repo_from_url(url: &str) -> Option<String> {
  let mut segments = url.trim_end_matches('/').rsplit('/');
  let repo = segments.next().filter(|s| !s.is_empty())?;
  let owner = segments.next().filter(|s| !s.is_empty())?;
  Some(format!("{}/{}", owner, repo))
}
