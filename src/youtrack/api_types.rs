//! Serde types matching YouTrack REST requests and responses.
//!
//! These types are separate from domain types to keep the `$type`
//! discriminators and camelCase names out of the engine.

use serde::{Deserialize, Serialize};

use super::types::{DestinationIssue, DestinationProject, DestinationTag};
use crate::error::Rejection;
use crate::sync::types::CanonicalIssue;

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiProject {
  pub id: String,
  #[serde(rename = "shortName", default)]
  pub short_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiTag {
  pub id: String,
  #[serde(default)]
  pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiExternalIssue {
  pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiIssue {
  pub id: String,
  #[serde(rename = "idReadable")]
  pub id_readable: Option<String>,
  #[serde(rename = "externalIssue")]
  pub external_issue: Option<ApiExternalIssue>,
}

impl ApiIssue {
  pub fn external_id(&self) -> Option<&str> {
    self.external_issue.as_ref()?.id.as_deref()
  }
}

/// Error body YouTrack sends with 4xx/5xx responses
#[derive(Debug, Default, Deserialize)]
pub struct ApiError {
  pub error: Option<String>,
  pub error_description: Option<String>,
  /// Name of the offending field, when the server reports one
  pub error_field: Option<String>,
}

const UNKNOWN_USER_PREFIX: &str = "No user for login:";

impl ApiError {
  /// Classify the failure for the engine.
  ///
  /// `error_field` is checked first. Without it, only the exact
  /// "No user for login: <login>" description counts; everything else is
  /// `Rejection::Other`.
  pub fn rejection(&self) -> Rejection {
    if self
      .error_field
      .as_deref()
      .is_some_and(|f| f.eq_ignore_ascii_case("assignee"))
    {
      return Rejection::UnknownUser { login: None };
    }

    match self
      .error_description
      .as_deref()
      .and_then(|d| d.trim().strip_prefix(UNKNOWN_USER_PREFIX))
      .map(str::trim)
    {
      Some(login) if !login.is_empty() => Rejection::UnknownUser {
        login: Some(login.to_string()),
      },
      _ => Rejection::Other,
    }
  }

  pub fn message(&self, fallback: &str) -> String {
    self
      .error_description
      .clone()
      .or_else(|| self.error.clone())
      .unwrap_or_else(|| fallback.to_string())
  }
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Serialize)]
pub struct IdRef {
  pub id: String,
}

#[derive(Debug, Serialize)]
pub struct StateValue {
  pub name: String,
}

#[derive(Debug, Serialize)]
pub struct UserValue {
  pub login: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "$type")]
pub enum ApiCustomField {
  #[serde(rename = "StateIssueCustomField")]
  State { name: String, value: StateValue },
  #[serde(rename = "SingleUserIssueCustomField")]
  User {
    name: String,
    value: Option<UserValue>,
  },
}

impl ApiCustomField {
  fn state(value: &str) -> Self {
    ApiCustomField::State {
      name: "State".to_string(),
      value: StateValue {
        name: value.to_string(),
      },
    }
  }

  fn assignee(login: Option<&str>) -> Self {
    ApiCustomField::User {
      name: "Assignee".to_string(),
      value: login.map(|login| UserValue {
        login: login.to_string(),
      }),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct CreateIssueRequest {
  pub project: IdRef,
  pub summary: String,
  pub description: String,
  #[serde(rename = "customFields")]
  pub custom_fields: Vec<ApiCustomField>,
  #[serde(rename = "externalIssue")]
  pub external_issue: IdRef,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub tags: Vec<IdRef>,
}

impl CreateIssueRequest {
  pub fn new(project_id: &str, issue: &CanonicalIssue) -> Self {
    let mut custom_fields = Vec::new();
    if let Some(state) = issue.state {
      custom_fields.push(ApiCustomField::state(state.as_str()));
    }
    if let Some(login) = issue.assignee_login.as_deref() {
      custom_fields.push(ApiCustomField::assignee(Some(login)));
    }

    Self {
      project: IdRef {
        id: project_id.to_string(),
      },
      summary: issue.summary.clone(),
      description: issue.description.clone(),
      custom_fields,
      external_issue: IdRef {
        id: issue.external_id.clone(),
      },
      tags: tag_refs(&issue.tag_ids),
    }
  }
}

/// Field update. Project and external id are never rewritten.
#[derive(Debug, Serialize)]
pub struct UpdateIssueRequest {
  pub summary: String,
  pub description: String,
  #[serde(rename = "customFields")]
  pub custom_fields: Vec<ApiCustomField>,
  pub tags: Vec<IdRef>,
}

impl UpdateIssueRequest {
  pub fn new(issue: &CanonicalIssue) -> Self {
    let mut custom_fields = Vec::new();
    if let Some(state) = issue.state {
      custom_fields.push(ApiCustomField::state(state.as_str()));
    }
    // Overwrite: an unassigned source issue clears the assignee
    custom_fields.push(ApiCustomField::assignee(issue.assignee_login.as_deref()));

    Self {
      summary: issue.summary.clone(),
      description: issue.description.clone(),
      custom_fields,
      tags: tag_refs(&issue.tag_ids),
    }
  }
}

fn tag_refs(ids: &[String]) -> Vec<IdRef> {
  ids.iter().map(|id| IdRef { id: id.clone() }).collect()
}

// ============================================================================
// Conversions to domain types
// ============================================================================

impl From<ApiProject> for DestinationProject {
  fn from(p: ApiProject) -> Self {
    DestinationProject {
      id: p.id,
      short_name: p.short_name,
    }
  }
}

impl From<ApiTag> for DestinationTag {
  fn from(t: ApiTag) -> Self {
    DestinationTag {
      id: t.id,
      name: t.name,
    }
  }
}

impl From<ApiIssue> for DestinationIssue {
  fn from(i: ApiIssue) -> Self {
    DestinationIssue {
      id: i.id,
      id_readable: i.id_readable,
    }
  }
}
