use serde::Serialize;

/// Destination-side issue state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CanonicalState {
  Open,
  Done,
  #[serde(rename = "Won't fix")]
  WontFix,
}

impl CanonicalState {
  /// Value name as configured in the YouTrack State bundle
  pub fn as_str(&self) -> &'static str {
    match self {
      CanonicalState::Open => "Open",
      CanonicalState::Done => "Done",
      CanonicalState::WontFix => "Won't fix",
    }
  }
}

impl std::fmt::Display for CanonicalState {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Tracker-agnostic record produced by mapping a source issue.
///
/// Built fresh on every mapping call and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalIssue {
  pub summary: String,
  pub description: String,
  pub state: Option<CanonicalState>,
  pub assignee_login: Option<String>,
  pub external_id: String,
  pub tag_ids: Vec<String>,
}

impl CanonicalIssue {
  /// Same issue with the assignee removed
  pub fn without_assignee(&self) -> Self {
    Self {
      assignee_login: None,
      ..self.clone()
    }
  }
}
