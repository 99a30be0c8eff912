/// Issue state as reported by GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueState {
  Open,
  Closed,
  /// Any value GitHub may add later
  Other(String),
}

impl IssueState {
  pub fn parse(value: &str) -> Self {
    match value {
      "open" => IssueState::Open,
      "closed" => IssueState::Closed,
      other => IssueState::Other(other.to_string()),
    }
  }
}

/// Why an issue was closed (or reopened)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateReason {
  NotPlanned,
  Reopened,
  Completed,
  Other,
}

impl StateReason {
  pub fn parse(value: &str) -> Self {
    match value {
      "not_planned" => StateReason::NotPlanned,
      "reopened" => StateReason::Reopened,
      "completed" => StateReason::Completed,
      _ => StateReason::Other,
    }
  }
}

/// A GitHub issue, normalized at the API boundary.
///
/// Labels are plain names here regardless of how the payload encoded them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceIssue {
  pub number: u64,
  pub title: Option<String>,
  pub body: Option<String>,
  pub state: IssueState,
  pub state_reason: Option<StateReason>,
  pub labels: Vec<String>,
  pub assignee: Option<String>,
  pub author: Option<String>,
  /// "owner/repo", when it could be derived
  pub repo_full_name: Option<String>,
}
