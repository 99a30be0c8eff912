//! One-shot import of a full issue listing.

use tracing::{error, info};

use crate::github::types::SourceIssue;
use crate::sync::context::SyncContext;
use crate::sync::engine::{SyncEngine, SyncOutcome};
use crate::sync::tracker::DestinationTracker;

/// Tally of a finished import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
  pub created: usize,
  pub updated: usize,
  /// Issue number and error message for each failure
  pub failed: Vec<(u64, String)>,
}

impl ImportReport {
  pub fn attempted(&self) -> usize {
    self.created + self.updated + self.failed.len()
  }
}

impl std::fmt::Display for ImportReport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{} created, {} updated, {} failed",
      self.created,
      self.updated,
      self.failed.len()
    )
  }
}

/// Sync every issue in listing order, one at a time.
///
/// A failing issue is logged and skipped; the rest of the batch still runs.
pub async fn import_all<T: DestinationTracker>(
  engine: &SyncEngine<T>,
  issues: &[SourceIssue],
  ctx: &SyncContext,
) -> ImportReport {
  let mut report = ImportReport::default();

  for issue in issues {
    match engine.sync(issue, ctx).await {
      Ok(SyncOutcome::Created { .. }) => report.created += 1,
      Ok(SyncOutcome::Updated(_)) => report.updated += 1,
      Err(e) => {
        error!(issue = issue.number, "Failed to sync GitHub issue #{}: {}", issue.number, e);
        report.failed.push((issue.number, e.to_string()));
      }
    }
  }

  info!(attempted = report.attempted(), "Import complete: {}", report);
  report
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::github::types::IssueState;
  use crate::sync::tags::TagTable;
  use crate::sync::testing::FakeTracker;
  use std::sync::Arc;

  fn source(number: u64) -> SourceIssue {
    SourceIssue {
      number,
      title: Some(format!("Issue {}", number)),
      body: None,
      state: IssueState::Open,
      state_reason: None,
      labels: vec![],
      assignee: None,
      author: None,
      repo_full_name: Some("acme/app".to_string()),
    }
  }

  #[tokio::test]
  async fn test_failure_does_not_abort_batch() {
    let tracker = Arc::new(FakeTracker::default());
    tracker.fail_lookup("github:acme/app#2");
    let engine = SyncEngine::new(tracker.clone());
    let ctx = SyncContext::new("0-1", TagTable::default());

    let report = import_all(&engine, &[source(1), source(2), source(3)], &ctx).await;

    assert_eq!(report.created, 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, 2);
    assert_eq!(report.attempted(), 3);

    let synced: Vec<String> = tracker.issues().into_iter().map(|i| i.external_id).collect();
    assert_eq!(synced, vec!["github:acme/app#1", "github:acme/app#3"]);
  }

  #[tokio::test]
  async fn test_reimport_updates() {
    let tracker = Arc::new(FakeTracker::default());
    let engine = SyncEngine::new(tracker.clone());
    let ctx = SyncContext::new("0-1", TagTable::default());
    let issues = [source(1), source(2)];

    import_all(&engine, &issues, &ctx).await;
    let report = import_all(&engine, &issues, &ctx).await;

    assert_eq!(report.to_string(), "0 created, 2 updated, 0 failed");
    assert_eq!(tracker.issues().len(), 2);
  }

  #[tokio::test]
  async fn test_empty_listing() {
    let engine = SyncEngine::new(FakeTracker::default());
    let ctx = SyncContext::new("0-1", TagTable::default());

    let report = import_all(&engine, &[], &ctx).await;

    assert_eq!(report, ImportReport::default());
  }
}
