//! Create-or-update of a single source issue.

use tracing::{info, warn};

use crate::error::{Result, TrackerError};
use crate::github::types::SourceIssue;
use crate::sync::context::SyncContext;
use crate::sync::mapper;
use crate::sync::tracker::DestinationTracker;
use crate::sync::types::CanonicalIssue;
use crate::youtrack::types::DestinationIssue;

/// What a sync call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
  Created {
    issue: DestinationIssue,
    /// The assignee was unknown and left out
    assignee_dropped: bool,
  },
  Updated(DestinationIssue),
}

impl SyncOutcome {
  pub fn issue(&self) -> &DestinationIssue {
    match self {
      SyncOutcome::Created { issue, .. } => issue,
      SyncOutcome::Updated(issue) => issue,
    }
  }

  pub fn is_created(&self) -> bool {
    matches!(self, SyncOutcome::Created { .. })
  }
}

/// Result of looking up a source issue on the destination side
enum Lookup {
  Found(DestinationIssue),
  NotFound,
}

/// Syncs source issues into the destination tracker.
///
/// Holds no mutable state. Every call looks the issue up again, so calls for
/// different external ids never interfere.
pub struct SyncEngine<T> {
  tracker: T,
}

impl<T: DestinationTracker> SyncEngine<T> {
  pub fn new(tracker: T) -> Self {
    Self { tracker }
  }

  /// Sync one issue: update it if its external id is known, create it otherwise.
  pub async fn sync(&self, source: &SourceIssue, ctx: &SyncContext) -> Result<SyncOutcome> {
    let external_id = mapper::external_id(source);

    let lookup = match self.tracker.find_issue(&external_id).await? {
      Some(existing) => Lookup::Found(existing),
      None => Lookup::NotFound,
    };

    let mapped = mapper::map_issue(source, ctx.tags());

    let outcome = match lookup {
      Lookup::Found(existing) => {
        let updated = self.tracker.update_issue(&existing.id, &mapped).await?;
        info!(
          "Updated YouTrack issue {} for GitHub issue #{}",
          updated.display_id(),
          source.number
        );
        SyncOutcome::Updated(updated)
      }
      Lookup::NotFound => {
        let outcome = self.create(ctx.project_id(), &mapped).await?;
        info!(
          "Created new YouTrack issue {} for GitHub issue #{}",
          outcome.issue().display_id(),
          source.number
        );
        outcome
      }
    };

    Ok(outcome)
  }

  /// Create, retrying once without the assignee if the tracker does not
  /// know the login.
  async fn create(&self, project_id: &str, issue: &CanonicalIssue) -> Result<SyncOutcome> {
    match self.tracker.create_issue(project_id, issue).await {
      Ok(created) => Ok(SyncOutcome::Created {
        issue: created,
        assignee_dropped: false,
      }),
      Err(e) if should_drop_assignee(&e, issue) => {
        warn!(
          "User {} not found in YouTrack, creating issue without assignee",
          issue.assignee_login.as_deref().unwrap_or_default()
        );
        let created = self
          .tracker
          .create_issue(project_id, &issue.without_assignee())
          .await?;
        Ok(SyncOutcome::Created {
          issue: created,
          assignee_dropped: true,
        })
      }
      Err(e) => Err(e.into()),
    }
  }
}

fn should_drop_assignee(err: &TrackerError, issue: &CanonicalIssue) -> bool {
  issue.assignee_login.is_some() && err.is_unknown_user()
}
