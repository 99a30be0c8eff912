//! The destination tracker seam.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::TrackerError;
use crate::sync::types::CanonicalIssue;
use crate::youtrack::types::{DestinationIssue, DestinationProject, DestinationTag};

/// Operations the sync core needs from the destination tracker.
///
/// The YouTrack client implements this for real; tests use an in-memory fake.
#[async_trait]
pub trait DestinationTracker: Send + Sync {
  /// Look up a project by its short name.
  async fn find_project(&self, short_name: &str)
    -> Result<Option<DestinationProject>, TrackerError>;

  /// Fetch the full tag catalog.
  async fn list_tags(&self) -> Result<Vec<DestinationTag>, TrackerError>;

  /// Find the issue carrying the given external id, if any.
  async fn find_issue(&self, external_id: &str) -> Result<Option<DestinationIssue>, TrackerError>;

  /// Create an issue, linking it to `issue.external_id`.
  async fn create_issue(
    &self,
    project_id: &str,
    issue: &CanonicalIssue,
  ) -> Result<DestinationIssue, TrackerError>;

  /// Overwrite the mutable fields of an existing issue.
  async fn update_issue(
    &self,
    issue_id: &str,
    issue: &CanonicalIssue,
  ) -> Result<DestinationIssue, TrackerError>;
}

#[async_trait]
impl<T: DestinationTracker + ?Sized> DestinationTracker for Arc<T> {
  async fn find_project(
    &self,
    short_name: &str,
  ) -> Result<Option<DestinationProject>, TrackerError> {
    (**self).find_project(short_name).await
  }

  async fn list_tags(&self) -> Result<Vec<DestinationTag>, TrackerError> {
    (**self).list_tags().await
  }

  async fn find_issue(&self, external_id: &str) -> Result<Option<DestinationIssue>, TrackerError> {
    (**self).find_issue(external_id).await
  }

  async fn create_issue(
    &self,
    project_id: &str,
    issue: &CanonicalIssue,
  ) -> Result<DestinationIssue, TrackerError> {
    (**self).create_issue(project_id, issue).await
  }

  async fn update_issue(
    &self,
    issue_id: &str,
    issue: &CanonicalIssue,
  ) -> Result<DestinationIssue, TrackerError> {
    (**self).update_issue(issue_id, issue).await
  }
}
