//! Read-only data shared by every sync call.

use tracing::info;

use crate::error::Result;
use crate::sync::project::{resolve_project, ProjectSelector};
use crate::sync::tags::{load_tags, TagTable};
use crate::sync::tracker::DestinationTracker;

/// Project id and tag table, built once before any work starts.
///
/// There are no setters; share it behind `&` or `Arc`.
#[derive(Debug, Clone)]
pub struct SyncContext {
  project_id: String,
  tags: TagTable,
}

impl SyncContext {
  pub fn new(project_id: impl Into<String>, tags: TagTable) -> Self {
    Self {
      project_id: project_id.into(),
      tags,
    }
  }

  /// Resolve the project (fatal on failure), then load tags (never fatal).
  pub async fn initialize<T: DestinationTracker + ?Sized>(
    tracker: &T,
    selector: &ProjectSelector,
  ) -> Result<Self> {
    let project_id = resolve_project(tracker, selector).await?;
    let tags = load_tags(tracker).await;
    info!("YouTrack project ID: {}", project_id);
    Ok(Self::new(project_id, tags))
  }

  pub fn project_id(&self) -> &str {
    &self.project_id
  }

  pub fn tags(&self) -> &TagTable {
    &self.tags
  }
}
