//! Destination project resolution.

use tracing::info;

use crate::error::{Result, SyncError};
use crate::sync::tracker::DestinationTracker;

/// How the destination project is identified in configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectSelector {
  /// Internal id such as "0-1", used as is
  Id(String),
  /// Short name such as "APP", resolved through the tracker
  ShortName(String),
}

/// Resolve the project id once at startup. Any failure is fatal.
pub async fn resolve_project<T: DestinationTracker + ?Sized>(
  tracker: &T,
  selector: &ProjectSelector,
) -> Result<String> {
  let short_name = match selector {
    ProjectSelector::Id(id) => return Ok(id.clone()),
    ProjectSelector::ShortName(short_name) => short_name,
  };

  info!("Resolving YouTrack project ID for shortname: {}", short_name);

  let project = tracker
    .find_project(short_name)
    .await
    .map_err(|e| SyncError::Resolution {
      short_name: short_name.clone(),
      reason: e.to_string(),
    })?
    .ok_or_else(|| SyncError::Resolution {
      short_name: short_name.clone(),
      reason: "no such project".to_string(),
    })?;

  Ok(project.id)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sync::testing::FakeTracker;
  use crate::youtrack::types::DestinationProject;

  fn tracker() -> FakeTracker {
    FakeTracker::with_projects(vec![DestinationProject {
      id: "0-7".to_string(),
      short_name: "APP".to_string(),
    }])
  }

  #[tokio::test]
  async fn test_id_is_used_without_lookup() {
    let tracker = FakeTracker::default();
    tracker.fail_projects();

    let id = resolve_project(&tracker, &ProjectSelector::Id("0-1".into()))
      .await
      .unwrap();

    assert_eq!(id, "0-1");
  }

  #[tokio::test]
  async fn test_short_name_is_resolved() {
    let id = resolve_project(&tracker(), &ProjectSelector::ShortName("APP".into()))
      .await
      .unwrap();

    assert_eq!(id, "0-7");
  }

  #[tokio::test]
  async fn test_unknown_short_name_is_an_error() {
    let err = resolve_project(&tracker(), &ProjectSelector::ShortName("INVALID".into()))
      .await
      .unwrap_err();

    assert!(matches!(err, SyncError::Resolution { ref short_name, .. } if short_name == "INVALID"));
  }

  #[tokio::test]
  async fn test_lookup_failure_is_propagated() {
    let tracker = tracker();
    tracker.fail_projects();

    let err = resolve_project(&tracker, &ProjectSelector::ShortName("APP".into()))
      .await
      .unwrap_err();

    assert!(matches!(err, SyncError::Resolution { .. }));
  }
}
