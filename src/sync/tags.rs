//! Label name to tag id lookup.

use std::collections::HashMap;
use tracing::{info, warn};

use crate::sync::tracker::DestinationTracker;
use crate::youtrack::types::DestinationTag;

/// Tag ids keyed by lower-cased tag name.
///
/// Names that collide up to case keep the last id seen.
#[derive(Debug, Clone, Default)]
pub struct TagTable {
  by_name: HashMap<String, String>,
}

impl TagTable {
  pub fn from_tags(tags: impl IntoIterator<Item = DestinationTag>) -> Self {
    let by_name = tags
      .into_iter()
      .map(|tag| (tag.name.to_lowercase(), tag.id))
      .collect();
    Self { by_name }
  }

  /// Tag id for a label name, compared case-insensitively.
  pub fn resolve(&self, name: &str) -> Option<&str> {
    self.by_name.get(&name.to_lowercase()).map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.by_name.len()
  }

  pub fn is_empty(&self) -> bool {
    self.by_name.is_empty()
  }
}

/// Fetch the tag catalog once.
///
/// A failed fetch yields an empty table: labels then map to no tags, but
/// issues still sync.
pub async fn load_tags<T: DestinationTracker + ?Sized>(tracker: &T) -> TagTable {
  match tracker.list_tags().await {
    Ok(tags) => {
      let table = TagTable::from_tags(tags);
      if table.is_empty() {
        warn!("No YouTrack tags found, labels will not be mapped");
      } else {
        info!("Loaded {} YouTrack tags", table.len());
      }
      table
    }
    Err(e) => {
      warn!("Failed to fetch YouTrack tags: {}", e);
      TagTable::default()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sync::testing::FakeTracker;

  fn tag(id: &str, name: &str) -> DestinationTag {
    DestinationTag {
      id: id.to_string(),
      name: name.to_string(),
    }
  }

  #[test]
  fn test_resolve_is_case_insensitive() {
    let table = TagTable::from_tags(vec![tag("t1", "Bug"), tag("t2", "good first issue")]);

    assert_eq!(table.resolve("bug"), Some("t1"));
    assert_eq!(table.resolve("BUG"), Some("t1"));
    assert_eq!(table.resolve("Good First Issue"), Some("t2"));
    assert_eq!(table.resolve("feature"), None);
  }

  #[test]
  fn test_case_collision_last_wins() {
    let table = TagTable::from_tags(vec![tag("t1", "bug"), tag("t2", "BUG")]);

    assert_eq!(table.len(), 1);
    assert_eq!(table.resolve("bug"), Some("t2"));
  }

  #[tokio::test]
  async fn test_load_tags() {
    let tracker = FakeTracker::with_tags(vec![tag("t1", "bug")]);

    let table = load_tags(&tracker).await;

    assert_eq!(table.resolve("bug"), Some("t1"));
  }

  #[tokio::test]
  async fn test_load_tags_degrades_to_empty_on_failure() {
    let tracker = FakeTracker::default();
    tracker.fail_tags();

    let table = load_tags(&tracker).await;

    assert!(table.is_empty());
  }
}
