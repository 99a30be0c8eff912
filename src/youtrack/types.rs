/// Tag as known to YouTrack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationTag {
  pub id: String,
  pub name: String,
}

/// Project reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationProject {
  pub id: String,
  pub short_name: String,
}

/// Issue reference returned by lookups and writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationIssue {
  pub id: String,
  /// Human readable id like "APP-12"
  pub id_readable: Option<String>,
}

impl DestinationIssue {
  /// Best label for log lines
  pub fn display_id(&self) -> &str {
    self.id_readable.as_deref().unwrap_or(&self.id)
  }
}
