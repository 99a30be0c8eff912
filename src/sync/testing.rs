//! In-memory destination tracker for tests.

use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::error::{Rejection, TrackerError};
use crate::sync::tracker::DestinationTracker;
use crate::sync::types::CanonicalIssue;
use crate::youtrack::types::{DestinationIssue, DestinationProject, DestinationTag};

/// An issue as the fake stores it
#[derive(Debug, Clone)]
pub struct StoredIssue {
  pub id: String,
  pub project_id: String,
  pub external_id: String,
  pub fields: CanonicalIssue,
}

#[derive(Default)]
pub struct FakeTracker {
  projects: Vec<DestinationProject>,
  tags: Vec<DestinationTag>,
  projects_down: AtomicBool,
  tags_down: AtomicBool,
  issues: Mutex<Vec<StoredIssue>>,
  create_failures: Mutex<VecDeque<TrackerError>>,
  failing_lookups: Mutex<HashSet<String>>,
  create_attempts: Mutex<Vec<CanonicalIssue>>,
}

pub fn rejected(rejection: Rejection, message: &str) -> TrackerError {
  TrackerError::Rejected {
    status: 400,
    rejection,
    message: message.to_string(),
  }
}

pub fn unknown_user(login: &str) -> TrackerError {
  rejected(
    Rejection::UnknownUser {
      login: Some(login.to_string()),
    },
    &format!("No user for login: {}", login),
  )
}

impl FakeTracker {
  pub fn with_projects(projects: Vec<DestinationProject>) -> Self {
    Self {
      projects,
      ..Default::default()
    }
  }

  pub fn with_tags(tags: Vec<DestinationTag>) -> Self {
    Self {
      tags,
      ..Default::default()
    }
  }

  pub fn fail_projects(&self) {
    self.projects_down.store(true, Ordering::SeqCst);
  }

  pub fn fail_tags(&self) {
    self.tags_down.store(true, Ordering::SeqCst);
  }

  /// Queue an error for the next create call.
  pub fn fail_next_create(&self, err: TrackerError) {
    self.create_failures.lock().unwrap().push_back(err);
  }

  /// Make every lookup for this external id fail.
  pub fn fail_lookup(&self, external_id: &str) {
    self
      .failing_lookups
      .lock()
      .unwrap()
      .insert(external_id.to_string());
  }

  pub fn issues(&self) -> Vec<StoredIssue> {
    self.issues.lock().unwrap().clone()
  }

  /// Every create request seen, failed ones included
  pub fn create_attempts(&self) -> Vec<CanonicalIssue> {
    self.create_attempts.lock().unwrap().clone()
  }
}

#[async_trait]
impl DestinationTracker for FakeTracker {
  async fn find_project(
    &self,
    short_name: &str,
  ) -> Result<Option<DestinationProject>, TrackerError> {
    if self.projects_down.load(Ordering::SeqCst) {
      return Err(rejected(Rejection::Other, "projects unavailable"));
    }
    Ok(
      self
        .projects
        .iter()
        .find(|p| p.short_name.eq_ignore_ascii_case(short_name))
        .cloned(),
    )
  }

  async fn list_tags(&self) -> Result<Vec<DestinationTag>, TrackerError> {
    if self.tags_down.load(Ordering::SeqCst) {
      return Err(rejected(Rejection::Other, "Network error"));
    }
    Ok(self.tags.clone())
  }

  async fn find_issue(&self, external_id: &str) -> Result<Option<DestinationIssue>, TrackerError> {
    if self.failing_lookups.lock().unwrap().contains(external_id) {
      return Err(rejected(Rejection::Other, "lookup failed"));
    }
    Ok(
      self
        .issues
        .lock()
        .unwrap()
        .iter()
        .find(|i| i.external_id == external_id)
        .map(|i| DestinationIssue {
          id: i.id.clone(),
          id_readable: None,
        }),
    )
  }

  async fn create_issue(
    &self,
    project_id: &str,
    issue: &CanonicalIssue,
  ) -> Result<DestinationIssue, TrackerError> {
    self.create_attempts.lock().unwrap().push(issue.clone());

    if let Some(err) = self.create_failures.lock().unwrap().pop_front() {
      return Err(err);
    }

    let mut issues = self.issues.lock().unwrap();
    let id = format!("2-{}", issues.len() + 1);
    issues.push(StoredIssue {
      id: id.clone(),
      project_id: project_id.to_string(),
      external_id: issue.external_id.clone(),
      fields: issue.clone(),
    });

    Ok(DestinationIssue {
      id,
      id_readable: None,
    })
  }

  async fn update_issue(
    &self,
    issue_id: &str,
    issue: &CanonicalIssue,
  ) -> Result<DestinationIssue, TrackerError> {
    let mut issues = self.issues.lock().unwrap();
    let stored = issues
      .iter_mut()
      .find(|i| i.id == issue_id)
      .ok_or_else(|| rejected(Rejection::Other, "no such issue"))?;

    // External id is fixed at creation
    stored.fields = CanonicalIssue {
      external_id: stored.external_id.clone(),
      ..issue.clone()
    };

    Ok(DestinationIssue {
      id: stored.id.clone(),
      id_readable: None,
    })
  }
}
