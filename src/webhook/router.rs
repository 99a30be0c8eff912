//! Dispatch of a single webhook delivery.

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::github::api_types::WebhookPayload;
use crate::sync::{SyncContext, SyncEngine, SyncOutcome};
use crate::sync::tracker::DestinationTracker;

/// The only event kind that triggers a sync
pub const ISSUES_EVENT: &str = "issues";

/// What happened to a delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
  /// Not an issues event
  Ignored,
  /// An issues event without an issue object
  MissingIssue,
  Synced(SyncOutcome),
}

/// Routes deliveries to the sync engine.
///
/// Shared across concurrent requests; the context is never written after
/// construction.
pub struct WebhookEventRouter<T> {
  engine: SyncEngine<T>,
  context: SyncContext,
}

impl<T: DestinationTracker> WebhookEventRouter<T> {
  pub fn new(engine: SyncEngine<T>, context: SyncContext) -> Self {
    Self { engine, context }
  }

  pub fn context(&self) -> &SyncContext {
    &self.context
  }

  pub async fn handle(&self, event: &str, payload: WebhookPayload) -> Result<WebhookOutcome> {
    if event != ISSUES_EVENT {
      info!("Ignoring webhook event: {}", event);
      return Ok(WebhookOutcome::Ignored);
    }

    let Some(api_issue) = payload.issue else {
      warn!("No issue data in webhook payload");
      return Ok(WebhookOutcome::MissingIssue);
    };

    let mut issue = api_issue.into_source();
    if issue.repo_full_name.is_none() {
      issue.repo_full_name = payload.repository.and_then(|r| r.full_name);
    }

    info!(
      "Processing GitHub issue {} - Action: {}",
      issue.number,
      payload.action.as_deref().unwrap_or("unknown")
    );

    match self.engine.sync(&issue, &self.context).await {
      Ok(outcome) => {
        debug!(
          issue = issue.number,
          created = outcome.is_created(),
          "synced {}",
          outcome.issue().display_id()
        );
        Ok(WebhookOutcome::Synced(outcome))
      }
      Err(e) => {
        warn!("Failed to sync GitHub issue #{}: {}", issue.number, e);
        Err(e)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sync::tags::TagTable;
  use crate::sync::testing::FakeTracker;
  use std::sync::Arc;

  fn router() -> (Arc<FakeTracker>, WebhookEventRouter<Arc<FakeTracker>>) {
    let tracker = Arc::new(FakeTracker::default());
    let router = WebhookEventRouter::new(
      SyncEngine::new(tracker.clone()),
      SyncContext::new("0-1", TagTable::default()),
    );
    (tracker, router)
  }

  fn payload(value: serde_json::Value) -> WebhookPayload {
    serde_json::from_value(value).unwrap()
  }

  #[tokio::test]
  async fn test_other_events_are_ignored() {
    let (tracker, router) = router();

    let outcome = router
      .handle("issue_comment", payload(serde_json::json!({"action": "created"})))
      .await
      .unwrap();

    assert_eq!(outcome, WebhookOutcome::Ignored);
    assert!(tracker.create_attempts().is_empty());
  }

  #[tokio::test]
  async fn test_missing_issue_is_a_noop() {
    let (tracker, router) = router();

    let outcome = router
      .handle(ISSUES_EVENT, payload(serde_json::json!({"action": "opened"})))
      .await
      .unwrap();

    assert_eq!(outcome, WebhookOutcome::MissingIssue);
    assert!(tracker.create_attempts().is_empty());
  }

  #[tokio::test]
  async fn test_issue_event_syncs() {
    let (tracker, router) = router();
    let body = serde_json::json!({
      "action": "opened",
      "issue": {
        "number": 42,
        "title": "Add feature",
        "state": "open",
        "repository_url": "https://api.github.com/repos/acme/app"
      }
    });

    let outcome = router.handle(ISSUES_EVENT, payload(body.clone())).await.unwrap();
    assert!(matches!(outcome, WebhookOutcome::Synced(ref o) if o.is_created()));

    let outcome = router.handle(ISSUES_EVENT, payload(body)).await.unwrap();
    assert!(matches!(outcome, WebhookOutcome::Synced(SyncOutcome::Updated(_))));

    assert_eq!(tracker.issues().len(), 1);
  }

  #[tokio::test]
  async fn test_repository_fallback_for_external_id() {
    let (tracker, router) = router();

    router
      .handle(
        ISSUES_EVENT,
        payload(serde_json::json!({
          "action": "edited",
          "issue": {"number": 3, "title": "T", "state": "open"},
          "repository": {"full_name": "acme/app"}
        })),
      )
      .await
      .unwrap();

    assert_eq!(tracker.issues()[0].external_id, "github:acme/app#3");
  }

  #[tokio::test]
  async fn test_sync_failure_is_returned() {
    let (tracker, router) = router();
    tracker.fail_lookup("github:acme/app#9");

    let result = router
      .handle(
        ISSUES_EVENT,
        payload(serde_json::json!({
          "action": "closed",
          "issue": {"number": 9, "state": "closed", "repository_url": "https://api.github.com/repos/acme/app"}
        })),
      )
      .await;

    assert!(result.is_err());
  }
}
