use async_trait::async_trait;
use color_eyre::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::TrackerError;
use crate::sync::tracker::DestinationTracker;
use crate::sync::types::CanonicalIssue;
use crate::youtrack::api_types::{
  ApiError, ApiIssue, ApiProject, ApiTag, CreateIssueRequest, UpdateIssueRequest,
};
use crate::youtrack::types::{DestinationIssue, DestinationProject, DestinationTag};

const PAGE_SIZE: usize = 100;
const ISSUE_FIELDS: &str = "id,idReadable,summary";
const LOOKUP_FIELDS: &str = "id,idReadable,externalIssue(id)";

/// YouTrack REST API client
#[derive(Clone)]
pub struct YouTrackClient {
  http: reqwest::Client,
  api_url: Url,
}

impl YouTrackClient {
  pub fn new(config: &Config) -> Result<Self> {
    let token = Config::get_youtrack_token()?;
    Ok(Self::with_base_url(&config.youtrack.url, &token)?)
  }

  /// Build a client for `<base_url>/api/`.
  pub fn with_base_url(base_url: &str, token: &str) -> std::result::Result<Self, TrackerError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    let http = reqwest::Client::builder()
      .default_headers(headers)
      .timeout(Duration::from_secs(30))
      .build()?;

    let api_url = Url::parse(&format!("{}/api/", base_url.trim().trim_end_matches('/')))?;

    Ok(Self { http, api_url })
  }

  /// Send a request and decode the JSON response, classifying error bodies.
  async fn send<T: DeserializeOwned>(
    &self,
    request: reqwest::RequestBuilder,
  ) -> std::result::Result<T, TrackerError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
      let text = response.text().await.unwrap_or_default();
      let body: ApiError = serde_json::from_str(&text).unwrap_or_default();
      return Err(TrackerError::Rejected {
        status: status.as_u16(),
        rejection: body.rejection(),
        message: body.message(&text),
      });
    }

    Ok(response.json().await?)
  }

  /// Fetch every page of a `$skip/$top` collection endpoint.
  async fn get_all<T: DeserializeOwned>(
    &self,
    path: &str,
    fields: &str,
  ) -> std::result::Result<Vec<T>, TrackerError> {
    let url = self.api_url.join(path)?;
    let mut all_items = Vec::new();
    let mut skip = 0usize;

    loop {
      let request = self.http.get(url.clone()).query(&[
        ("fields", fields.to_string()),
        ("$skip", skip.to_string()),
        ("$top", PAGE_SIZE.to_string()),
      ]);
      let items: Vec<T> = self.send(request).await?;
      let count = items.len();
      all_items.extend(items);

      if count < PAGE_SIZE {
        break;
      }
      skip += PAGE_SIZE;
    }

    Ok(all_items)
  }
}

#[async_trait]
impl DestinationTracker for YouTrackClient {
  async fn find_project(
    &self,
    short_name: &str,
  ) -> std::result::Result<Option<DestinationProject>, TrackerError> {
    let projects: Vec<ApiProject> = self.get_all("admin/projects", "id,shortName").await?;

    Ok(
      projects
        .into_iter()
        .find(|p| p.short_name.eq_ignore_ascii_case(short_name))
        .map(DestinationProject::from),
    )
  }

  async fn list_tags(&self) -> std::result::Result<Vec<DestinationTag>, TrackerError> {
    let tags: Vec<ApiTag> = self.get_all("tags", "id,name").await?;
    debug!("fetched {} YouTrack tags", tags.len());
    Ok(tags.into_iter().map(DestinationTag::from).collect())
  }

  async fn find_issue(
    &self,
    external_id: &str,
  ) -> std::result::Result<Option<DestinationIssue>, TrackerError> {
    let url = self.api_url.join("issues")?;
    let query = format!("\"{}\"", external_id);
    let mut skip = 0usize;

    // Text search can return near matches; page until the exact link shows up
    loop {
      let request = self.http.get(url.clone()).query(&[
        ("query", query.clone()),
        ("fields", LOOKUP_FIELDS.to_string()),
        ("$skip", skip.to_string()),
        ("$top", PAGE_SIZE.to_string()),
      ]);

      let candidates: Vec<ApiIssue> = self.send(request).await?;
      let count = candidates.len();

      if let Some(found) = candidates
        .into_iter()
        .find(|issue| issue.external_id() == Some(external_id))
      {
        return Ok(Some(DestinationIssue::from(found)));
      }

      if count < PAGE_SIZE {
        return Ok(None);
      }
      skip += PAGE_SIZE;
    }
  }

  async fn create_issue(
    &self,
    project_id: &str,
    issue: &CanonicalIssue,
  ) -> std::result::Result<DestinationIssue, TrackerError> {
    let url = self.api_url.join("issues")?;
    let request = self
      .http
      .post(url)
      .query(&[("fields", ISSUE_FIELDS)])
      .json(&CreateIssueRequest::new(project_id, issue));

    let created: ApiIssue = self.send(request).await?;
    let created = DestinationIssue::from(created);
    debug!("created YouTrack issue {}", created.display_id());
    Ok(created)
  }

  async fn update_issue(
    &self,
    issue_id: &str,
    issue: &CanonicalIssue,
  ) -> std::result::Result<DestinationIssue, TrackerError> {
    let url = self.api_url.join(&format!("issues/{}", issue_id))?;
    let request = self
      .http
      .post(url)
      .query(&[("fields", ISSUE_FIELDS)])
      .json(&UpdateIssueRequest::new(issue));

    let updated: ApiIssue = self.send(request).await?;
    let updated = DestinationIssue::from(updated);
    debug!("updated YouTrack issue {}", updated.display_id());
    Ok(updated)
  }
}
