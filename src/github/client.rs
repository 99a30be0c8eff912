use color_eyre::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use tracing::{debug, info};
use url::Url;

use crate::config::Config;
use crate::error::{Rejection, TrackerError};
use crate::github::api_types::ApiIssue;
use crate::github::types::SourceIssue;

const DEFAULT_PAGE_SIZE: u32 = 100;

/// GitHub REST API client, read-only
#[derive(Clone)]
pub struct GitHubClient {
  http: reqwest::Client,
  base_url: Url,
  page_size: u32,
}

impl GitHubClient {
  pub fn new(config: &Config) -> Result<Self> {
    let token = Config::get_github_token()?;
    Ok(Self::with_base_url(&config.github.api_url, &token)?)
  }

  pub fn with_base_url(base_url: &str, token: &str) -> std::result::Result<Self, TrackerError> {
    let mut headers = HeaderMap::new();
    headers.insert(
      ACCEPT,
      HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(USER_AGENT, HeaderValue::from_static("ghyt"));
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    let http = reqwest::Client::builder()
      .default_headers(headers)
      .build()?;

    // Url::join drops the last segment unless the base ends with a slash
    let base_url = Url::parse(&format!("{}/", base_url.trim().trim_end_matches('/')))?;

    Ok(Self {
      http,
      base_url,
      page_size: DEFAULT_PAGE_SIZE,
    })
  }

  #[cfg(test)]
  fn with_page_size(mut self, page_size: u32) -> Self {
    self.page_size = page_size;
    self
  }

  /// List every issue of a repository (open and closed), in listing order.
  ///
  /// Pull requests come back from the same endpoint and are dropped here.
  pub async fn list_issues(
    &self,
    owner: &str,
    repo: &str,
  ) -> std::result::Result<Vec<SourceIssue>, TrackerError> {
    info!("Fetching GitHub issues for {}/{} (state=all)", owner, repo);

    let url = self
      .base_url
      .join(&format!("repos/{}/{}/issues", owner, repo))?;

    let mut all_issues = Vec::new();
    let mut page = 1u32;

    loop {
      let response = self
        .http
        .get(url.clone())
        .query(&[
          ("state", "all".to_string()),
          ("per_page", self.page_size.to_string()),
          ("page", page.to_string()),
        ])
        .send()
        .await?;

      let status = response.status();
      if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(TrackerError::Rejected {
          status: status.as_u16(),
          rejection: Rejection::Other,
          message,
        });
      }

      let issues: Vec<ApiIssue> = response.json().await?;
      let fetched = issues.len();
      debug!(page, fetched, "fetched issues page");

      all_issues.extend(
        issues
          .into_iter()
          .filter(|issue| !issue.is_pull_request())
          .map(ApiIssue::into_source),
      );

      // A short page is the last one
      if fetched < self.page_size as usize {
        break;
      }
      page += 1;
    }

    info!("Fetched {} issues from GitHub", all_issues.len());
    Ok(all_issues)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use mockito::{Matcher, Server};

  fn page_query(page: &str) -> Matcher {
    Matcher::AllOf(vec![
      Matcher::UrlEncoded("state".into(), "all".into()),
      Matcher::UrlEncoded("per_page".into(), "2".into()),
      Matcher::UrlEncoded("page".into(), page.into()),
    ])
  }

  #[tokio::test]
  async fn test_list_issues_filters_pull_requests_across_pages() {
    let mut server = Server::new_async().await;
    let first = server
      .mock("GET", "/repos/a/b/issues")
      .match_query(page_query("1"))
      .match_header("authorization", "Bearer test-token")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(
        serde_json::json!([
          {"number": 1, "title": "One", "state": "open"},
          {"number": 2, "title": "PR", "state": "open", "pull_request": {}}
        ])
        .to_string(),
      )
      .create_async()
      .await;
    let second = server
      .mock("GET", "/repos/a/b/issues")
      .match_query(page_query("2"))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(serde_json::json!([{"number": 3, "title": "Three", "state": "closed"}]).to_string())
      .create_async()
      .await;

    let client = GitHubClient::with_base_url(&server.url(), "test-token")
      .unwrap()
      .with_page_size(2);
    let issues = client.list_issues("a", "b").await.unwrap();

    let numbers: Vec<u64> = issues.iter().map(|i| i.number).collect();
    assert_eq!(numbers, vec![1, 3]);
    first.assert_async().await;
    second.assert_async().await;
  }

  #[tokio::test]
  async fn test_list_issues_surfaces_http_errors() {
    let mut server = Server::new_async().await;
    let _mock = server
      .mock("GET", "/repos/a/missing/issues")
      .match_query(Matcher::Any)
      .with_status(404)
      .with_body(r#"{"message":"Not Found"}"#)
      .create_async()
      .await;

    let client = GitHubClient::with_base_url(&server.url(), "t").unwrap();
    let err = client.list_issues("a", "missing").await.unwrap_err();

    assert!(matches!(err, TrackerError::Rejected { status: 404, .. }));
  }

  #[test]
  fn test_token_with_control_characters_is_rejected() {
    let result = GitHubClient::with_base_url("https://api.github.com", "tok\nen");
    assert!(matches!(result, Err(TrackerError::InvalidToken(_))));
  }
}
