use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::SyncError;
use crate::sync::ProjectSelector;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_WEBHOOK_PORT: u16 = 3000;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub github: GitHubConfig,
  #[serde(default)]
  pub youtrack: YouTrackConfig,
  #[serde(default)]
  pub webhook: WebhookConfig,
  #[serde(default)]
  pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
  #[serde(default)]
  pub owner: String,
  #[serde(default)]
  pub repo: String,
  #[serde(default = "default_api_url")]
  pub api_url: String,
}

impl Default for GitHubConfig {
  fn default() -> Self {
    Self {
      owner: String::new(),
      repo: String::new(),
      api_url: default_api_url(),
    }
  }
}

fn default_api_url() -> String {
  DEFAULT_GITHUB_API_URL.to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct YouTrackConfig {
  /// Instance base URL, without the `/api` suffix
  #[serde(default)]
  pub url: String,
  /// Internal project id such as "0-1"; takes precedence over the short name
  pub project_id: Option<String>,
  pub project_short_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
  #[serde(default = "default_port")]
  pub port: u16,
}

impl Default for WebhookConfig {
  fn default() -> Self {
    Self {
      port: DEFAULT_WEBHOOK_PORT,
    }
  }
}

fn default_port() -> u16 {
  DEFAULT_WEBHOOK_PORT
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
  #[serde(default)]
  pub debug: bool,
  /// Directory for the daily rolling log file; stdout only when unset
  pub dir: Option<PathBuf>,
}

impl Config {
  /// Load configuration from file and environment.
  ///
  /// Search order for the file:
  /// 1. Explicit path if provided
  /// 2. ./ghyt.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/ghyt/config.yaml
  ///
  /// No file at all is fine; environment variables are applied on top either way.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    Self::load_with(explicit_path, |key| std::env::var(key).ok())
  }

  /// Like `load`, reading the environment through `lookup`.
  pub fn load_with(
    explicit_path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
  ) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let mut config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Config::default(),
    };

    config.apply_env(lookup)?;
    config.validate()?;
    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("ghyt.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("ghyt").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  /// Overlay environment variables. Blank values count as unset.
  pub fn apply_env(
    &mut self,
    lookup: impl Fn(&str) -> Option<String>,
  ) -> std::result::Result<(), SyncError> {
    let get = |key: &str| {
      lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
    };

    if let Some(v) = get("GITHUB_OWNER") {
      self.github.owner = v;
    }
    if let Some(v) = get("GITHUB_REPO") {
      self.github.repo = v;
    }
    if let Some(v) = get("GITHUB_API_URL") {
      self.github.api_url = v;
    }
    if let Some(v) = get("YOUTRACK_BASE_URL") {
      self.youtrack.url = v;
    }
    if let Some(v) = get("YOUTRACK_PROJECT_ID") {
      self.youtrack.project_id = Some(v);
    }
    if let Some(v) = get("YOUTRACK_PROJECT_SHORTNAME") {
      self.youtrack.project_short_name = Some(v);
    }
    if let Some(v) = get("WEBHOOK_PORT") {
      self.webhook.port = v
        .parse()
        .map_err(|_| SyncError::Configuration(format!("invalid WEBHOOK_PORT: {}", v)))?;
    }
    if let Some(v) = get("DEBUG") {
      self.logging.debug = v == "1" || v.eq_ignore_ascii_case("true");
    }
    if let Some(v) = get("GHYT_LOG_DIR") {
      self.logging.dir = Some(PathBuf::from(v));
    }

    Ok(())
  }

  pub fn validate(&self) -> std::result::Result<(), SyncError> {
    let missing = |what: &str| SyncError::Configuration(format!("{} is not configured", what));

    if self.github.owner.trim().is_empty() {
      return Err(missing("GitHub owner (GITHUB_OWNER)"));
    }
    if self.github.repo.trim().is_empty() {
      return Err(missing("GitHub repository (GITHUB_REPO)"));
    }
    if self.youtrack.url.trim().is_empty() {
      return Err(missing("YouTrack URL (YOUTRACK_BASE_URL)"));
    }
    self.project_selector()?;
    Ok(())
  }

  /// Point at a project by short name, replacing any configured project.
  pub fn override_project(&mut self, short_name: String) {
    self.youtrack.project_id = None;
    self.youtrack.project_short_name = Some(short_name);
  }

  /// The configured destination project. The id wins when both are set.
  pub fn project_selector(&self) -> std::result::Result<ProjectSelector, SyncError> {
    let non_empty = |v: &Option<String>| {
      v.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
    };

    if let Some(id) = non_empty(&self.youtrack.project_id) {
      return Ok(ProjectSelector::Id(id));
    }
    if let Some(short_name) = non_empty(&self.youtrack.project_short_name) {
      return Ok(ProjectSelector::ShortName(short_name));
    }
    Err(SyncError::Configuration(
      "either YOUTRACK_PROJECT_ID or YOUTRACK_PROJECT_SHORTNAME must be set".to_string(),
    ))
  }

  /// Get the GitHub API token from GITHUB_TOKEN.
  pub fn get_github_token() -> Result<String> {
    secret_from_env("GITHUB_TOKEN")
      .ok_or_else(|| eyre!("GitHub token not found. Set the GITHUB_TOKEN environment variable."))
  }

  /// Get the YouTrack permanent token from YOUTRACK_TOKEN.
  pub fn get_youtrack_token() -> Result<String> {
    secret_from_env("YOUTRACK_TOKEN").ok_or_else(|| {
      eyre!("YouTrack token not found. Set the YOUTRACK_TOKEN environment variable.")
    })
  }

  /// Load `.env` from the working directory. Only a missing file is ignored.
  pub fn load_dotenv() -> Result<()> {
    dotenv_outcome(dotenvy::dotenv().map(|_| ()))
  }

  /// Webhook HMAC secret from GITHUB_WEBHOOK_SECRET, if any.
  pub fn get_webhook_secret() -> Option<String> {
    secret_from_env("GITHUB_WEBHOOK_SECRET")
  }
}

fn dotenv_outcome(result: std::result::Result<(), dotenvy::Error>) -> Result<()> {
  match result {
    Ok(()) => Ok(()),
    Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(eyre!("Failed to load .env file: {}", e)),
  }
}

fn secret_from_env(key: &str) -> Option<String> {
  std::env::var(key)
    .ok()
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}
