//! Error types shared by the trackers, the sync engine and the webhook server.

/// Why a tracker refused a request, as far as the engine cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
  /// The assignee login does not exist on the destination side.
  UnknownUser { login: Option<String> },
  /// Anything else. Never retried.
  Other,
}

/// Failure talking to either issue tracker.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("invalid url: {0}")]
  Url(#[from] url::ParseError),

  #[error("token is not a valid header value")]
  InvalidToken(#[from] reqwest::header::InvalidHeaderValue),

  #[error("rejected with status {status}: {message}")]
  Rejected {
    status: u16,
    rejection: Rejection,
    message: String,
  },
}

impl TrackerError {
  /// True when the tracker said the assignee login is unknown.
  pub fn is_unknown_user(&self) -> bool {
    matches!(
      self,
      TrackerError::Rejected {
        rejection: Rejection::UnknownUser { .. },
        ..
      }
    )
  }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
  #[error("configuration error: {0}")]
  Configuration(String),

  #[error("authentication failed: {0}")]
  Authentication(&'static str),

  #[error("could not resolve project {short_name}: {reason}")]
  Resolution { short_name: String, reason: String },

  #[error("invalid webhook payload: {0}")]
  Payload(#[from] serde_json::Error),

  #[error("tracker error: {0}")]
  Tracker(#[from] TrackerError),
}

pub type Result<T> = std::result::Result<T, SyncError>;
