//! tracing subscriber setup.

use color_eyre::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LoggingConfig;

pub const LOG_FILE_NAME: &str = "ghyt.log";

/// Install the global subscriber.
///
/// Logs go to stdout, plus a daily rolling file when a directory is
/// configured. The returned guard must be held until exit or buffered file
/// output is lost.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
  let stdout_layer = tracing_subscriber::fmt::layer()
    .with_target(true)
    .with_filter(filter(config.debug));

  let guard = if let Some(ref dir) = config.dir {
    std::fs::create_dir_all(dir)?;
    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(dir, LOG_FILE_NAME));

    let file_layer = tracing_subscriber::fmt::layer()
      .with_writer(writer)
      .with_ansi(false)
      .with_target(true)
      .with_filter(filter(config.debug));

    tracing_subscriber::registry()
      .with(stdout_layer)
      .with(file_layer)
      .try_init()?;

    Some(guard)
  } else {
    tracing_subscriber::registry().with(stdout_layer).try_init()?;
    None
  };

  Ok(guard)
}

/// `RUST_LOG` wins; otherwise info, or debug when asked for.
fn filter(debug: bool) -> EnvFilter {
  let default = if debug {
    LevelFilter::DEBUG
  } else {
    LevelFilter::INFO
  };

  EnvFilter::builder()
    .with_default_directive(default.into())
    .from_env_lossy()
}
