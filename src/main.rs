mod config;
mod error;
mod github;
mod logging;
mod sync;
mod webhook;
mod youtrack;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::Config;
use crate::github::GitHubClient;
use crate::sync::import::import_all;
use crate::sync::{mapper, SyncContext, SyncEngine};
use crate::webhook::{AppState, SignatureVerifier, WebhookEventRouter};
use crate::youtrack::YouTrackClient;

#[derive(Parser, Debug)]
#[command(name = "ghyt")]
#[command(about = "Sync GitHub issues into YouTrack")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./ghyt.yaml or $XDG_CONFIG_HOME/ghyt/config.yaml)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// YouTrack project short name to sync into
  #[arg(short, long, global = true)]
  project: Option<String>,

  /// Enable debug logging
  #[arg(long, global = true)]
  debug: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
  /// Import every issue of the repository once
  Import {
    /// Print mapped issues as JSON lines instead of writing them
    #[arg(long)]
    dry_run: bool,
  },
  /// Serve the webhook endpoint
  Serve {
    /// Port to listen on (overrides WEBHOOK_PORT)
    #[arg(long)]
    port: Option<u16>,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  Config::load_dotenv()?;

  let args = Args::parse();

  let mut config = Config::load(args.config.as_deref())?;
  if let Some(project) = args.project {
    config.override_project(project);
  }
  if args.debug {
    config.logging.debug = true;
  }

  let _guard = logging::init(&config.logging)?;

  match args.command {
    Commands::Import { dry_run } => import(&config, dry_run).await,
    Commands::Serve { port } => serve(&config, port.unwrap_or(config.webhook.port)).await,
  }
}

async fn import(config: &Config, dry_run: bool) -> Result<()> {
  info!("Starting GitHub to YouTrack import");

  let github = GitHubClient::new(config)?;
  let youtrack = YouTrackClient::new(config)?;

  let ctx = SyncContext::initialize(&youtrack, &config.project_selector()?).await?;
  let issues = github
    .list_issues(&config.github.owner, &config.github.repo)
    .await?;
  info!("Found {} issues to import", issues.len());

  if dry_run {
    for issue in &issues {
      println!("{}", serde_json::to_string(&mapper::map_issue(issue, ctx.tags()))?);
    }
    return Ok(());
  }

  let engine = SyncEngine::new(youtrack);
  let report = import_all(&engine, &issues, &ctx).await;
  if !report.failed.is_empty() {
    warn!("{} issues failed to import", report.failed.len());
  }

  Ok(())
}

async fn serve(config: &Config, port: u16) -> Result<()> {
  let youtrack = YouTrackClient::new(config)?;
  let ctx = SyncContext::initialize(&youtrack, &config.project_selector()?).await?;

  let verifier = SignatureVerifier::new(Config::get_webhook_secret());
  if !verifier.is_enabled() {
    warn!("GITHUB_WEBHOOK_SECRET is not set; webhook signatures will not be checked");
  }

  let router = WebhookEventRouter::new(SyncEngine::new(youtrack), ctx);
  webhook::server::serve(AppState::new(router, verifier), port).await
}
