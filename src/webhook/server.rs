//! HTTP surface: `POST /webhook` and `GET /health`.

use axum::{
  body::Bytes,
  extract::State,
  http::{HeaderMap, StatusCode},
  response::Json,
  routing::{get, post},
  Router,
};
use chrono::Utc;
use color_eyre::Result;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, Instrument};

use crate::error::SyncError;
use crate::github::api_types::WebhookPayload;
use crate::sync::tracker::DestinationTracker;
use crate::webhook::router::WebhookEventRouter;
use crate::webhook::signature::SignatureVerifier;

pub const EVENT_HEADER: &str = "x-github-event";
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";
pub const DELIVERY_HEADER: &str = "x-github-delivery";

/// State shared by all requests. Read-only after startup.
pub struct AppState<T> {
  router: Arc<WebhookEventRouter<T>>,
  verifier: Arc<SignatureVerifier>,
}

impl<T> AppState<T> {
  pub fn new(router: WebhookEventRouter<T>, verifier: SignatureVerifier) -> Self {
    Self {
      router: Arc::new(router),
      verifier: Arc::new(verifier),
    }
  }
}

impl<T> Clone for AppState<T> {
  fn clone(&self) -> Self {
    Self {
      router: Arc::clone(&self.router),
      verifier: Arc::clone(&self.verifier),
    }
  }
}

pub fn app<T: DestinationTracker + 'static>(state: AppState<T>) -> Router {
  Router::new()
    .route("/webhook", post(handle_webhook::<T>))
    .route("/health", get(health::<T>))
    .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve<T: DestinationTracker + 'static>(state: AppState<T>, port: u16) -> Result<()> {
  let addr = format!("0.0.0.0:{}", port);
  let listener = TcpListener::bind(&addr).await?;

  info!("GitHub webhook server running on port {}", port);
  info!("Webhook endpoint: http://localhost:{}/webhook", port);
  info!("Health check: http://localhost:{}/health", port);

  axum::serve(listener, app(state))
    .with_graceful_shutdown(async {
      let _ = tokio::signal::ctrl_c().await;
      info!("shutting down");
    })
    .await?;

  Ok(())
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
  headers.get(name).and_then(|v| v.to_str().ok())
}

async fn handle_webhook<T: DestinationTracker + 'static>(
  State(state): State<AppState<T>>,
  headers: HeaderMap,
  body: Bytes,
) -> (StatusCode, Json<Value>) {
  let event = header(&headers, EVENT_HEADER).unwrap_or("unknown").to_string();
  let delivery = header(&headers, DELIVERY_HEADER).unwrap_or("-").to_string();
  let span = tracing::info_span!("webhook", %event, %delivery);

  async move {
    if let Err(e) = state.verifier.verify(&body, header(&headers, SIGNATURE_HEADER)) {
      return error_response(&e);
    }

    info!("Received GitHub webhook: {}", event);

    let result = match serde_json::from_slice::<WebhookPayload>(&body) {
      Ok(payload) => state.router.handle(&event, payload).await,
      Err(e) => Err(SyncError::from(e)),
    };

    match result {
      Ok(_) => (
        StatusCode::OK,
        Json(json!({ "message": "Webhook processed successfully" })),
      ),
      Err(e) => {
        error!("Webhook processing failed: {}", e);
        error_response(&e)
      }
    }
  }
  .instrument(span)
  .await
}

fn error_response(err: &SyncError) -> (StatusCode, Json<Value>) {
  match err {
    SyncError::Authentication(reason) => (StatusCode::UNAUTHORIZED, Json(json!({ "error": reason }))),
    SyncError::Payload(_) => (
      StatusCode::BAD_REQUEST,
      Json(json!({ "error": "Invalid payload" })),
    ),
    _ => (
      StatusCode::INTERNAL_SERVER_ERROR,
      Json(json!({ "error": "Internal server error" })),
    ),
  }
}

async fn health<T: DestinationTracker + 'static>(State(state): State<AppState<T>>) -> Json<Value> {
  Json(json!({
    "status": "healthy",
    "timestamp": Utc::now().to_rfc3339(),
    "youtrackProjectId": state.router.context().project_id(),
  }))
}
