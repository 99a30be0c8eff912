//! Webhook intake: signature check, event routing and the HTTP server.

pub mod router;
pub mod server;
pub mod signature;

pub use router::WebhookEventRouter;
pub use server::AppState;
pub use signature::SignatureVerifier;
