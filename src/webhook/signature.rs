//! GitHub webhook signature check (`X-Hub-Signature-256`).

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

use crate::error::{Result, SyncError};

type HmacSha256 = Hmac<Sha256>;

const PREFIX: &str = "sha256=";

pub struct SignatureVerifier {
  secret: Option<String>,
}

impl SignatureVerifier {
  /// An empty secret counts as no secret.
  pub fn new(secret: Option<String>) -> Self {
    Self {
      secret: secret.filter(|s| !s.is_empty()),
    }
  }

  pub fn is_enabled(&self) -> bool {
    self.secret.is_some()
  }

  /// Check `signature` against an HMAC-SHA256 of the raw body bytes.
  ///
  /// Without a configured secret every request passes, with a warning.
  pub fn verify(&self, body: &[u8], signature: Option<&str>) -> Result<()> {
    let Some(secret) = self.secret.as_deref() else {
      warn!("No webhook secret configured, skipping signature verification");
      return Ok(());
    };

    let Some(signature) = signature else {
      warn!("No signature found in webhook request");
      return Err(SyncError::Authentication("Missing signature"));
    };

    let invalid = || {
      warn!("Invalid webhook signature");
      SyncError::Authentication("Invalid signature")
    };

    // GitHub sends lowercase hex; anything else is not the digest we compute
    let digest = signature
      .strip_prefix(PREFIX)
      .filter(|hex_digest| is_lower_hex(hex_digest))
      .and_then(|hex_digest| hex::decode(hex_digest).ok())
      .ok_or_else(invalid)?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| invalid())?;
    mac.update(body);
    // verify_slice compares in constant time
    mac.verify_slice(&digest).map_err(|_| invalid())
  }
}

fn is_lower_hex(value: &str) -> bool {
  value
    .bytes()
    .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[cfg(test)]
pub fn sign(secret: &str, body: &[u8]) -> String {
  let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
  mac.update(body);
  format!("{}{}", PREFIX, hex::encode(mac.finalize().into_bytes()))
}
