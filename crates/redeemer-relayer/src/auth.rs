//! Relayer credential issuance.
//!
//! Credentials are HMAC-SHA256 request signatures in the Polymarket builder
//! style: the MAC covers `timestamp + method + path + body`, is keyed by the
//! base64-decoded API secret and is rendered as URL-safe base64.

use crate::{operation_path, RelayerError};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use redeemer_config::RelayerConfig;
use redeemer_types::{RelayerCredential, SignedMessage};
use sha2::Sha256;
use std::time::Duration;

type HmacSha256 = Hmac<Sha256>;

/// Issues a fresh credential for one relayer call.
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
	async fn issue(&self, message: &SignedMessage) -> Result<RelayerCredential, RelayerError>;
}

/// Issues credentials locally from the configured API key pair.
pub struct HmacCredentialIssuer {
	api_key: String,
	passphrase: String,
	secret: Vec<u8>,
	ttl: Duration,
	clock: fn() -> i64,
}

fn now_ms() -> i64 {
	chrono::Utc::now().timestamp_millis()
}

/// Decodes the API secret. URL-safe base64 is tried first, then standard
/// base64, then the raw bytes are used as-is.
fn decode_secret(secret: &str) -> Vec<u8> {
	general_purpose::URL_SAFE
		.decode(secret)
		.or_else(|_| general_purpose::STANDARD.decode(secret))
		.unwrap_or_else(|_| secret.as_bytes().to_vec())
}

impl HmacCredentialIssuer {
	pub fn new(
		api_key: impl Into<String>,
		api_secret: &str,
		passphrase: impl Into<String>,
		ttl: Duration,
	) -> Self {
		Self {
			api_key: api_key.into(),
			passphrase: passphrase.into(),
			secret: decode_secret(api_secret),
			ttl,
			clock: now_ms,
		}
	}

	/// Overrides the millisecond clock used for timestamps.
	pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
		self.clock = clock;
		self
	}

	/// Signs `timestamp + method + path + body`.
	pub fn sign(
		&self,
		timestamp: i64,
		method: &str,
		path: &str,
		body: &str,
	) -> Result<String, RelayerError> {
		let mut mac = HmacSha256::new_from_slice(&self.secret)
			.map_err(|e| RelayerError::Credential(format!("Invalid API secret: {}", e)))?;
		mac.update(format!("{}{}{}{}", timestamp, method, path, body).as_bytes());
		Ok(general_purpose::URL_SAFE.encode(mac.finalize().into_bytes()))
	}
}

#[async_trait]
impl CredentialIssuer for HmacCredentialIssuer {
	async fn issue(&self, message: &SignedMessage) -> Result<RelayerCredential, RelayerError> {
		let timestamp = (self.clock)();
		let body = format!("{}{}", message.encoded(), message.signature().to_hex());
		let token = self.sign(timestamp, "POST", operation_path(message.kind()), &body)?;

		Ok(RelayerCredential {
			api_key: self.api_key.clone(),
			passphrase: self.passphrase.clone(),
			timestamp,
			token,
			expires_at: timestamp + self.ttl.as_millis() as i64,
		})
	}
}

/// Builds the credential issuer from resolved configuration.
pub fn create_credential_issuer(config: &RelayerConfig) -> Box<dyn CredentialIssuer> {
	Box::new(HmacCredentialIssuer::new(
		&config.api_key,
		&config.api_secret,
		&config.api_passphrase,
		Duration::from_secs(config.credential_ttl_secs),
	))
}
