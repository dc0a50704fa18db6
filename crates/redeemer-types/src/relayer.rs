//! Relayer credential and submission outcome types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Short-lived authentication attached to a single relayer call.
///
/// A credential is bound to one request and must not be reused; the relayer
/// rejects stale timestamps.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayerCredential {
	pub api_key: String,
	pub passphrase: String,
	/// Issue time in unix milliseconds.
	pub timestamp: i64,
	/// Request signature proving possession of the API secret.
	pub token: String,
	/// Expiry in unix milliseconds.
	pub expires_at: i64,
}

impl RelayerCredential {
	pub fn is_expired_at(&self, now_ms: i64) -> bool {
		now_ms >= self.expires_at
	}
}

impl fmt::Debug for RelayerCredential {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RelayerCredential")
			.field("api_key", &self.api_key)
			.field("passphrase", &"<redacted>")
			.field("timestamp", &self.timestamp)
			.field("token", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Acknowledgment returned by the relayer for an accepted operation.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayerAck {
	/// Relayer-side identifier of the submitted operation.
	pub reference: String,
	/// Raw acknowledgment body.
	pub body: serde_json::Value,
}

/// Outcome of a redemption submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
	pub accepted: bool,
	pub relayer_reference: String,
	pub reason: Option<String>,
}

impl SubmissionResult {
	pub fn accepted(relayer_reference: impl Into<String>) -> Self {
		Self {
			accepted: true,
			relayer_reference: relayer_reference.into(),
			reason: None,
		}
	}

	pub fn rejected(reason: impl Into<String>) -> Self {
		Self {
			accepted: false,
			relayer_reference: String::new(),
			reason: Some(reason.into()),
		}
	}
}
