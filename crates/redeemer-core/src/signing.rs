//! Message and signing layer.
//!
//! Builds the canonical encoding of a payload, has the account sign exactly
//! those bytes, checks the result, and pairs it with a credential issued for
//! the single relayer call it will travel on.

use redeemer_account::{AccountError, AccountService};
use redeemer_relayer::{CredentialIssuer, RelayerError};
use redeemer_types::{MessagePayload, RelayerCredential, SignedMessage};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SigningError {
	#[error("Failed to encode payload: {0}")]
	Encoding(#[from] serde_json::Error),
	#[error("Account error: {0}")]
	Account(#[from] AccountError),
	/// The signature does not bind the payload that would be submitted.
	#[error("Signed payload mismatch: {0}")]
	PayloadMismatch(String),
	#[error("Failed to issue relayer credential: {0}")]
	Credential(#[source] RelayerError),
}

/// A signed message ready for exactly one relayer call.
#[derive(Debug, Clone)]
pub struct AuthorizedMessage {
	pub message: SignedMessage,
	pub credential: RelayerCredential,
}

pub struct MessageSigner {
	account: Arc<AccountService>,
	issuer: Arc<dyn CredentialIssuer>,
}

impl MessageSigner {
	pub fn new(account: Arc<AccountService>, issuer: Arc<dyn CredentialIssuer>) -> Self {
		Self { account, issuer }
	}

	/// Signs the canonical encoding of `payload`.
	pub async fn sign(&self, payload: MessagePayload) -> Result<SignedMessage, SigningError> {
		let encoded = payload.encode()?;
		let signer = self.account.get_address().await?;
		let signature = self.account.sign(encoded.as_bytes()).await?;

		let message = SignedMessage::new(payload, encoded, signature, signer);
		verify_binding(&message)?;

		debug!(kind = %message.kind(), %signer, "payload signed");
		Ok(message)
	}

	/// Signs `payload` and obtains a fresh credential for submitting it.
	///
	/// Nothing is cached: every call signs again and issues a new credential.
	pub async fn authorize(
		&self,
		payload: MessagePayload,
	) -> Result<AuthorizedMessage, SigningError> {
		let message = self.sign(payload).await?;
		let credential = self
			.issuer
			.issue(&message)
			.await
			.map_err(SigningError::Credential)?;

		Ok(AuthorizedMessage {
			message,
			credential,
		})
	}
}

/// Checks that `message` is internally consistent: re-encoding the payload
/// reproduces the signed bytes, and the signature over those bytes recovers
/// to the recorded signer.
pub fn verify_binding(message: &SignedMessage) -> Result<(), SigningError> {
	if message.payload().encode()? != message.encoded() {
		return Err(SigningError::PayloadMismatch(
			"payload encoding differs from signed bytes".to_string(),
		));
	}

	let recovered = message
		.signature()
		.recover_signer(message.encoded().as_bytes())
		.map_err(|e| SigningError::PayloadMismatch(format!("unrecoverable signature: {}", e)))?;

	if recovered != message.signer() {
		return Err(SigningError::PayloadMismatch(format!(
			"signature recovers to {} but signer is {}",
			recovered,
			message.signer()
		)));
	}

	Ok(())
}
