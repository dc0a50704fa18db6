//! Relayer transport and per-call credential issuance.
//!
//! Every mutating operation goes to the relayer as a
//! `{ message, signature, relayerAuth }` triple. The credential in
//! `relayerAuth` is issued for exactly one call.

use async_trait::async_trait;
use redeemer_types::{OperationKind, RelayerAck, RelayerCredential, SignedMessage};
use thiserror::Error;

pub mod auth;
pub mod implementations {
	pub mod http;
}

pub use auth::{create_credential_issuer, CredentialIssuer, HmacCredentialIssuer};
pub use implementations::http::{create_relayer, HttpRelayer};

#[derive(Debug, Error)]
pub enum RelayerError {
	/// The relayer answered but refused the operation. `body` is the raw
	/// rejection payload.
	#[error("Relayer rejected request with status {status}: {body}")]
	Rejected { status: u16, body: String },
	#[error("Relayer request timed out")]
	Timeout,
	#[error("Network error: {0}")]
	Network(String),
	#[error("Invalid relayer response: {0}")]
	InvalidResponse(String),
	#[error("Credential error: {0}")]
	Credential(String),
}

/// Request path for each operation, relative to the relayer base URL.
pub fn operation_path(kind: OperationKind) -> &'static str {
	match kind {
		OperationKind::OperatorApproval => "/approvals/operator",
		OperationKind::TokenApproval => "/approvals/token",
		OperationKind::RedeemPositions => "/redeem",
	}
}

#[async_trait]
pub trait RelayerInterface: Send + Sync {
	/// Submits a signed message. The operation kind is taken from the
	/// message payload.
	async fn submit(
		&self,
		message: &SignedMessage,
		credential: &RelayerCredential,
	) -> Result<RelayerAck, RelayerError>;
}

pub struct RelayerService {
	provider: Box<dyn RelayerInterface>,
}

impl RelayerService {
	pub fn new(provider: Box<dyn RelayerInterface>) -> Self {
		Self { provider }
	}

	pub async fn submit(
		&self,
		message: &SignedMessage,
		credential: &RelayerCredential,
	) -> Result<RelayerAck, RelayerError> {
		self.provider.submit(message, credential).await
	}
}
