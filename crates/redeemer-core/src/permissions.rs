//! Permission ensurer.
//!
//! Grants the operator approval and the collateral allowance that the
//! relayer needs before it can redeem. Grants are re-issued on every run
//! rather than queried first; the relayer treats an already active approval
//! as a no-op.

use crate::signing::MessageSigner;
use crate::CoreError;
use redeemer_relayer::{RelayerError, RelayerService};
use redeemer_types::{Address, AuthorizationRequest, MessagePayload, RelayerAck, U256};
use std::sync::Arc;
use tracing::{info, warn};

/// Allowance requested for the collateral token.
pub const UNLIMITED_ALLOWANCE: U256 = U256::MAX;

pub struct PermissionEnsurer {
	signer: Arc<MessageSigner>,
	relayer: Arc<RelayerService>,
	chain_id: u64,
}

/// Reason text for a relayer failure. Rejections carry the relayer's raw
/// payload.
pub(crate) fn rejection_reason(error: RelayerError) -> String {
	match error {
		RelayerError::Rejected { body, .. } => body,
		other => other.to_string(),
	}
}

impl PermissionEnsurer {
	pub fn new(signer: Arc<MessageSigner>, relayer: Arc<RelayerService>, chain_id: u64) -> Self {
		Self {
			signer,
			relayer,
			chain_id,
		}
	}

	/// Lets `operator` move the conditional-token positions of `owner`.
	pub async fn ensure_operator_approval(
		&self,
		owner: Address,
		operator: Address,
	) -> Result<RelayerAck, CoreError> {
		self.grant(AuthorizationRequest::operator_approval(owner, operator))
			.await
	}

	/// Lets `spender` move `amount` of `token` on behalf of `owner`.
	pub async fn ensure_token_approval(
		&self,
		owner: Address,
		token: Address,
		spender: Address,
		amount: U256,
	) -> Result<RelayerAck, CoreError> {
		if amount == UNLIMITED_ALLOWANCE {
			info!(%token, %spender, "requesting unlimited allowance");
		}
		self.grant(AuthorizationRequest::token_approval(owner, token, spender, amount))
			.await
	}

	async fn grant(&self, request: AuthorizationRequest) -> Result<RelayerAck, CoreError> {
		let kind = request.kind;
		let authorized = self
			.signer
			.authorize(MessagePayload::authorization(self.chain_id, &request))
			.await?;

		match self
			.relayer
			.submit(&authorized.message, &authorized.credential)
			.await
		{
			Ok(ack) => {
				info!(%kind, reference = %ack.reference, "permission granted");
				Ok(ack)
			}
			Err(e) => {
				warn!(%kind, error = %e, "relayer refused permission");
				Err(CoreError::PermissionRejected {
					kind,
					reason: rejection_reason(e),
				})
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::*;
	use redeemer_types::{AuthorizationKind, OperationKind};

	fn ensurer(relayer: ScriptedRelayer) -> (PermissionEnsurer, Arc<CountingIssuer>) {
		let (account, _) = counting_account();
		let issuer = Arc::new(CountingIssuer::default());
		let signer = Arc::new(MessageSigner::new(account, issuer.clone()));
		(
			PermissionEnsurer::new(signer, Arc::new(RelayerService::new(Box::new(relayer))), 137),
			issuer,
		)
	}

	#[tokio::test]
	async fn test_operator_approval_payload() {
		let relayer = ScriptedRelayer::default();
		let calls = relayer.calls.clone();
		let (ensurer, _) = ensurer(relayer);

		ensurer.ensure_operator_approval(funder(), ctf()).await.unwrap();

		let calls = calls.lock().unwrap();
		assert_eq!(calls.len(), 1);
		assert_eq!(calls[0].kind, OperationKind::OperatorApproval);
		assert_eq!(calls[0].message["extra"]["approved"], true);
		assert_eq!(
			calls[0].message["target"].as_str().unwrap().parse::<Address>().unwrap(),
			ctf()
		);
	}

	#[tokio::test]
	async fn test_token_approval_requests_unlimited_allowance() {
		let relayer = ScriptedRelayer::default();
		let calls = relayer.calls.clone();
		let (ensurer, _) = ensurer(relayer);

		ensurer
			.ensure_token_approval(funder(), usdc(), ctf(), UNLIMITED_ALLOWANCE)
			.await
			.unwrap();

		let calls = calls.lock().unwrap();
		assert_eq!(
			calls[0].message["extra"]["amount"],
			"115792089237316195423570985008687907853269984665640564039457584007913129639935"
		);
	}

	#[tokio::test]
	async fn test_reissuing_is_not_an_error() {
		let relayer = ScriptedRelayer::default();
		let calls = relayer.calls.clone();
		let (ensurer, issuer) = ensurer(relayer);

		ensurer.ensure_operator_approval(funder(), ctf()).await.unwrap();
		ensurer.ensure_operator_approval(funder(), ctf()).await.unwrap();

		assert_eq!(calls.lock().unwrap().len(), 2);
		assert_eq!(issuer.issued(), 2);
	}

	#[tokio::test]
	async fn test_rejection_carries_raw_reason() {
		let (ensurer, _) = ensurer(
			ScriptedRelayer::default().rejecting(OperationKind::TokenApproval, "{\"error\":\"no\"}"),
		);

		let err = ensurer
			.ensure_token_approval(funder(), usdc(), ctf(), UNLIMITED_ALLOWANCE)
			.await
			.unwrap_err();
		assert!(matches!(
			err,
			CoreError::PermissionRejected { kind: AuthorizationKind::TokenApproval, ref reason }
				if reason == "{\"error\":\"no\"}"
		));
	}
}
