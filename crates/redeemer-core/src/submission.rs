//! Redemption submitter.

use crate::permissions::rejection_reason;
use crate::signing::MessageSigner;
use crate::CoreError;
use redeemer_relayer::{RelayerError, RelayerService};
use redeemer_types::{Address, MessagePayload, RedeemableSet, RedemptionRequest, SubmissionResult};
use std::sync::Arc;
use tracing::{info, warn};

/// Submits a whole [`RedeemableSet`] as one signed batch.
pub struct RedemptionSubmitter {
	signer: Arc<MessageSigner>,
	relayer: Arc<RelayerService>,
	chain_id: u64,
}

impl RedemptionSubmitter {
	pub fn new(signer: Arc<MessageSigner>, relayer: Arc<RelayerService>, chain_id: u64) -> Self {
		Self {
			signer,
			relayer,
			chain_id,
		}
	}

	/// Signs and submits one redemption covering every position in `set`.
	///
	/// A refusal by the relayer is reported as a non-accepted result; the
	/// batch is never split. Signing and transport failures are errors.
	pub async fn submit_redemption(
		&self,
		user: Address,
		set: &RedeemableSet,
	) -> Result<SubmissionResult, CoreError> {
		if set.is_empty() {
			return Ok(SubmissionResult::rejected("no positions to redeem"));
		}

		let request = RedemptionRequest::new(user, set);
		let authorized = self
			.signer
			.authorize(MessagePayload::redemption(self.chain_id, &request))
			.await?;

		match self
			.relayer
			.submit(&authorized.message, &authorized.credential)
			.await
		{
			Ok(ack) => {
				info!(positions = set.len(), reference = %ack.reference, "redemption accepted");
				Ok(SubmissionResult::accepted(ack.reference))
			}
			Err(e @ RelayerError::Rejected { .. }) => {
				warn!(positions = set.len(), error = %e, "redemption rejected");
				Ok(SubmissionResult::rejected(rejection_reason(e)))
			}
			Err(e) => Err(CoreError::SubmissionRejected {
				reason: rejection_reason(e),
			}),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::*;
	use redeemer_types::{Decimal, OperationKind, Position};

	fn submitter(relayer: ScriptedRelayer) -> (RedemptionSubmitter, Arc<std::sync::atomic::AtomicUsize>) {
		let (account, signs) = counting_account();
		let signer = Arc::new(MessageSigner::new(account, Arc::new(CountingIssuer::default())));
		(
			RedemptionSubmitter::new(signer, Arc::new(RelayerService::new(Box::new(relayer))), 137),
			signs,
		)
	}

	fn three_positions() -> RedeemableSet {
		[("0xA", "1"), ("0xB", "2"), ("0xC", "1")]
			.into_iter()
			.map(|(c, i)| Position::new(c, i, Decimal::ONE))
			.collect()
	}

	#[tokio::test]
	async fn test_whole_set_in_one_signed_batch() {
		let relayer = ScriptedRelayer::default();
		let calls = relayer.calls.clone();
		let (submitter, signs) = submitter(relayer);

		let result = submitter
			.submit_redemption(funder(), &three_positions())
			.await
			.unwrap();

		assert!(result.accepted);
		assert_eq!(result.relayer_reference, "ref-1");
		assert_eq!(signs.load(Ordering::SeqCst), 1);

		let calls = calls.lock().unwrap();
		assert_eq!(calls.len(), 1);
		assert_eq!(calls[0].kind, OperationKind::RedeemPositions);
		let positions = calls[0].message["positions"].as_array().unwrap();
		assert_eq!(positions.len(), 3);
		assert_eq!(positions[1]["conditionId"], "0xB");
		assert_eq!(positions[1]["indexSet"], "2");
	}

	#[tokio::test]
	async fn test_rejected_batch_reports_reason() {
		let (submitter, _) = submitter(
			ScriptedRelayer::default().rejecting(OperationKind::RedeemPositions, "insufficient balance"),
		);

		let result = submitter
			.submit_redemption(funder(), &three_positions())
			.await
			.unwrap();

		assert!(!result.accepted);
		assert!(result.relayer_reference.is_empty());
		assert_eq!(result.reason.as_deref(), Some("insufficient balance"));
	}

	#[tokio::test]
	async fn test_empty_set_never_signs() {
		let relayer = ScriptedRelayer::default();
		let calls = relayer.calls.clone();
		let (submitter, signs) = submitter(relayer);

		let result = submitter
			.submit_redemption(funder(), &RedeemableSet::new())
			.await
			.unwrap();

		assert!(!result.accepted);
		assert_eq!(signs.load(Ordering::SeqCst), 0);
		assert!(calls.lock().unwrap().is_empty());
	}
}
