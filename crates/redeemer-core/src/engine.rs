//! Redemption orchestrator.
//!
//! A run walks `Start -> FetchedInventory -> Filtered` and then either stops
//! at `DryRunReport` or continues through `PermissionsGranted` and
//! `Submitted` to `Done`. Any failure aborts the rest of the run. Approvals
//! already granted stay granted.

use crate::event_bus::EventBus;
use crate::permissions::{PermissionEnsurer, UNLIMITED_ALLOWANCE};
use crate::signing::MessageSigner;
use crate::submission::RedemptionSubmitter;
use crate::CoreError;
use redeemer_account::AccountService;
use redeemer_config::Config;
use redeemer_inventory::{InventoryService, RedeemabilityFilter};
use redeemer_relayer::{CredentialIssuer, RelayerService};
use redeemer_types::{
	AuthorizationKind, RedeemableSet, RedemptionEvent, RunStage, SubmissionResult,
};
use std::sync::Arc;
use tracing::{debug, error, info};

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
	/// No position passed the filter. Nothing was signed or submitted.
	NothingToRedeem,
	/// Dry run: these positions would have been redeemed.
	DryRun { positions: RedeemableSet },
	/// Approvals granted and the batch accepted by the relayer.
	Redeemed {
		positions: RedeemableSet,
		result: SubmissionResult,
	},
}

pub struct RedemptionEngine {
	config: Config,
	inventory: Arc<InventoryService>,
	filter: RedeemabilityFilter,
	permissions: PermissionEnsurer,
	submitter: RedemptionSubmitter,
	event_bus: EventBus,
}

fn advance(stage: &mut RunStage, next: RunStage) {
	debug!(from = %stage, to = %next, "stage transition");
	*stage = next;
}

impl RedemptionEngine {
	pub fn new(
		config: Config,
		account: Arc<AccountService>,
		inventory: Arc<InventoryService>,
		relayer: Arc<RelayerService>,
		issuer: Arc<dyn CredentialIssuer>,
	) -> Self {
		let chain_id = config.chain.chain_id;
		let signer = Arc::new(MessageSigner::new(account, issuer));

		Self {
			filter: RedeemabilityFilter::new(config.redemption.min_redeemable_usd),
			permissions: PermissionEnsurer::new(signer.clone(), relayer.clone(), chain_id),
			submitter: RedemptionSubmitter::new(signer, relayer, chain_id),
			inventory,
			config,
			event_bus: EventBus::new(64),
		}
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn event_bus(&self) -> &EventBus {
		&self.event_bus
	}

	fn publish(&self, event: RedemptionEvent) {
		self.event_bus.publish(event).ok();
	}

	/// Executes one run.
	pub async fn run(&self) -> Result<RunOutcome, CoreError> {
		let mut stage = RunStage::Start;
		let result = self.execute(&mut stage).await;

		match &result {
			Ok(_) => self.publish(RedemptionEvent::Completed),
			Err(e) => {
				error!(%stage, error = %e, "run aborted");
				self.publish(RedemptionEvent::Aborted {
					stage,
					reason: e.to_string(),
				});
			}
		}

		result
	}

	async fn execute(&self, stage: &mut RunStage) -> Result<RunOutcome, CoreError> {
		let funder = self.config.account.funder_address;
		let conditional_tokens = self.config.chain.conditional_tokens_address;
		let collateral = self.config.chain.collateral_token_address;

		info!(%funder, "fetching position inventory");
		let records = self
			.inventory
			.fetch_positions(&funder)
			.await
			.map_err(CoreError::InventoryUnavailable)?;
		advance(stage, RunStage::FetchedInventory);
		self.publish(RedemptionEvent::InventoryFetched {
			records: records.len(),
		});

		let positions = self.filter.filter(&records);
		advance(stage, RunStage::Filtered);
		info!(
			records = records.len(),
			eligible = positions.len(),
			min_value = %self.filter.min_value(),
			"filtered inventory"
		);
		self.publish(RedemptionEvent::PositionsFiltered {
			eligible: positions.len(),
		});

		if positions.is_empty() {
			info!("nothing to redeem");
			advance(stage, RunStage::Done);
			return Ok(RunOutcome::NothingToRedeem);
		}

		if self.config.redemption.dry_run {
			for position in &positions {
				info!(
					condition_id = %position.condition_id,
					index_set = %position.index_set,
					amount = %position.redeemable_amount,
					"dry run: would redeem"
				);
			}
			info!(
				operator = %conditional_tokens,
				token = %collateral,
				total = %positions.total_amount(),
				"dry run: would grant operator and token approvals and submit one batch"
			);
			advance(stage, RunStage::DryRunReport);
			self.publish(RedemptionEvent::DryRunReported {
				positions: positions.len(),
			});
			return Ok(RunOutcome::DryRun { positions });
		}

		let ack = self
			.permissions
			.ensure_operator_approval(funder, conditional_tokens)
			.await?;
		self.publish(RedemptionEvent::PermissionGranted {
			kind: AuthorizationKind::OperatorApproval,
			reference: ack.reference,
		});

		let ack = self
			.permissions
			.ensure_token_approval(funder, collateral, conditional_tokens, UNLIMITED_ALLOWANCE)
			.await?;
		self.publish(RedemptionEvent::PermissionGranted {
			kind: AuthorizationKind::TokenApproval,
			reference: ack.reference,
		});
		advance(stage, RunStage::PermissionsGranted);

		let result = self
			.submitter
			.submit_redemption(funder, &positions)
			.await?;
		self.publish(RedemptionEvent::RedemptionSubmitted {
			result: result.clone(),
		});

		if !result.accepted {
			return Err(CoreError::SubmissionRejected {
				reason: result.reason.unwrap_or_default(),
			});
		}

		advance(stage, RunStage::Submitted);
		info!(
			positions = positions.len(),
			reference = %result.relayer_reference,
			"redemption submitted"
		);
		advance(stage, RunStage::Done);

		Ok(RunOutcome::Redeemed { positions, result })
	}
}
