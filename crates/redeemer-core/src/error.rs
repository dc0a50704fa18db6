use redeemer_inventory::InventoryError;
use redeemer_types::AuthorizationKind;
use thiserror::Error;

use crate::signing::SigningError;

/// Failures that end a run. None of them are retried.
#[derive(Error, Debug)]
pub enum CoreError {
	#[error("Configuration error: {0}")]
	Configuration(String),

	#[error("Inventory unavailable: {0}")]
	InventoryUnavailable(#[source] InventoryError),

	#[error("Relayer rejected {kind}: {reason}")]
	PermissionRejected {
		kind: AuthorizationKind,
		reason: String,
	},

	#[error("Relayer rejected redemption batch: {reason}")]
	SubmissionRejected { reason: String },

	#[error("Signing error: {0}")]
	Signing(#[from] SigningError),
}
