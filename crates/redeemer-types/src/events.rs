//! Run stages and the audit events published while a run progresses.

use crate::{AuthorizationKind, SubmissionResult};
use std::fmt;

/// Stages of a single redemption run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStage {
	Start,
	FetchedInventory,
	Filtered,
	DryRunReport,
	PermissionsGranted,
	Submitted,
	Done,
}

impl fmt::Display for RunStage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			RunStage::Start => "start",
			RunStage::FetchedInventory => "fetched-inventory",
			RunStage::Filtered => "filtered",
			RunStage::DryRunReport => "dry-run-report",
			RunStage::PermissionsGranted => "permissions-granted",
			RunStage::Submitted => "submitted",
			RunStage::Done => "done",
		};
		f.write_str(name)
	}
}

/// Audit trail entries emitted by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum RedemptionEvent {
	InventoryFetched {
		records: usize,
	},
	PositionsFiltered {
		eligible: usize,
	},
	DryRunReported {
		positions: usize,
	},
	PermissionGranted {
		kind: AuthorizationKind,
		reference: String,
	},
	RedemptionSubmitted {
		result: SubmissionResult,
	},
	/// The run stopped at `stage`. Earlier side effects are left in place.
	Aborted {
		stage: RunStage,
		reason: String,
	},
	Completed,
}
