//! Human-readable run summaries written to stdout.

use redeemer_config::Config;
use redeemer_core::RunOutcome;
use redeemer_types::RedeemableSet;
use std::fmt::Write;

fn list_positions(out: &mut String, positions: &RedeemableSet) {
	for position in positions {
		let _ = writeln!(
			out,
			"  {} / {}  ({})",
			position.condition_id, position.index_set, position.redeemable_amount
		);
	}
}

pub fn render_outcome(outcome: &RunOutcome) -> String {
	let mut out = String::new();
	match outcome {
		RunOutcome::NothingToRedeem => {
			out.push_str("Nothing to redeem.\n");
		}
		RunOutcome::DryRun { positions } => {
			let _ = writeln!(
				out,
				"Dry run: {} position(s) would be redeemed (total {}).",
				positions.len(),
				positions.total_amount()
			);
			list_positions(&mut out, positions);
		}
		RunOutcome::Redeemed { positions, result } => {
			let _ = writeln!(
				out,
				"Redeemed {} position(s) (total {}). Relayer reference: {}",
				positions.len(),
				positions.total_amount(),
				result.relayer_reference
			);
			list_positions(&mut out, positions);
		}
	}
	out
}

/// Effective settings with secrets left out.
pub fn render_config(config: &Config) -> String {
	let mut out = String::new();
	let _ = writeln!(out, "funder address:       {}", config.account.funder_address);
	let _ = writeln!(out, "chain id:             {}", config.chain.chain_id);
	let _ = writeln!(out, "relayer url:          {}", config.relayer.url);
	let _ = writeln!(out, "relayer api key:      {}", config.relayer.api_key);
	let _ = writeln!(out, "inventory url:        {}", config.inventory.url);
	let _ = writeln!(
		out,
		"conditional tokens:   {}",
		config.chain.conditional_tokens_address
	);
	let _ = writeln!(
		out,
		"collateral token:     {}",
		config.chain.collateral_token_address
	);
	let _ = writeln!(out, "dry run:              {}", config.redemption.dry_run);
	let _ = writeln!(
		out,
		"min redeemable usd:   {}",
		config.redemption.min_redeemable_usd
	);
	out
}
