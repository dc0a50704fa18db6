//! Wires the production implementations into the engine builder.

use anyhow::{Context, Result};
use redeemer_account::create_account;
use redeemer_config::Config;
use redeemer_core::{RedemptionBuilder, RedemptionEngine};
use redeemer_inventory::create_inventory;
use redeemer_relayer::{create_credential_issuer, create_relayer};

pub fn build_engine(config: Config) -> Result<RedemptionEngine> {
	RedemptionBuilder::new(config)
		.with_account_factory(create_account)
		.with_inventory_factory(create_inventory)
		.with_relayer_factory(create_relayer)
		.with_credential_factory(create_credential_issuer)
		.build()
		.context("Failed to build redemption engine")
}
