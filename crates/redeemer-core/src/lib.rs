//! Redemption orchestration.
//!
//! [`RedemptionBuilder`] assembles a [`RedemptionEngine`] from component
//! factories; [`RedemptionEngine::run`] executes a single pass of
//! fetch, filter, approve and redeem.

use redeemer_account::{AccountError, AccountInterface, AccountService};
use redeemer_config::{AccountConfig, Config, InventoryConfig, RelayerConfig};
use redeemer_inventory::{InventoryError, InventoryInterface, InventoryService};
use redeemer_relayer::{CredentialIssuer, RelayerError, RelayerInterface, RelayerService};
use std::sync::Arc;

pub mod engine;
pub mod error;
pub mod event_bus;
pub mod permissions;
pub mod signing;
pub mod submission;

#[cfg(test)]
mod test_support;

pub use engine::{RedemptionEngine, RunOutcome};
pub use error::CoreError;
pub use event_bus::EventBus;
pub use permissions::{PermissionEnsurer, UNLIMITED_ALLOWANCE};
pub use signing::{AuthorizedMessage, MessageSigner, SigningError};
pub use submission::RedemptionSubmitter;

// Type aliases for factory functions
type AccountFactory =
	Box<dyn Fn(&AccountConfig) -> Result<Box<dyn AccountInterface>, AccountError> + Send>;
type InventoryFactory =
	Box<dyn Fn(&InventoryConfig) -> Result<Box<dyn InventoryInterface>, InventoryError> + Send>;
type RelayerFactory =
	Box<dyn Fn(&RelayerConfig) -> Result<Box<dyn RelayerInterface>, RelayerError> + Send>;
type CredentialFactory = Box<dyn Fn(&RelayerConfig) -> Box<dyn CredentialIssuer> + Send>;

/// Builds a [`RedemptionEngine`] from configuration and component factories.
pub struct RedemptionBuilder {
	config: Config,
	account_factory: Option<AccountFactory>,
	inventory_factory: Option<InventoryFactory>,
	relayer_factory: Option<RelayerFactory>,
	credential_factory: Option<CredentialFactory>,
}

impl RedemptionBuilder {
	pub fn new(config: Config) -> Self {
		Self {
			config,
			account_factory: None,
			inventory_factory: None,
			relayer_factory: None,
			credential_factory: None,
		}
	}

	pub fn with_account_factory<F>(mut self, factory: F) -> Self
	where
		F: Fn(&AccountConfig) -> Result<Box<dyn AccountInterface>, AccountError> + Send + 'static,
	{
		self.account_factory = Some(Box::new(factory));
		self
	}

	pub fn with_inventory_factory<F>(mut self, factory: F) -> Self
	where
		F: Fn(&InventoryConfig) -> Result<Box<dyn InventoryInterface>, InventoryError>
			+ Send
			+ 'static,
	{
		self.inventory_factory = Some(Box::new(factory));
		self
	}

	pub fn with_relayer_factory<F>(mut self, factory: F) -> Self
	where
		F: Fn(&RelayerConfig) -> Result<Box<dyn RelayerInterface>, RelayerError> + Send + 'static,
	{
		self.relayer_factory = Some(Box::new(factory));
		self
	}

	pub fn with_credential_factory<F>(mut self, factory: F) -> Self
	where
		F: Fn(&RelayerConfig) -> Box<dyn CredentialIssuer> + Send + 'static,
	{
		self.credential_factory = Some(Box::new(factory));
		self
	}

	pub fn build(self) -> Result<RedemptionEngine, CoreError> {
		let account_provider = self
			.account_factory
			.ok_or_else(|| CoreError::Configuration("Account factory not provided".into()))?(
			&self.config.account,
		)
		.map_err(|e| CoreError::Configuration(format!("Failed to create account: {}", e)))?;
		let account = Arc::new(AccountService::new(account_provider));

		let inventory_provider = self
			.inventory_factory
			.ok_or_else(|| CoreError::Configuration("Inventory factory not provided".into()))?(
			&self.config.inventory,
		)
		.map_err(|e| CoreError::Configuration(format!("Failed to create inventory: {}", e)))?;
		let inventory = Arc::new(InventoryService::new(inventory_provider));

		let relayer_provider = self
			.relayer_factory
			.ok_or_else(|| CoreError::Configuration("Relayer factory not provided".into()))?(
			&self.config.relayer,
		)
		.map_err(|e| CoreError::Configuration(format!("Failed to create relayer: {}", e)))?;
		let relayer = Arc::new(RelayerService::new(relayer_provider));

		let issuer_provider = self
			.credential_factory
			.ok_or_else(|| CoreError::Configuration("Credential factory not provided".into()))?(
			&self.config.relayer,
		);
		let issuer: Arc<dyn CredentialIssuer> = Arc::from(issuer_provider);

		Ok(RedemptionEngine::new(
			self.config,
			account,
			inventory,
			relayer,
			issuer,
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::*;
	use redeemer_account::LocalWallet;
	use redeemer_config::{ChainConfig, RedemptionConfig};
	use redeemer_types::Decimal;
	use serde_json::json;

	fn config() -> Config {
		Config {
			account: AccountConfig {
				private_key: KEY.to_string(),
				funder_address: funder(),
			},
			relayer: RelayerConfig {
				url: "http://relayer.invalid".to_string(),
				api_key: "key".to_string(),
				api_secret: "c2VjcmV0".to_string(),
				api_passphrase: "pass".to_string(),
				timeout_secs: 30,
				credential_ttl_secs: 30,
			},
			inventory: InventoryConfig {
				url: "http://inventory.invalid".to_string(),
				timeout_secs: 30,
			},
			chain: ChainConfig {
				chain_id: 137,
				conditional_tokens_address: ctf(),
				collateral_token_address: usdc(),
			},
			redemption: RedemptionConfig {
				dry_run: true,
				min_redeemable_usd: Decimal::ZERO,
			},
		}
	}

	#[tokio::test]
	async fn test_builder_wires_factories() {
		let engine = RedemptionBuilder::new(config())
			.with_account_factory(|c| Ok(Box::new(LocalWallet::new(&c.private_key)?)))
			.with_inventory_factory(|_| {
				Ok(Box::new(StaticInventory::with_records(vec![json!({
					"conditionId": "0xA", "indexSet": "1", "redeemable": 1
				})])))
			})
			.with_relayer_factory(|_| Ok(Box::new(ScriptedRelayer::default())))
			.with_credential_factory(|_| Box::new(CountingIssuer::default()))
			.build()
			.unwrap();

		let outcome = engine.run().await.unwrap();
		assert!(matches!(outcome, RunOutcome::DryRun { ref positions } if positions.len() == 1));
	}

	#[test]
	fn test_missing_factory_is_configuration_error() {
		let err = RedemptionBuilder::new(config())
			.with_account_factory(|c| Ok(Box::new(LocalWallet::new(&c.private_key)?)))
			.build()
			.err()
			.unwrap();
		assert!(matches!(err, CoreError::Configuration(msg) if msg.contains("Inventory")));
	}

	#[test]
	fn test_factory_failure_is_configuration_error() {
		let err = RedemptionBuilder::new(config())
			.with_account_factory(|_| Err(AccountError::InvalidKey("bad".into())))
			.build()
			.err()
			.unwrap();
		assert!(matches!(err, CoreError::Configuration(msg) if msg.contains("bad")));
	}
}
