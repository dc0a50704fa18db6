//! Configuration value types.

use redeemer_types::{Address, Decimal};
use serde::Deserialize;
use std::fmt;

pub const DEFAULT_CHAIN_ID: u64 = 137;
pub const DEFAULT_RELAYER_URL: &str = "https://relayer.polymarket.com";
pub const DEFAULT_INVENTORY_URL: &str = "https://data-api.polymarket.com";
pub const DEFAULT_CONDITIONAL_TOKENS: &str = "0x4D97DCd97eC945f40cF65F87097ACe5EA0476045";
pub const DEFAULT_COLLATERAL_TOKEN: &str = "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CREDENTIAL_TTL_SECS: u64 = 30;

const REDACTED: &str = "<redacted>";

/// Fully resolved, validated configuration for one run.
#[derive(Clone, Debug)]
pub struct Config {
	pub account: AccountConfig,
	pub relayer: RelayerConfig,
	pub inventory: InventoryConfig,
	pub chain: ChainConfig,
	pub redemption: RedemptionConfig,
}

#[derive(Clone)]
pub struct AccountConfig {
	/// Hex private key, always `0x`-prefixed.
	pub private_key: String,
	pub funder_address: Address,
}

impl fmt::Debug for AccountConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AccountConfig")
			.field("private_key", &REDACTED)
			.field("funder_address", &self.funder_address)
			.finish()
	}
}

#[derive(Clone)]
pub struct RelayerConfig {
	pub url: String,
	pub api_key: String,
	pub api_secret: String,
	pub api_passphrase: String,
	pub timeout_secs: u64,
	pub credential_ttl_secs: u64,
}

impl fmt::Debug for RelayerConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RelayerConfig")
			.field("url", &self.url)
			.field("api_key", &self.api_key)
			.field("api_secret", &REDACTED)
			.field("api_passphrase", &REDACTED)
			.field("timeout_secs", &self.timeout_secs)
			.field("credential_ttl_secs", &self.credential_ttl_secs)
			.finish()
	}
}

#[derive(Clone, Debug)]
pub struct InventoryConfig {
	pub url: String,
	pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ChainConfig {
	pub chain_id: u64,
	pub conditional_tokens_address: Address,
	pub collateral_token_address: Address,
}

#[derive(Clone, Debug)]
pub struct RedemptionConfig {
	pub dry_run: bool,
	pub min_redeemable_usd: Decimal,
}

/// Partially specified configuration as read from a TOML file and then
/// overlaid with environment values. Every field is optional until
/// [`crate::ConfigLoader`] resolves it.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
	pub account: AccountSection,
	pub relayer: RelayerSection,
	pub inventory: InventorySection,
	pub chain: ChainSection,
	pub redemption: RedemptionSection,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccountSection {
	pub private_key: Option<String>,
	pub funder_address: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelayerSection {
	pub url: Option<String>,
	pub api_key: Option<String>,
	pub api_secret: Option<String>,
	pub api_passphrase: Option<String>,
	pub timeout_secs: Option<u64>,
	pub credential_ttl_secs: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InventorySection {
	pub url: Option<String>,
	pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChainSection {
	pub chain_id: Option<u64>,
	pub conditional_tokens_address: Option<String>,
	pub collateral_token_address: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RedemptionSection {
	pub dry_run: Option<bool>,
	pub min_redeemable_usd: Option<Decimal>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_debug_redacts_secrets() {
		let account = AccountConfig {
			private_key: "0xdeadbeef".to_string(),
			funder_address: Address::ZERO,
		};
		let relayer = RelayerConfig {
			url: DEFAULT_RELAYER_URL.to_string(),
			api_key: "key-1".to_string(),
			api_secret: "c2VjcmV0".to_string(),
			api_passphrase: "hunter2".to_string(),
			timeout_secs: 30,
			credential_ttl_secs: 30,
		};

		let rendered = format!("{:?} {:?}", account, relayer);
		assert!(!rendered.contains("deadbeef"));
		assert!(!rendered.contains("c2VjcmV0"));
		assert!(!rendered.contains("hunter2"));
		assert!(rendered.contains("key-1"));
	}
}
