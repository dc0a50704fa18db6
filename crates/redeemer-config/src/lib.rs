//! Configuration for the redemption orchestrator.
//!
//! A [`Config`] is resolved once at startup from built-in defaults, an
//! optional TOML file and the process environment (highest precedence),
//! then passed explicitly to every component.

use redeemer_types::{Address, ConfigSchema, Decimal};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

mod flag;
mod schema;
mod types;

pub use flag::{parse_flag, FALSY, TRUTHY};
pub use schema::ConfigFileSchema;
pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Missing required setting: {0}")]
	MissingSetting(&'static str),

	#[error("Invalid value for {name}: {message}")]
	InvalidSetting { name: &'static str, message: String },

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Configuration loader layering defaults, file and environment.
pub struct ConfigLoader {
	file_path: Option<PathBuf>,
	env: EnvLookup,
}

impl Default for ConfigLoader {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env: Box::new(|name| std::env::var(name).ok()),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_path_buf());
		self
	}

	/// Replaces the process environment as the override source.
	pub fn with_env<F>(mut self, lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String> + Send + Sync + 'static,
	{
		self.env = Box::new(lookup);
		self
	}

	pub async fn load(&self) -> Result<Config, ConfigError> {
		let mut file = match &self.file_path {
			Some(path) => self.load_from_file(path).await?,
			None => ConfigFile::default(),
		};

		self.apply_env_overrides(&mut file)?;

		resolve(file)
	}

	async fn load_from_file(&self, path: &Path) -> Result<ConfigFile, ConfigError> {
		if !path.exists() {
			return Err(ConfigError::FileNotFound(path.display().to_string()));
		}
		debug!(path = %path.display(), "reading configuration file");
		let content = tokio::fs::read_to_string(path).await?;
		Self::from_toml(&content)
	}

	/// Parses and shape-checks a TOML configuration document.
	pub fn from_toml(content: &str) -> Result<ConfigFile, ConfigError> {
		let value: toml::Value =
			toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

		ConfigFileSchema
			.validate(&value)
			.map_err(|e| ConfigError::ValidationError(e.to_string()))?;

		value
			.try_into()
			.map_err(|e: toml::de::Error| ConfigError::ParseError(e.to_string()))
	}

	/// Looks up an environment value, treating blank values as unset.
	fn var(&self, name: &str) -> Option<String> {
		(self.env)(name)
			.map(|v| v.trim().to_string())
			.filter(|v| !v.is_empty())
	}

	fn apply_env_overrides(&self, file: &mut ConfigFile) -> Result<(), ConfigError> {
		let strings: [(&str, &mut Option<String>); 9] = [
			("PRIVATE_KEY", &mut file.account.private_key),
			("FUNDER_ADDRESS", &mut file.account.funder_address),
			("CLOB_API_KEY", &mut file.relayer.api_key),
			("CLOB_API_SECRET", &mut file.relayer.api_secret),
			("CLOB_API_PASSPHRASE", &mut file.relayer.api_passphrase),
			("RELAYER_URL", &mut file.relayer.url),
			("DATA_API_URL", &mut file.inventory.url),
			(
				"CONDITIONAL_TOKENS_ADDRESS",
				&mut file.chain.conditional_tokens_address,
			),
			(
				"COLLATERAL_TOKEN_ADDRESS",
				&mut file.chain.collateral_token_address,
			),
		];
		for (name, slot) in strings {
			if let Some(value) = self.var(name) {
				debug!(setting = name, "overriding from environment");
				*slot = Some(value);
			}
		}

		let numbers: [(&'static str, &mut Option<u64>); 4] = [
			("CHAIN_ID", &mut file.chain.chain_id),
			("INVENTORY_TIMEOUT_SECS", &mut file.inventory.timeout_secs),
			("RELAYER_TIMEOUT_SECS", &mut file.relayer.timeout_secs),
			("CREDENTIAL_TTL_SECS", &mut file.relayer.credential_ttl_secs),
		];
		for (name, slot) in numbers {
			if let Some(value) = self.var(name) {
				let parsed = value.parse().map_err(|e| ConfigError::InvalidSetting {
					name,
					message: format!("'{}' is not an unsigned integer: {}", value, e),
				})?;
				*slot = Some(parsed);
			}
		}

		if let Some(value) = self.var("DRY_RUN") {
			let parsed = parse_flag(&value).ok_or_else(|| ConfigError::InvalidSetting {
				name: "DRY_RUN",
				message: format!(
					"'{}' is not one of {} or {}",
					value,
					TRUTHY.join("/"),
					FALSY.join("/")
				),
			})?;
			file.redemption.dry_run = Some(parsed);
		}

		if let Some(value) = self.var("MIN_REDEEMABLE_USD") {
			let parsed = value.parse().map_err(|e| ConfigError::InvalidSetting {
				name: "MIN_REDEEMABLE_USD",
				message: format!("'{}' is not a number: {}", value, e),
			})?;
			file.redemption.min_redeemable_usd = Some(parsed);
		}

		Ok(())
	}
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
	value
		.filter(|v| !v.trim().is_empty())
		.ok_or(ConfigError::MissingSetting(name))
}

fn parse_address(value: &str, name: &'static str) -> Result<Address, ConfigError> {
	value
		.trim()
		.parse()
		.map_err(|e| ConfigError::InvalidSetting {
			name,
			message: format!("'{}' is not a valid address: {}", value, e),
		})
}

fn check_url(value: String, name: &'static str) -> Result<String, ConfigError> {
	if value.starts_with("http://") || value.starts_with("https://") {
		Ok(value)
	} else {
		Err(ConfigError::InvalidSetting {
			name,
			message: format!("'{}' must start with http:// or https://", value),
		})
	}
}

fn normalize_private_key(value: String) -> Result<String, ConfigError> {
	let digits = schema::private_key_digits(&value).ok_or_else(|| ConfigError::InvalidSetting {
		name: "PRIVATE_KEY",
		message: "expected 32 bytes of hex".to_string(),
	})?;
	Ok(format!("0x{}", digits))
}

fn positive(value: Option<u64>, default: u64, name: &'static str) -> Result<u64, ConfigError> {
	match value.unwrap_or(default) {
		0 => Err(ConfigError::InvalidSetting {
			name,
			message: "must be greater than zero".to_string(),
		}),
		v => Ok(v),
	}
}

/// Applies defaults and validates a fully overlaid file into a [`Config`].
fn resolve(file: ConfigFile) -> Result<Config, ConfigError> {
	let ConfigFile {
		account,
		relayer,
		inventory,
		chain,
		redemption,
	} = file;

	let private_key = normalize_private_key(required(account.private_key, "PRIVATE_KEY")?)?;
	let funder_address = parse_address(
		&required(account.funder_address, "FUNDER_ADDRESS")?,
		"FUNDER_ADDRESS",
	)?;

	let relayer = RelayerConfig {
		api_key: required(relayer.api_key, "CLOB_API_KEY")?,
		api_secret: required(relayer.api_secret, "CLOB_API_SECRET")?,
		api_passphrase: required(relayer.api_passphrase, "CLOB_API_PASSPHRASE")?,
		url: check_url(
			relayer.url.unwrap_or_else(|| DEFAULT_RELAYER_URL.to_string()),
			"RELAYER_URL",
		)?,
		timeout_secs: positive(
			relayer.timeout_secs,
			DEFAULT_TIMEOUT_SECS,
			"RELAYER_TIMEOUT_SECS",
		)?,
		credential_ttl_secs: positive(
			relayer.credential_ttl_secs,
			DEFAULT_CREDENTIAL_TTL_SECS,
			"CREDENTIAL_TTL_SECS",
		)?,
	};

	let inventory = InventoryConfig {
		url: check_url(
			inventory
				.url
				.unwrap_or_else(|| DEFAULT_INVENTORY_URL.to_string()),
			"DATA_API_URL",
		)?,
		timeout_secs: positive(
			inventory.timeout_secs,
			DEFAULT_TIMEOUT_SECS,
			"INVENTORY_TIMEOUT_SECS",
		)?,
	};

	let chain = ChainConfig {
		chain_id: positive(chain.chain_id, DEFAULT_CHAIN_ID, "CHAIN_ID")?,
		conditional_tokens_address: parse_address(
			chain
				.conditional_tokens_address
				.as_deref()
				.unwrap_or(DEFAULT_CONDITIONAL_TOKENS),
			"CONDITIONAL_TOKENS_ADDRESS",
		)?,
		collateral_token_address: parse_address(
			chain
				.collateral_token_address
				.as_deref()
				.unwrap_or(DEFAULT_COLLATERAL_TOKEN),
			"COLLATERAL_TOKEN_ADDRESS",
		)?,
	};

	let min_redeemable_usd = redemption.min_redeemable_usd.unwrap_or(Decimal::ZERO);
	if min_redeemable_usd < Decimal::ZERO {
		return Err(ConfigError::InvalidSetting {
			name: "MIN_REDEEMABLE_USD",
			message: format!("{} must not be negative", min_redeemable_usd),
		});
	}

	Ok(Config {
		account: AccountConfig {
			private_key,
			funder_address,
		},
		relayer,
		inventory,
		chain,
		redemption: RedemptionConfig {
			dry_run: redemption.dry_run.unwrap_or(false),
			min_redeemable_usd,
		},
	})
}
