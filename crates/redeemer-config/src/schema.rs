//! Shape validation for the TOML configuration file.

use redeemer_types::{ConfigSchema, Field, FieldType, Schema, ValidationError};

/// Returns the hex digits of a private key, or `None` unless the value is
/// 32 bytes of hex with an optional `0x` prefix.
pub(crate) fn private_key_digits(value: &str) -> Option<&str> {
	let trimmed = value.trim();
	let digits = trimmed
		.strip_prefix("0x")
		.or_else(|| trimmed.strip_prefix("0X"))
		.unwrap_or(trimmed);

	(digits.len() == 64 && digits.chars().all(|c| c.is_ascii_hexdigit())).then_some(digits)
}

/// Schema for the optional configuration file. Every section and key is
/// optional; required settings are enforced after environment overrides.
pub struct ConfigFileSchema;

impl ConfigFileSchema {
	fn schema() -> Schema {
		let timeout = || FieldType::Integer {
			min: Some(1),
			max: Some(600),
		};

		Schema::new(
			vec![],
			vec![
				Field::new(
					"account",
					FieldType::Table(Schema::new(
						vec![],
						vec![
							Field::new("private_key", FieldType::String).with_validator(|v| {
								match v.as_str().and_then(private_key_digits) {
									Some(_) => Ok(()),
									None => Err("expected 32 bytes of hex".to_string()),
								}
							}),
							Field::new("funder_address", FieldType::Address),
						],
					)),
				),
				Field::new(
					"relayer",
					FieldType::Table(Schema::new(
						vec![],
						vec![
							Field::new("url", FieldType::HttpUrl),
							Field::new("api_key", FieldType::String),
							Field::new("api_secret", FieldType::String),
							Field::new("api_passphrase", FieldType::String),
							Field::new("timeout_secs", timeout()),
							Field::new("credential_ttl_secs", timeout()),
						],
					)),
				),
				Field::new(
					"inventory",
					FieldType::Table(Schema::new(
						vec![],
						vec![
							Field::new("url", FieldType::HttpUrl),
							Field::new("timeout_secs", timeout()),
						],
					)),
				),
				Field::new(
					"chain",
					FieldType::Table(Schema::new(
						vec![],
						vec![
							Field::new(
								"chain_id",
								FieldType::Integer {
									min: Some(1),
									max: None,
								},
							),
							Field::new("conditional_tokens_address", FieldType::Address),
							Field::new("collateral_token_address", FieldType::Address),
						],
					)),
				),
				Field::new(
					"redemption",
					FieldType::Table(Schema::new(
						vec![],
						vec![
							Field::new("dry_run", FieldType::Boolean),
							Field::new("min_redeemable_usd", FieldType::Number { min: Some(0.0) }),
						],
					)),
				),
			],
		)
	}
}

impl ConfigSchema for ConfigFileSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Self::schema().validate(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn account(key: &str) -> toml::Value {
		toml::from_str(&format!("[account]\nprivate_key = \"{}\"", key)).unwrap()
	}

	#[test]
	fn test_private_key_format_checked() {
		let key = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

		assert!(ConfigFileSchema.validate(&account(key)).is_ok());
		assert!(ConfigFileSchema.validate(&account(&format!("0x{}", key))).is_ok());

		let err = ConfigFileSchema.validate(&account("0x1234")).unwrap_err();
		assert!(err.to_string().contains("account.private_key"));
		assert!(ConfigFileSchema.validate(&account(&format!("{}zz", &key[..62]))).is_err());
	}

	#[test]
	fn test_private_key_digits() {
		let key = "AC0974BEC39A17E36BA4A6B4D238FF944BACB478CBED5EFCAE784D7BF4F2FF80";
		assert_eq!(private_key_digits(&format!(" 0X{} ", key)), Some(key));
		assert_eq!(private_key_digits(""), None);
	}
}
