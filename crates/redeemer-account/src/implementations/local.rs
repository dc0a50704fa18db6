//! Local private-key wallet.

use crate::{AccountError, AccountInterface};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use redeemer_config::AccountConfig;
use redeemer_types::{Address, Signature};

/// Wallet holding its private key in memory.
pub struct LocalWallet {
	signer: PrivateKeySigner,
}

impl LocalWallet {
	/// Creates a wallet from a hex-encoded private key, with or without `0x`.
	pub fn new(private_key_hex: &str) -> Result<Self, AccountError> {
		let signer = private_key_hex
			.parse::<PrivateKeySigner>()
			.map_err(|e| AccountError::InvalidKey(format!("Invalid private key: {}", e)))?;

		Ok(Self { signer })
	}
}

#[async_trait]
impl AccountInterface for LocalWallet {
	async fn address(&self) -> Result<Address, AccountError> {
		Ok(self.signer.address())
	}

	async fn sign_message(&self, message: &[u8]) -> Result<Signature, AccountError> {
		let signature =
			self.signer.sign_message(message).await.map_err(|e| {
				AccountError::SigningFailed(format!("Failed to sign message: {}", e))
			})?;

		Ok(signature.into())
	}
}

/// Builds the signing account from resolved configuration.
pub fn create_account(config: &AccountConfig) -> Result<Box<dyn AccountInterface>, AccountError> {
	Ok(Box::new(LocalWallet::new(&config.private_key)?))
}

#[cfg(test)]
mod tests {
	use super::*;

	// Well-known development key (anvil account 0).
	const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
	const ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

	#[tokio::test]
	async fn test_address_matches_key() {
		let wallet = LocalWallet::new(KEY).unwrap();
		assert_eq!(wallet.address().await.unwrap(), ADDRESS.parse::<Address>().unwrap());
	}

	#[tokio::test]
	async fn test_signature_recovers_to_wallet() {
		let wallet = LocalWallet::new(KEY).unwrap();
		let message = br#"{"kind":"redeemPositions"}"#;

		let signature = wallet.sign_message(message).await.unwrap();
		assert_eq!(signature.0.len(), 65);
		assert_eq!(
			signature.recover_signer(message).unwrap(),
			wallet.address().await.unwrap()
		);
		assert_ne!(
			signature.recover_signer(b"something else").unwrap(),
			wallet.address().await.unwrap()
		);
	}

	#[test]
	fn test_invalid_key_rejected() {
		assert!(matches!(
			LocalWallet::new("0x1234"),
			Err(AccountError::InvalidKey(_))
		));
	}

	#[tokio::test]
	async fn test_create_account_from_config() {
		let config = AccountConfig {
			private_key: KEY.to_string(),
			funder_address: Address::ZERO,
		};
		let account = create_account(&config).unwrap();
		assert_eq!(account.address().await.unwrap(), ADDRESS.parse::<Address>().unwrap());
	}
}
