//! Position inventory access and redeemability filtering.

use async_trait::async_trait;
use redeemer_types::Address;
use serde_json::Value;
use thiserror::Error;

pub mod filter;
pub mod implementations {
	pub mod data_api;
}

pub use filter::RedeemabilityFilter;
pub use implementations::data_api::{create_inventory, DataApiInventory};

#[derive(Debug, Error)]
pub enum InventoryError {
	#[error("Inventory request timed out")]
	Timeout,
	#[error("Network error: {0}")]
	Network(String),
	#[error("Inventory service returned status {status}: {body}")]
	Status { status: u16, body: String },
	#[error("Malformed inventory response: {0}")]
	Malformed(String),
}

/// Source of raw position records for an account.
///
/// Records are returned as loosely-typed JSON; normalization is the job of
/// [`RedeemabilityFilter`].
#[async_trait]
pub trait InventoryInterface: Send + Sync {
	async fn fetch_positions(&self, user: &Address) -> Result<Vec<Value>, InventoryError>;
}

pub struct InventoryService {
	provider: Box<dyn InventoryInterface>,
}

impl InventoryService {
	pub fn new(provider: Box<dyn InventoryInterface>) -> Self {
		Self { provider }
	}

	pub async fn fetch_positions(&self, user: &Address) -> Result<Vec<Value>, InventoryError> {
		self.provider.fetch_positions(user).await
	}
}
