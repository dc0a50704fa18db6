//! Inventory client for the Polymarket data API.

use crate::{InventoryError, InventoryInterface};
use async_trait::async_trait;
use redeemer_config::InventoryConfig;
use redeemer_types::Address;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Fetches positions from `GET <base>/positions?user=<address>`.
pub struct DataApiInventory {
	client: reqwest::Client,
	base_url: String,
}

impl DataApiInventory {
	pub fn new(base_url: &str, timeout: Duration) -> Result<Self, InventoryError> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| InventoryError::Network(format!("Failed to build HTTP client: {}", e)))?;

		Ok(Self {
			client,
			base_url: base_url.trim_end_matches('/').to_string(),
		})
	}

	fn positions_url(&self) -> String {
		format!("{}/positions", self.base_url)
	}
}

#[async_trait]
impl InventoryInterface for DataApiInventory {
	async fn fetch_positions(&self, user: &Address) -> Result<Vec<Value>, InventoryError> {
		let url = self.positions_url();
		debug!(%url, %user, "fetching positions");

		let response = self
			.client
			.get(&url)
			.query(&[("user", user.to_string())])
			.send()
			.await
			.map_err(classify)?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			warn!(status = status.as_u16(), "inventory service returned error status");
			return Err(InventoryError::Status {
				status: status.as_u16(),
				body,
			});
		}

		let body: Value = response
			.json()
			.await
			.map_err(|e| match classify(e) {
				InventoryError::Network(msg) => InventoryError::Malformed(msg),
				other => other,
			})?;

		match body {
			Value::Array(records) => Ok(records),
			other => Err(InventoryError::Malformed(format!(
				"expected a JSON array of positions, got {}",
				json_kind(&other)
			))),
		}
	}
}

fn classify(e: reqwest::Error) -> InventoryError {
	if e.is_timeout() {
		InventoryError::Timeout
	} else {
		InventoryError::Network(e.to_string())
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

/// Builds the inventory client from resolved configuration.
pub fn create_inventory(
	config: &InventoryConfig,
) -> Result<Box<dyn InventoryInterface>, InventoryError> {
	Ok(Box::new(DataApiInventory::new(
		&config.url,
		Duration::from_secs(config.timeout_secs),
	)?))
}
