//! HTTP relayer client.

use crate::{operation_path, RelayerError, RelayerInterface};
use async_trait::async_trait;
use redeemer_config::RelayerConfig;
use redeemer_types::{RelayerAck, RelayerCredential, SignedMessage};
use serde::Serialize;
use serde_json::value::RawValue;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Fields that may carry the relayer's identifier for an accepted
/// operation, highest priority first.
const REFERENCE_FIELDS: [&str; 4] = ["transactionID", "transactionId", "id", "hash"];

/// Request body sent to the relayer.
///
/// `message` is embedded as raw JSON so the submitted bytes are exactly the
/// bytes that were signed.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RelayRequest<'a> {
	message: &'a RawValue,
	signature: String,
	relayer_auth: &'a RelayerCredential,
}

pub struct HttpRelayer {
	client: reqwest::Client,
	base_url: String,
	clock: fn() -> i64,
}

impl HttpRelayer {
	pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RelayerError> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| RelayerError::Network(format!("Failed to build HTTP client: {}", e)))?;

		Ok(Self {
			client,
			base_url: base_url.trim_end_matches('/').to_string(),
			clock: || chrono::Utc::now().timestamp_millis(),
		})
	}

	/// Overrides the millisecond clock used for credential expiry checks.
	pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
		self.clock = clock;
		self
	}
}

fn classify(e: reqwest::Error) -> RelayerError {
	if e.is_timeout() {
		RelayerError::Timeout
	} else {
		RelayerError::Network(e.to_string())
	}
}

/// Interprets a 2xx response body.
fn parse_ack(status: u16, text: &str) -> Result<RelayerAck, RelayerError> {
	let body: Value = if text.trim().is_empty() {
		Value::Null
	} else {
		serde_json::from_str(text).map_err(|e| {
			RelayerError::InvalidResponse(format!("acknowledgment is not JSON: {}", e))
		})?
	};

	if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
		let reason = match error {
			Value::String(s) => s.clone(),
			other => other.to_string(),
		};
		return Err(RelayerError::Rejected {
			status,
			body: reason,
		});
	}

	let reference = REFERENCE_FIELDS
		.iter()
		.find_map(|field| match body.get(*field) {
			Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
			Some(Value::Number(n)) => Some(n.to_string()),
			_ => None,
		})
		.unwrap_or_default();

	if reference.is_empty() {
		warn!("relayer acknowledgment carries no reference");
	}

	Ok(RelayerAck { reference, body })
}

#[async_trait]
impl RelayerInterface for HttpRelayer {
	async fn submit(
		&self,
		message: &SignedMessage,
		credential: &RelayerCredential,
	) -> Result<RelayerAck, RelayerError> {
		if credential.is_expired_at((self.clock)()) {
			return Err(RelayerError::Credential(
				"credential expired before submission".to_string(),
			));
		}

		let raw = RawValue::from_string(message.encoded().to_string())
			.map_err(|e| RelayerError::InvalidResponse(format!("payload is not JSON: {}", e)))?;
		let request = RelayRequest {
			message: &raw,
			signature: message.signature().to_hex(),
			relayer_auth: credential,
		};

		let url = format!("{}{}", self.base_url, operation_path(message.kind()));
		debug!(%url, kind = %message.kind(), "submitting to relayer");

		let response = self
			.client
			.post(&url)
			.json(&request)
			.send()
			.await
			.map_err(classify)?;

		let status = response.status();
		let text = response.text().await.map_err(classify)?;

		if !status.is_success() {
			return Err(RelayerError::Rejected {
				status: status.as_u16(),
				body: text,
			});
		}

		parse_ack(status.as_u16(), &text)
	}
}

/// Builds the relayer client from resolved configuration.
pub fn create_relayer(config: &RelayerConfig) -> Result<Box<dyn RelayerInterface>, RelayerError> {
	Ok(Box::new(HttpRelayer::new(
		&config.url,
		Duration::from_secs(config.timeout_secs),
	)?))
}

#[cfg(test)]
mod tests {
	use super::*;
	use redeemer_types::{
		Address, AuthorizationRequest, MessagePayload, Signature, U256,
	};
	use serde_json::json;
	use wiremock::matchers::{body_partial_json, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn credential(expires_at: i64) -> RelayerCredential {
		RelayerCredential {
			api_key: "api-key".to_string(),
			passphrase: "pass".to_string(),
			timestamp: 0,
			token: "token".to_string(),
			expires_at,
		}
	}

	fn token_approval() -> SignedMessage {
		let request = AuthorizationRequest::token_approval(
			Address::ZERO,
			Address::repeat_byte(0x22),
			Address::repeat_byte(0x33),
			U256::MAX,
		);
		let payload = MessagePayload::authorization(137, &request);
		let encoded = payload.encode().unwrap();
		SignedMessage::new(payload, encoded, Signature(vec![0x01, 0x02]), Address::ZERO)
	}

	fn relayer(server: &MockServer) -> HttpRelayer {
		HttpRelayer::new(&server.uri(), Duration::from_secs(5))
			.unwrap()
			.with_clock(|| 1_000)
	}

	#[tokio::test]
	async fn test_submit_posts_triple_to_operation_path() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/approvals/token"))
			.and(body_partial_json(json!({
				"signature": "0x0102",
				"relayerAuth": { "apiKey": "api-key", "passphrase": "pass", "token": "token" },
				"message": { "kind": "tokenApproval", "chainId": 137 }
			})))
			.respond_with(
				ResponseTemplate::new(200).set_body_json(json!({ "transactionID": "tx-1" })),
			)
			.expect(1)
			.mount(&server)
			.await;

		let message = token_approval();
		let ack = relayer(&server)
			.submit(&message, &credential(60_000))
			.await
			.unwrap();
		assert_eq!(ack.reference, "tx-1");

		// The signed bytes are embedded verbatim.
		let requests = server.received_requests().await.unwrap();
		let body = String::from_utf8(requests[0].body.clone()).unwrap();
		assert!(body.contains(message.encoded()));
	}

	#[tokio::test]
	async fn test_rejection_surfaces_raw_body() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error":"nonce too low"}"#))
			.mount(&server)
			.await;

		let err = relayer(&server)
			.submit(&token_approval(), &credential(60_000))
			.await
			.unwrap_err();
		assert!(matches!(
			err,
			RelayerError::Rejected { status: 400, ref body } if body == r#"{"error":"nonce too low"}"#
		));
	}

	#[tokio::test]
	async fn test_expired_credential_not_sent() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(200))
			.expect(0)
			.mount(&server)
			.await;

		let err = relayer(&server)
			.submit(&token_approval(), &credential(1_000))
			.await
			.unwrap_err();
		assert!(matches!(err, RelayerError::Credential(_)));
	}

	#[test]
	fn test_ack_reference_fallbacks() {
		assert_eq!(parse_ack(200, r#"{"transactionId":"a","id":"b"}"#).unwrap().reference, "a");
		assert_eq!(parse_ack(200, r#"{"id":42}"#).unwrap().reference, "42");
		assert_eq!(parse_ack(200, r#"{"hash":"0xabc"}"#).unwrap().reference, "0xabc");
		assert_eq!(parse_ack(200, "").unwrap().reference, "");
	}

	#[test]
	fn test_error_field_in_success_body_is_rejection() {
		let err = parse_ack(200, r#"{"error":"already approved elsewhere"}"#).unwrap_err();
		assert!(matches!(
			err,
			RelayerError::Rejected { status: 200, ref body } if body == "already approved elsewhere"
		));
		assert!(parse_ack(200, r#"{"error":null,"id":"x"}"#).is_ok());
		assert!(matches!(
			parse_ack(200, "not json"),
			Err(RelayerError::InvalidResponse(_))
		));
	}
}
