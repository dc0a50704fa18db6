//! Typed payloads submitted to the relayer.
//!
//! Three operation kinds exist: operator approval, token approval and the
//! batched redemption. Each is wrapped in a [`MessagePayload`] that carries the
//! chain id and is serialized to canonical JSON before signing.

use crate::{Position, RedeemableSet, Signature};
use alloy_primitives::{Address, U256};
use serde::Serialize;
use std::fmt;

/// Relayer operation a payload is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
	OperatorApproval,
	TokenApproval,
	RedeemPositions,
}

impl fmt::Display for OperationKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OperationKind::OperatorApproval => write!(f, "operator approval"),
			OperationKind::TokenApproval => write!(f, "token approval"),
			OperationKind::RedeemPositions => write!(f, "redeem positions"),
		}
	}
}

/// The two prerequisite permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthorizationKind {
	OperatorApproval,
	TokenApproval,
}

impl AuthorizationKind {
	pub fn operation(self) -> OperationKind {
		match self {
			AuthorizationKind::OperatorApproval => OperationKind::OperatorApproval,
			AuthorizationKind::TokenApproval => OperationKind::TokenApproval,
		}
	}
}

impl fmt::Display for AuthorizationKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.operation().fmt(f)
	}
}

/// A permission grant, built fresh for each run.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationRequest {
	pub kind: AuthorizationKind,
	pub owner: Address,
	/// Operator for operator approval, spender for token approval.
	pub target: Address,
	pub extra: serde_json::Value,
}

impl AuthorizationRequest {
	/// Lets `operator` move every conditional-token position held by `owner`.
	pub fn operator_approval(owner: Address, operator: Address) -> Self {
		Self {
			kind: AuthorizationKind::OperatorApproval,
			owner,
			target: operator,
			extra: serde_json::json!({ "approved": true }),
		}
	}

	/// Lets `spender` move up to `amount` of `token` from `owner`.
	pub fn token_approval(owner: Address, token: Address, spender: Address, amount: U256) -> Self {
		Self {
			kind: AuthorizationKind::TokenApproval,
			owner,
			target: spender,
			extra: serde_json::json!({
				"token": token,
				"amount": amount.to_string(),
			}),
		}
	}
}

/// Identifiers of a single position inside a redemption batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRef {
	pub condition_id: String,
	pub index_set: String,
}

impl From<&Position> for PositionRef {
	fn from(position: &Position) -> Self {
		Self {
			condition_id: position.condition_id.clone(),
			index_set: position.index_set.clone(),
		}
	}
}

/// One batch covering every position in a [`RedeemableSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct RedemptionRequest {
	pub user: Address,
	pub positions: Vec<PositionRef>,
}

impl RedemptionRequest {
	pub fn new(user: Address, set: &RedeemableSet) -> Self {
		Self {
			user,
			positions: set.iter().map(PositionRef::from).collect(),
		}
	}
}

/// Serialized body of a relayer message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
	pub kind: OperationKind,
	pub chain_id: u64,
	#[serde(flatten)]
	pub body: MessageBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageBody {
	#[serde(rename_all = "camelCase")]
	Authorization {
		owner: Address,
		target: Address,
		extra: serde_json::Value,
	},
	#[serde(rename_all = "camelCase")]
	Redemption {
		user: Address,
		positions: Vec<PositionRef>,
	},
}

impl MessagePayload {
	pub fn authorization(chain_id: u64, request: &AuthorizationRequest) -> Self {
		Self {
			kind: request.kind.operation(),
			chain_id,
			body: MessageBody::Authorization {
				owner: request.owner,
				target: request.target,
				extra: request.extra.clone(),
			},
		}
	}

	pub fn redemption(chain_id: u64, request: &RedemptionRequest) -> Self {
		Self {
			kind: OperationKind::RedeemPositions,
			chain_id,
			body: MessageBody::Redemption {
				user: request.user,
				positions: request.positions.clone(),
			},
		}
	}

	/// Canonical JSON encoding. These are the bytes that get signed.
	pub fn encode(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string(self)
	}
}

/// A payload together with the signature over its exact encoding.
///
/// Fields are private so a signed message cannot be altered after signing.
#[derive(Debug, Clone)]
pub struct SignedMessage {
	payload: MessagePayload,
	encoded: String,
	signature: Signature,
	signer: Address,
}

impl SignedMessage {
	pub fn new(
		payload: MessagePayload,
		encoded: String,
		signature: Signature,
		signer: Address,
	) -> Self {
		Self {
			payload,
			encoded,
			signature,
			signer,
		}
	}

	pub fn payload(&self) -> &MessagePayload {
		&self.payload
	}

	/// The serialized payload the signature was produced over.
	pub fn encoded(&self) -> &str {
		&self.encoded
	}

	pub fn signature(&self) -> &Signature {
		&self.signature
	}

	pub fn signer(&self) -> Address {
		self.signer
	}

	pub fn kind(&self) -> OperationKind {
		self.payload.kind
	}
}
