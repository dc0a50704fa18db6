//! Hand-written collaborators for exercising the pipeline without network
//! access. Each one counts or records the calls it receives.

use async_trait::async_trait;
use redeemer_account::{AccountError, AccountInterface, AccountService, LocalWallet};
use redeemer_inventory::{InventoryError, InventoryInterface};
use redeemer_relayer::{CredentialIssuer, RelayerError, RelayerInterface};
use redeemer_types::{
	Address, OperationKind, RelayerAck, RelayerCredential, Signature, SignedMessage,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex};

pub use std::sync::atomic::Ordering;

// Anvil development account 0.
pub const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub fn wallet_address() -> Address {
	"0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap()
}

pub fn funder() -> Address {
	Address::repeat_byte(0x11)
}

pub fn ctf() -> Address {
	"0x4D97DCd97eC945f40cF65F87097ACe5EA0476045".parse().unwrap()
}

pub fn usdc() -> Address {
	"0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174".parse().unwrap()
}

pub struct CountingAccount {
	wallet: LocalWallet,
	signs: Arc<AtomicUsize>,
}

#[async_trait]
impl AccountInterface for CountingAccount {
	async fn address(&self) -> Result<Address, AccountError> {
		self.wallet.address().await
	}

	async fn sign_message(&self, message: &[u8]) -> Result<Signature, AccountError> {
		self.signs.fetch_add(1, Ordering::SeqCst);
		self.wallet.sign_message(message).await
	}
}

pub fn counting_account() -> (Arc<AccountService>, Arc<AtomicUsize>) {
	let signs = Arc::new(AtomicUsize::new(0));
	let account = CountingAccount {
		wallet: LocalWallet::new(KEY).unwrap(),
		signs: signs.clone(),
	};
	(Arc::new(AccountService::new(Box::new(account))), signs)
}

/// Signs something other than what it was given.
pub struct TamperingAccount {
	wallet: LocalWallet,
}

impl TamperingAccount {
	pub fn new() -> Self {
		Self {
			wallet: LocalWallet::new(KEY).unwrap(),
		}
	}
}

#[async_trait]
impl AccountInterface for TamperingAccount {
	async fn address(&self) -> Result<Address, AccountError> {
		self.wallet.address().await
	}

	async fn sign_message(&self, message: &[u8]) -> Result<Signature, AccountError> {
		let mut altered = message.to_vec();
		altered.push(b' ');
		self.wallet.sign_message(&altered).await
	}
}

#[derive(Default)]
pub struct CountingIssuer {
	issued: AtomicUsize,
}

impl CountingIssuer {
	pub fn issued(&self) -> usize {
		self.issued.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl CredentialIssuer for CountingIssuer {
	async fn issue(&self, message: &SignedMessage) -> Result<RelayerCredential, RelayerError> {
		let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
		Ok(RelayerCredential {
			api_key: "key".to_string(),
			passphrase: "pass".to_string(),
			timestamp: n as i64,
			token: format!("token-{}-{}", n, message.kind()),
			expires_at: i64::MAX,
		})
	}
}

pub struct StaticInventory {
	records: Option<Vec<Value>>,
	pub calls: Arc<AtomicUsize>,
}

impl StaticInventory {
	pub fn with_records(records: Vec<Value>) -> Self {
		Self {
			records: Some(records),
			calls: Arc::new(AtomicUsize::new(0)),
		}
	}

	/// An inventory whose feed is down.
	pub fn unavailable() -> Self {
		Self {
			records: None,
			calls: Arc::new(AtomicUsize::new(0)),
		}
	}
}

#[async_trait]
impl InventoryInterface for StaticInventory {
	async fn fetch_positions(&self, _user: &Address) -> Result<Vec<Value>, InventoryError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.records
			.clone()
			.ok_or_else(|| InventoryError::Malformed("expected a JSON array".to_string()))
	}
}

/// One call seen by [`ScriptedRelayer`].
#[derive(Debug, Clone)]
pub struct RelayedCall {
	pub kind: OperationKind,
	pub message: Value,
	pub token: String,
}

/// Relayer that accepts everything except the kinds it is told to reject.
#[derive(Default)]
pub struct ScriptedRelayer {
	rejections: HashMap<OperationKind, String>,
	pub calls: Arc<Mutex<Vec<RelayedCall>>>,
}

impl ScriptedRelayer {
	pub fn rejecting(mut self, kind: OperationKind, body: &str) -> Self {
		self.rejections.insert(kind, body.to_string());
		self
	}

	pub fn kinds(calls: &Arc<Mutex<Vec<RelayedCall>>>) -> Vec<OperationKind> {
		calls.lock().unwrap().iter().map(|c| c.kind).collect()
	}
}

#[async_trait]
impl RelayerInterface for ScriptedRelayer {
	async fn submit(
		&self,
		message: &SignedMessage,
		credential: &RelayerCredential,
	) -> Result<RelayerAck, RelayerError> {
		self.calls.lock().unwrap().push(RelayedCall {
			kind: message.kind(),
			message: serde_json::from_str(message.encoded()).unwrap(),
			token: credential.token.clone(),
		});

		if let Some(body) = self.rejections.get(&message.kind()) {
			return Err(RelayerError::Rejected {
				status: 400,
				body: body.clone(),
			});
		}

		let reference = format!("ref-{}", self.calls.lock().unwrap().len());
		Ok(RelayerAck {
			reference: reference.clone(),
			body: json!({ "transactionID": reference }),
		})
	}
}
