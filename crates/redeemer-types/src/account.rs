//! Signature type produced by the signing collaborator.

use alloy_primitives::{Address, PrimitiveSignature, SignatureError};

/// Cryptographic signature representation.
///
/// Stores signatures as raw bytes in the standard Ethereum format (r, s, v).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(pub Vec<u8>);

impl From<PrimitiveSignature> for Signature {
	fn from(sig: PrimitiveSignature) -> Self {
		let mut bytes = Vec::with_capacity(65);
		bytes.extend_from_slice(&sig.r().to_be_bytes::<32>());
		bytes.extend_from_slice(&sig.s().to_be_bytes::<32>());
		// Personal messages carry no chain id, so v is always 27 + y_parity
		let v = if sig.v() { 28 } else { 27 };
		bytes.push(v);
		Signature(bytes)
	}
}

impl Signature {
	/// Hex form with 0x prefix, as submitted to the relayer.
	pub fn to_hex(&self) -> String {
		format!("0x{}", hex::encode(&self.0))
	}

	/// Recovers the address that signed `message` under EIP-191.
	pub fn recover_signer(&self, message: &[u8]) -> Result<Address, SignatureError> {
		let sig = PrimitiveSignature::from_raw(&self.0)?;
		sig.recover_address_from_msg(message)
	}
}
