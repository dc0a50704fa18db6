//! Redeemable position types.
//!
//! A [`Position`] is the normalized form of an inventory record. Records are
//! only turned into positions once both identifiers resolve to non-empty
//! values, so every `Position` in circulation is addressable on-chain.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A settled position eligible for redemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
	/// Condition identifier of the settled market.
	pub condition_id: String,
	/// Index set selecting the outcome slice within the condition.
	pub index_set: String,
	/// Value reported by the inventory service. Informational only.
	pub redeemable_amount: Decimal,
}

impl Position {
	pub fn new(
		condition_id: impl Into<String>,
		index_set: impl Into<String>,
		redeemable_amount: Decimal,
	) -> Self {
		Self {
			condition_id: condition_id.into(),
			index_set: index_set.into(),
			redeemable_amount,
		}
	}

	/// The `(conditionId, indexSet)` pair that identifies this position.
	pub fn key(&self) -> (&str, &str) {
		(&self.condition_id, &self.index_set)
	}

	/// Renders the position back into the inventory record shape.
	///
	/// The record is flagged redeemable, since the position already passed
	/// eligibility, so positions admitted by the flag alone with a zero value
	/// survive a second pass through the redeemability filter.
	pub fn to_raw_record(&self) -> serde_json::Value {
		serde_json::json!({
			"conditionId": self.condition_id,
			"indexSet": self.index_set,
			"redeemable": self.redeemable_amount.to_string(),
			"isRedeemable": true,
		})
	}
}

/// Ordered set of positions to redeem in a single batch.
///
/// Insertion order is preserved and each `(conditionId, indexSet)` pair is
/// kept at most once; later duplicates are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedeemableSet {
	positions: Vec<Position>,
	seen: HashSet<(String, String)>,
}

impl RedeemableSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends `position` unless its key is already present.
	///
	/// Returns `true` if the position was added.
	pub fn insert(&mut self, position: Position) -> bool {
		let key = (position.condition_id.clone(), position.index_set.clone());
		if !self.seen.insert(key) {
			return false;
		}
		self.positions.push(position);
		true
	}

	pub fn len(&self) -> usize {
		self.positions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Position> {
		self.positions.iter()
	}

	pub fn positions(&self) -> &[Position] {
		&self.positions
	}

	/// Sum of the reported redeemable amounts.
	pub fn total_amount(&self) -> Decimal {
		self.positions.iter().map(|p| p.redeemable_amount).sum()
	}

	pub fn to_raw_records(&self) -> Vec<serde_json::Value> {
		self.positions.iter().map(Position::to_raw_record).collect()
	}
}

impl FromIterator<Position> for RedeemableSet {
	fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
		let mut set = RedeemableSet::new();
		for position in iter {
			set.insert(position);
		}
		set
	}
}

impl<'a> IntoIterator for &'a RedeemableSet {
	type Item = &'a Position;
	type IntoIter = std::slice::Iter<'a, Position>;

	fn into_iter(self) -> Self::IntoIter {
		self.positions.iter()
	}
}

impl IntoIterator for RedeemableSet {
	type Item = Position;
	type IntoIter = std::vec::IntoIter<Position>;

	fn into_iter(self) -> Self::IntoIter {
		self.positions.into_iter()
	}
}
