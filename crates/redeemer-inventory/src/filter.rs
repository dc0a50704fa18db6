//! Redeemability filter.
//!
//! Inventory records arrive with inconsistent field names and encodings.
//! Each logical field is resolved through an ordered alias table; the first
//! alias carrying a usable value wins. Records are first judged on value and
//! then on shape, and a record failing either check is excluded without
//! raising an error.

use redeemer_types::{Decimal, Position, RedeemableSet};
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::debug;

/// Aliases for the reported redeemable value, highest priority first.
pub const AMOUNT_FIELDS: [&str; 3] = ["redeemable", "redeemableValue", "redeemable_value"];
/// Aliases for the condition identifier, highest priority first.
pub const CONDITION_FIELDS: [&str; 3] = ["conditionId", "condition_id", "condition"];
/// Aliases for the index set, highest priority first.
pub const INDEX_SET_FIELDS: [&str; 3] = ["indexSet", "index_set", "index"];
/// Flag marking a record as redeemable regardless of its value.
pub const REDEEMABLE_FLAG: &str = "isRedeemable";

/// Returns the first alias for which `read` yields a value.
fn first_of<'a, T>(
	record: &'a Map<String, Value>,
	aliases: &[&str],
	read: impl Fn(&'a Value) -> Option<T>,
) -> Option<T> {
	aliases
		.iter()
		.find_map(|alias| record.get(*alias).and_then(&read))
}

/// Reads an amount alias.
///
/// Null, `false`, zero and empty strings do not count as set, so resolution
/// moves on to the next alias. Any other value settles the amount, with
/// anything that is not a representable number coercing to zero.
fn read_amount(value: &Value) -> Option<Decimal> {
	match value {
		Value::Null | Value::Bool(false) => None,
		Value::String(s) if s.is_empty() => None,
		Value::Number(n) if is_zero(n) => None,
		Value::Number(n) => Some(parse_decimal(&n.to_string()).unwrap_or(Decimal::ZERO)),
		Value::String(s) => Some(parse_decimal(s.trim()).unwrap_or(Decimal::ZERO)),
		_ => Some(Decimal::ZERO),
	}
}

fn parse_decimal(s: &str) -> Option<Decimal> {
	Decimal::from_str(s)
		.or_else(|_| Decimal::from_scientific(s))
		.ok()
}

fn is_zero(n: &serde_json::Number) -> bool {
	n.as_f64() == Some(0.0)
}

/// Reads an identifier alias. Strings are trimmed; nonzero numbers are
/// rendered in decimal. Anything else, or an empty result, does not count as
/// set.
fn read_identifier(value: &Value) -> Option<String> {
	let id = match value {
		Value::String(s) => s.trim().to_string(),
		Value::Number(n) if is_zero(n) => return None,
		Value::Number(n) => n.to_string(),
		_ => return None,
	};
	(!id.is_empty()).then_some(id)
}

/// Selects redeemable positions from raw inventory records.
#[derive(Debug, Clone)]
pub struct RedeemabilityFilter {
	min_value: Decimal,
}

/// Why a record did not make it into the redeemable set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
	/// Not an object.
	NotARecord,
	/// Not redeemable, or below the value floor.
	Value,
	/// Redeemable by value but missing an identifier.
	Shape,
	/// Same `(conditionId, indexSet)` as an earlier record.
	Duplicate,
}

impl RedeemabilityFilter {
	pub fn new(min_value: Decimal) -> Self {
		Self { min_value }
	}

	pub fn min_value(&self) -> Decimal {
		self.min_value
	}

	/// Normalizes one record into a position, or says why it was excluded.
	///
	/// Value eligibility is decided before identifiers are looked at.
	pub fn evaluate(&self, raw: &Value) -> Result<Position, Exclusion> {
		let record = raw.as_object().ok_or(Exclusion::NotARecord)?;

		let amount = first_of(record, &AMOUNT_FIELDS, read_amount).unwrap_or(Decimal::ZERO);
		let flagged = record.get(REDEEMABLE_FLAG) == Some(&Value::Bool(true));

		if !(flagged || amount > Decimal::ZERO) || amount < self.min_value {
			return Err(Exclusion::Value);
		}

		let condition_id =
			first_of(record, &CONDITION_FIELDS, read_identifier).ok_or(Exclusion::Shape)?;
		let index_set =
			first_of(record, &INDEX_SET_FIELDS, read_identifier).ok_or(Exclusion::Shape)?;

		Ok(Position::new(condition_id, index_set, amount))
	}

	/// Filters `records` into a [`RedeemableSet`], preserving input order.
	pub fn filter(&self, records: &[Value]) -> RedeemableSet {
		let mut set = RedeemableSet::new();
		let (mut by_value, mut by_shape, mut duplicates) = (0usize, 0usize, 0usize);

		for (index, raw) in records.iter().enumerate() {
			match self.evaluate(raw) {
				Ok(position) => {
					if !set.insert(position) {
						duplicates += 1;
						debug!(index, "duplicate position skipped");
					}
				}
				Err(Exclusion::Shape) => {
					by_shape += 1;
					debug!(index, "redeemable record missing condition or index set");
				}
				Err(_) => by_value += 1,
			}
		}

		debug!(
			total = records.len(),
			eligible = set.len(),
			excluded_by_value = by_value,
			excluded_by_shape = by_shape,
			duplicates,
			min_value = %self.min_value,
			"filtered inventory"
		);

		set
	}
}
