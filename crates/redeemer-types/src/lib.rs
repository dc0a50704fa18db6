//! Shared types for the position redeemer.
//!
//! This crate holds the data model that flows between the inventory client,
//! the signing layer, the relayer transport and the orchestrator. Nothing in
//! here performs I/O.

pub mod account;
pub mod events;
pub mod message;
pub mod position;
pub mod relayer;
pub mod validation;

pub use account::*;
pub use events::*;
pub use message::*;
pub use position::*;
pub use relayer::*;
pub use validation::*;

pub use alloy_primitives::{Address, U256};
pub use rust_decimal::Decimal;
