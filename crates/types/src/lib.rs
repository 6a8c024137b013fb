//! Core types for the staking ledger backend.
//!
//! This crate provides the fundamental data structures shared across the
//! staking ledger: the delegation lifecycle state, the staking transaction
//! kind used for timelock-expiry tracking, and the explicit eligibility
//! tables that govern which state transitions each queue event may perform.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

pub mod state;
pub mod tx_type;

pub use state::{DelegationState, DelegationStateError};
pub use tx_type::{TxType, TxTypeError};
