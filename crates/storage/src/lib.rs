//! Storage layer for the staking ledger.
//!
//! This crate defines the storage contract consumed by the event-processing
//! core. It deliberately contains no business logic: every operation is an
//! atomic document primitive (create, conditional state transition,
//! get-or-create lock, counter increment/subtract, paginated scan) and the
//! lifecycle rules live in the service layer on top.
//!
//! # Architecture
//!
//! - [`DelegationStore`]: capability trait covering the full contract
//!   surface, implemented by concrete backends
//! - [`InMemoryStore`]: in-memory implementation for testing and local runs
//!
//! Conditional transitions are compare-and-swap against the stored state:
//! a transition whose allow-list does not match the current state reports
//! `applied = false` rather than an error, which is how duplicate or
//! out-of-order deliveries are absorbed without serializing handlers.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

pub mod address;
pub mod contract;
pub mod delegation;
pub mod error;
pub mod info;
pub mod memory;
pub mod pagination;
pub mod stats;
pub mod timelock;
pub mod unprocessable;

pub use address::{DelegationFilter, PkAddressMapping};
pub use contract::DelegationStore;
pub use delegation::DelegationDocument;
pub use error::StorageError;
pub use info::BtcInfo;
pub use memory::InMemoryStore;
pub use pagination::Page;
pub use stats::{
    FinalityProviderStatsDocument, OverallStatsDocument, StakerStatsDocument, StatsLockDocument,
    StatsLockField,
};
pub use timelock::TimeLockDocument;
pub use unprocessable::UnprocessableMessageDocument;
