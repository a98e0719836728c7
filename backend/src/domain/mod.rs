//! # Domain Module
//!
//! Business logic for the savings tracker.
//!
//! ## Module Organization
//!
//! - **ledger_service**: the ledger engine (create, deposit, withdraw, mark
//!   spent, update metadata, delete)
//! - **summary_service**: aggregates derived from the collection
//! - **export_service**: CSV export of transaction history
//! - **commands**: inputs to the ledger operations
//! - **models**: ledger errors, events and outcomes
//!
//! The domain never performs I/O. It works on borrowed goal slices and hands
//! back new collections, leaving persistence to the storage layer.

pub mod commands;
pub mod export_service;
pub mod ledger_service;
pub mod models;
pub mod summary_service;

pub use export_service::*;
pub use ledger_service::*;
pub use models::goal::{LedgerError, LedgerEvent, LedgerOutcome};
pub use summary_service::*;
