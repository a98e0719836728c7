//! # Savings Tracker
//!
//! A personal savings-goal tracker. Goals have a target amount, receive
//! deposits and withdrawals, and can be archived once the money is spent.
//! Everything is stored locally.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (CLI, confirmation prompts, notices)
//!     ↓
//! Tracker (owns the in-memory collection, write-through saves)
//!     ↓
//! Domain Layer (ledger engine, aggregates, export)
//!     ↓
//! Storage Layer (key-value store, goal repository, migration, config)
//! ```

pub mod domain;
pub mod io;
pub mod storage;
pub mod tracker;

pub use tracker::{Confirmation, GoalTracker, TrackerError};
