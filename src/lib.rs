//! finledger - income and expense ledger
//!
//! This library provides the core of the finledger application: a personal
//! ledger and a directory of per-user ledgers, each keeping its transactions
//! and running income/expense totals, persisted as line-delimited JSON.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, ledgers, users, IDs, money)
//! - `storage`: File codec, atomic writes and repositories
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `export`: CSV and JSON export
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use finledger::config::paths::LedgerPaths;
//! use finledger::models::Money;
//! use finledger::services::LedgerService;
//! use finledger::storage::Storage;
//!
//! let mut storage = Storage::new(LedgerPaths::new()?);
//! storage.load_all()?;
//! LedgerService::personal(&storage).add_income("Salary", Money::from_cents(100000))?;
//! storage.shutdown();
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
