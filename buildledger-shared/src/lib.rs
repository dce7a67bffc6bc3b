//! # BuildLedger Shared Library
//!
//! Storage and aggregation core of the BuildLedger construction ERP, shared by
//! the API server and its tooling.
//!
//! ## Module Organization
//!
//! - `models`: Entity schemas, inputs, patches and filters
//! - `store`: Dual-mode (file / PostgreSQL) record store
//! - `isolation`: Per-country caller binding
//! - `aggregation`: Balances, rollups, dashboard and report views
//! - `auth`: Password hashing, JWT and role checks
//! - `db`: Connection pool and migrations for remote storage
//! - `error`: Store error taxonomy

pub mod aggregation;
pub mod auth;
pub mod db;
pub mod error;
pub mod isolation;
pub mod models;
pub mod store;

/// Current version of the BuildLedger shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
