//! # BuildLedger API Server Library
//!
//! HTTP boundary of the BuildLedger construction ERP. Resolves the caller's
//! country from a validated bearer token and hands every request to a
//! country-scoped view of the record store.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
