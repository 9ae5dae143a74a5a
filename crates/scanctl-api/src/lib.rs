//! HTTP client for the scan manager's management-protocol gateway.
//!
//! The gateway fronts the scanner daemon and serves JSON envelopes of the
//! management protocol: `{ "status": "200", "status_text": "OK", "data": ... }`.
//! This crate owns transport mechanics (TLS, timeouts, session cookies),
//! the raw wire element types, and typed per-entity endpoints. It performs
//! no domain interpretation — `scanctl-core` converts the raw elements into
//! domain models.

pub mod client;
pub mod elements;
mod endpoints;
pub mod error;
pub mod transport;

pub use client::GmpClient;
pub use error::Error;
