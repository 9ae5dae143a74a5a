//! Core domain layer for scanctl.
//!
//! Converts raw gateway elements into typed, immutable domain models and
//! caches them in per-entity reactive stores. All writes to a store flow
//! through a pure fold over an explicit action type; reads are pure
//! projections over immutable snapshots. The [`Session`] type owns the
//! gateway client and orchestrates loads against the stores.

pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod store;

pub use config::{AuthCredentials, SessionConfig, TlsVerification};
pub use error::CoreError;
pub use session::{LoadOptions, Session, Stores};
