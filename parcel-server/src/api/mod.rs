//! API route modules
//!
//! One module per resource, each exposing a `router()`:
//!
//! - [`health`] - liveness probe
//! - [`parcels`] - parcel creation, lookup, listing and lifecycle

pub mod health;
pub mod parcels;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
