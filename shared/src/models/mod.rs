//! Data models
//!
//! Shared between the server and API clients. Wire names are camelCase;
//! internal IDs are `i64` (SQLite INTEGER), tracking codes are strings.

pub mod parcel;

// Re-exports
pub use parcel::*;
