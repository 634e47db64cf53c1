//! Shared types for the parcel tracking service
//!
//! Domain models, pagination types and ID utilities used by both the
//! server and any API clients.

pub mod models;
pub mod types;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{Parcel, ParcelCreate, ParcelStatus, StatusLogEntry, StatusUpdate};
pub use types::{Paginated, PaginationParams, SortOrder, SortParams};
