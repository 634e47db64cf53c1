//! Parcel Tracking Server
//!
//! REST API for creating parcels, looking them up by tracking code and
//! moving them through their status lifecycle.
//!
//! # Module structure
//!
//! ```text
//! parcel-server/src/
//! ├── core/          # configuration, state, server
//! ├── auth/          # JWT validation, identity context
//! ├── db/            # connection pool, parcel repository
//! ├── lifecycle.rs   # status transition rules and audit log
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod lifecycle;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState, build_router};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
