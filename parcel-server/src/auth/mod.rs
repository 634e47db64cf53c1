//! Authentication
//!
//! JWT validation and the identity context handed to handlers. The acting
//! user arrives pre-authenticated; user records themselves are owned by a
//! separate user-management service and are only ever referenced by ID here.

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;

/// The authenticated caller, as injected by [`require_auth`]
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub role: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
        }
    }
}
