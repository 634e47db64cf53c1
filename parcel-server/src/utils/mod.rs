//! Utility modules

pub mod error;
pub mod extract;
pub mod logger;
pub mod result;
pub mod validation;

pub use error::{AppError, AppResponse, ok};
pub use extract::AppJson;
pub use result::AppResult;
