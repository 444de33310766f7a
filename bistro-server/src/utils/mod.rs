//! Utility module — shared helpers and types
//!
//! - [`AppError`] / [`AppResponse`] - error type and response envelope
//! - [`validation`] - input validation helpers
//! - [`logger`] - tracing setup

pub mod error;
pub mod logger;
pub mod result;
pub mod validation;

pub use error::{AppError, AppResponse, ok, ok_with_message};
pub use result::AppResult;
