//! Shared domain types and error taxonomy for the repcount services.

pub mod error;
pub mod types;
