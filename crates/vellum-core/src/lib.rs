//! Shared configuration, constants and error types for the Vellum delivery tier.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
pub mod util;
