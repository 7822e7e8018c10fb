//! Vellum content delivery server - integration test support.
//!
//! Re-exports the workspace crates so the HTTP tests under `tests/` can build
//! the full router over an in-memory repository.

pub use vellum_app as app;
pub use vellum_core as core;
pub use vellum_db as db;
pub use vellum_service as service;
