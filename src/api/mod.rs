//! HTTP API for essay feedback
//!
//! Provides:
//! - the essay endpoint (`POST`/`OPTIONS`)
//! - a health check

pub mod errors;
pub mod server;

pub use server::{build_router, ApiServer, JSON_CONTENT_TYPE};
